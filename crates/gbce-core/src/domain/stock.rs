use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::Duration;
use tracing::info;

use crate::clock::SharedClock;
use crate::pricing::{round_half_even, PRICE_PRECISION};
use crate::{PricingError, Symbol, Trade, TradeLedger, TradeType, ValidationError};

/// Default look-back window for the volume weighted stock price.
pub const DEFAULT_WINDOW_MINUTES: f64 = 5.0;

/// How a stock's dividend is determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DividendType {
    Common,
    Preferred,
}

impl DividendType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Common => "Common",
            Self::Preferred => "Preferred",
        }
    }
}

impl Display for DividendType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DividendType {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "Common" => Ok(Self::Common),
            "Preferred" => Ok(Self::Preferred),
            other => Err(ValidationError::InvalidDividendType {
                value: other.to_owned(),
            }),
        }
    }
}

/// Static description of a listed stock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockDefinition {
    pub symbol: Symbol,
    pub dividend_type: DividendType,
    pub last_dividend: f64,
    /// Fixed dividend as a ratio (`0.02` for 2%). Present only for preferred stock.
    pub fixed_dividend: Option<f64>,
    pub par_value: f64,
}

impl StockDefinition {
    pub fn new(
        symbol: Symbol,
        dividend_type: DividendType,
        last_dividend: f64,
        fixed_dividend: Option<f64>,
        par_value: f64,
    ) -> Result<Self, ValidationError> {
        validate_non_negative("last_dividend", last_dividend)?;
        validate_positive("par_value", par_value)?;

        match (dividend_type, fixed_dividend) {
            (DividendType::Preferred, None) => {
                return Err(ValidationError::MissingFixedDividend {
                    symbol: symbol.to_string(),
                });
            }
            (DividendType::Common, Some(_)) => {
                return Err(ValidationError::UnexpectedFixedDividend {
                    symbol: symbol.to_string(),
                });
            }
            (DividendType::Preferred, Some(ratio)) => {
                validate_non_negative("fixed_dividend", ratio)?;
            }
            (DividendType::Common, None) => {}
        }

        Ok(Self {
            symbol,
            dividend_type,
            last_dividend,
            fixed_dividend,
            par_value,
        })
    }

    /// Common stock: no fixed dividend.
    pub fn common(
        symbol: Symbol,
        last_dividend: f64,
        par_value: f64,
    ) -> Result<Self, ValidationError> {
        Self::new(symbol, DividendType::Common, last_dividend, None, par_value)
    }

    /// Preferred stock with `fixed_dividend_percent` given in percent (`2.0` for 2%).
    pub fn preferred(
        symbol: Symbol,
        last_dividend: f64,
        fixed_dividend_percent: f64,
        par_value: f64,
    ) -> Result<Self, ValidationError> {
        Self::new(
            symbol,
            DividendType::Preferred,
            last_dividend,
            Some(fixed_dividend_percent / 100.0),
            par_value,
        )
    }
}

/// A listed stock together with its trade history.
pub struct Stock {
    definition: StockDefinition,
    trades: TradeLedger,
    clock: SharedClock,
}

impl std::fmt::Debug for Stock {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stock")
            .field("definition", &self.definition)
            .field("trades", &self.trades.len())
            .finish()
    }
}

impl Stock {
    pub fn new(definition: StockDefinition, clock: SharedClock) -> Self {
        Self {
            definition,
            trades: TradeLedger::new(),
            clock,
        }
    }

    pub fn symbol(&self) -> &Symbol {
        &self.definition.symbol
    }

    pub fn definition(&self) -> &StockDefinition {
        &self.definition
    }

    pub fn trades(&self) -> &TradeLedger {
        &self.trades
    }

    /// Dividend yield at `price`, or at the current volume weighted price when
    /// `price` is `None`. `Ok(None)` when no price can be determined.
    pub fn calc_dividend_yield(&self, price: Option<f64>) -> Result<Option<f64>, PricingError> {
        let price = match price {
            Some(price) => price,
            None => match self.calc_vol_weighted_stock_price(DEFAULT_WINDOW_MINUTES)? {
                Some(price) => price,
                None => return Ok(None),
            },
        };
        let price = checked_price(price)?;

        let dividend = match (self.definition.dividend_type, self.definition.fixed_dividend) {
            (DividendType::Preferred, Some(ratio)) => ratio * self.definition.par_value,
            _ => self.definition.last_dividend,
        };

        finite("dividend yield", dividend / price).map(Some)
    }

    /// Price/earnings ratio. `Ok(None)` when no price is given or the stock
    /// pays no dividend.
    pub fn calc_pe_ratio(&self, price: Option<f64>) -> Result<Option<f64>, PricingError> {
        let Some(price) = price else {
            return Ok(None);
        };
        let price = checked_price(price)?;

        if self.definition.last_dividend == 0.0 {
            return Ok(None);
        }

        finite("P/E ratio", price / self.definition.last_dividend).map(Some)
    }

    /// Append a trade stamped with the engine clock.
    pub fn record_trade(&mut self, trade_type: TradeType, quantity: u64, price: f64) {
        let trade = Trade {
            timestamp: self.clock.now(),
            trade_type,
            quantity,
            price,
        };
        self.trades.append(trade);
    }

    /// Quantity weighted mean price of the trades younger than
    /// `window_minutes`, rounded to four decimals. `Ok(None)` when nothing
    /// traded in the window.
    pub fn calc_vol_weighted_stock_price(
        &self,
        window_minutes: f64,
    ) -> Result<Option<f64>, PricingError> {
        let now = self.clock.now();
        let window = Duration::seconds_f64(window_minutes * 60.0);

        // Summed as u128 so u64-sized quantities cannot overflow.
        let (notional, volume) = self
            .trades
            .within_window(now, window)
            .fold((0.0_f64, 0_u128), |(notional, volume), trade| {
                (
                    notional + trade.price * trade.quantity as f64,
                    volume + u128::from(trade.quantity),
                )
            });

        if volume == 0 {
            info!(
                symbol = %self.definition.symbol,
                window_minutes,
                "no recent trades, stock price cannot be calculated"
            );
            return Ok(None);
        }

        let price = finite("stock price", notional / volume as f64)?;
        Ok(Some(round_half_even(price, PRICE_PRECISION)))
    }

    pub fn clear_trades(&mut self) {
        self.trades.clear();
    }
}

fn checked_price(price: f64) -> Result<f64, PricingError> {
    if price == 0.0 {
        return Err(PricingError::ZeroPrice);
    }
    if !price.is_finite() || price < 0.0 {
        return Err(PricingError::InvalidPrice { value: price });
    }
    Ok(price)
}

fn finite(quantity: &'static str, value: f64) -> Result<f64, PricingError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(PricingError::NonFiniteResult { quantity })
    }
}

fn validate_non_negative(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteValue { field });
    }
    if value < 0.0 {
        return Err(ValidationError::NegativeValue { field });
    }
    Ok(())
}

fn validate_positive(field: &'static str, value: f64) -> Result<(), ValidationError> {
    validate_non_negative(field, value)?;
    if value == 0.0 {
        return Err(ValidationError::NonPositiveValue { field });
    }
    Ok(())
}
