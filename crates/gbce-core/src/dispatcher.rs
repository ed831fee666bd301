//! Request validation and routing.
//!
//! Every request goes through the same steps, stopping at the first failure:
//!
//! 1. the action is known and the argument count matches its arity,
//! 2. the `symbol` argument names a listed stock,
//! 3. `price` and `quantity` parse as numbers, and are positive for a trade,
//! 4. `trade_type` is `BUY` or `SELL`,
//!
//! after which the domain operation runs and its result is wrapped in a
//! [`Response`]. Failures become error responses; nothing here is fatal.

use std::str::FromStr;

use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::protocol::{Action, Arguments, Request, Response, ResultValue};
use crate::{PricingError, Registry, Stock, TradeType, DEFAULT_WINDOW_MINUTES};

/// Why a request was rejected. The display text is sent back to the client.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DispatchError {
    #[error("Invalid number of arguments")]
    InvalidArgumentCount,

    #[error("Missing argument '{name}'")]
    MissingArgument { name: &'static str },

    #[error("Argument '{name}' cannot be null")]
    NullArgument { name: &'static str },

    #[error("Invalid Symbol '{symbol}'")]
    InvalidSymbol { symbol: String },

    #[error("Invalid numeric value for '{name}': '{value}'")]
    InvalidNumber { name: &'static str, value: String },

    #[error("Argument '{name}' must be positive")]
    NonPositiveArgument { name: &'static str },

    #[error("Trade type can be either BUY or SELL")]
    InvalidTradeType,

    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// What the transport should do after a request was handled.
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatch {
    Reply(Response),
    /// Orderly stop requested; no reply is sent.
    Shutdown,
}

/// A request whose arguments passed validation.
#[derive(Debug, Clone, PartialEq)]
enum Command {
    DivYield {
        symbol: String,
        price: Option<f64>,
    },
    PeRatio {
        symbol: String,
        price: Option<f64>,
    },
    RecordTrade {
        symbol: String,
        trade_type: TradeType,
        quantity: u64,
        price: f64,
    },
    CalcStockPrice {
        symbol: String,
    },
    CalcIndex,
    ClearTrades,
    Exit,
}

/// Turns requests into registry calls, one at a time.
#[derive(Debug)]
pub struct Dispatcher {
    registry: Registry,
}

impl Dispatcher {
    pub fn new(registry: Registry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    pub fn handle(&mut self, request: &Request) -> Dispatch {
        match self.execute(request) {
            Ok(None) => {
                info!("exit requested, clearing exchange state");
                self.registry.shutdown();
                Dispatch::Shutdown
            }
            Ok(Some(value)) => {
                debug!(action = %request.action, value = ?value, "request handled");
                Dispatch::Reply(Response::success(request.action.clone(), value))
            }
            Err(error) => {
                warn!(action = %request.action, %error, "request rejected");
                Dispatch::Reply(Response::error(request.action.clone(), error.to_string()))
            }
        }
    }

    /// `Ok(None)` means the exchange should shut down.
    fn execute(&mut self, request: &Request) -> Result<Option<ResultValue>, DispatchError> {
        let command = self.validate(request)?;
        info!(action = %request.action, args = ?request.args, "processing request");

        let value = match command {
            Command::DivYield { symbol, price } => {
                self.stock(&symbol)?.calc_dividend_yield(price)?.into()
            }
            Command::PeRatio { symbol, price } => {
                self.stock(&symbol)?.calc_pe_ratio(price)?.into()
            }
            Command::RecordTrade {
                symbol,
                trade_type,
                quantity,
                price,
            } => {
                self.registry
                    .get_mut(&symbol)
                    .ok_or(DispatchError::InvalidSymbol { symbol })?
                    .record_trade(trade_type, quantity, price);
                ResultValue::Acknowledged
            }
            Command::CalcStockPrice { symbol } => self
                .stock(&symbol)?
                .calc_vol_weighted_stock_price(DEFAULT_WINDOW_MINUTES)?
                .into(),
            Command::CalcIndex => ResultValue::Number(self.registry.calc_gbce_index()?),
            Command::ClearTrades => {
                self.registry.clear_all_trades();
                ResultValue::Missing
            }
            Command::Exit => return Ok(None),
        };

        Ok(Some(value))
    }

    fn stock(&self, symbol: &str) -> Result<&Stock, DispatchError> {
        self.registry
            .get(symbol)
            .ok_or_else(|| DispatchError::InvalidSymbol {
                symbol: symbol.to_owned(),
            })
    }

    fn validate(&self, request: &Request) -> Result<Command, DispatchError> {
        let action =
            Action::from_str(&request.action).map_err(|_| DispatchError::InvalidArgumentCount)?;
        let args = &request.args;

        if args.len() != action.arity() {
            return Err(DispatchError::InvalidArgumentCount);
        }
        for &name in action.argument_names() {
            if !args.contains_key(name) {
                return Err(DispatchError::MissingArgument { name });
            }
        }

        let symbol = match args.get("symbol") {
            Some(raw) => {
                let symbol = required(args, "symbol", raw.as_deref())?;
                if self.registry.get(symbol).is_none() {
                    return Err(DispatchError::InvalidSymbol {
                        symbol: symbol.to_owned(),
                    });
                }
                Some(symbol.to_owned())
            }
            None => None,
        };

        let command = match (action, symbol) {
            (Action::DivYield, Some(symbol)) => Command::DivYield {
                symbol,
                price: optional_number(args, "price")?,
            },
            (Action::PeRatio, Some(symbol)) => Command::PeRatio {
                symbol,
                price: optional_number(args, "price")?,
            },
            (Action::RecordTrade, Some(symbol)) => {
                let quantity: u64 = required_number(args, "quantity")?;
                let price: f64 = required_number(args, "price")?;
                if quantity == 0 {
                    return Err(DispatchError::NonPositiveArgument { name: "quantity" });
                }
                if price <= 0.0 {
                    return Err(DispatchError::NonPositiveArgument { name: "price" });
                }

                let trade_type = required(args, "trade_type", None)?
                    .parse::<TradeType>()
                    .map_err(|_| DispatchError::InvalidTradeType)?;

                Command::RecordTrade {
                    symbol,
                    trade_type,
                    quantity,
                    price,
                }
            }
            (Action::CalcStockPrice, Some(symbol)) => Command::CalcStockPrice { symbol },
            (Action::CalcIndex, _) => Command::CalcIndex,
            (Action::ClearTrades, _) => Command::ClearTrades,
            (Action::Exit, _) => Command::Exit,
            (_, None) => return Err(DispatchError::MissingArgument { name: "symbol" }),
        };

        Ok(command)
    }
}

/// Non-null text of `name`. `value` short-circuits the lookup when the
/// caller already holds it.
fn required<'a>(
    args: &'a Arguments,
    name: &'static str,
    value: Option<&'a str>,
) -> Result<&'a str, DispatchError> {
    if let Some(value) = value {
        return Ok(value);
    }
    args.get(name)
        .ok_or(DispatchError::MissingArgument { name })?
        .as_deref()
        .ok_or(DispatchError::NullArgument { name })
}

/// JSON number text, where JSON `null` (as a value or as text) means absent.
fn optional_number(args: &Arguments, name: &'static str) -> Result<Option<f64>, DispatchError> {
    match args.get(name).and_then(|value| value.as_deref()) {
        None => Ok(None),
        Some(text) => parse_number::<Option<f64>>(name, text),
    }
}

fn required_number<T: DeserializeOwned>(
    args: &Arguments,
    name: &'static str,
) -> Result<T, DispatchError> {
    let text = required(args, name, None)?;
    parse_number::<Option<T>>(name, text)?.ok_or(DispatchError::NullArgument { name })
}

fn parse_number<T: DeserializeOwned>(name: &'static str, text: &str) -> Result<T, DispatchError> {
    serde_json::from_str(text.trim()).map_err(|_| DispatchError::InvalidNumber {
        name,
        value: text.to_owned(),
    })
}
