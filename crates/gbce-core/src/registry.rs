//! The set of stocks listed on the exchange and the all-share index.

use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::clock::SharedClock;
use crate::pricing::{geometric_mean, round_half_even, PRICE_PRECISION};
use crate::{
    Catalog, PricingError, Stock, StockDefinition, Symbol, ValidationError,
    DEFAULT_WINDOW_MINUTES,
};

/// Symbol to stock mapping, fixed after construction.
#[derive(Debug)]
pub struct Registry {
    stocks: BTreeMap<Symbol, Stock>,
}

impl Registry {
    pub fn new(
        definitions: impl IntoIterator<Item = StockDefinition>,
        clock: SharedClock,
    ) -> Result<Self, ValidationError> {
        let mut stocks: BTreeMap<Symbol, Stock> = BTreeMap::new();
        for definition in definitions {
            let symbol = definition.symbol.clone();
            if stocks.contains_key(&symbol) {
                return Err(ValidationError::DuplicateSymbol {
                    symbol: symbol.to_string(),
                });
            }
            stocks.insert(symbol, Stock::new(definition, clock.clone()));
        }

        info!(stocks = stocks.len(), "stock registry loaded");
        Ok(Self { stocks })
    }

    pub fn from_catalog(catalog: Catalog, clock: SharedClock) -> Self {
        let stocks = catalog
            .into_iter()
            .map(|definition| {
                let symbol = definition.symbol.clone();
                (symbol, Stock::new(definition, clock.clone()))
            })
            .collect::<BTreeMap<_, _>>();

        info!(stocks = stocks.len(), "stock registry loaded");
        Self { stocks }
    }

    pub fn get(&self, symbol: &str) -> Option<&Stock> {
        self.stocks.get(symbol)
    }

    pub fn get_mut(&mut self, symbol: &str) -> Option<&mut Stock> {
        self.stocks.get_mut(symbol)
    }

    /// Stocks in symbol order.
    pub fn iter(&self) -> impl Iterator<Item = &Stock> + '_ {
        self.stocks.values()
    }

    pub fn len(&self) -> usize {
        self.stocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stocks.is_empty()
    }

    /// Geometric mean of the volume weighted prices of every stock traded
    /// within the default window. `0.0` when nothing traded.
    pub fn calc_gbce_index(&self) -> Result<f64, PricingError> {
        let mut prices = Vec::with_capacity(self.stocks.len());
        for stock in self.stocks.values() {
            if let Some(price) = stock.calc_vol_weighted_stock_price(DEFAULT_WINDOW_MINUTES)? {
                prices.push(price);
            }
        }

        debug!(contributing = prices.len(), "computing all-share index");
        Ok(round_half_even(geometric_mean(&prices), PRICE_PRECISION))
    }

    pub fn clear_all_trades(&mut self) {
        for stock in self.stocks.values_mut() {
            stock.clear_trades();
        }
    }

    /// Clear all trade history and delist every stock.
    pub fn shutdown(&mut self) {
        self.clear_all_trades();
        self.stocks.clear();
    }
}
