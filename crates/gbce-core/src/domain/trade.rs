use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::Duration;

use crate::UtcDateTime;

/// Side of a recorded trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeType {
    Buy,
    Sell,
}

impl TradeType {
    pub const ALL: [Self; 2] = [Self::Buy, Self::Sell];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Buy => "BUY",
            Self::Sell => "SELL",
        }
    }
}

impl Display for TradeType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a trade side is anything but exactly `BUY` or `SELL`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown trade type '{0}'")]
pub struct UnknownTradeType(pub String);

impl FromStr for TradeType {
    type Err = UnknownTradeType;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "BUY" => Ok(Self::Buy),
            "SELL" => Ok(Self::Sell),
            other => Err(UnknownTradeType(other.to_owned())),
        }
    }
}

/// A single executed trade. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub timestamp: UtcDateTime,
    pub trade_type: TradeType,
    pub quantity: u64,
    pub price: f64,
}

/// Append-only trade history of one stock, oldest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TradeLedger {
    trades: Vec<Trade>,
}

impl TradeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, trade: Trade) {
        self.trades.push(trade);
    }

    /// Trades strictly younger than `window` as seen from `now`.
    ///
    /// A trade exactly `window` old is outside the window.
    pub fn within_window(
        &self,
        now: UtcDateTime,
        window: Duration,
    ) -> impl Iterator<Item = &Trade> + '_ {
        self.trades
            .iter()
            .filter(move |trade| now.since(trade.timestamp) < window)
    }

    pub fn clear(&mut self) {
        self.trades.clear();
    }

    pub fn len(&self) -> usize {
        self.trades.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Trade> {
        self.trades.iter()
    }
}
