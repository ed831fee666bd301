//! # Domain Models
//!
//! Stocks, trades and the value types they are built from.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Stock`] | Listed stock with its pricing formulas and trade ledger |
//! | [`StockDefinition`] | Validated static description of a stock |
//! | [`DividendType`] | Common or Preferred |
//! | [`Trade`] | Immutable trade record |
//! | [`TradeLedger`] | Append-only trade history, queried by time window |
//! | [`TradeType`] | BUY or SELL |
//! | [`Symbol`] | Validated ticker |
//! | [`UtcDateTime`] | UTC timestamp |
//!
//! Construction validates every invariant, so a [`StockDefinition`] for a
//! preferred stock always carries a fixed dividend and a common one never does:
//!
//! ```rust
//! use gbce_core::{DividendType, StockDefinition, Symbol, ValidationError};
//!
//! let symbol = Symbol::parse("GIN").unwrap();
//! let err = StockDefinition::new(symbol, DividendType::Preferred, 8.0, None, 100.0);
//! assert!(matches!(err, Err(ValidationError::MissingFixedDividend { .. })));
//! ```

mod stock;
mod symbol;
mod timestamp;
mod trade;

pub use stock::{DividendType, Stock, StockDefinition, DEFAULT_WINDOW_MINUTES};
pub use symbol::Symbol;
pub use timestamp::UtcDateTime;
pub use trade::{Trade, TradeLedger, TradeType, UnknownTradeType};
