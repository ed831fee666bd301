//! # GBCE Core
//!
//! Exchange engine for the Global Beverage Corporation Exchange.
//!
//! ## Overview
//!
//! - **Domain models** for stocks, trades and their validation
//! - **Pricing formulas**: dividend yield, P/E ratio, volume weighted stock
//!   price and the all-share index
//! - **Registry** of listed stocks, loaded once from a [`Catalog`]
//! - **Protocol** messages and the [`Dispatcher`] that validates and routes them
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`catalog`] | Stock catalog file loading |
//! | [`clock`] | Engine clock abstraction |
//! | [`dispatcher`] | Request validation and routing |
//! | [`domain`] | Stock, trade and value types |
//! | [`error`] | Core error types |
//! | [`pricing`] | Rounding and geometric mean |
//! | [`protocol`] | Request/response messages |
//! | [`registry`] | Listed stocks and the all-share index |
//!
//! ## Quick Start
//!
//! ```rust
//! use gbce_core::{Catalog, Dispatch, Dispatcher, Registry, Request, SystemClock};
//!
//! let catalog = Catalog::from_json_str(r#"{ "sample data": [
//!     { "Symbol": "POP", "Div Type": "Common", "Last Dividend": 8,
//!       "Fixed Dividend": "None", "Par Value": 100 }
//! ] }"#)?;
//! let mut dispatcher = Dispatcher::new(Registry::from_catalog(catalog, SystemClock::shared()));
//!
//! let request = Request::new("GBCE_DIV_YIELD")
//!     .with_arg("symbol", "POP")
//!     .with_arg("price", "100.0");
//! let Dispatch::Reply(response) = dispatcher.handle(&request) else {
//!     unreachable!("only EXIT shuts down");
//! };
//! assert_eq!(response.value(), Some("0.08"));
//! # Ok::<(), gbce_core::CoreError>(())
//! ```

pub mod catalog;
pub mod clock;
pub mod dispatcher;
pub mod domain;
pub mod error;
pub mod pricing;
pub mod protocol;
pub mod registry;

pub use catalog::Catalog;
pub use clock::{Clock, ManualClock, SharedClock, SystemClock};
pub use dispatcher::{Dispatch, DispatchError, Dispatcher};
pub use domain::{
    DividendType, Stock, StockDefinition, Symbol, Trade, TradeLedger, TradeType,
    UnknownTradeType, UtcDateTime, DEFAULT_WINDOW_MINUTES,
};
pub use error::{CoreError, PricingError, ValidationError};
pub use protocol::{Action, Arguments, Request, Response, ResponseArgs, ResultValue, Status};
pub use registry::Registry;
