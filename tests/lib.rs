//! Shared fixtures for the exchange integration tests.

use std::sync::Arc;

pub use gbce_core::{
    Catalog, Dispatch, Dispatcher, ManualClock, Registry, Request, Response, Status, UtcDateTime,
};

/// The catalog shipped in `data/sample_data.json`.
pub const SAMPLE_CATALOG: &str = include_str!("../data/sample_data.json");

pub fn manual_clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(
        UtcDateTime::parse("2024-06-03T09:30:00Z").expect("valid timestamp"),
    ))
}

/// Dispatcher over the sample catalog, driven by `clock`.
pub fn sample_dispatcher(clock: Arc<ManualClock>) -> Dispatcher {
    let catalog = Catalog::from_json_str(SAMPLE_CATALOG).expect("sample catalog is valid");
    Dispatcher::new(Registry::from_catalog(catalog, clock))
}

/// Handle `request`, which must not be an exit.
pub fn reply(dispatcher: &mut Dispatcher, request: Request) -> Response {
    match dispatcher.handle(&request) {
        Dispatch::Reply(response) => response,
        Dispatch::Shutdown => panic!("request unexpectedly shut the exchange down"),
    }
}

pub fn record_trade(symbol: &str, trade_type: &str, quantity: &str, price: &str) -> Request {
    Request::new("GBCE_RECORD_TRADE")
        .with_arg("symbol", symbol)
        .with_arg("trade_type", trade_type)
        .with_arg("quantity", quantity)
        .with_arg("price", price)
}

pub fn stock_price(symbol: &str) -> Request {
    Request::new("GBCE_CALC_STOCK_PRICE").with_arg("symbol", symbol)
}
