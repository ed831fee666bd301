//! Behavior-driven tests for the exchange's financial queries
//!
//! These tests drive the dispatcher the way a client would and check the
//! values that come back on the wire.

use gbce_tests::{
    manual_clock, record_trade, reply, sample_dispatcher, stock_price, Request, Status,
};
use time::Duration;

// =============================================================================
// Dividend Yield
// =============================================================================

#[test]
fn when_common_stock_yield_is_requested_last_dividend_is_used() {
    // Given: POP pays a last dividend of 8
    let mut dispatcher = sample_dispatcher(manual_clock());

    // When: The yield at price 100 is requested
    let request = Request::new("GBCE_DIV_YIELD")
        .with_arg("symbol", "POP")
        .with_arg("price", "100.0");
    let response = reply(&mut dispatcher, request);

    // Then: The yield is 8 / 100
    assert_eq!(response.status(), Status::Success);
    assert_eq!(response.value(), Some("0.08"));
    assert_eq!(response.message(), "");
}

#[test]
fn when_preferred_stock_yield_is_requested_fixed_dividend_is_used() {
    // Given: GIN is preferred with a 2% fixed dividend on a par value of 100
    let mut dispatcher = sample_dispatcher(manual_clock());

    // When: The yield at price 100 is requested
    let request = Request::new("GBCE_DIV_YIELD")
        .with_arg("symbol", "GIN")
        .with_arg("price", "100");
    let response = reply(&mut dispatcher, request);

    // Then: The yield is 0.02 * 100 / 100
    assert_eq!(response.value(), Some("0.02"));
}

#[test]
fn when_yield_is_requested_without_price_and_no_trades_value_is_null() {
    // Given: No trades have been recorded
    let mut dispatcher = sample_dispatcher(manual_clock());

    // When: The yield is requested with a null price
    let request = Request::new("GBCE_DIV_YIELD")
        .with_arg("symbol", "POP")
        .with_null_arg("price");
    let response = reply(&mut dispatcher, request);

    // Then: The request succeeds with no value
    assert_eq!(response.status(), Status::Success);
    assert_eq!(response.value(), None);
}

#[test]
fn when_yield_is_requested_without_price_recent_trades_set_the_price() {
    // Given: POP traded at 200
    let mut dispatcher = sample_dispatcher(manual_clock());
    reply(&mut dispatcher, record_trade("POP", "BUY", "50", "200"));

    // When: The yield is requested with a null price
    let request = Request::new("GBCE_DIV_YIELD")
        .with_arg("symbol", "POP")
        .with_null_arg("price");
    let response = reply(&mut dispatcher, request);

    // Then: The stock price is used
    assert_eq!(response.value(), Some("0.04"));
}

#[test]
fn when_yield_price_argument_is_omitted_request_is_rejected() {
    // Given: A client forgets the price argument entirely
    let mut dispatcher = sample_dispatcher(manual_clock());

    // When: Only the symbol is sent
    let request = Request::new("GBCE_DIV_YIELD").with_arg("symbol", "POP");
    let response = reply(&mut dispatcher, request);

    // Then: The arity check rejects it
    assert_eq!(response.status(), Status::Error);
    assert_eq!(response.value(), None);
    assert_eq!(response.message(), "Invalid number of arguments");
}

// =============================================================================
// P/E Ratio
// =============================================================================

#[test]
fn when_pe_ratio_is_requested_price_is_divided_by_last_dividend() {
    let mut dispatcher = sample_dispatcher(manual_clock());

    let request = Request::new("GBCE_PE_RATIO")
        .with_arg("symbol", "POP")
        .with_arg("price", "1000.0");
    let response = reply(&mut dispatcher, request);

    assert_eq!(response.value(), Some("125.0"));
}

#[test]
fn when_pe_ratio_has_no_price_value_is_null() {
    let mut dispatcher = sample_dispatcher(manual_clock());

    let request = Request::new("GBCE_PE_RATIO")
        .with_arg("symbol", "POP")
        .with_null_arg("price");
    let response = reply(&mut dispatcher, request);

    assert_eq!(response.status(), Status::Success);
    assert_eq!(response.value(), None);
}

#[test]
fn when_stock_pays_no_dividend_pe_ratio_is_null() {
    // Given: TEA has a last dividend of 0
    let mut dispatcher = sample_dispatcher(manual_clock());

    let request = Request::new("GBCE_PE_RATIO")
        .with_arg("symbol", "TEA")
        .with_arg("price", "50");
    let response = reply(&mut dispatcher, request);

    // Then: The ratio is undefined rather than an error
    assert_eq!(response.status(), Status::Success);
    assert_eq!(response.value(), None);
}

// =============================================================================
// Volume Weighted Stock Price
// =============================================================================

#[test]
fn when_buy_and_sell_are_recorded_stock_price_is_their_weighted_mean() {
    // Given: A BUY and a SELL of 100 TEA each
    let mut dispatcher = sample_dispatcher(manual_clock());
    let buy = reply(&mut dispatcher, record_trade("TEA", "BUY", "100", "20.54"));
    let sell = reply(&mut dispatcher, record_trade("TEA", "SELL", "100", "25.70"));
    assert_eq!(buy.value(), Some("success"));
    assert_eq!(sell.value(), Some("success"));

    // When: The stock price is requested
    let response = reply(&mut dispatcher, stock_price("TEA"));

    // Then: It is (100 * 20.54 + 100 * 25.70) / 200
    assert_eq!(response.value(), Some("23.12"));
}

#[test]
fn when_stock_has_no_trades_stock_price_is_null_success() {
    let mut dispatcher = sample_dispatcher(manual_clock());

    let response = reply(&mut dispatcher, stock_price("ALE"));

    assert_eq!(response.status(), Status::Success);
    assert_eq!(response.value(), None);
}

#[test]
fn when_trades_age_past_five_minutes_they_stop_counting() {
    // Given: One old trade and one recent trade
    let clock = manual_clock();
    let mut dispatcher = sample_dispatcher(clock.clone());
    reply(&mut dispatcher, record_trade("JOE", "BUY", "100", "10"));
    clock.advance(Duration::minutes(4));
    reply(&mut dispatcher, record_trade("JOE", "SELL", "300", "20"));

    // When: The first trade is exactly five minutes old
    clock.advance(Duration::minutes(1));
    let response = reply(&mut dispatcher, stock_price("JOE"));

    // Then: Only the recent trade counts
    assert_eq!(response.value(), Some("20.0"));

    // And: Once both have aged out there is no price
    clock.advance(Duration::minutes(4));
    let response = reply(&mut dispatcher, stock_price("JOE"));
    assert_eq!(response.value(), None);
}

#[test]
fn stock_price_is_rounded_to_four_decimals() {
    let mut dispatcher = sample_dispatcher(manual_clock());
    reply(&mut dispatcher, record_trade("ALE", "BUY", "3", "10"));
    reply(&mut dispatcher, record_trade("ALE", "BUY", "1", "11"));
    reply(&mut dispatcher, record_trade("ALE", "SELL", "2", "10.3333"));

    // (30 + 11 + 20.6666) / 6 = 10.2777666...
    let response = reply(&mut dispatcher, stock_price("ALE"));
    assert_eq!(response.value(), Some("10.2778"));
}

// =============================================================================
// All-Share Index
// =============================================================================

#[test]
fn when_nothing_has_traded_index_is_zero() {
    let mut dispatcher = sample_dispatcher(manual_clock());

    let response = reply(&mut dispatcher, Request::new("GBCE_CALC_GBCE_INDEX"));

    assert_eq!(response.status(), Status::Success);
    assert_eq!(response.value(), Some("0.0"));
}

#[test]
fn index_is_geometric_mean_of_traded_stocks_only() {
    // Given: Two of five stocks traded recently
    let mut dispatcher = sample_dispatcher(manual_clock());
    reply(&mut dispatcher, record_trade("TEA", "BUY", "10", "4"));
    reply(&mut dispatcher, record_trade("GIN", "SELL", "10", "9"));

    // When: The index is requested
    let response = reply(&mut dispatcher, Request::new("CALC_INDEX"));

    // Then: The untraded stocks are skipped, not counted as zero
    assert_eq!(response.value(), Some("6.0"));
}

// =============================================================================
// Clearing Trades
// =============================================================================

#[test]
fn clear_trades_resets_every_stock_and_is_idempotent() {
    // Given: Trades on several stocks
    let mut dispatcher = sample_dispatcher(manual_clock());
    reply(&mut dispatcher, record_trade("TEA", "BUY", "10", "4"));
    reply(&mut dispatcher, record_trade("POP", "BUY", "10", "150.25"));

    // When: Trades are cleared twice
    for _ in 0..2 {
        let response = reply(&mut dispatcher, Request::new("GBCE_CLEAR_TRADES"));
        assert_eq!(response.status(), Status::Success);
        assert_eq!(response.value(), None);
    }

    // Then: No stock has history and the index is back to zero
    assert!(dispatcher
        .registry()
        .iter()
        .all(|stock| stock.trades().is_empty()));
    let response = reply(&mut dispatcher, Request::new("GBCE_CALC_GBCE_INDEX"));
    assert_eq!(response.value(), Some("0.0"));
}

// =============================================================================
// Out-of-Range Results
// =============================================================================

#[test]
fn when_quantities_near_the_u64_limit_are_traded_prices_still_compute() {
    // Given: Two accepted trades whose combined quantity exceeds u64::MAX
    let mut dispatcher = sample_dispatcher(manual_clock());
    let big = "10000000000000000000";
    let buy = reply(&mut dispatcher, record_trade("POP", "BUY", big, "2"));
    let sell = reply(&mut dispatcher, record_trade("POP", "SELL", big, "4"));
    assert_eq!(buy.value(), Some("success"));
    assert_eq!(sell.value(), Some("success"));

    // When: Every VWAP-backed query runs
    let price = reply(&mut dispatcher, stock_price("POP"));
    let index = reply(&mut dispatcher, Request::new("GBCE_CALC_GBCE_INDEX"));
    let request = Request::new("GBCE_DIV_YIELD")
        .with_arg("symbol", "POP")
        .with_null_arg("price");
    let dividend_yield = reply(&mut dispatcher, request);

    // Then: They answer instead of bringing the exchange down
    assert_eq!(price.value(), Some("3.0"));
    assert_eq!(index.value(), Some("3.0"));
    assert_eq!(dividend_yield.status(), Status::Success);
}

#[test]
fn when_stock_price_overflows_an_error_is_returned_not_null() {
    // Given: A trade whose notional is beyond f64 range
    let mut dispatcher = sample_dispatcher(manual_clock());
    reply(&mut dispatcher, record_trade("ALE", "BUY", "10", "1e308"));

    // When: The price and the index are requested
    let price = reply(&mut dispatcher, stock_price("ALE"));
    let index = reply(&mut dispatcher, Request::new("GBCE_CALC_GBCE_INDEX"));

    // Then: Both are errors, distinguishable from "no recent trades"
    for response in [price, index] {
        assert_eq!(response.status(), Status::Error);
        assert_eq!(response.value(), None);
        assert!(response.message().contains("not a finite number"));
    }
}

#[test]
fn when_stock_price_rounds_to_zero_yield_reports_division_by_zero() {
    // Given: A trade so cheap its VWAP rounds to 0.0
    let mut dispatcher = sample_dispatcher(manual_clock());
    reply(&mut dispatcher, record_trade("POP", "BUY", "10", "0.00001"));

    // When: The yield is requested at the stock's own price
    let request = Request::new("GBCE_DIV_YIELD")
        .with_arg("symbol", "POP")
        .with_null_arg("price");
    let response = reply(&mut dispatcher, request);

    // Then: It is a division error rather than a null success
    assert_eq!(response.status(), Status::Error);
    assert_eq!(response.value(), None);
    assert!(response.message().contains("division by zero"));
}
