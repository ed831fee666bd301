//! Numeric helpers shared by stock and index calculations.

/// Decimal places kept for stock prices and the all-share index.
pub const PRICE_PRECISION: u32 = 4;

/// Round to `places` decimals, ties to even (`2.00005 -> 2.0`, `2.00015 -> 2.0002`).
///
/// Ties are judged on the binary value, so a decimal literal that is not
/// exactly representable rounds towards whichever side it actually lies on.
pub fn round_half_even(value: f64, places: u32) -> f64 {
    let scale = 10f64.powi(places as i32);
    (value * scale).round_ties_even() / scale
}

/// Geometric mean of strictly positive prices, `0.0` for an empty slice.
///
/// Computed in log space so long price lists cannot overflow the product.
pub fn geometric_mean(prices: &[f64]) -> f64 {
    if prices.is_empty() {
        return 0.0;
    }

    let log_sum: f64 = prices.iter().map(|price| price.ln()).sum();
    (log_sum / prices.len() as f64).exp()
}
