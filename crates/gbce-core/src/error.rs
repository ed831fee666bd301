use thiserror::Error;

/// Validation and contract errors exposed by `gbce-core`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("symbol cannot be empty")]
    EmptySymbol,
    #[error("symbol length {len} exceeds max {max}")]
    SymbolTooLong { len: usize, max: usize },
    #[error("symbol must start with an ASCII letter: '{ch}'")]
    SymbolInvalidStart { ch: char },
    #[error("symbol contains invalid character '{ch}' at index {index}")]
    SymbolInvalidChar { ch: char, index: usize },
    #[error("duplicate symbol '{symbol}' in stock catalog")]
    DuplicateSymbol { symbol: String },

    #[error("invalid dividend type '{value}', expected Common or Preferred")]
    InvalidDividendType { value: String },
    #[error("preferred stock '{symbol}' requires a fixed dividend")]
    MissingFixedDividend { symbol: String },
    #[error("common stock '{symbol}' cannot carry a fixed dividend")]
    UnexpectedFixedDividend { symbol: String },
    #[error("invalid fixed dividend marker '{value}', expected a number or \"None\"")]
    InvalidFixedDividend { value: String },

    #[error("timestamp must be RFC3339 UTC (suffix Z): '{value}'")]
    TimestampNotUtc { value: String },

    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },
    #[error("field '{field}' must be non-negative")]
    NegativeValue { field: &'static str },
    #[error("field '{field}' must be positive")]
    NonPositiveValue { field: &'static str },
}

/// Reasons a pricing formula refuses a caller-supplied price.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum PricingError {
    #[error("division by zero: price must be non-zero")]
    ZeroPrice,
    #[error("price must be a positive finite number, got {value}")]
    InvalidPrice { value: f64 },
    #[error("{quantity} is out of range: result is not a finite number")]
    NonFiniteResult { quantity: &'static str },
}

/// Top-level error type for core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("failed to read stock catalog: {0}")]
    Io(#[from] std::io::Error),
}
