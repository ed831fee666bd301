//! Stock catalog loading.
//!
//! The catalog keeps the layout of the exchange's sample data file:
//!
//! ```json
//! { "sample data": [
//!   { "Symbol": "GIN", "Div Type": "Preferred", "Last Dividend": 8,
//!     "Fixed Dividend": 2, "Par Value": 100 }
//! ] }
//! ```
//!
//! `"Fixed Dividend"` is a percentage; common stocks carry `"None"` or `null`.

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use crate::{CoreError, DividendType, StockDefinition, Symbol, ValidationError};

const NOT_APPLICABLE_MARKERS: [&str; 3] = ["None", "N/A", ""];

#[derive(Debug, Deserialize)]
struct RawCatalog {
    #[serde(rename = "sample data")]
    entries: Vec<RawStock>,
}

#[derive(Debug, Deserialize)]
struct RawStock {
    #[serde(rename = "Symbol")]
    symbol: String,
    #[serde(rename = "Div Type")]
    dividend_type: String,
    #[serde(rename = "Last Dividend")]
    last_dividend: f64,
    #[serde(rename = "Fixed Dividend", default)]
    fixed_dividend: Option<RawFixedDividend>,
    #[serde(rename = "Par Value")]
    par_value: f64,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawFixedDividend {
    Percent(f64),
    Text(String),
}

impl RawFixedDividend {
    /// Percent value, `None` when marked as not applicable.
    fn percent(&self) -> Result<Option<f64>, ValidationError> {
        match self {
            Self::Percent(value) => Ok(Some(*value)),
            Self::Text(text) => {
                let trimmed = text.trim();
                if NOT_APPLICABLE_MARKERS.contains(&trimmed) {
                    return Ok(None);
                }
                trimmed
                    .parse::<f64>()
                    .map(Some)
                    .map_err(|_| ValidationError::InvalidFixedDividend {
                        value: text.clone(),
                    })
            }
        }
    }
}

impl TryFrom<RawStock> for StockDefinition {
    type Error = ValidationError;

    fn try_from(raw: RawStock) -> Result<Self, Self::Error> {
        let symbol = Symbol::parse(&raw.symbol)?;
        let dividend_type: DividendType = raw.dividend_type.parse()?;
        let percent = match &raw.fixed_dividend {
            Some(field) => field.percent()?,
            None => None,
        };

        StockDefinition::new(
            symbol,
            dividend_type,
            raw.last_dividend,
            percent.map(|percent| percent / 100.0),
            raw.par_value,
        )
    }
}

/// Validated list of stocks to list on the exchange, in file order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Catalog {
    stocks: Vec<StockDefinition>,
}

impl Catalog {
    pub fn new(stocks: Vec<StockDefinition>) -> Result<Self, ValidationError> {
        let mut seen = HashSet::with_capacity(stocks.len());
        for stock in &stocks {
            if !seen.insert(stock.symbol.as_str()) {
                return Err(ValidationError::DuplicateSymbol {
                    symbol: stock.symbol.to_string(),
                });
            }
        }

        Ok(Self { stocks })
    }

    pub fn from_json_str(input: &str) -> Result<Self, CoreError> {
        let raw: RawCatalog = serde_json::from_str(input)?;
        let stocks = raw
            .entries
            .into_iter()
            .map(StockDefinition::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::new(stocks)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn stocks(&self) -> &[StockDefinition] {
        &self.stocks
    }

    pub fn len(&self) -> usize {
        self.stocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stocks.is_empty()
    }
}

impl IntoIterator for Catalog {
    type Item = StockDefinition;
    type IntoIter = std::vec::IntoIter<StockDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.stocks.into_iter()
    }
}
