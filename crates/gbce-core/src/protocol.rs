//! Request/response messages exchanged with clients.
//!
//! ```json
//! {"action": "GBCE_DIV_YIELD", "args": {"symbol": "POP", "price": "100.0"}}
//! {"action": "GBCE_DIV_YIELD", "args": {"status": "success", "message": "", "value": "0.08"}}
//! ```
//!
//! Argument values are text. Numeric results travel as text as well so the
//! client sees the exact shortest representation of the computed `f64`.

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Marker value returned for acknowledged commands.
pub const SUCCESS_MARKER: &str = "success";

/// Actions understood by the exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    DivYield,
    PeRatio,
    RecordTrade,
    CalcStockPrice,
    CalcIndex,
    ClearTrades,
    Exit,
}

impl Action {
    pub const ALL: [Self; 7] = [
        Self::DivYield,
        Self::PeRatio,
        Self::RecordTrade,
        Self::CalcStockPrice,
        Self::CalcIndex,
        Self::ClearTrades,
        Self::Exit,
    ];

    /// Name used on the wire.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DivYield => "GBCE_DIV_YIELD",
            Self::PeRatio => "GBCE_PE_RATIO",
            Self::RecordTrade => "GBCE_RECORD_TRADE",
            Self::CalcStockPrice => "GBCE_CALC_STOCK_PRICE",
            Self::CalcIndex => "GBCE_CALC_GBCE_INDEX",
            Self::ClearTrades => "GBCE_CLEAR_TRADES",
            Self::Exit => "GBCE_EXIT",
        }
    }

    pub const fn short_name(self) -> &'static str {
        match self {
            Self::DivYield => "DIV_YIELD",
            Self::PeRatio => "PE_RATIO",
            Self::RecordTrade => "RECORD_TRADE",
            Self::CalcStockPrice => "CALC_STOCK_PRICE",
            Self::CalcIndex => "CALC_INDEX",
            Self::ClearTrades => "CLEAR_TRADES",
            Self::Exit => "EXIT",
        }
    }

    /// Argument names the action takes, in positional order.
    pub const fn argument_names(self) -> &'static [&'static str] {
        match self {
            Self::DivYield | Self::PeRatio => &["symbol", "price"],
            Self::RecordTrade => &["symbol", "trade_type", "quantity", "price"],
            Self::CalcStockPrice => &["symbol"],
            Self::CalcIndex | Self::ClearTrades | Self::Exit => &[],
        }
    }

    pub const fn arity(self) -> usize {
        self.argument_names().len()
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned for action names outside [`Action::ALL`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown action '{0}'")]
pub struct UnknownAction(pub String);

impl FromStr for Action {
    type Err = UnknownAction;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let short = trimmed.strip_prefix("GBCE_").unwrap_or(trimmed);
        let action = match short {
            "DIV_YIELD" => Self::DivYield,
            "PE_RATIO" => Self::PeRatio,
            "RECORD_TRADE" => Self::RecordTrade,
            "CALC_STOCK_PRICE" => Self::CalcStockPrice,
            "CALC_GBCE_INDEX" | "CALC_INDEX" => Self::CalcIndex,
            "CLEAR_TRADES" => Self::ClearTrades,
            "EXIT" => Self::Exit,
            _ => return Err(UnknownAction(value.to_owned())),
        };
        Ok(action)
    }
}

/// Named request arguments. `None` is an explicit JSON `null`.
pub type Arguments = BTreeMap<String, Option<String>>;

/// Inbound message: an action name plus its arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    pub action: String,
    #[serde(default, deserialize_with = "deserialize_arguments")]
    pub args: Arguments,
}

impl Request {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            args: Arguments::new(),
        }
    }

    pub fn with_arg(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.args.insert(name.into(), Some(value.into()));
        self
    }

    pub fn with_null_arg(mut self, name: impl Into<String>) -> Self {
        self.args.insert(name.into(), None);
        self
    }
}

/// Accepts strings and nulls as they are, renders other scalars as text.
fn deserialize_arguments<'de, D>(deserializer: D) -> Result<Arguments, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<BTreeMap<String, Value>>::deserialize(deserializer)?.unwrap_or_default();
    raw.into_iter()
        .map(|(name, value)| {
            let text = match value {
                Value::Null => None,
                Value::String(text) => Some(text),
                Value::Number(number) => Some(number.to_string()),
                Value::Bool(flag) => Some(flag.to_string()),
                Value::Array(_) | Value::Object(_) => {
                    return Err(D::Error::custom(format!(
                        "argument '{name}' must be a string, number, boolean or null"
                    )));
                }
            };
            Ok((name, text))
        })
        .collect()
}

/// Outcome flag of a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

/// Body of a response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseArgs {
    pub status: Status,
    pub message: String,
    pub value: Option<String>,
}

/// Outbound message echoing the request's action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub action: String,
    pub args: ResponseArgs,
}

impl Response {
    pub fn success(action: impl Into<String>, value: ResultValue) -> Self {
        Self {
            action: action.into(),
            args: ResponseArgs {
                status: Status::Success,
                message: String::new(),
                value: value.to_wire(),
            },
        }
    }

    pub fn error(action: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            args: ResponseArgs {
                status: Status::Error,
                message: message.into(),
                value: None,
            },
        }
    }

    pub fn is_success(&self) -> bool {
        self.args.status == Status::Success
    }

    pub fn status(&self) -> Status {
        self.args.status
    }

    pub fn value(&self) -> Option<&str> {
        self.args.value.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.args.message
    }
}

/// Value produced by a successful action, before serialisation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResultValue {
    Number(f64),
    /// No data available, e.g. no recent trades.
    Missing,
    Acknowledged,
}

impl From<Option<f64>> for ResultValue {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Self::Missing, Self::Number)
    }
}

impl ResultValue {
    /// Text carried in the response `value` field.
    pub fn to_wire(self) -> Option<String> {
        match self {
            Self::Number(value) => serde_json::Number::from_f64(value).map(|n| n.to_string()),
            Self::Missing => None,
            Self::Acknowledged => Some(String::from(SUCCESS_MARKER)),
        }
    }
}
