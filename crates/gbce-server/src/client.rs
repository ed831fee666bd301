//! Line-protocol client used by `gbce client` and the integration tests.

use gbce_core::{Action, Request, Response};
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpStream, ToSocketAddrs};

use crate::transport::{write_message, TransportError};

/// Text accepted in place of a price to ask the exchange for its own price.
const NULL_PRICE_MARKERS: [&str; 2] = ["None", "null"];

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("unknown action '{0}'")]
    UnknownAction(String),

    #[error("{action} expects {expected} argument(s): {usage}")]
    Usage {
        action: &'static str,
        expected: usize,
        usage: String,
    },

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Build the request for `action` from positional command-line arguments.
///
/// Arguments follow [`Action::argument_names`] order, e.g.
/// `RECORD_TRADE TEA BUY 100 20.54`. A price of `None` asks the exchange to
/// use the stock's current price.
pub fn build_request(action: &str, params: &[String]) -> Result<Request, ClientError> {
    let parsed: Action = action
        .parse()
        .map_err(|_| ClientError::UnknownAction(action.to_owned()))?;
    let names = parsed.argument_names();

    if params.len() != names.len() {
        return Err(ClientError::Usage {
            action: parsed.as_str(),
            expected: names.len(),
            usage: names
                .iter()
                .map(|name| format!("<{name}>"))
                .collect::<Vec<_>>()
                .join(" "),
        });
    }

    let request = names.iter().zip(params).fold(
        Request::new(parsed.as_str()),
        |request, (name, value)| {
            let nullable = matches!(parsed, Action::DivYield | Action::PeRatio);
            if *name == "price" && nullable && NULL_PRICE_MARKERS.contains(&value.as_str()) {
                request.with_null_arg(*name)
            } else {
                request.with_arg(*name, value.clone())
            }
        },
    );

    Ok(request)
}

/// Connection to a running exchange.
pub struct ExchangeClient {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
}

impl ExchangeClient {
    pub async fn connect(addr: impl ToSocketAddrs) -> Result<Self, ClientError> {
        let stream = TcpStream::connect(addr)
            .await
            .map_err(TransportError::from)?;
        let (reader, writer) = stream.into_split();
        Ok(Self {
            reader: BufReader::new(reader),
            writer,
        })
    }

    /// Send `request` and wait for its response. Exit requests are not
    /// answered, so they return `None` right after sending.
    pub async fn send(&mut self, request: &Request) -> Result<Option<Response>, ClientError> {
        write_message(&mut self.writer, request).await?;

        if matches!(request.action.parse::<Action>(), Ok(Action::Exit)) && request.args.is_empty()
        {
            return Ok(None);
        }

        let mut line = String::new();
        let read = self
            .reader
            .read_line(&mut line)
            .await
            .map_err(TransportError::from)?;
        if read == 0 {
            return Err(TransportError::ConnectionClosed.into());
        }

        Ok(Some(serde_json::from_str(line.trim_end())?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn builds_record_trade_in_positional_order() {
        let request = build_request("RECORD_TRADE", &params(&["TEA", "BUY", "100", "20.54"]))
            .expect("request");

        assert_eq!(request.action, "GBCE_RECORD_TRADE");
        assert_eq!(request.args["symbol"].as_deref(), Some("TEA"));
        assert_eq!(request.args["trade_type"].as_deref(), Some("BUY"));
        assert_eq!(request.args["quantity"].as_deref(), Some("100"));
        assert_eq!(request.args["price"].as_deref(), Some("20.54"));
    }

    #[test]
    fn none_price_becomes_null() {
        let request =
            build_request("GBCE_DIV_YIELD", &params(&["POP", "None"])).expect("request");
        assert_eq!(request.args.len(), 2);
        assert_eq!(request.args["price"], None);
    }

    #[test]
    fn rejects_wrong_argument_count() {
        let err = build_request("CALC_STOCK_PRICE", &[]).expect_err("must fail");
        assert!(matches!(err, ClientError::Usage { expected: 1, .. }));
        assert!(err.to_string().contains("<symbol>"));
    }

    #[test]
    fn rejects_unknown_action() {
        let err = build_request("SHORT_SELL", &[]).expect_err("must fail");
        assert!(matches!(err, ClientError::UnknownAction(_)));
    }
}
