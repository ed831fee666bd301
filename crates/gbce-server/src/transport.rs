//! # Request/Reply Transport
//!
//! Newline-delimited JSON over TCP. Every request line is answered by exactly
//! one response line, except `GBCE_EXIT`, which is never answered.
//!
//! Connections are read concurrently, but all requests are funnelled through a
//! single engine loop that owns the [`Dispatcher`]:
//!
//! ```text
//! ┌────────────┐   Inbound    ┌──────────────┐
//! │ connection │─────────────▶│  engine loop │──▶ Dispatcher ──▶ Registry
//! │   tasks    │◀─────────────│ (one at a    │
//! └────────────┘   oneshot    │  time)       │
//!                              └──────────────┘
//! ```
//!
//! so the registry never sees two requests at once and needs no locking.

use std::net::SocketAddr;

use gbce_core::{Dispatch, Dispatcher, Request, Response};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream, ToSocketAddrs};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, info_span, warn};
use uuid::Uuid;

const REQUEST_QUEUE_DEPTH: usize = 64;

/// Transport-level failures.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("failed to encode message: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("connection closed before a response arrived")]
    ConnectionClosed,
}

/// A decoded request waiting for the engine, with the slot for its reply.
/// `None` in the slot means no reply will be sent.
struct Inbound {
    request: Request,
    reply: oneshot::Sender<Option<Response>>,
}

/// Exchange bound to a TCP listener.
pub struct ExchangeServer {
    listener: TcpListener,
    dispatcher: Dispatcher,
}

impl ExchangeServer {
    pub async fn bind(
        addr: impl ToSocketAddrs,
        dispatcher: Dispatcher,
    ) -> Result<Self, TransportError> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self {
            listener,
            dispatcher,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, TransportError> {
        Ok(self.listener.local_addr()?)
    }

    /// Serve until a client sends `GBCE_EXIT`.
    ///
    /// Returns once the exchange state is cleared and the listener released.
    pub async fn serve(self) -> Result<(), TransportError> {
        let Self {
            listener,
            mut dispatcher,
        } = self;
        let (requests, mut inbox) = mpsc::channel::<Inbound>(REQUEST_QUEUE_DEPTH);

        info!(addr = %listener.local_addr()?, "server listening");

        loop {
            tokio::select! {
                accepted = listener.accept() => match accepted {
                    Ok((stream, peer)) => {
                        debug!(%peer, "client connected");
                        let requests = requests.clone();
                        tokio::spawn(async move {
                            if let Err(error) = handle_connection(stream, requests).await {
                                warn!(%peer, %error, "connection closed with error");
                            }
                        });
                    }
                    Err(error) => warn!(%error, "failed to accept connection"),
                },
                Some(inbound) = inbox.recv() => {
                    let span = info_span!(
                        "request",
                        request_id = %Uuid::new_v4(),
                        action = %inbound.request.action,
                    );
                    let dispatch = span.in_scope(|| dispatcher.handle(&inbound.request));

                    match dispatch {
                        Dispatch::Reply(response) => {
                            if inbound.reply.send(Some(response)).is_err() {
                                debug!("client went away before its reply");
                            }
                        }
                        Dispatch::Shutdown => {
                            let _ = inbound.reply.send(None);
                            break;
                        }
                    }
                }
            }
        }

        drop(listener);
        info!("server exit");
        Ok(())
    }
}

async fn handle_connection(
    stream: TcpStream,
    requests: mpsc::Sender<Inbound>,
) -> Result<(), TransportError> {
    let (reader, mut writer) = stream.into_split();
    let mut lines = BufReader::new(reader).lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<Request>(&line) {
            Ok(request) => {
                let (reply, pending) = oneshot::channel();
                if requests.send(Inbound { request, reply }).await.is_err() {
                    break;
                }
                match pending.await {
                    Ok(Some(response)) => response,
                    Ok(None) | Err(_) => break,
                }
            }
            Err(error) => {
                warn!(%error, "malformed request");
                Response::error(
                    echoed_action(&line),
                    format!("Malformed request: {error}"),
                )
            }
        };

        write_message(&mut writer, &response).await?;
    }

    Ok(())
}

/// Best-effort action name of an undecodable request line.
fn echoed_action(line: &str) -> String {
    serde_json::from_str::<Value>(line)
        .ok()
        .and_then(|value| value.get("action")?.as_str().map(str::to_owned))
        .unwrap_or_default()
}

/// Write `message` as one JSON line and flush.
pub async fn write_message<W, T>(writer: &mut W, message: &T) -> Result<(), TransportError>
where
    W: AsyncWrite + Unpin,
    T: Serialize,
{
    let mut line = serde_json::to_vec(message)?;
    line.push(b'\n');
    writer.write_all(&line).await?;
    writer.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn echoes_action_of_partially_valid_request() {
        assert_eq!(
            echoed_action(r#"{"action":"GBCE_PE_RATIO","args":{"symbol":["POP"]}}"#),
            "GBCE_PE_RATIO"
        );
        assert_eq!(echoed_action("not json"), "");
        assert_eq!(echoed_action(r#"{"action": 7}"#), "");
    }

    #[tokio::test]
    async fn writes_one_line_per_message() {
        let mut buffer = Vec::new();
        let response = Response::error("GBCE_EXIT", "Invalid number of arguments");
        write_message(&mut buffer, &response).await.expect("write");

        let text = String::from_utf8(buffer).expect("utf8");
        assert!(text.ends_with('\n'));
        assert_eq!(text.matches('\n').count(), 1);
        let decoded: Response = serde_json::from_str(text.trim_end()).expect("decode");
        assert_eq!(decoded, response);
    }
}
