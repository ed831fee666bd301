//! # GBCE Server
//!
//! Everything around the exchange engine that talks to the outside world:
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`client`] | Line-protocol client and request builder |
//! | [`config`] | Layered server configuration |
//! | [`logging`] | Tracing subscriber setup |
//! | [`transport`] | NDJSON-over-TCP server loop |

pub mod client;
pub mod config;
pub mod logging;
pub mod transport;

pub use client::{build_request, ClientError, ExchangeClient};
pub use config::{ConfigError, LogConfig, LogFormat, ServerConfig};
pub use transport::{ExchangeServer, TransportError};
