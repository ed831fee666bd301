//! CLI argument definitions for the `gbce` binary.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `serve` | Load the stock catalog and serve requests |
//! | `client` | Send one action to a running exchange |
//!
//! # Examples
//!
//! ```bash
//! # Start the exchange with the bundled sample data
//! gbce serve --catalog data/sample_data.json
//!
//! # Record a trade and query the stock price
//! gbce client RECORD_TRADE TEA BUY 100 20.54
//! gbce client CALC_STOCK_PRICE TEA
//!
//! # Dividend yield at the current stock price
//! gbce client DIV_YIELD POP None
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use gbce_server::LogFormat;

/// Global Beverage Corporation Exchange
///
/// A super simple stock market: record trades, then ask for dividend yields,
/// P/E ratios, volume weighted stock prices and the all-share index.
#[derive(Debug, Parser)]
#[command(name = "gbce", author, version, about = "Super simple stock market")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start the exchange server.
    Serve(ServeArgs),

    /// Send a single action to a running exchange.
    ///
    /// Actions and their arguments:
    ///
    ///   DIV_YIELD <symbol> <price|None>
    ///   PE_RATIO <symbol> <price|None>
    ///   RECORD_TRADE <symbol> <BUY|SELL> <quantity> <price>
    ///   CALC_STOCK_PRICE <symbol>
    ///   CALC_INDEX
    ///   CLEAR_TRADES
    ///   EXIT
    Client(ClientArgs),
}

/// Log format as accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    Compact,
    Pretty,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(value: LogFormatArg) -> Self {
        match value {
            LogFormatArg::Compact => Self::Compact,
            LogFormatArg::Pretty => Self::Pretty,
            LogFormatArg::Json => Self::Json,
        }
    }
}

/// Arguments for the `serve` command.
#[derive(Debug, Args)]
pub struct ServeArgs {
    /// JSON configuration file.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Listen address (overrides config and GBCE_HOST).
    #[arg(long)]
    pub host: Option<String>,

    /// Listen port (overrides config and GBCE_PORT).
    #[arg(long)]
    pub port: Option<u16>,

    /// Stock catalog file (overrides config and GBCE_CATALOG).
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Log output format.
    #[arg(long, value_enum)]
    pub log_format: Option<LogFormatArg>,
}

/// Arguments for the `client` command.
#[derive(Debug, Args)]
pub struct ClientArgs {
    /// Exchange host.
    #[arg(long, default_value = "localhost")]
    pub host: String,

    /// Exchange port.
    #[arg(long, default_value_t = 5555)]
    pub port: u16,

    /// Action name, with or without the GBCE_ prefix.
    pub action: String,

    /// Positional action arguments.
    #[arg(num_args = 0.., allow_hyphen_values = true)]
    pub params: Vec<String>,
}
