use gbce_core::{Catalog, Dispatcher, Registry, SystemClock};
use gbce_server::{logging, ExchangeServer, ServerConfig};
use tracing::info;

use crate::cli::ServeArgs;
use crate::error::CliError;

pub async fn run(args: ServeArgs) -> Result<(), CliError> {
    let mut config = ServerConfig::load(args.config.as_deref())?;
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(catalog) = args.catalog {
        config.catalog_path = catalog;
    }
    if let Some(format) = args.log_format {
        config.log.format = format.into();
    }
    config.validate()?;

    logging::init(&config.log);
    info!(
        version = env!("CARGO_PKG_VERSION"),
        catalog = %config.catalog_path.display(),
        "starting exchange"
    );

    let catalog = Catalog::load(&config.catalog_path)?;
    let registry = Registry::from_catalog(catalog, SystemClock::shared());
    let server = ExchangeServer::bind(config.socket_addr()?, Dispatcher::new(registry)).await?;

    server.serve().await?;
    Ok(())
}
