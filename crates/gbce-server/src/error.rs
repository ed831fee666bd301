use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] gbce_server::ConfigError),

    #[error(transparent)]
    Catalog(#[from] gbce_core::CoreError),

    #[error(transparent)]
    Client(#[from] gbce_server::ClientError),

    #[error(transparent)]
    Transport(#[from] gbce_server::TransportError),

    #[error("{action} failed: {message}")]
    Rejected { action: String, message: String },
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) | Self::Catalog(_) => 2,
            Self::Rejected { .. } => 3,
            Self::Client(_) => 4,
            Self::Transport(_) => 10,
        }
    }
}
