use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot parse configuration: {0}")]
    Extract(#[from] Box<figment::Error>),
    #[error("invalid rpc url {0}: {1}")]
    InvalidRpcUrl(String, String),
    #[error("invalid private key: expected 32 hex encoded bytes")]
    InvalidPrivateKey,
    #[error("max poll attempts must be at least 1")]
    InvalidPollAttempts,
    #[error("stream number must be at least 1")]
    InvalidStreamNumber,
    #[error("invalid database port: {0}")]
    InvalidDatabasePort(u16),
}
