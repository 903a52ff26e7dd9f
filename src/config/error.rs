use thiserror::Error;

/// Startup configuration failure.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read TODO_API__* settings: {0}")]
    Source(#[from] config::ConfigError),

    #[error("rejected settings: {0}")]
    Invalid(#[from] ValidationError),
}

/// A setting that parsed but makes no sense.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingRequired(&'static str),

    #[error("server port must be non-zero")]
    InvalidPort,

    #[error("'{0}' is not a bindable address")]
    InvalidBindAddress(String),

    #[error("database url must use the postgres:// or postgresql:// scheme")]
    InvalidDatabaseUrl,

    #[error("database min_connections is greater than max_connections")]
    InvalidPoolSize,

    #[error("database max_connections is above 100")]
    PoolSizeTooLarge,

    #[error("database acquire_timeout_secs must be at least 1")]
    InvalidAcquireTimeout,
}
