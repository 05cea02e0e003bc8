use thiserror::Error;

/// Crate-wide error taxonomy.
///
/// Remote-call failures are non-fatal to the console: callers report them
/// through the notifier and keep running.
#[derive(Error, Debug)]
pub enum ConsoleError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("bot rejected the call: {0}")]
    Api(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConsoleError>;
