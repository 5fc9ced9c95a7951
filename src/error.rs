//! Error types for the kiln command line client.

use thiserror::Error;

/// Failures talking to the build service. Any of these aborts the whole
/// command; no partial output is produced.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("decoding response: {0}")]
    Decode(String),

    #[error("protocol error: {0}")]
    Protocol(String),

    #[error("invalid service URL: {0}")]
    BadUrl(String),
}

/// A resolved payload could not be formatted for display.
#[derive(Debug, Error)]
pub enum ProjectionError {
    #[error("missing field '{0}'")]
    MissingField(&'static str),

    #[error("unexpected type for field '{0}'")]
    WrongType(&'static str),
}

/// A save target was unsafe or unwritable.
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("Invalid filename: {0}")]
    InvalidName(String),

    #[error("encoding TOML file: {0}")]
    Encode(String),

    #[error("writing {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// One item of a batch failed while being rendered or saved. Collected
/// and reported per item; never fatal to the rest of the batch.
#[derive(Debug, Error)]
pub enum ItemFailure {
    #[error("converting blueprint: {0}")]
    Projection(#[from] ProjectionError),

    #[error(transparent)]
    Save(#[from] SaveError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Outcome of one command invocation.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("API error: {0}")]
    Client(#[from] ClientError),

    /// The batch partially succeeded; everything that resolved was
    /// rendered or saved, but at least one item failed.
    #[error("{failures} item(s) failed")]
    Degraded { failures: usize },

    #[error("{0}")]
    Usage(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("writing output: {0}")]
    Io(#[from] std::io::Error),

    #[error("serializing output: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl From<config::ConfigError> for CommandError {
    fn from(err: config::ConfigError) -> Self {
        CommandError::Config(err.to_string())
    }
}
