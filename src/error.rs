/// Error types shared across the client
///
/// Remote failures are `Clone` because they travel inside iced messages.
use thiserror::Error;

/// Failure of a call against the image collection API
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The request never produced a response (connection refused, DNS, ...)
    #[error("transport error: {0}")]
    Transport(String),

    /// The service answered with a non-success status
    #[error("service returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body did not match the expected shape
    #[error("malformed response: {0}")]
    Decode(String),

    /// A request URL could not be built
    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Transport(err.to_string())
    }
}

/// Failure reading or writing the persisted session slot
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("session storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("session storage io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not determine a data directory for the session store")]
    NoDataDir,

    #[error("session store lock poisoned")]
    Poisoned,
}

/// Invalid configuration value
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {key} value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// A picked file that cannot be uploaded
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UploadError {
    #[error("file is empty")]
    Empty,

    #[error("file is not a supported image")]
    NotAnImage,

    #[error("could not read file: {0}")]
    Unreadable(String),
}
