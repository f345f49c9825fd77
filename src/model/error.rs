use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures surfaced by the enumerator and the page fetchers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Invalid setup detected before any listing request is issued.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Network or throttling failure. Re-issuing the same request may succeed.
    #[error("transient fetch error: {0}")]
    TransientFetch(String),

    /// Authorization, missing bucket or malformed request/response.
    #[error("fatal fetch error: {0}")]
    FatalFetch(String),
}

impl Error {
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration(message.into())
    }

    pub fn transient(message: impl Into<String>) -> Self {
        Error::TransientFetch(message.into())
    }

    pub fn fatal(message: impl Into<String>) -> Self {
        Error::FatalFetch(message.into())
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::TransientFetch(_))
    }

    /// Short label used as the `error_group` field in logs.
    pub fn group(&self) -> &'static str {
        match self {
            Error::Configuration(_) => "configuration",
            Error::TransientFetch(_) => "transient_fetch",
            Error::FatalFetch(_) => "fatal_fetch",
        }
    }
}
