//! Error types for vixwatch

use thiserror::Error;

/// Result type alias using vixwatch's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for vixwatch operations
#[derive(Error, Debug)]
pub enum Error {
    /// Recipient address or email credential absent under the strict policy
    #[error("Missing required environment variables")]
    ConfigurationMissing {
        /// Whether `ALERT_EMAIL` was present
        alert_email: bool,
        /// Whether the email provider key was present
        email_api_key: bool,
    },

    /// Quote provider transport failure or non-success status
    #[error("{0}")]
    ProviderUnavailable(String),

    /// Quote provider returned a payload without a usable price
    #[error("{0}")]
    MalformedProviderResponse(String),

    /// Email provider rejected or failed the send
    #[error("Email send failed: {0}")]
    EmailSendFailure(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Discriminant of [`Error`], for asserting on the failure class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// See [`Error::ConfigurationMissing`]
    ConfigurationMissing,
    /// See [`Error::ProviderUnavailable`]
    ProviderUnavailable,
    /// See [`Error::MalformedProviderResponse`]
    MalformedProviderResponse,
    /// See [`Error::EmailSendFailure`]
    EmailSendFailure,
    /// Config, IO and serialization failures
    Internal,
}

impl Error {
    /// Create a provider-unavailable error
    pub fn provider_unavailable(msg: impl Into<String>) -> Self {
        Self::ProviderUnavailable(msg.into())
    }

    /// Create a malformed-response error
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedProviderResponse(msg.into())
    }

    /// Create an email-send error
    pub fn email(msg: impl Into<String>) -> Self {
        Self::EmailSendFailure(msg.into())
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Failure class of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ConfigurationMissing { .. } => ErrorKind::ConfigurationMissing,
            Self::ProviderUnavailable(_) => ErrorKind::ProviderUnavailable,
            Self::MalformedProviderResponse(_) => ErrorKind::MalformedProviderResponse,
            Self::EmailSendFailure(_) => ErrorKind::EmailSendFailure,
            Self::Config(_) | Self::Io(_) | Self::Serialization(_) => ErrorKind::Internal,
        }
    }

    /// Display form of this error followed by each of its sources, one per line
    pub fn chain(&self) -> String {
        let mut out = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(err) = source {
            out.push_str("\n    caused by: ");
            out.push_str(&err.to_string());
            source = std::error::Error::source(err);
        }
        out
    }
}

impl From<::config::ConfigError> for Error {
    fn from(err: ::config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}
