//! Crate error taxonomy.
//!
//! Every failure carries a [`Kind`] so callers (and the HTTP layer) can
//! map it to a status without string matching. Credential material never
//! appears in messages.

use thiserror::Error as ThisError;

/// Coarse failure classification.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Kind {
    /// Bad intent shape or values; user fixable.
    Validation,
    /// Intent cannot be represented on the exchange tick/lot grid.
    Precision,
    /// Missing or invalid key material, or an unusable signing setup.
    Signing,
    /// Shared-secret check failed.
    Unauthorized,
    /// Exchange unreachable or persistently failing.
    Submission,
    /// Ambiguous network failure after send; the order may exist.
    UnknownOutcome,
    /// Exchange answered a read request with a non-success status.
    Status,
    /// Bad process configuration.
    Config,
    /// HTTP transport failure.
    Http,
    /// Payload (de)serialization failure.
    Serde,
}

impl Kind {
    /// Stable lowercase tag used in structured error bodies.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Kind::Validation => "validation",
            Kind::Precision => "precision",
            Kind::Signing => "signing",
            Kind::Unauthorized => "unauthorized",
            Kind::Submission => "submission",
            Kind::UnknownOutcome => "unknown_outcome",
            Kind::Status => "status",
            Kind::Config => "config",
            Kind::Http => "http",
            Kind::Serde => "serde",
        }
    }
}

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("precision error: {0}")]
    Precision(String),

    #[error("signing error: {0}")]
    Signing(String),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("submission failed: {0}")]
    Submission(String),

    #[error("submission outcome unknown: {0}")]
    UnknownOutcome(String),

    #[error("exchange returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("http transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl Error {
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }

    pub fn precision(message: impl Into<String>) -> Self {
        Error::Precision(message.into())
    }

    pub fn signing(message: impl Into<String>) -> Self {
        Error::Signing(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Error::Unauthorized(message.into())
    }

    pub fn submission(message: impl Into<String>) -> Self {
        Error::Submission(message.into())
    }

    pub fn unknown_outcome(message: impl Into<String>) -> Self {
        Error::UnknownOutcome(message.into())
    }

    pub fn config(message: impl Into<String>) -> Self {
        Error::Config(message.into())
    }

    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Error::Status {
            status,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> Kind {
        match self {
            Error::Validation(_) => Kind::Validation,
            Error::Precision(_) => Kind::Precision,
            Error::Signing(_) => Kind::Signing,
            Error::Unauthorized(_) => Kind::Unauthorized,
            Error::Submission(_) => Kind::Submission,
            Error::UnknownOutcome(_) => Kind::UnknownOutcome,
            Error::Status { .. } => Kind::Status,
            Error::Config(_) => Kind::Config,
            Error::Http(_) => Kind::Http,
            Error::Url(_) => Kind::Config,
            Error::Serde(_) => Kind::Serde,
        }
    }
}

impl From<alloy::signers::Error> for Error {
    fn from(err: alloy::signers::Error) -> Self {
        Error::Signing(err.to_string())
    }
}
