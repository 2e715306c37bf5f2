use std::fmt;

use thiserror::Error;

use crate::config::ConfigError;
use crate::transport::TransportError;

/// Errors that can occur while relaying a form submission.
#[derive(Debug, Error)]
pub enum Error {
    /// The submission or the envelope built from it was rejected.
    #[error("submission rejected: {0}")]
    Rejected(#[from] Rejection),

    /// The transport refused or failed to deliver the envelope.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The relay configuration is unusable.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// The first validation rule a request or envelope violated.
///
/// Both validators stop at the first failing rule and describe it with a
/// `Rejection`. Messages name the offending field but never echo recipient
/// values, which may have arrived encrypted.
///
/// # Examples
///
/// ```
/// use formrelay_core::{Rejection, RejectionKind};
///
/// let rejection = Rejection::unprocessable("Invalid '_to' recipient");
/// assert_eq!(rejection.kind(), RejectionKind::UnprocessableInput);
/// assert_eq!(rejection.message(), "Invalid '_to' recipient");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct Rejection {
    kind: RejectionKind,
    message: String,
}

impl Rejection {
    /// Creates a new rejection.
    pub fn new(kind: RejectionKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// A submission flagged as automated.
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(RejectionKind::Forbidden, message)
    }

    /// A submission the client can fix.
    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self::new(RejectionKind::UnprocessableInput, message)
    }

    /// A submission whose transport context is missing the client origin.
    pub fn malformed_origin(message: impl Into<String>) -> Self {
        Self::new(RejectionKind::MalformedOrigin, message)
    }

    /// An envelope that failed its own consistency checks.
    pub fn invalid_envelope(message: impl Into<String>) -> Self {
        Self::new(RejectionKind::InvalidEnvelope, message)
    }

    /// Returns the rejection kind.
    pub fn kind(&self) -> RejectionKind {
        self.kind
    }

    /// Returns the human-readable message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns `true` when the rejection is the client's fault.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self.kind,
            RejectionKind::Forbidden | RejectionKind::UnprocessableInput
        )
    }
}

/// The kind of rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionKind {
    /// The honeypot field was filled in.
    Forbidden,
    /// A field failed validation: format, recipients, redirect or content.
    UnprocessableInput,
    /// The transport layer did not report the client's network origin.
    MalformedOrigin,
    /// The constructed envelope is not well-formed.
    InvalidEnvelope,
}

impl fmt::Display for RejectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Forbidden => write!(f, "forbidden"),
            Self::UnprocessableInput => write!(f, "unprocessable input"),
            Self::MalformedOrigin => write!(f, "malformed origin"),
            Self::InvalidEnvelope => write!(f, "invalid envelope"),
        }
    }
}
