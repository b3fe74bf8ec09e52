//! Error taxonomy for client operations.

use lapor_api_models::ValidationErrors;
use thiserror::Error;

/// Generic user-facing failure text.
pub const GENERIC_FAILURE: &str = "Terjadi kesalahan. Silakan coba lagi.";

/// Errors raised by the data-access layer.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request could not be completed (network failure, aborted request).
    #[error("request failed: {message}")]
    Transport {
        /// Transport-level description.
        message: String,
    },
    /// A body was present but was not valid JSON.
    #[error("response body was not valid JSON (status {status})")]
    MalformedResponse {
        /// HTTP status of the response.
        status: u16,
        /// Raw body text for diagnostics.
        raw: String,
    },
    /// The server or a local form check rejected individual fields.
    #[error("validation failed for {} field(s)", .0.len())]
    Validation(ValidationErrors),
    /// A protected image could not be fetched.
    #[error("image fetch failed with status {status}: {message}")]
    ImageFetch {
        /// HTTP status of the image response (0 when no request was made).
        status: u16,
        /// Server-provided text or status line.
        message: String,
    },
    /// The server answered with a failure status or an explicit failure marker.
    #[error("request rejected (status {status}): {message}")]
    Rejected {
        /// HTTP status of the response.
        status: u16,
        /// Server-provided message.
        message: String,
    },
    /// A successful body did not have the expected shape.
    #[error("unexpected response shape")]
    UnexpectedShape {
        /// Serialized body for diagnostics.
        raw: String,
    },
    /// The operation needs a session token but none is stored.
    #[error("no session token; log in first")]
    MissingToken,
    /// A local image handle could not be created.
    #[error("image handle could not be created: {message}")]
    Image {
        /// Platform error text.
        message: String,
    },
    /// The session store could not be read or written.
    #[error("session storage failed: {message}")]
    Session {
        /// Storage error text.
        message: String,
    },
}

impl ClientError {
    /// Build a transport error from any displayable cause.
    #[must_use]
    pub fn transport(cause: impl std::fmt::Display) -> Self {
        Self::Transport {
            message: cause.to_string(),
        }
    }

    /// Field errors, when this is a validation failure.
    #[must_use]
    pub const fn validation(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Validation(errors) => Some(errors),
            _ => None,
        }
    }

    /// HTTP status associated with the failure, if any.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::MalformedResponse { status, .. }
            | Self::ImageFetch { status, .. }
            | Self::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Text suitable for a toast. Server messages are passed through; other
    /// failures collapse to a generic message.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Rejected { message, .. } if !message.trim().is_empty() => message.clone(),
            Self::Validation(_) => "Validasi gagal, periksa input.".to_string(),
            Self::MissingToken => "Sesi berakhir, silakan login kembali.".to_string(),
            _ => GENERIC_FAILURE.to_string(),
        }
    }
}
