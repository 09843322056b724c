use thiserror::Error;

use crate::models::ErrorBody;

/// Failure of a single backend call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The request never produced an HTTP response (DNS, refused, timeout, CORS).
    #[error("backend unreachable: {0}")]
    NetworkUnreachable(String),

    /// HTTP 401: missing, expired or rejected credentials.
    #[error("unauthorized: {detail}")]
    Unauthorized {
        /// Server message.
        detail: String,
    },

    /// HTTP 403.
    #[error("forbidden: {detail}")]
    Forbidden {
        /// Server message.
        detail: String,
    },

    /// Any other 4xx; `detail` is the flattened server message.
    #[error("request rejected ({status}): {detail}")]
    Validation {
        /// HTTP status code.
        status: u16,
        /// Server message.
        detail: String,
    },

    /// 5xx or an unexpected non-success status.
    #[error("server error ({status}): {detail}")]
    Server {
        /// HTTP status code.
        status: u16,
        /// Server message, possibly empty.
        detail: String,
    },

    /// A success response whose body did not match the expected shape.
    #[error("unexpected response body: {0}")]
    Decode(String),
}

impl ApiError {
    /// Classifies a non-success response by status code.
    #[must_use]
    pub fn from_status(status: u16, body: &str) -> Self {
        let detail = ErrorBody::from_body(body).message();
        match status {
            401 => Self::Unauthorized { detail },
            403 => Self::Forbidden { detail },
            400..=499 => Self::Validation { status, detail },
            _ => Self::Server { status, detail },
        }
    }

    /// HTTP status carried by this error, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { .. } => Some(401),
            Self::Forbidden { .. } => Some(403),
            Self::Validation { status, .. } | Self::Server { status, .. } => Some(*status),
            Self::NetworkUnreachable(_) | Self::Decode(_) => None,
        }
    }

    /// Whether the backend rejected the credentials (HTTP 401).
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }
}
