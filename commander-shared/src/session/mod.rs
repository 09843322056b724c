//! # Session
//!
//! Holds the bearer token and the signed-in user's profile, keeps the token
//! in persistent storage across restarts, and reacts to the backend
//! rejecting it.

mod state;
mod store;

use thiserror::Error;

use crate::api::ApiError;
use crate::validation::ValidationError;

pub use state::{Profile, Session, ThemePreferences};
pub use store::{SessionListener, SessionStore};

/// Errors surfaced by [`SessionStore`] operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The backend refused the username/password pair.
    #[error("login failed: {0}")]
    InvalidCredentials(ApiError),

    /// The operation needs a signed-in user.
    #[error("not signed in")]
    NotAuthenticated,

    /// Input rejected before any request was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Any other backend failure.
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl SessionError {
    /// Message suitable for showing next to a form.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidCredentials(ApiError::Unauthorized { detail })
            | Self::InvalidCredentials(ApiError::Validation { detail, .. })
                if !detail.is_empty() =>
            {
                detail.clone()
            }
            Self::InvalidCredentials(_) => "Invalid username or password".to_string(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credential_errors_prefer_server_detail() {
        let error = SessionError::InvalidCredentials(ApiError::Unauthorized {
            detail: "Incorrect username or password".into(),
        });
        assert_eq!(error.user_message(), "Incorrect username or password");

        let error = SessionError::InvalidCredentials(ApiError::from_status(500, ""));
        assert_eq!(error.user_message(), "Invalid username or password");
    }

    #[test]
    fn validation_errors_are_transparent() {
        let error = SessionError::from(ValidationError::PasswordsDoNotMatch);
        assert_eq!(error.user_message(), "passwords do not match");
    }
}
