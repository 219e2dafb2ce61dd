use thiserror::Error;

use crate::api::ApiError;

#[derive(Error, Debug)]
pub enum AuthError {
    /// Login failed. The request error is carried unchanged.
    #[error("Login rejected: {0}")]
    Rejected(#[source] ApiError),

    /// Profile fetch failed for any reason; the session has been cleared.
    #[error("Session is no longer valid: {0}")]
    SessionInvalid(#[source] ApiError),
}

impl AuthError {
    /// The underlying request error
    pub fn api_error(&self) -> &ApiError {
        match self {
            AuthError::Rejected(e) | AuthError::SessionInvalid(e) => e,
        }
    }
}
