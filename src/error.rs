use axum::http::StatusCode;
use thiserror::Error;

/// Caller-visible failures of the per-user stores.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("{0}")]
    Validation(String),
    #[error("user must be logged in")]
    NotSignedIn,
    #[error("{0} not found")]
    NotFound(String),
}

impl StoreError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            StoreError::Validation(_) => StatusCode::BAD_REQUEST,
            StoreError::NotSignedIn => StatusCode::UNAUTHORIZED,
            StoreError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl From<StoreError> for (StatusCode, String) {
    fn from(e: StoreError) -> Self {
        (e.status(), e.to_string())
    }
}

#[cfg(test)]
mod error_tests {
    use super::*;

    #[test]
    fn maps_to_http_status() {
        let (status, msg): (StatusCode, String) = StoreError::NotSignedIn.into();
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(msg, "user must be logged in");

        let (status, msg): (StatusCode, String) =
            StoreError::validation("Plan name required").into();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(msg, "Plan name required");

        let (status, _): (StatusCode, String) = StoreError::NotFound("meal plan".into()).into();
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
