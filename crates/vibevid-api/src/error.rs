//! API client error types.

use reqwest::StatusCode;
use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

/// Which API operation produced a response. Drives the status mapping:
/// the backend reuses status codes across endpoints, so the same 400 means
/// different things on signup and verify.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Signup,
    Verify,
    Login,
    List,
    Upload,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Signup => "signup",
            Operation::Verify => "verify",
            Operation::Login => "login",
            Operation::List => "list",
            Operation::Upload => "upload",
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Already registered: {0}")]
    Conflict(String),

    #[error("Invalid code: {0}")]
    InvalidCode(String),

    #[error("Code expired: {0}")]
    ExpiredCode(String),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Account not verified: {0}")]
    Unverified(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Upload rejected: {0}")]
    Payload(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    /// Map a non-2xx response to the taxonomy, given the operation that
    /// produced it and the server's `detail` message.
    pub fn from_rejection(op: Operation, status: StatusCode, detail: String) -> Self {
        if status.is_server_error() {
            return Self::RequestFailed(format!("{} returned {}: {}", op.as_str(), status, detail));
        }

        match op {
            Operation::Signup => match status {
                StatusCode::CONFLICT => Self::Conflict(detail),
                StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                    Self::Validation(detail)
                }
                _ => Self::RequestFailed(detail),
            },
            Operation::Verify => {
                if status == StatusCode::GONE || detail.to_lowercase().contains("expired") {
                    Self::ExpiredCode(detail)
                } else {
                    Self::InvalidCode(detail)
                }
            }
            Operation::Login => {
                if status == StatusCode::FORBIDDEN || detail.to_lowercase().contains("verif") {
                    Self::Unverified(detail)
                } else {
                    Self::Authentication(detail)
                }
            }
            Operation::List => match status {
                StatusCode::UNAUTHORIZED => Self::Unauthorized(detail),
                _ => Self::RequestFailed(detail),
            },
            Operation::Upload => match status {
                StatusCode::UNAUTHORIZED => Self::Unauthorized(detail),
                s if s.is_client_error() => Self::Payload(detail),
                _ => Self::RequestFailed(detail),
            },
        }
    }

    /// The human-readable message for the initiating UI surface.
    pub fn detail(&self) -> String {
        match self {
            Self::Validation(d)
            | Self::Conflict(d)
            | Self::InvalidCode(d)
            | Self::ExpiredCode(d)
            | Self::Authentication(d)
            | Self::Unverified(d)
            | Self::Unauthorized(d)
            | Self::Payload(d)
            | Self::RequestFailed(d) => d.clone(),
            Self::Network(e) => format!("Network error: {}", e),
            Self::InvalidResponse(d) => format!("Invalid response: {}", d),
        }
    }

    /// Transient errors the user may sensibly retry. Retrying is always a
    /// user action, never automatic.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network(_) | Self::RequestFailed(_))
    }

    /// Session token rejected; observers must tear the session down.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signup_conflict_maps_to_conflict() {
        let err = ApiError::from_rejection(
            Operation::Signup,
            StatusCode::CONFLICT,
            "Email already registered".to_string(),
        );
        assert!(matches!(err, ApiError::Conflict(_)));
        assert_eq!(err.detail(), "Email already registered");
    }

    #[test]
    fn verify_expired_detail_maps_to_expired() {
        let err = ApiError::from_rejection(
            Operation::Verify,
            StatusCode::BAD_REQUEST,
            "Code expired, request a new one".to_string(),
        );
        assert!(matches!(err, ApiError::ExpiredCode(_)));

        let err = ApiError::from_rejection(
            Operation::Verify,
            StatusCode::BAD_REQUEST,
            "Wrong code".to_string(),
        );
        assert!(matches!(err, ApiError::InvalidCode(_)));
    }

    #[test]
    fn login_forbidden_maps_to_unverified() {
        let err = ApiError::from_rejection(
            Operation::Login,
            StatusCode::FORBIDDEN,
            "Account not verified".to_string(),
        );
        assert!(matches!(err, ApiError::Unverified(_)));
    }

    #[test]
    fn list_unauthorized_flags_teardown() {
        let err = ApiError::from_rejection(
            Operation::List,
            StatusCode::UNAUTHORIZED,
            "Invalid token".to_string(),
        );
        assert!(err.is_unauthorized());
    }

    #[test]
    fn server_errors_are_retryable_request_failures() {
        let err = ApiError::from_rejection(
            Operation::Upload,
            StatusCode::INTERNAL_SERVER_ERROR,
            "boom".to_string(),
        );
        assert!(matches!(err, ApiError::RequestFailed(_)));
        assert!(err.is_retryable());
    }
}
