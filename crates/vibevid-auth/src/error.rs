//! Auth flow error types.

use thiserror::Error;

use vibevid_api::ApiError;
use vibevid_models::IdentityError;
use vibevid_session::SessionError;

use crate::flow::AuthStage;

/// Result type for auth flow operations.
pub type AuthResult<T> = Result<T, AuthFlowError>;

#[derive(Debug, Error)]
pub enum AuthFlowError {
    /// A submission arrived while another request was in flight.
    #[error("A request is already in flight")]
    Busy,

    /// The submitted operation does not belong to the current stage.
    #[error("Operation belongs to the {expected} stage (currently {actual})")]
    WrongStage {
        expected: AuthStage,
        actual: AuthStage,
    },

    #[error(transparent)]
    Identity(#[from] IdentityError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Failed to persist session: {0}")]
    Store(#[from] SessionError),
}
