//! Credential exchange state machine.
//!
//! Drives the signup → verify → login progression against the backend,
//! normalizing the email-or-phone contact handle at submission time and
//! handing the resulting session to the session store.

pub mod error;
pub mod flow;

pub use error::{AuthFlowError, AuthResult};
pub use flow::{AuthFlow, AuthStage};
