//! Auth flow state machine.
//!
//! Stages: Signup (initial) → Verify → Login → authenticated (an exit, not
//! a stage). Failures never advance the stage; they surface a message and
//! the same form can retry. Any stage can jump to any other via
//! [`AuthFlow::switch_to`] — a pure UI transition, no protocol call.

use std::fmt;

use tokio::sync::RwLock;
use tracing::{debug, info};

use vibevid_api::ApiClient;
use vibevid_models::{ContactIdentity, RequestGate, Session};
use vibevid_session::SessionStore;

use crate::error::{AuthFlowError, AuthResult};

/// Which form the auth surface is showing, and which protocol operation a
/// submission triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AuthStage {
    /// Collecting contact handle + password for registration
    #[default]
    Signup,
    /// Collecting the one-time code
    Verify,
    /// Collecting contact handle + password for login
    Login,
}

impl AuthStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthStage::Signup => "signup",
            AuthStage::Verify => "verify",
            AuthStage::Login => "login",
        }
    }
}

impl fmt::Display for AuthStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The credential exchange state machine.
///
/// One in-flight request across the whole flow: submissions while the gate
/// is claimed are rejected with [`AuthFlowError::Busy`], never queued.
pub struct AuthFlow {
    stage: RwLock<AuthStage>,
    message: RwLock<Option<String>>,
    gate: RequestGate,
}

impl Default for AuthFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthFlow {
    /// Create a flow at the initial Signup stage.
    pub fn new() -> Self {
        Self {
            stage: RwLock::new(AuthStage::Signup),
            message: RwLock::new(None),
            gate: RequestGate::new(),
        }
    }

    pub async fn stage(&self) -> AuthStage {
        *self.stage.read().await
    }

    /// Last human-readable message for the auth surface.
    pub async fn message(&self) -> Option<String> {
        self.message.read().await.clone()
    }

    pub fn is_busy(&self) -> bool {
        self.gate.is_in_flight()
    }

    /// Jump to another stage ("Have an account?" / "Create account").
    /// Side-effect-free; rejected while a request is in flight.
    pub async fn switch_to(&self, stage: AuthStage) -> AuthResult<()> {
        if self.is_busy() {
            return Err(AuthFlowError::Busy);
        }
        debug!(to = stage.as_str(), "Switching auth stage");
        *self.stage.write().await = stage;
        *self.message.write().await = None;
        Ok(())
    }

    /// Return to the initial unauthenticated surface, e.g. after a session
    /// teardown. Side-effect-free.
    pub async fn reset(&self) {
        *self.stage.write().await = AuthStage::Signup;
        *self.message.write().await = None;
    }

    /// Register a new account. Success moves Signup → Verify and surfaces
    /// the OTP hint; no session is created.
    pub async fn submit_signup(
        &self,
        api: &ApiClient,
        email: &str,
        phone: &str,
        password: &str,
    ) -> AuthResult<()> {
        let _claim = self.gate.claim().ok_or(AuthFlowError::Busy)?;
        self.expect_stage(AuthStage::Signup).await?;
        let identity = self.resolve(email, phone).await?;

        match api.signup(&identity, password).await {
            Ok(receipt) => {
                info!(handle = %identity, "Signup accepted");
                self.advance(
                    AuthStage::Verify,
                    format!(
                        "Verification code: {}. Please enter it to verify.",
                        receipt.otp_hint
                    ),
                )
                .await;
                Ok(())
            }
            Err(e) => {
                self.set_message(e.detail()).await;
                Err(e.into())
            }
        }
    }

    /// Prove contact ownership with the one-time code. Success moves
    /// Verify → Login; verification proves identity, not a logged-in
    /// session.
    pub async fn submit_verify(
        &self,
        api: &ApiClient,
        email: &str,
        phone: &str,
        code: &str,
    ) -> AuthResult<()> {
        let _claim = self.gate.claim().ok_or(AuthFlowError::Busy)?;
        self.expect_stage(AuthStage::Verify).await?;
        let identity = self.resolve(email, phone).await?;

        match api.verify(&identity, code).await {
            Ok(()) => {
                info!(handle = %identity, "Contact verified");
                self.advance(AuthStage::Login, "Verified! You can now log in.".to_string())
                    .await;
                Ok(())
            }
            Err(e) => {
                self.set_message(e.detail()).await;
                Err(e.into())
            }
        }
    }

    /// Exchange credentials for a session. Success hands the session to
    /// `store` and exits the machine (the caller's surface becomes the
    /// authenticated one).
    pub async fn submit_login(
        &self,
        api: &ApiClient,
        store: &SessionStore,
        email: &str,
        phone: &str,
        password: &str,
    ) -> AuthResult<Session> {
        let _claim = self.gate.claim().ok_or(AuthFlowError::Busy)?;
        self.expect_stage(AuthStage::Login).await?;
        let identity = self.resolve(email, phone).await?;

        match api.login(&identity, password).await {
            Ok(session) => {
                info!(user_id = %session.user_id, "Logged in");
                store.activate(session.clone()).await?;
                *self.message.write().await = None;
                Ok(session)
            }
            Err(e) => {
                self.set_message(e.detail()).await;
                Err(e.into())
            }
        }
    }

    async fn expect_stage(&self, expected: AuthStage) -> AuthResult<()> {
        let actual = self.stage().await;
        if actual != expected {
            return Err(AuthFlowError::WrongStage { expected, actual });
        }
        Ok(())
    }

    async fn resolve(&self, email: &str, phone: &str) -> AuthResult<ContactIdentity> {
        match ContactIdentity::resolve(email, phone) {
            Ok(identity) => Ok(identity),
            Err(e) => {
                self.set_message(e.to_string()).await;
                Err(e.into())
            }
        }
    }

    async fn advance(&self, to: AuthStage, message: String) {
        *self.stage.write().await = to;
        *self.message.write().await = Some(message);
    }

    async fn set_message(&self, message: String) {
        *self.message.write().await = Some(message);
    }
}
