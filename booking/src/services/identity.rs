//! Identity bootstrap service.

use crate::config::IdentityConfig;
use crate::environment::IdentityEnvironment;
use crate::error::{Result, RoomsError};
use crate::reducers::{BootstrapAction, BootstrapPhase, BootstrapSaga, BootstrapState};
use rooms_runtime::Workflow;
use std::sync::Arc;

/// Identity bootstrap service.
#[derive(Clone)]
pub struct IdentityBootstrapService {
    workflow: Arc<Workflow<BootstrapSaga>>,
}

impl IdentityBootstrapService {
    /// Create an identity bootstrap service.
    #[must_use]
    pub fn new(environment: IdentityEnvironment, config: IdentityConfig) -> Self {
        Self {
            workflow: Arc::new(Workflow::new(BootstrapSaga::new(config), environment)),
        }
    }

    /// Issue a one-time password for `email`, creating the owner on first login.
    ///
    /// The caller delivers the password out of band.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Another request created the same email concurrently → `RoomsError::Conflict`
    /// - A store fails → `RoomsError::Upstream`
    pub async fn issue_one_time_password(
        &self,
        email: impl Into<String>,
        session_token: impl Into<String>,
    ) -> Result<String> {
        let state = self
            .workflow
            .run(
                BootstrapState::default(),
                BootstrapAction::IssueOneTimePassword {
                    email: email.into(),
                    session_token: session_token.into(),
                },
            )
            .await?;

        match state {
            BootstrapState {
                phase: BootstrapPhase::Issued,
                one_time_password: Some(otp),
                ..
            } => Ok(otp),
            BootstrapState {
                phase: BootstrapPhase::Failed,
                failure: Some(error),
                ..
            } => Err(error),
            BootstrapState { phase, .. } => Err(RoomsError::upstream(
                "identity bootstrap",
                format!("workflow stalled in {phase:?}"),
            )),
        }
    }
}
