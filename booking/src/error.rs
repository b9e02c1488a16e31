//! Error types for the booking workflows.

use crate::constants::{HTTP_BAD_REQUEST, HTTP_CONFLICT, HTTP_INTERNAL_SERVER_ERROR, HTTP_NOT_FOUND};
use rooms_runtime::WorkflowError;
use std::fmt::Display;
use thiserror::Error;

/// Result type alias for booking operations.
pub type Result<T> = std::result::Result<T, RoomsError>;

/// Error taxonomy shared by the services and their collaborators.
///
/// Errors are `Clone` so they can travel inside workflow actions.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RoomsError {
    // ═══════════════════════════════════════════════════════════
    // Client Errors
    // ═══════════════════════════════════════════════════════════

    /// A settlement gate rejected the request.
    ///
    /// `detail` names the offending values for diagnostics.
    #[error("{reason}")]
    Validation {
        /// Human-readable reason
        reason: String,
        /// Offending field values
        detail: String,
    },

    /// A referenced record does not exist.
    #[error("{entity} not found: {key}")]
    NotFound {
        /// Kind of record
        entity: &'static str,
        /// Lookup key
        key: String,
    },

    /// A uniqueness constraint rejected a write.
    #[error("{entity} already exists: {key}")]
    Conflict {
        /// Kind of record
        entity: &'static str,
        /// Conflicting key
        key: String,
    },

    // ═══════════════════════════════════════════════════════════
    // System Errors
    // ═══════════════════════════════════════════════════════════

    /// A store or gateway failed.
    ///
    /// The cause is kept for logs but never shown to callers.
    #[error("{context}: {cause}")]
    Upstream {
        /// Operation that failed
        context: String,
        /// Underlying failure
        cause: String,
    },
}

impl RoomsError {
    /// Build a validation error.
    pub fn validation(reason: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Validation {
            reason: reason.into(),
            detail: detail.into(),
        }
    }

    /// Build a not-found error.
    pub fn not_found(entity: &'static str, key: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            key: key.into(),
        }
    }

    /// Build a conflict error.
    pub fn conflict(entity: &'static str, key: impl Into<String>) -> Self {
        Self::Conflict {
            entity,
            key: key.into(),
        }
    }

    /// Build an upstream error from any displayable cause.
    pub fn upstream(context: impl Into<String>, cause: impl Display) -> Self {
        Self::Upstream {
            context: context.into(),
            cause: cause.to_string(),
        }
    }

    /// HTTP-style status code for the caller-facing surface.
    ///
    /// # Examples
    ///
    /// ```
    /// # use rooms_booking::RoomsError;
    /// assert_eq!(RoomsError::validation("Invalid Guarantee currency.", "").status_code(), 400);
    /// assert_eq!(RoomsError::upstream("claim guarantee", "timeout").status_code(), 500);
    /// ```
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation { .. } => HTTP_BAD_REQUEST,
            Self::NotFound { .. } => HTTP_NOT_FOUND,
            Self::Conflict { .. } => HTTP_CONFLICT,
            Self::Upstream { .. } => HTTP_INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns `true` if the caller caused this error.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(self, Self::Validation { .. } | Self::NotFound { .. } | Self::Conflict { .. })
    }

    /// Returns `true` for a genuine "record does not exist" signal.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Message safe to return to callers.
    ///
    /// # Examples
    ///
    /// ```
    /// # use rooms_booking::RoomsError;
    /// let err = RoomsError::upstream("read offer", "connection reset by peer");
    /// assert_eq!(err.public_message(), "Internal error");
    /// ```
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::Upstream { .. } => "Internal error".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<WorkflowError> for RoomsError {
    fn from(err: WorkflowError) -> Self {
        Self::upstream("workflow runtime", err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_error_class() {
        assert_eq!(RoomsError::not_found("offer", "o-1").status_code(), 404);
        assert_eq!(RoomsError::conflict("profile", "a@b.com").status_code(), 409);
    }

    #[test]
    fn validation_message_is_the_reason() {
        let err = RoomsError::validation(
            "Invalid Guarantee currency.",
            "offer currency = USD; guarantee currency = EUR",
        );
        assert_eq!(err.to_string(), "Invalid Guarantee currency.");
        assert_eq!(err.public_message(), "Invalid Guarantee currency.");
        assert!(err.is_user_error());
    }

    #[test]
    fn workflow_errors_become_upstream() {
        let err: RoomsError = WorkflowError::StepLimitExceeded { max_steps: 3 }.into();
        assert!(!err.is_user_error());
        assert_eq!(err.status_code(), 500);
    }
}
