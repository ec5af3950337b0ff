use thiserror::Error;

use super::status::{WorkflowAction, WorkflowState};
use crate::common::AuthError;

/// Failures of participation workflow operations
#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error("Not authorized for this operation")]
    Unauthorized,

    #[error("{0} not found")]
    NotFound(String),

    #[error("Already registered for this event")]
    AlreadyRegistered,

    #[error("Not registered for this event")]
    NotRegistered,

    #[error("Registration for this event is closed")]
    RegistrationClosed,

    #[error("A survey has already been submitted")]
    SurveyAlreadySubmitted,

    #[error("The survey is not available")]
    SurveyNotAvailable,

    #[error("Invalid survey: {0}")]
    InvalidSurvey(String),

    /// Also raised when a concurrent change beat a compare-and-set update.
    #[error("Cannot {action} from status {from}")]
    InvalidTransition {
        from: WorkflowState,
        action: WorkflowAction,
    },

    #[error("Store error: {0}")]
    Store(#[from] anyhow::Error),
}

impl From<AuthError> for WorkflowError {
    fn from(err: AuthError) -> Self {
        if err.is_access_denied() {
            WorkflowError::Unauthorized
        } else {
            WorkflowError::Store(err.into())
        }
    }
}
