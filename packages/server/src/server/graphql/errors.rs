//! Error mapping for resolvers.
//!
//! Every error carries `extensions.code` so clients can route on it:
//! `UNAUTHORIZED` (send to home/login), `NOT_FOUND` (back to the listing),
//! `CONFLICT` and `BAD_REQUEST` (show the message), `INTERNAL`.

use std::fmt::Display;

use juniper::{FieldError, IntoFieldError, Object, Value};
use tracing::error;

use crate::common::AuthError;
use crate::domains::participation::WorkflowError;

pub const UNAUTHORIZED: &str = "UNAUTHORIZED";
pub const NOT_FOUND: &str = "NOT_FOUND";
pub const CONFLICT: &str = "CONFLICT";
pub const BAD_REQUEST: &str = "BAD_REQUEST";
pub const INTERNAL: &str = "INTERNAL";

pub fn coded_error(message: impl Display, code: &str) -> FieldError {
    let mut extensions = Object::with_capacity(1);
    extensions.add_field("code", Value::scalar(code.to_string()));
    FieldError::new(message, Value::Object(extensions))
}

/// Log the cause and return a generic message
pub fn internal_error(err: impl Display) -> FieldError {
    error!(error = %err, "Resolver failed");
    coded_error("Internal server error", INTERNAL)
}

pub fn not_found(what: &str) -> FieldError {
    coded_error(format!("{what} not found"), NOT_FOUND)
}

pub fn auth_error(err: AuthError) -> FieldError {
    err.into_field_error()
}

impl IntoFieldError for AuthError {
    fn into_field_error(self) -> FieldError {
        let code = match &self {
            AuthError::AuthenticationRequired
            | AuthError::PermissionDenied(_)
            | AuthError::AdminRequired
            | AuthError::InvalidToken
            | AuthError::InvalidCredentials => UNAUTHORIZED,
            AuthError::EmailTaken => CONFLICT,
            AuthError::InvalidInput(_) => BAD_REQUEST,
            AuthError::DatabaseError(_) | AuthError::InternalError(_) => {
                return internal_error(self);
            }
        };
        coded_error(self, code)
    }
}

impl IntoFieldError for WorkflowError {
    fn into_field_error(self) -> FieldError {
        let code = match &self {
            WorkflowError::Unauthorized => UNAUTHORIZED,
            WorkflowError::NotFound(_) => NOT_FOUND,
            WorkflowError::AlreadyRegistered
            | WorkflowError::SurveyAlreadySubmitted
            | WorkflowError::InvalidTransition { .. } => CONFLICT,
            WorkflowError::NotRegistered
            | WorkflowError::RegistrationClosed
            | WorkflowError::SurveyNotAvailable
            | WorkflowError::InvalidSurvey(_) => BAD_REQUEST,
            WorkflowError::Store(_) => return internal_error(self),
        };
        coded_error(self, code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code_of(err: &FieldError) -> Option<String> {
        err.extensions()
            .as_object_value()?
            .get_field_value("code")?
            .as_string_value()
            .map(str::to_string)
    }

    #[test]
    fn workflow_errors_carry_codes() {
        let cases = [
            (WorkflowError::Unauthorized, UNAUTHORIZED),
            (WorkflowError::NotFound("event".into()), NOT_FOUND),
            (WorkflowError::AlreadyRegistered, CONFLICT),
            (WorkflowError::SurveyAlreadySubmitted, CONFLICT),
            (WorkflowError::RegistrationClosed, BAD_REQUEST),
            (WorkflowError::Store(anyhow::anyhow!("connection reset")), INTERNAL),
        ];
        for (err, code) in cases {
            assert_eq!(code_of(&err.into_field_error()).as_deref(), Some(code));
        }
    }

    #[test]
    fn store_errors_are_not_leaked() {
        let err = WorkflowError::Store(anyhow::anyhow!("password authentication failed"));
        assert_eq!(err.into_field_error().message(), "Internal server error");
    }

    #[test]
    fn auth_errors_carry_codes() {
        assert_eq!(
            code_of(&AuthError::AdminRequired.into_field_error()).as_deref(),
            Some(UNAUTHORIZED)
        );
        assert_eq!(
            code_of(&AuthError::EmailTaken.into_field_error()).as_deref(),
            Some(CONFLICT)
        );
        assert_eq!(
            code_of(&AuthError::InvalidInput("x".into()).into_field_error()).as_deref(),
            Some(BAD_REQUEST)
        );
    }
}
