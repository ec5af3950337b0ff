use thiserror::Error;

/// Authentication and authorization failures
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Authentication required")]
    AuthenticationRequired,

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Admin access required")]
    AdminRequired,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("An account with this email already exists")]
    EmailTaken,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

impl AuthError {
    /// True for failures caused by who the caller is rather than by the system.
    pub fn is_access_denied(&self) -> bool {
        matches!(
            self,
            AuthError::AuthenticationRequired
                | AuthError::PermissionDenied(_)
                | AuthError::AdminRequired
                | AuthError::InvalidToken
        )
    }
}
