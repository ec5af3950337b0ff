//! Auth domain - credentials, password hashing and JWT sessions

pub mod actions;
pub mod data;
pub mod import;
pub mod jwt;
pub mod models;
pub mod password;

pub use data::{AuthPayload, SignUpInput};
pub use import::{parse_credential_rows, CredentialRow};
pub use jwt::{Claims, JwtService};
