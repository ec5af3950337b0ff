//! Sign-up and login

use anyhow::Context;
use tracing::{info, warn};

use crate::common::{AuthError, MemberRole};
use crate::domains::auth::models::Credential;
use crate::domains::auth::password::{self, MIN_PASSWORD_LEN};
use crate::domains::auth::JwtService;
use crate::domains::member::models::{CreateMember, Member};
use sqlx::PgPool;

/// Sign-up request after GraphQL input parsing
#[derive(Debug, Clone)]
pub struct SignUp {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
}

/// Successful login
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub member: Member,
}

pub fn normalize_email(email: &str) -> String {
    password::sanitize(email).to_lowercase()
}

/// Create a participant account: credential and member in one transaction.
pub async fn sign_up(input: SignUp, pool: &PgPool) -> Result<Member, AuthError> {
    let email = normalize_email(&input.email);
    if email.is_empty() || !email.contains('@') {
        return Err(AuthError::InvalidInput("a valid email is required".to_string()));
    }
    if input.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AuthError::InvalidInput(format!(
            "password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }

    let password_hash = password::hash_password(&input.password)?;

    let mut tx = pool.begin().await?;

    if Credential::create(&email, &password_hash, &mut *tx).await?.is_none() {
        return Err(AuthError::EmailTaken);
    }

    let member = Member::create(
        CreateMember {
            email,
            first_name: password::sanitize(&input.first_name),
            last_name: password::sanitize(&input.last_name),
            phone: input.phone,
            city: input.city,
            state: input.state,
            zip: input.zip,
            role: MemberRole::Participant,
        },
        &mut *tx,
    )
    .await
    .context("Failed to create member")?;

    tx.commit().await?;

    info!(member_id = %member.id, "Member signed up");
    Ok(member)
}

/// Verify a password and issue a JWT.
///
/// Unknown emails and wrong passwords fail identically.
pub async fn login(
    email: &str,
    password: &str,
    jwt: &JwtService,
    pool: &PgPool,
) -> Result<Session, AuthError> {
    let email = normalize_email(email);

    let Some(credential) = Credential::find_by_email(&email, pool).await? else {
        password::verify_dummy(password);
        warn!("Login attempt for unknown email");
        return Err(AuthError::InvalidCredentials);
    };

    if !password::verify_password(password, &credential.password_hash) {
        warn!("Login attempt with wrong password");
        return Err(AuthError::InvalidCredentials);
    }

    // A credential imported without a member row cannot log in.
    let member = Member::find_by_email(&credential.email, pool)
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    let token = jwt.create_token(member.id.into_uuid(), member.email.clone(), member.role)?;

    info!(member_id = %member.id, role = %member.role, "Member logged in");
    Ok(Session { token, member })
}
