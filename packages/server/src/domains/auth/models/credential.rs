use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::{PgExecutor, PgPool};

/// Login credential, keyed by email. Members reference it and cascade on delete.
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct Credential {
    pub email: String,
    pub password_hash: String,
    pub updated_at: DateTime<Utc>,
}

impl Credential {
    pub async fn find_by_email(email: &str, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM credentials WHERE LOWER(email) = LOWER($1)")
            .bind(email)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// Insert a credential; None if the email is already taken.
    pub async fn create<'e, E>(email: &str, password_hash: &str, executor: E) -> Result<Option<Self>>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Self>(
            "INSERT INTO credentials (email, password_hash)
             VALUES ($1, $2)
             ON CONFLICT (email) DO NOTHING
             RETURNING *",
        )
        .bind(email)
        .bind(password_hash)
        .fetch_optional(executor)
        .await
        .map_err(Into::into)
    }

    /// Insert or replace the hash for an email (bulk credential import).
    pub async fn upsert(email: &str, password_hash: &str, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO credentials (email, password_hash)
             VALUES ($1, $2)
             ON CONFLICT (email) DO UPDATE
                SET password_hash = EXCLUDED.password_hash, updated_at = NOW()
             RETURNING *",
        )
        .bind(email)
        .bind(password_hash)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }
}
