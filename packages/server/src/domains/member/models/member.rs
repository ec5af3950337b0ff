use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::{PgExecutor, PgPool};

use crate::common::{MemberId, MemberRole};

/// Member model - SQL persistence layer
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct Member {
    pub id: MemberId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,

    // Contact
    pub phone: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,

    pub role: MemberRole,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a member (sign-up)
#[derive(Debug, Clone)]
pub struct CreateMember {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub role: MemberRole,
}

/// Profile fields a member may change about themselves. `None` leaves a field as is.
#[derive(Debug, Clone, Default)]
pub struct UpdateProfile {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
}

impl Member {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Find member by ID
    pub async fn find_by_id(id: MemberId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM members WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// Find member by login email (case-insensitive)
    pub async fn find_by_email(email: &str, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM members WHERE LOWER(email) = LOWER($1)")
            .bind(email)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// Members ordered by surname, then first name
    pub async fn list(limit: i64, offset: i64, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM members
             ORDER BY last_name, first_name, id
             LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn count(pool: &PgPool) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM members")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    /// Insert new member. Runs inside the sign-up transaction, after the credential row.
    pub async fn create<'e, E>(input: CreateMember, executor: E) -> Result<Self>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Self>(
            "INSERT INTO members (id, email, first_name, last_name, phone, city, state, zip, role)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING *",
        )
        .bind(MemberId::new())
        .bind(&input.email)
        .bind(&input.first_name)
        .bind(&input.last_name)
        .bind(&input.phone)
        .bind(&input.city)
        .bind(&input.state)
        .bind(&input.zip)
        .bind(input.role)
        .fetch_one(executor)
        .await
        .map_err(Into::into)
    }

    /// Update profile fields, returning None if the member does not exist
    pub async fn update_profile(
        id: MemberId,
        input: UpdateProfile,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "UPDATE members SET
                first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                phone = COALESCE($4, phone),
                city = COALESCE($5, city),
                state = COALESCE($6, state),
                zip = COALESCE($7, zip),
                updated_at = NOW()
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(input.first_name)
        .bind(input.last_name)
        .bind(input.phone)
        .bind(input.city)
        .bind(input.state)
        .bind(input.zip)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn update_role(id: MemberId, role: MemberRole, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "UPDATE members SET role = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(role)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    /// Delete a member by removing its credential; member rows and their
    /// participations, surveys and milestones cascade from it.
    pub async fn delete(id: MemberId, pool: &PgPool) -> Result<bool> {
        let result = sqlx::query(
            "DELETE FROM credentials
             WHERE email = (SELECT email FROM members WHERE id = $1)",
        )
        .bind(id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
