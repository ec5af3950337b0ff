use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::common::{DonationId, MemberId};

/// A recorded gift; `member_id` is empty for anonymous donors
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct Donation {
    pub id: DonationId,
    pub member_id: Option<MemberId>,
    pub amount_cents: i64,
    pub donated_at: DateTime<Utc>,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateDonation {
    pub member_id: Option<MemberId>,
    pub amount_cents: i64,
    pub donated_at: DateTime<Utc>,
    pub note: Option<String>,
}

/// Sum and count over a set of donations
#[derive(sqlx::FromRow, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DonationTotal {
    pub total_cents: i64,
    pub count: i64,
}

impl Donation {
    pub async fn find_by_id(id: DonationId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM donations WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// Most recent first
    pub async fn list(limit: i64, offset: i64, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM donations ORDER BY donated_at DESC, id LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn list_for_member(member_id: MemberId, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM donations WHERE member_id = $1 ORDER BY donated_at DESC",
        )
        .bind(member_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn create(input: CreateDonation, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO donations (id, member_id, amount_cents, donated_at, note)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING *",
        )
        .bind(DonationId::new())
        .bind(input.member_id)
        .bind(input.amount_cents)
        .bind(input.donated_at)
        .bind(&input.note)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn delete(id: DonationId, pool: &PgPool) -> Result<bool> {
        let result = sqlx::query("DELETE FROM donations WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Total of donations made at or after `since` (all time when `None`)
    pub async fn total(since: Option<DateTime<Utc>>, pool: &PgPool) -> Result<DonationTotal> {
        sqlx::query_as::<_, DonationTotal>(
            "SELECT COALESCE(SUM(amount_cents), 0)::BIGINT AS total_cents, COUNT(*) AS count
             FROM donations
             WHERE $1::TIMESTAMPTZ IS NULL OR donated_at >= $1",
        )
        .bind(since)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }
}
