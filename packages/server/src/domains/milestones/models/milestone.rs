use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;

use crate::common::{MemberId, MilestoneId};

#[derive(sqlx::FromRow, Debug, Clone)]
pub struct Milestone {
    pub id: MilestoneId,
    pub member_id: MemberId,
    pub title: String,
    pub description: Option<String>,
    pub achieved_on: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateMilestone {
    pub title: String,
    pub description: Option<String>,
    pub achieved_on: NaiveDate,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateMilestone {
    pub title: Option<String>,
    pub description: Option<String>,
    pub achieved_on: Option<NaiveDate>,
}

impl Milestone {
    pub async fn find_by_id(id: MilestoneId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM milestones WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// Newest achievement first
    pub async fn find_by_member(member_id: MemberId, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM milestones WHERE member_id = $1 ORDER BY achieved_on DESC, created_at DESC",
        )
        .bind(member_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn create(member_id: MemberId, input: CreateMilestone, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO milestones (id, member_id, title, description, achieved_on)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING *",
        )
        .bind(MilestoneId::new())
        .bind(member_id)
        .bind(&input.title)
        .bind(&input.description)
        .bind(input.achieved_on)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn update(id: MilestoneId, input: UpdateMilestone, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "UPDATE milestones SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                achieved_on = COALESCE($4, achieved_on),
                updated_at = NOW()
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(input.title)
        .bind(input.description)
        .bind(input.achieved_on)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn delete(id: MilestoneId, pool: &PgPool) -> Result<bool> {
        let result = sqlx::query("DELETE FROM milestones WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
