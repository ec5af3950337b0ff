use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::common::EventTemplateId;

/// Reusable description shared by scheduled events
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct EventTemplate {
    pub id: EventTemplateId,
    pub name: String,
    pub event_type: String,
    pub description: Option<String>,
    /// Free-form, e.g. "weekly", "first Monday of the month"
    pub recurrence_pattern: Option<String>,
    pub default_capacity: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateEventTemplate {
    pub name: String,
    pub event_type: String,
    pub description: Option<String>,
    pub recurrence_pattern: Option<String>,
    pub default_capacity: Option<i32>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateEventTemplate {
    pub name: Option<String>,
    pub event_type: Option<String>,
    pub description: Option<String>,
    pub recurrence_pattern: Option<String>,
    pub default_capacity: Option<i32>,
}

impl EventTemplate {
    pub async fn find_by_id(id: EventTemplateId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM event_templates WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn find_all(pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM event_templates ORDER BY name")
            .fetch_all(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn create(input: CreateEventTemplate, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO event_templates (id, name, event_type, description, recurrence_pattern, default_capacity)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING *",
        )
        .bind(EventTemplateId::new())
        .bind(&input.name)
        .bind(&input.event_type)
        .bind(&input.description)
        .bind(&input.recurrence_pattern)
        .bind(input.default_capacity)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn update(
        id: EventTemplateId,
        input: UpdateEventTemplate,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "UPDATE event_templates SET
                name = COALESCE($2, name),
                event_type = COALESCE($3, event_type),
                description = COALESCE($4, description),
                recurrence_pattern = COALESCE($5, recurrence_pattern),
                default_capacity = COALESCE($6, default_capacity),
                updated_at = NOW()
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(input.name)
        .bind(input.event_type)
        .bind(input.description)
        .bind(input.recurrence_pattern)
        .bind(input.default_capacity)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    /// Number of scheduled events using this template
    pub async fn event_count(id: EventTemplateId, pool: &PgPool) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM events WHERE template_id = $1")
            .bind(id)
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    pub async fn delete(id: EventTemplateId, pool: &PgPool) -> Result<bool> {
        let result = sqlx::query("DELETE FROM event_templates WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
