use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::common::{EventId, EventTemplateId};

/// A scheduled occurrence of an event template
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct Event {
    pub id: EventId,
    pub template_id: EventTemplateId,

    // Schedule
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    /// When absent, registration stays open until the event ends
    pub registration_deadline: Option<DateTime<Utc>>,

    pub location: Option<String>,
    pub capacity: Option<i32>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateEvent {
    pub template_id: EventTemplateId,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub registration_deadline: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub capacity: Option<i32>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateEvent {
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub registration_deadline: Option<DateTime<Utc>>,
    /// Drop the deadline so registration stays open until the event ends
    pub clear_registration_deadline: bool,
    pub location: Option<String>,
    pub capacity: Option<i32>,
}

impl Event {
    /// The end time has passed.
    pub fn has_ended(&self, now: DateTime<Utc>) -> bool {
        self.ends_at < now
    }

    /// Before the registration deadline (if any) and not yet ended.
    pub fn is_registration_open(&self, now: DateTime<Utc>) -> bool {
        !self.has_ended(now)
            && self
                .registration_deadline
                .map_or(true, |deadline| now < deadline)
    }

    pub async fn find_by_id(id: EventId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM events WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// Events that have not ended yet, soonest first
    pub async fn find_upcoming(now: DateTime<Utc>, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM events WHERE ends_at >= $1 ORDER BY starts_at, id",
        )
        .bind(now)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// Ended events, most recent first
    pub async fn find_past(now: DateTime<Utc>, limit: i64, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM events WHERE ends_at < $1 ORDER BY starts_at DESC, id LIMIT $2",
        )
        .bind(now)
        .bind(limit)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn find_by_template(template_id: EventTemplateId, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM events WHERE template_id = $1 ORDER BY starts_at DESC",
        )
        .bind(template_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn create(input: CreateEvent, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO events (id, template_id, starts_at, ends_at, registration_deadline, location, capacity)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING *",
        )
        .bind(EventId::new())
        .bind(input.template_id)
        .bind(input.starts_at)
        .bind(input.ends_at)
        .bind(input.registration_deadline)
        .bind(&input.location)
        .bind(input.capacity)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn update(id: EventId, input: UpdateEvent, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "UPDATE events SET
                starts_at = COALESCE($2, starts_at),
                ends_at = COALESCE($3, ends_at),
                registration_deadline = CASE WHEN $7 THEN NULL
                                             ELSE COALESCE($4, registration_deadline) END,
                location = COALESCE($5, location),
                capacity = COALESCE($6, capacity),
                updated_at = NOW()
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(input.starts_at)
        .bind(input.ends_at)
        .bind(input.registration_deadline)
        .bind(input.location)
        .bind(input.capacity)
        .bind(input.clear_registration_deadline)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    /// Delete an event; its participations and surveys cascade.
    pub async fn delete(id: EventId, pool: &PgPool) -> Result<bool> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn event(ends_in: Duration, deadline_in: Option<Duration>) -> Event {
        let now = Utc::now();
        Event {
            id: EventId::new(),
            template_id: EventTemplateId::new(),
            starts_at: now + ends_in - Duration::hours(2),
            ends_at: now + ends_in,
            registration_deadline: deadline_in.map(|d| now + d),
            location: None,
            capacity: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn registration_closes_at_deadline() {
        let e = event(Duration::days(3), Some(Duration::days(1)));
        assert!(e.is_registration_open(Utc::now()));
        assert!(!e.is_registration_open(Utc::now() + Duration::days(2)));
    }

    #[test]
    fn registration_without_deadline_runs_until_end() {
        let e = event(Duration::days(1), None);
        assert!(e.is_registration_open(Utc::now() + Duration::hours(20)));
        assert!(!e.is_registration_open(Utc::now() + Duration::days(2)));
    }

    #[test]
    fn ended_only_after_end_time() {
        let e = event(Duration::hours(1), None);
        assert!(!e.has_ended(Utc::now()));
        assert!(e.has_ended(e.ends_at + Duration::seconds(1)));
        assert!(!e.has_ended(e.ends_at));
    }
}
