use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::common::{EventId, EventTemplateId};
use crate::domains::events::models::{Event, EventTemplate};

/// Default number of past events returned
pub const DEFAULT_PAST_LIMIT: i64 = 20;

// Event listings are public: no actor required.

pub async fn list_templates(pool: &PgPool) -> Result<Vec<EventTemplate>> {
    EventTemplate::find_all(pool).await
}

pub async fn get_template(id: EventTemplateId, pool: &PgPool) -> Result<Option<EventTemplate>> {
    EventTemplate::find_by_id(id, pool).await
}

pub async fn get_event(id: EventId, pool: &PgPool) -> Result<Option<Event>> {
    Event::find_by_id(id, pool).await
}

pub async fn list_upcoming_events(now: DateTime<Utc>, pool: &PgPool) -> Result<Vec<Event>> {
    Event::find_upcoming(now, pool).await
}

pub async fn list_past_events(
    now: DateTime<Utc>,
    limit: Option<i64>,
    pool: &PgPool,
) -> Result<Vec<Event>> {
    let limit = limit.unwrap_or(DEFAULT_PAST_LIMIT).clamp(1, 200);
    Event::find_past(now, limit, pool).await
}
