//! Test fixtures for creating test data.
//!
//! These fixtures use the model methods directly to create test data.

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use membership_core::common::MemberRole;
use membership_core::domains::auth::actions::{sign_up, SignUp};
use membership_core::domains::events::models::{
    CreateEvent, CreateEventTemplate, Event, EventTemplate,
};
use membership_core::domains::member::Member;
use sqlx::PgPool;
use uuid::Uuid;

pub const TEST_PASSWORD: &str = "correct-horse-battery";

/// Sign up a member with a unique email, then set its role.
pub async fn create_member(pool: &PgPool, role: MemberRole) -> Result<Member> {
    create_named_member(pool, "Test", "Member", role).await
}

pub async fn create_named_member(
    pool: &PgPool,
    first_name: &str,
    last_name: &str,
    role: MemberRole,
) -> Result<Member> {
    let member = sign_up(
        SignUp {
            email: format!("member-{}@example.org", Uuid::new_v4()),
            password: TEST_PASSWORD.to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            phone: None,
            city: None,
            state: None,
            zip: None,
        },
        pool,
    )
    .await?;

    if member.role == role {
        return Ok(member);
    }

    Member::update_role(member.id, role, pool)
        .await?
        .ok_or_else(|| anyhow::anyhow!("member vanished after sign-up"))
}

pub async fn create_template(pool: &PgPool) -> Result<EventTemplate> {
    EventTemplate::create(
        CreateEventTemplate {
            name: "Resume Workshop".to_string(),
            event_type: "workshop".to_string(),
            description: Some("Bring a printed copy".to_string()),
            recurrence_pattern: None,
            default_capacity: Some(20),
        },
        pool,
    )
    .await
}

pub async fn create_event_at(
    pool: &PgPool,
    starts_at: DateTime<Utc>,
    ends_at: DateTime<Utc>,
    registration_deadline: Option<DateTime<Utc>>,
) -> Result<Event> {
    let template = create_template(pool).await?;
    Event::create(
        CreateEvent {
            template_id: template.id,
            starts_at,
            ends_at,
            registration_deadline,
            location: Some("Community Room".to_string()),
            capacity: None,
        },
        pool,
    )
    .await
}

/// An event a day from now, open for registration.
pub async fn create_upcoming_event(pool: &PgPool) -> Result<Event> {
    let starts_at = Utc::now() + Duration::days(1);
    create_event_at(pool, starts_at, starts_at + Duration::hours(2), None).await
}

/// An event that ended an hour ago.
pub async fn create_past_event(pool: &PgPool) -> Result<Event> {
    let ends_at = Utc::now() - Duration::hours(1);
    create_event_at(pool, ends_at - Duration::hours(2), ends_at, None).await
}
