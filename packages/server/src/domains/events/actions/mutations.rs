use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::info;

use crate::common::{Actor, AuthError, Capability, EventId, EventTemplateId};
use crate::domains::events::models::{
    CreateEvent, CreateEventTemplate, Event, EventTemplate, UpdateEvent, UpdateEventTemplate,
};

fn check_schedule(event: &CreateEvent) -> Result<(), AuthError> {
    if event.ends_at <= event.starts_at {
        return Err(AuthError::InvalidInput(
            "event must end after it starts".to_string(),
        ));
    }
    if let Some(deadline) = event.registration_deadline {
        if deadline > event.ends_at {
            return Err(AuthError::InvalidInput(
                "registration deadline must not be after the event ends".to_string(),
            ));
        }
    }
    Ok(())
}

/// Deadline after applying a partial update to `current`.
fn merged_deadline(
    input: &UpdateEvent,
    current: Option<DateTime<Utc>>,
) -> Result<Option<DateTime<Utc>>, AuthError> {
    if !input.clear_registration_deadline {
        return Ok(input.registration_deadline.or(current));
    }
    if input.registration_deadline.is_some() {
        return Err(AuthError::InvalidInput(
            "cannot both set and clear the registration deadline".to_string(),
        ));
    }
    Ok(None)
}

fn check_capacity(capacity: Option<i32>) -> Result<(), AuthError> {
    match capacity {
        Some(c) if c <= 0 => Err(AuthError::InvalidInput(
            "capacity must be positive".to_string(),
        )),
        _ => Ok(()),
    }
}

pub async fn create_template(
    actor: Actor,
    input: CreateEventTemplate,
    pool: &PgPool,
) -> Result<EventTemplate, AuthError> {
    actor.can(Capability::ManageEvents).check()?;

    if input.name.trim().is_empty() {
        return Err(AuthError::InvalidInput("template name is required".to_string()));
    }
    check_capacity(input.default_capacity)?;

    let template = EventTemplate::create(input, pool).await?;
    info!(template_id = %template.id, name = %template.name, "Created event template");
    Ok(template)
}

pub async fn update_template(
    actor: Actor,
    id: EventTemplateId,
    input: UpdateEventTemplate,
    pool: &PgPool,
) -> Result<Option<EventTemplate>, AuthError> {
    actor.can(Capability::ManageEvents).check()?;
    check_capacity(input.default_capacity)?;

    info!(template_id = %id, "Updating event template");
    Ok(EventTemplate::update(id, input, pool).await?)
}

/// Delete a template that no scheduled event still uses
pub async fn delete_template(
    actor: Actor,
    id: EventTemplateId,
    pool: &PgPool,
) -> Result<bool, AuthError> {
    actor.can(Capability::ManageEvents).check()?;

    let in_use = EventTemplate::event_count(id, pool).await?;
    if in_use > 0 {
        return Err(AuthError::InvalidInput(format!(
            "template is used by {in_use} event(s)"
        )));
    }

    info!(template_id = %id, "Deleting event template");
    Ok(EventTemplate::delete(id, pool).await?)
}

pub async fn create_event(actor: Actor, input: CreateEvent, pool: &PgPool) -> Result<Event, AuthError> {
    actor.can(Capability::ManageEvents).check()?;

    check_schedule(&input)?;
    check_capacity(input.capacity)?;

    let template = EventTemplate::find_by_id(input.template_id, pool)
        .await?
        .ok_or_else(|| AuthError::InvalidInput("event template not found".to_string()))?;

    // Fall back to the template's capacity
    let input = CreateEvent {
        capacity: input.capacity.or(template.default_capacity),
        ..input
    };

    let event = Event::create(input, pool).await?;
    info!(
        event_id = %event.id,
        template = %template.name,
        starts_at = %event.starts_at,
        "Created event"
    );
    Ok(event)
}

/// Update an event; the merged schedule must still be valid.
pub async fn update_event(
    actor: Actor,
    id: EventId,
    input: UpdateEvent,
    pool: &PgPool,
) -> Result<Option<Event>, AuthError> {
    actor.can(Capability::ManageEvents).check()?;
    check_capacity(input.capacity)?;

    let Some(current) = Event::find_by_id(id, pool).await? else {
        return Ok(None);
    };

    check_schedule(&CreateEvent {
        template_id: current.template_id,
        starts_at: input.starts_at.unwrap_or(current.starts_at),
        ends_at: input.ends_at.unwrap_or(current.ends_at),
        registration_deadline: merged_deadline(&input, current.registration_deadline)?,
        location: None,
        capacity: None,
    })?;

    info!(event_id = %id, "Updating event");
    Ok(Event::update(id, input, pool).await?)
}

/// Delete an event together with its participations and surveys
pub async fn delete_event(actor: Actor, id: EventId, pool: &PgPool) -> Result<bool, AuthError> {
    actor.can(Capability::ManageEvents).check()?;

    info!(event_id = %id, "Deleting event");
    Ok(Event::delete(id, pool).await?)
}
