//! Event data types for GraphQL.

use chrono::{DateTime, Utc};
use juniper::{FieldResult, GraphQLInputObject, GraphQLObject, IntoFieldError};
use uuid::Uuid;

use crate::common::EventTemplateId;
use crate::domains::events::models::{
    CreateEvent, CreateEventTemplate, Event, EventTemplate, UpdateEvent, UpdateEventTemplate,
};
use crate::domains::participation::data::{ParticipantData, RegistrationViewData};
use crate::domains::participation::workflow;
use crate::server::graphql::context::GraphQLContext;
use crate::server::graphql::errors::internal_error;

#[derive(Debug, Clone, GraphQLObject)]
#[graphql(description = "Reusable description shared by scheduled events")]
pub struct EventTemplateData {
    pub id: Uuid,
    pub name: String,
    pub event_type: String,
    pub description: Option<String>,
    pub recurrence_pattern: Option<String>,
    pub default_capacity: Option<i32>,
}

impl From<EventTemplate> for EventTemplateData {
    fn from(template: EventTemplate) -> Self {
        Self {
            id: template.id.into_uuid(),
            name: template.name,
            event_type: template.event_type,
            description: template.description,
            recurrence_pattern: template.recurrence_pattern,
            default_capacity: template.default_capacity,
        }
    }
}

#[derive(Debug, Clone, GraphQLInputObject)]
pub struct CreateEventTemplateInput {
    pub name: String,
    pub event_type: String,
    pub description: Option<String>,
    pub recurrence_pattern: Option<String>,
    pub default_capacity: Option<i32>,
}

impl From<CreateEventTemplateInput> for CreateEventTemplate {
    fn from(input: CreateEventTemplateInput) -> Self {
        Self {
            name: input.name,
            event_type: input.event_type,
            description: input.description,
            recurrence_pattern: input.recurrence_pattern,
            default_capacity: input.default_capacity,
        }
    }
}

#[derive(Debug, Clone, Default, GraphQLInputObject)]
pub struct UpdateEventTemplateInput {
    pub name: Option<String>,
    pub event_type: Option<String>,
    pub description: Option<String>,
    pub recurrence_pattern: Option<String>,
    pub default_capacity: Option<i32>,
}

impl From<UpdateEventTemplateInput> for UpdateEventTemplate {
    fn from(input: UpdateEventTemplateInput) -> Self {
        Self {
            name: input.name,
            event_type: input.event_type,
            description: input.description,
            recurrence_pattern: input.recurrence_pattern,
            default_capacity: input.default_capacity,
        }
    }
}

/// A scheduled event, with the caller's registration state resolved on demand
#[derive(Debug, Clone)]
pub struct EventData {
    pub event: Event,
}

impl From<Event> for EventData {
    fn from(event: Event) -> Self {
        Self { event }
    }
}

#[juniper::graphql_object(Context = GraphQLContext)]
impl EventData {
    fn id(&self) -> Uuid {
        self.event.id.into_uuid()
    }

    fn template_id(&self) -> Uuid {
        self.event.template_id.into_uuid()
    }

    fn starts_at(&self) -> DateTime<Utc> {
        self.event.starts_at
    }

    fn ends_at(&self) -> DateTime<Utc> {
        self.event.ends_at
    }

    fn registration_deadline(&self) -> Option<DateTime<Utc>> {
        self.event.registration_deadline
    }

    fn location(&self) -> Option<&str> {
        self.event.location.as_deref()
    }

    fn capacity(&self) -> Option<i32> {
        self.event.capacity
    }

    fn has_ended(&self) -> bool {
        self.event.has_ended(Utc::now())
    }

    fn registration_open(&self) -> bool {
        self.event.is_registration_open(Utc::now())
    }

    async fn template(&self, ctx: &GraphQLContext) -> FieldResult<Option<EventTemplateData>> {
        let template = EventTemplate::find_by_id(self.event.template_id, &ctx.db_pool)
            .await
            .map_err(internal_error)?;
        Ok(template.map(EventTemplateData::from))
    }

    /// Buttons and flags for the caller's registration page
    async fn registration(&self, ctx: &GraphQLContext) -> FieldResult<RegistrationViewData> {
        let view = workflow::registration_view(
            ctx.participation_store(),
            ctx.actor(),
            self.event.id,
            Utc::now(),
        )
        .await
        .map_err(|e| e.into_field_error())?;
        Ok(view.into())
    }

    /// Participants visible to the caller, in display order
    async fn participants(&self, ctx: &GraphQLContext) -> FieldResult<Vec<ParticipantData>> {
        let rows = workflow::list_participants(
            ctx.participation_store(),
            ctx.actor(),
            self.event.id,
            Utc::now(),
        )
        .await
        .map_err(|e| e.into_field_error())?;

        let is_admin = ctx.actor().is_some_and(|a| a.is_admin());
        Ok(rows
            .into_iter()
            .map(|row| ParticipantData::from_row(row, is_admin))
            .collect())
    }
}

#[derive(Debug, Clone, GraphQLInputObject)]
pub struct CreateEventInput {
    pub template_id: Uuid,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub registration_deadline: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub capacity: Option<i32>,
}

impl From<CreateEventInput> for CreateEvent {
    fn from(input: CreateEventInput) -> Self {
        Self {
            template_id: EventTemplateId::from_uuid(input.template_id),
            starts_at: input.starts_at,
            ends_at: input.ends_at,
            registration_deadline: input.registration_deadline,
            location: input.location,
            capacity: input.capacity,
        }
    }
}

#[derive(Debug, Clone, Default, GraphQLInputObject)]
pub struct UpdateEventInput {
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub registration_deadline: Option<DateTime<Utc>>,
    /// Remove the deadline; cannot be combined with `registration_deadline`
    pub clear_registration_deadline: Option<bool>,
    pub location: Option<String>,
    pub capacity: Option<i32>,
}

impl From<UpdateEventInput> for UpdateEvent {
    fn from(input: UpdateEventInput) -> Self {
        Self {
            starts_at: input.starts_at,
            ends_at: input.ends_at,
            registration_deadline: input.registration_deadline,
            clear_registration_deadline: input.clear_registration_deadline.unwrap_or(false),
            location: input.location,
            capacity: input.capacity,
        }
    }
}
