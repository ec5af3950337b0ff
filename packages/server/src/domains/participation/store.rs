//! Postgres-backed participation store

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::common::{EventId, MemberId, ParticipationId};
use crate::domains::events::models::Event;
use crate::domains::participation::models::{ParticipantRow, Participation, Survey, SurveyScores};
use crate::domains::participation::status::RegistrationStatus;
use crate::kernel::BaseParticipationStore;

pub struct PgParticipationStore {
    pool: PgPool,
}

impl PgParticipationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BaseParticipationStore for PgParticipationStore {
    async fn find_event(&self, event_id: EventId) -> Result<Option<Event>> {
        Event::find_by_id(event_id, &self.pool).await
    }

    async fn find_participation(
        &self,
        member_id: MemberId,
        event_id: EventId,
    ) -> Result<Option<Participation>> {
        Participation::find_for_member(member_id, event_id, &self.pool).await
    }

    async fn find_participation_by_id(&self, id: ParticipationId) -> Result<Option<Participation>> {
        Participation::find_by_id(id, &self.pool).await
    }

    async fn create_participation(
        &self,
        member_id: MemberId,
        event_id: EventId,
    ) -> Result<Option<Participation>> {
        Participation::register(member_id, event_id, &self.pool).await
    }

    async fn transition_status(
        &self,
        id: ParticipationId,
        expected: RegistrationStatus,
        next: RegistrationStatus,
        checked_in_at: Option<DateTime<Utc>>,
    ) -> Result<Option<Participation>> {
        Participation::transition(id, expected, next, checked_in_at, &self.pool).await
    }

    async fn mark_no_shows(&self, event_id: EventId) -> Result<u64> {
        Participation::mark_no_shows(event_id, &self.pool).await
    }

    async fn find_survey(&self, participation_id: ParticipationId) -> Result<Option<Survey>> {
        Survey::find_by_participation(participation_id, &self.pool).await
    }

    async fn create_survey(
        &self,
        participation_id: ParticipationId,
        scores: &SurveyScores,
    ) -> Result<Option<Survey>> {
        Survey::create(participation_id, scores, &self.pool).await
    }

    async fn list_participants(&self, event_id: EventId) -> Result<Vec<ParticipantRow>> {
        Participation::list_for_event(event_id, &self.pool).await
    }

    async fn list_surveys(&self, event_id: EventId) -> Result<Vec<Survey>> {
        Survey::list_for_event(event_id, &self.pool).await
    }
}
