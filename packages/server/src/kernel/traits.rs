// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// The participation workflow (legality, authorization, time guards) lives in
// domains::participation::workflow and runs against these traits.
//
// Naming convention: Base* for trait names (e.g., BaseParticipationStore)

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::common::{EventId, MemberId, ParticipationId};
use crate::domains::events::models::Event;
use crate::domains::participation::models::{ParticipantRow, Participation, Survey, SurveyScores};
use crate::domains::participation::status::RegistrationStatus;

// =============================================================================
// Participation Store Trait (Infrastructure - persistence for the workflow)
// =============================================================================

#[async_trait]
pub trait BaseParticipationStore: Send + Sync {
    async fn find_event(&self, event_id: EventId) -> Result<Option<Event>>;

    async fn find_participation(
        &self,
        member_id: MemberId,
        event_id: EventId,
    ) -> Result<Option<Participation>>;

    async fn find_participation_by_id(&self, id: ParticipationId) -> Result<Option<Participation>>;

    /// Atomically create a signed-up participation.
    /// Returns `None` if one already exists for (member, event).
    async fn create_participation(
        &self,
        member_id: MemberId,
        event_id: EventId,
    ) -> Result<Option<Participation>>;

    /// Conditional status update; `None` if the stored status is not `expected`,
    /// or if it would leave `attended` after a survey was submitted.
    async fn transition_status(
        &self,
        id: ParticipationId,
        expected: RegistrationStatus,
        next: RegistrationStatus,
        checked_in_at: Option<DateTime<Utc>>,
    ) -> Result<Option<Participation>>;

    /// Signed-up participations for the event become no-shows. Returns the count changed.
    async fn mark_no_shows(&self, event_id: EventId) -> Result<u64>;

    async fn find_survey(&self, participation_id: ParticipationId) -> Result<Option<Survey>>;

    /// Returns `None` if a survey already exists for the participation or it
    /// is not attended at the time of the write.
    async fn create_survey(
        &self,
        participation_id: ParticipationId,
        scores: &SurveyScores,
    ) -> Result<Option<Survey>>;

    /// Every participation for the event with member names, unsorted
    async fn list_participants(&self, event_id: EventId) -> Result<Vec<ParticipantRow>>;

    async fn list_surveys(&self, event_id: EventId) -> Result<Vec<Survey>>;
}
