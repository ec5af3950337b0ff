// TestDependencies - in-memory implementations for testing
//
// Provides a participation store that the workflow can run against without
// a database.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Mutex;

use super::BaseParticipationStore;
use crate::common::{EventId, MemberId, ParticipationId, SurveyId};
use crate::domains::events::models::Event;
use crate::domains::participation::models::{ParticipantRow, Participation, Survey, SurveyScores};
use crate::domains::participation::status::RegistrationStatus;

// =============================================================================
// Memory Participation Store
// =============================================================================

#[derive(Debug, Clone)]
struct MemberName {
    first_name: String,
    last_name: String,
    email: String,
}

#[derive(Default)]
struct MemoryState {
    events: HashMap<EventId, Event>,
    members: HashMap<MemberId, MemberName>,
    participations: Vec<Participation>,
    surveys: Vec<Survey>,
}

/// Participation store backed by process memory.
///
/// Mirrors the Postgres constraints: one participation per (member, event),
/// one survey per participation, surveys only on attended rows, and no
/// check-out once a survey exists.
#[derive(Default)]
pub struct MemoryParticipationStore {
    state: Mutex<MemoryState>,
}

impl MemoryParticipationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_event(self, event: Event) -> Self {
        self.state.lock().unwrap().events.insert(event.id, event);
        self
    }

    /// Register a member name for participant listings
    pub fn with_member(self, member_id: MemberId, first_name: &str, last_name: &str) -> Self {
        self.state.lock().unwrap().members.insert(
            member_id,
            MemberName {
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
                email: format!(
                    "{}.{}@example.org",
                    first_name.to_lowercase(),
                    last_name.to_lowercase()
                ),
            },
        );
        self
    }

    /// Snapshot of every stored participation
    pub fn participations(&self) -> Vec<Participation> {
        self.state.lock().unwrap().participations.clone()
    }

    pub fn survey_count(&self) -> usize {
        self.state.lock().unwrap().surveys.len()
    }
}

#[async_trait]
impl BaseParticipationStore for MemoryParticipationStore {
    async fn find_event(&self, event_id: EventId) -> Result<Option<Event>> {
        Ok(self.state.lock().unwrap().events.get(&event_id).cloned())
    }

    async fn find_participation(
        &self,
        member_id: MemberId,
        event_id: EventId,
    ) -> Result<Option<Participation>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .participations
            .iter()
            .find(|p| p.member_id == member_id && p.event_id == event_id)
            .cloned())
    }

    async fn find_participation_by_id(&self, id: ParticipationId) -> Result<Option<Participation>> {
        let state = self.state.lock().unwrap();
        Ok(state.participations.iter().find(|p| p.id == id).cloned())
    }

    async fn create_participation(
        &self,
        member_id: MemberId,
        event_id: EventId,
    ) -> Result<Option<Participation>> {
        let mut state = self.state.lock().unwrap();
        if !state.events.contains_key(&event_id) {
            anyhow::bail!("foreign key violation: event {event_id} does not exist");
        }
        if state
            .participations
            .iter()
            .any(|p| p.member_id == member_id && p.event_id == event_id)
        {
            return Ok(None);
        }

        let participation = Participation {
            id: ParticipationId::new(),
            member_id,
            event_id,
            status: RegistrationStatus::SignedUp,
            checked_in_at: None,
            registered_at: Utc::now(),
        };
        state.participations.push(participation.clone());
        Ok(Some(participation))
    }

    async fn transition_status(
        &self,
        id: ParticipationId,
        expected: RegistrationStatus,
        next: RegistrationStatus,
        checked_in_at: Option<DateTime<Utc>>,
    ) -> Result<Option<Participation>> {
        let mut state = self.state.lock().unwrap();
        let surveyed = state.surveys.iter().any(|s| s.participation_id == id);
        if surveyed && expected == RegistrationStatus::Attended && next != RegistrationStatus::Attended {
            return Ok(None);
        }

        let Some(participation) = state
            .participations
            .iter_mut()
            .find(|p| p.id == id && p.status == expected)
        else {
            return Ok(None);
        };

        participation.status = next;
        participation.checked_in_at = checked_in_at;
        Ok(Some(participation.clone()))
    }

    async fn mark_no_shows(&self, event_id: EventId) -> Result<u64> {
        let mut state = self.state.lock().unwrap();
        let mut changed = 0;
        for participation in state
            .participations
            .iter_mut()
            .filter(|p| p.event_id == event_id && p.status == RegistrationStatus::SignedUp)
        {
            participation.status = RegistrationStatus::NoShow;
            changed += 1;
        }
        Ok(changed)
    }

    async fn find_survey(&self, participation_id: ParticipationId) -> Result<Option<Survey>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .surveys
            .iter()
            .find(|s| s.participation_id == participation_id)
            .cloned())
    }

    async fn create_survey(
        &self,
        participation_id: ParticipationId,
        scores: &SurveyScores,
    ) -> Result<Option<Survey>> {
        let mut state = self.state.lock().unwrap();
        let attended = state
            .participations
            .iter()
            .any(|p| p.id == participation_id && p.status == RegistrationStatus::Attended);
        if !attended
            || state
                .surveys
                .iter()
                .any(|s| s.participation_id == participation_id)
        {
            return Ok(None);
        }

        let survey = Survey {
            id: SurveyId::new(),
            participation_id,
            satisfaction: scores.satisfaction,
            usefulness: scores.usefulness,
            instructor: scores.instructor,
            recommendation: scores.recommendation,
            overall_score: scores.overall_score(),
            comments: scores.comments.clone(),
            submitted_at: Utc::now(),
        };
        state.surveys.push(survey.clone());
        Ok(Some(survey))
    }

    async fn list_participants(&self, event_id: EventId) -> Result<Vec<ParticipantRow>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .participations
            .iter()
            .filter(|p| p.event_id == event_id)
            .map(|p| {
                let name = state.members.get(&p.member_id).cloned().unwrap_or(MemberName {
                    first_name: String::new(),
                    last_name: String::new(),
                    email: String::new(),
                });
                ParticipantRow {
                    participation: p.clone(),
                    first_name: name.first_name,
                    last_name: name.last_name,
                    email: name.email,
                }
            })
            .collect())
    }

    async fn list_surveys(&self, event_id: EventId) -> Result<Vec<Survey>> {
        let state = self.state.lock().unwrap();
        let ids: Vec<ParticipationId> = state
            .participations
            .iter()
            .filter(|p| p.event_id == event_id)
            .map(|p| p.id)
            .collect();
        Ok(state
            .surveys
            .iter()
            .filter(|s| ids.contains(&s.participation_id))
            .cloned()
            .collect())
    }
}
