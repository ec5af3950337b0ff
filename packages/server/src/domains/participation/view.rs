//! Derived view models: registration page flags and participant listings.

use super::models::ParticipantRow;
use super::status::{RegistrationStatus, WorkflowState};
use crate::common::ParticipationId;

/// What the registration page shows for one (caller, event) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistrationView {
    pub state: WorkflowState,
    /// The caller's participation, needed to submit a survey
    pub participation_id: Option<ParticipationId>,
    pub show_register_btn: bool,
    pub show_cancel_btn: bool,
    pub show_take_survey: bool,
    pub survey_submitted: bool,
}

impl RegistrationView {
    /// `may_participate` is false for anonymous callers and visitors, which
    /// turns every flag off.
    pub fn from_state(state: WorkflowState, event_ended: bool, may_participate: bool) -> Self {
        if !may_participate {
            return Self::hidden(state);
        }

        Self {
            state,
            participation_id: None,
            show_register_btn: state == WorkflowState::NotRegistered && !event_ended,
            show_cancel_btn: state == WorkflowState::SignedUp && !event_ended,
            show_take_survey: state == WorkflowState::Attended && event_ended,
            survey_submitted: state == WorkflowState::Surveyed,
        }
    }

    fn hidden(state: WorkflowState) -> Self {
        Self {
            state,
            participation_id: None,
            show_register_btn: false,
            show_cancel_btn: false,
            show_take_survey: false,
            survey_submitted: false,
        }
    }
}

fn visible_to_public(status: RegistrationStatus, event_ended: bool) -> bool {
    match status {
        RegistrationStatus::Attended => true,
        RegistrationStatus::SignedUp => !event_ended,
        RegistrationStatus::Cancelled | RegistrationStatus::NoShow => false,
    }
}

/// Filter participants for the caller and sort by status priority, then
/// last name, then first name (case-insensitive).
pub fn visible_participants(
    rows: Vec<ParticipantRow>,
    is_admin: bool,
    event_ended: bool,
) -> Vec<ParticipantRow> {
    let mut rows: Vec<ParticipantRow> = rows
        .into_iter()
        .filter(|row| is_admin || visible_to_public(row.participation.status, event_ended))
        .collect();

    rows.sort_by_cached_key(|row| {
        (
            row.participation.status.sort_priority(),
            row.last_name.to_lowercase(),
            row.first_name.to_lowercase(),
        )
    });
    rows
}
