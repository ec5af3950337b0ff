use chrono::{DateTime, Utc};
use juniper::{GraphQLInputObject, GraphQLObject};
use uuid::Uuid;

use crate::domains::participation::models::{ParticipantRow, Participation, Survey, SurveyScores};
use crate::domains::participation::status::{RegistrationStatus, WorkflowState};
use crate::domains::participation::view::RegistrationView;

#[derive(Debug, Clone, GraphQLObject)]
#[graphql(description = "A member's registration for an event")]
pub struct ParticipationData {
    pub id: Uuid,
    pub member_id: Uuid,
    pub event_id: Uuid,
    pub status: RegistrationStatus,
    pub checked_in_at: Option<DateTime<Utc>>,
    pub registered_at: DateTime<Utc>,
}

impl From<Participation> for ParticipationData {
    fn from(p: Participation) -> Self {
        Self {
            id: p.id.into_uuid(),
            member_id: p.member_id.into_uuid(),
            event_id: p.event_id.into_uuid(),
            status: p.status,
            checked_in_at: p.checked_in_at,
            registered_at: p.registered_at,
        }
    }
}

#[derive(Debug, Clone, GraphQLObject)]
#[graphql(description = "Registration page state for the current caller")]
pub struct RegistrationViewData {
    pub status: WorkflowState,
    pub participation_id: Option<Uuid>,
    pub show_register_btn: bool,
    pub show_cancel_btn: bool,
    pub show_take_survey: bool,
    pub survey_submitted: bool,
}

impl From<RegistrationView> for RegistrationViewData {
    fn from(view: RegistrationView) -> Self {
        Self {
            status: view.state,
            participation_id: view.participation_id.map(|id| id.into_uuid()),
            show_register_btn: view.show_register_btn,
            show_cancel_btn: view.show_cancel_btn,
            show_take_survey: view.show_take_survey,
            survey_submitted: view.survey_submitted,
        }
    }
}

/// One row of an event's participant list
#[derive(Debug, Clone, GraphQLObject)]
pub struct ParticipantData {
    pub participation_id: Uuid,
    pub member_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    /// Only returned to admins
    pub email: Option<String>,
    pub status: RegistrationStatus,
    pub checked_in_at: Option<DateTime<Utc>>,
}

impl ParticipantData {
    pub fn from_row(row: ParticipantRow, include_email: bool) -> Self {
        Self {
            participation_id: row.participation.id.into_uuid(),
            member_id: row.participation.member_id.into_uuid(),
            first_name: row.first_name,
            last_name: row.last_name,
            email: include_email.then_some(row.email),
            status: row.participation.status,
            checked_in_at: row.participation.checked_in_at,
        }
    }
}

#[derive(Debug, Clone, GraphQLObject)]
pub struct SurveyData {
    pub id: Uuid,
    pub participation_id: Uuid,
    pub satisfaction: i32,
    pub usefulness: i32,
    pub instructor: i32,
    pub recommendation: i32,
    pub overall_score: f64,
    pub comments: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

impl From<Survey> for SurveyData {
    fn from(s: Survey) -> Self {
        Self {
            id: s.id.into_uuid(),
            participation_id: s.participation_id.into_uuid(),
            satisfaction: s.satisfaction.into(),
            usefulness: s.usefulness.into(),
            instructor: s.instructor.into(),
            recommendation: s.recommendation.into(),
            overall_score: s.overall_score,
            comments: s.comments,
            submitted_at: s.submitted_at,
        }
    }
}

/// Survey answers; each score is 1 to 5
#[derive(Debug, Clone, GraphQLInputObject)]
pub struct SurveyInput {
    pub satisfaction: i32,
    pub usefulness: i32,
    pub instructor: i32,
    pub recommendation: i32,
    /// Defaults to the mean of the four scores
    pub overall: Option<f64>,
    pub comments: Option<String>,
}

impl From<SurveyInput> for SurveyScores {
    fn from(input: SurveyInput) -> Self {
        // Out-of-range values saturate and are then rejected by validation
        let clamp = |v: i32| i16::try_from(v).unwrap_or(if v < 0 { i16::MIN } else { i16::MAX });
        Self {
            satisfaction: clamp(input.satisfaction),
            usefulness: clamp(input.usefulness),
            instructor: clamp(input.instructor),
            recommendation: clamp(input.recommendation),
            overall: input.overall,
            comments: input
                .comments
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty()),
        }
    }
}
