//! Participation domain - the event participation workflow
//!
//! Registration, cancellation, check-in, no-shows and surveys for a
//! (member, event) pair, plus the registration page view and participant
//! listings derived from that state.

pub mod data;
pub mod errors;
pub mod models;
pub mod status;
pub mod store;
pub mod view;
pub mod workflow;

pub use data::{ParticipantData, ParticipationData, RegistrationViewData, SurveyData, SurveyInput};
pub use errors::WorkflowError;
pub use models::{ParticipantRow, Participation, Survey, SurveyScores};
pub use status::{RegistrationStatus, WorkflowAction, WorkflowState};
pub use store::PgParticipationStore;
pub use view::RegistrationView;
