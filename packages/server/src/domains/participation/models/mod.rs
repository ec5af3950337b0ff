pub mod participation;
pub mod survey;

pub use participation::{ParticipantRow, Participation};
pub use survey::{Survey, SurveyScores};
