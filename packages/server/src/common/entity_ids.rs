//! Typed ids for every stored entity.

pub use super::id::Id;

// Entity markers

pub struct Member;
pub struct EventTemplate;
pub struct Event;
pub struct Participation;
pub struct Survey;
pub struct Donation;
pub struct Milestone;

pub type MemberId = Id<Member>;
pub type EventTemplateId = Id<EventTemplate>;
pub type EventId = Id<Event>;
pub type ParticipationId = Id<Participation>;
pub type SurveyId = Id<Survey>;
pub type DonationId = Id<Donation>;
pub type MilestoneId = Id<Milestone>;
