pub mod auth;
pub mod donations;
pub mod events;
pub mod member;
pub mod milestones;
pub mod participation;
