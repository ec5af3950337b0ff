pub mod milestone;

pub use milestone::{CreateMilestone, Milestone, UpdateMilestone};
