//! Milestones domain - achievements recorded against a member

pub mod actions;
pub mod data;
pub mod models;

pub use data::{CreateMilestoneInput, MilestoneData, UpdateMilestoneInput};
pub use models::Milestone;
