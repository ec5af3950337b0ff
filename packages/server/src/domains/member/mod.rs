//! Member domain - profiles and administrative member management

pub mod actions;
pub mod data;
pub mod models;

pub use data::{MemberData, UpdateProfileInput};
pub use models::Member;
