//! Events domain - event templates and scheduled events

pub mod actions;
pub mod data;
pub mod models;

pub use data::{EventData, EventTemplateData};
pub use models::{Event, EventTemplate};
