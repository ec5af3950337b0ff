pub mod event;
pub mod event_template;

pub use event::{CreateEvent, Event, UpdateEvent};
pub use event_template::{CreateEventTemplate, EventTemplate, UpdateEventTemplate};
