// Membership & Event Participation - API Core
//
// Members, events, and the participation workflow (register, cancel,
// check-in, no-shows, surveys) behind a GraphQL API.
//
// Domains live in domains/*; shared infrastructure in kernel/.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
