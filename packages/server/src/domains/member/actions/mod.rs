//! Member domain actions
//!
//! Every action takes the verified `Actor` and performs its own authorization
//! check before touching the store.

mod mutations;
mod queries;

pub use mutations::*;
pub use queries::*;
