pub mod milestone;

pub use milestone::*;
