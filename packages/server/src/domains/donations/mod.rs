//! Donations domain - gifts recorded by administrators

pub mod actions;
pub mod data;
pub mod models;

pub use data::{DonationData, DonationTotalData, RecordDonationInput};
pub use models::Donation;
