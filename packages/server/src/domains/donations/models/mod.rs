pub mod donation;

pub use donation::{CreateDonation, Donation, DonationTotal};
