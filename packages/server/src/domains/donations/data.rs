use chrono::{DateTime, Utc};
use juniper::{GraphQLInputObject, GraphQLObject};
use uuid::Uuid;

use crate::common::MemberId;
use crate::domains::donations::models::{CreateDonation, Donation, DonationTotal};

fn dollars(cents: i64) -> f64 {
    cents as f64 / 100.0
}

#[derive(Debug, Clone, GraphQLObject)]
pub struct DonationData {
    pub id: Uuid,
    pub member_id: Option<Uuid>,
    /// Amount in dollars
    pub amount: f64,
    pub donated_at: DateTime<Utc>,
    pub note: Option<String>,
}

impl From<Donation> for DonationData {
    fn from(d: Donation) -> Self {
        Self {
            id: d.id.into_uuid(),
            member_id: d.member_id.map(|id| id.into_uuid()),
            amount: dollars(d.amount_cents),
            donated_at: d.donated_at,
            note: d.note,
        }
    }
}

#[derive(Debug, Clone, GraphQLObject)]
pub struct DonationTotalData {
    /// Sum in dollars
    pub total: f64,
    pub count: i32,
}

impl From<DonationTotal> for DonationTotalData {
    fn from(t: DonationTotal) -> Self {
        Self {
            total: dollars(t.total_cents),
            count: i32::try_from(t.count).unwrap_or(i32::MAX),
        }
    }
}

#[derive(Debug, Clone, GraphQLInputObject)]
pub struct RecordDonationInput {
    pub member_id: Option<Uuid>,
    pub amount_cents: i32,
    /// Defaults to now
    pub donated_at: Option<DateTime<Utc>>,
    pub note: Option<String>,
}

impl From<RecordDonationInput> for CreateDonation {
    fn from(input: RecordDonationInput) -> Self {
        Self {
            member_id: input.member_id.map(MemberId::from_uuid),
            amount_cents: input.amount_cents.into(),
            donated_at: input.donated_at.unwrap_or_else(Utc::now),
            note: input.note,
        }
    }
}
