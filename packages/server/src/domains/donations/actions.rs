use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::info;

use crate::common::{Actor, AuthError, Capability, DonationId, MemberId};
use crate::domains::donations::models::{CreateDonation, Donation, DonationTotal};

pub async fn record_donation(
    actor: Actor,
    input: CreateDonation,
    pool: &PgPool,
) -> Result<Donation, AuthError> {
    actor.can(Capability::ManageDonations).check()?;

    if input.amount_cents <= 0 {
        return Err(AuthError::InvalidInput(
            "donation amount must be positive".to_string(),
        ));
    }

    let donation = Donation::create(input, pool).await?;
    info!(
        donation_id = %donation.id,
        amount_cents = donation.amount_cents,
        "Recorded donation"
    );
    Ok(donation)
}

pub async fn delete_donation(actor: Actor, id: DonationId, pool: &PgPool) -> Result<bool, AuthError> {
    actor.can(Capability::ManageDonations).check()?;

    info!(donation_id = %id, "Deleting donation");
    Ok(Donation::delete(id, pool).await?)
}

pub async fn list_donations(
    actor: Actor,
    limit: Option<i64>,
    offset: Option<i64>,
    pool: &PgPool,
) -> Result<Vec<Donation>, AuthError> {
    actor.can(Capability::ManageDonations).check()?;

    let limit = limit.unwrap_or(50).clamp(1, 200);
    Ok(Donation::list(limit, offset.unwrap_or(0).max(0), pool).await?)
}

/// A member's own donations; admins may look up anyone's.
pub async fn list_member_donations(
    actor: Actor,
    member_id: MemberId,
    pool: &PgPool,
) -> Result<Vec<Donation>, AuthError> {
    if member_id != actor.member_id() {
        actor.can(Capability::ManageDonations).check()?;
    }

    Ok(Donation::list_for_member(member_id, pool).await?)
}

pub async fn donation_total(
    actor: Actor,
    since: Option<DateTime<Utc>>,
    pool: &PgPool,
) -> Result<DonationTotal, AuthError> {
    actor.can(Capability::ManageDonations).check()?;

    Ok(Donation::total(since, pool).await?)
}
