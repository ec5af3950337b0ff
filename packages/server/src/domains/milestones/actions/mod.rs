//! Milestone actions. Every operation is limited to the owning member or an
//! admin through `Capability::EditMilestones`.

use sqlx::PgPool;
use tracing::info;

use crate::common::{Actor, AuthError, Capability, MemberId, MilestoneId};
use crate::domains::milestones::models::{CreateMilestone, Milestone, UpdateMilestone};

pub async fn list_milestones(
    actor: Actor,
    member_id: MemberId,
    pool: &PgPool,
) -> Result<Vec<Milestone>, AuthError> {
    actor
        .can(Capability::EditMilestones)
        .for_member(member_id)
        .check()?;

    Ok(Milestone::find_by_member(member_id, pool).await?)
}

pub async fn create_milestone(
    actor: Actor,
    member_id: MemberId,
    input: CreateMilestone,
    pool: &PgPool,
) -> Result<Milestone, AuthError> {
    actor
        .can(Capability::EditMilestones)
        .for_member(member_id)
        .check()?;

    if input.title.is_empty() {
        return Err(AuthError::InvalidInput("milestone title is required".to_string()));
    }

    let milestone = Milestone::create(member_id, input, pool).await?;
    info!(milestone_id = %milestone.id, member_id = %member_id, "Created milestone");
    Ok(milestone)
}

pub async fn update_milestone(
    actor: Actor,
    id: MilestoneId,
    input: UpdateMilestone,
    pool: &PgPool,
) -> Result<Option<Milestone>, AuthError> {
    let Some(existing) = Milestone::find_by_id(id, pool).await? else {
        return Ok(None);
    };
    actor
        .can(Capability::EditMilestones)
        .for_member(existing.member_id)
        .check()?;

    if input.title.as_deref() == Some("") {
        return Err(AuthError::InvalidInput("milestone title is required".to_string()));
    }

    info!(milestone_id = %id, "Updating milestone");
    Ok(Milestone::update(id, input, pool).await?)
}

pub async fn delete_milestone(actor: Actor, id: MilestoneId, pool: &PgPool) -> Result<bool, AuthError> {
    let Some(existing) = Milestone::find_by_id(id, pool).await? else {
        return Ok(false);
    };
    actor
        .can(Capability::EditMilestones)
        .for_member(existing.member_id)
        .check()?;

    info!(milestone_id = %id, "Deleting milestone");
    Ok(Milestone::delete(id, pool).await?)
}
