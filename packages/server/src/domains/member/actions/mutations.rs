use sqlx::PgPool;
use tracing::info;

use crate::common::{Actor, AuthError, Capability, MemberId, MemberRole};
use crate::domains::member::models::{Member, UpdateProfile};

/// Edit a profile. Participants may only edit their own.
pub async fn update_profile(
    actor: Actor,
    member_id: MemberId,
    input: UpdateProfile,
    pool: &PgPool,
) -> Result<Option<Member>, AuthError> {
    actor
        .can(Capability::EditProfile)
        .for_member(member_id)
        .check()?;

    info!(member_id = %member_id, actor = %actor.member_id(), "Updating member profile");

    Ok(Member::update_profile(member_id, input, pool).await?)
}

/// Change a member's role (admin only). Admins cannot demote themselves.
pub async fn update_member_role(
    actor: Actor,
    member_id: MemberId,
    role: MemberRole,
    pool: &PgPool,
) -> Result<Option<Member>, AuthError> {
    actor.can(Capability::ManageMembers).check()?;

    if member_id == actor.member_id() && role != MemberRole::Admin {
        return Err(AuthError::PermissionDenied(
            "admins cannot remove their own admin role".to_string(),
        ));
    }

    info!(member_id = %member_id, role = %role, "Updating member role");

    Ok(Member::update_role(member_id, role, pool).await?)
}

/// Delete a member and everything that hangs off it (admin only)
pub async fn delete_member(
    actor: Actor,
    member_id: MemberId,
    pool: &PgPool,
) -> Result<bool, AuthError> {
    actor.can(Capability::ManageMembers).check()?;

    if member_id == actor.member_id() {
        return Err(AuthError::PermissionDenied(
            "admins cannot delete their own account".to_string(),
        ));
    }

    info!(member_id = %member_id, "Deleting member");

    Ok(Member::delete(member_id, pool).await?)
}
