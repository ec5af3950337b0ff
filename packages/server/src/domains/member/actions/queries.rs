use sqlx::PgPool;
use tracing::debug;

use crate::common::{Actor, AuthError, Capability, MemberId};
use crate::domains::member::models::Member;

/// Largest page the member listing returns
pub const MAX_PAGE_SIZE: i64 = 200;

/// A member's own record, or anyone's for admins.
pub async fn get_member(
    actor: Actor,
    member_id: MemberId,
    pool: &PgPool,
) -> Result<Option<Member>, AuthError> {
    // Any signed-in role may read its own record
    if member_id != actor.member_id() {
        actor.can(Capability::ManageMembers).check()?;
    }

    Ok(Member::find_by_id(member_id, pool).await?)
}

/// Paginated member list (admin only)
pub async fn list_members(
    actor: Actor,
    limit: Option<i64>,
    offset: Option<i64>,
    pool: &PgPool,
) -> Result<(Vec<Member>, i64), AuthError> {
    actor.can(Capability::ManageMembers).check()?;

    let limit = limit.unwrap_or(50).clamp(1, MAX_PAGE_SIZE);
    let offset = offset.unwrap_or(0).max(0);
    debug!(limit, offset, "Listing members");

    let members = Member::list(limit, offset, pool).await?;
    let total = Member::count(pool).await?;

    Ok((members, total))
}
