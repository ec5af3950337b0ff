/// Authorization for every mutating operation.
///
/// Role and identity come from the verified JWT (see `server::middleware`),
/// never from client input. Callers build a check fluently:
///
/// ```rust
/// use membership_core::common::{Actor, Capability, MemberId, MemberRole};
///
/// let me = MemberId::new();
/// Actor::new(me, MemberRole::Participant)
///     .can(Capability::EditMilestones)
///     .for_member(me)
///     .check()
///     .unwrap();
/// ```
mod builder;
mod capability;
mod errors;
mod role;

pub use builder::{authorize, Actor, CapabilityBuilder};
pub use capability::{Capability, Ownership};
pub use errors::AuthError;
pub use role::MemberRole;
