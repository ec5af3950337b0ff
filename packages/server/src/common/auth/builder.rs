use super::{AuthError, Capability, MemberRole, Ownership};
use crate::common::entity_ids::MemberId;

/// The single role predicate every check goes through.
pub fn authorize(role: MemberRole, required: &[MemberRole]) -> bool {
    required.contains(&role)
}

/// Verified identity of the caller for one request.
///
/// Built from the JWT claims by the auth middleware; `is_admin` and `role`
/// are never taken from request arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    member_id: MemberId,
    role: MemberRole,
}

impl Actor {
    pub fn new(member_id: MemberId, role: MemberRole) -> Self {
        Self { member_id, role }
    }

    pub fn member_id(&self) -> MemberId {
        self.member_id
    }

    pub fn role(&self) -> MemberRole {
        self.role
    }

    pub fn is_admin(&self) -> bool {
        self.role == MemberRole::Admin
    }

    /// Specify what capability the actor needs
    pub fn can(self, capability: Capability) -> CapabilityBuilder {
        CapabilityBuilder {
            actor: self,
            capability,
            subject: None,
        }
    }
}

/// Builder after specifying capability
pub struct CapabilityBuilder {
    actor: Actor,
    capability: Capability,
    subject: Option<MemberId>,
}

impl CapabilityBuilder {
    /// The member whose records the operation touches.
    pub fn for_member(mut self, member_id: MemberId) -> Self {
        self.subject = Some(member_id);
        self
    }

    /// Perform the authorization check
    pub fn check(self) -> Result<(), AuthError> {
        let Self {
            actor,
            capability,
            subject,
        } = self;

        if !authorize(actor.role, capability.required_roles()) {
            return Err(if capability.requires_admin() {
                AuthError::AdminRequired
            } else {
                AuthError::PermissionDenied(format!(
                    "role '{}' cannot {}",
                    actor.role, capability
                ))
            });
        }

        let acting_for_other = subject.is_some_and(|member_id| member_id != actor.member_id);
        if !acting_for_other {
            return Ok(());
        }

        match capability.ownership() {
            Ownership::Unscoped => Ok(()),
            Ownership::SelfOrAdmin if actor.is_admin() => Ok(()),
            Ownership::SelfOrAdmin | Ownership::SelfOnly => Err(AuthError::PermissionDenied(
                format!("cannot {} on behalf of another member", capability),
            )),
        }
    }
}
