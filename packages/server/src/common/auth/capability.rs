use super::MemberRole;

const ADMIN_ONLY: &[MemberRole] = &[MemberRole::Admin];
const MEMBERS: &[MemberRole] = &[MemberRole::Participant, MemberRole::Admin];

/// Operations that require more than anonymous read access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Register for or cancel an event registration
    RegisterForEvents,

    /// Submit a post-event survey
    SubmitSurveys,

    /// Toggle attendance on a participation
    CheckInParticipants,

    /// Close an event, turning remaining sign-ups into no-shows
    CloseEvents,

    /// Create, edit and delete events and event templates
    ManageEvents,

    /// List, re-role and delete members
    ManageMembers,

    /// Record and delete donations
    ManageDonations,

    /// Read all participations and surveys of an event
    ViewAllParticipants,

    /// Edit a member profile
    EditProfile,

    /// Create, edit and delete milestones
    EditMilestones,
}

/// How a capability treats a subject member other than the actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ownership {
    /// No subject member involved.
    Unscoped,
    /// Only the actor's own records.
    SelfOnly,
    /// The actor's own records, or anyone's for admins.
    SelfOrAdmin,
}

impl Capability {
    /// Roles allowed to exercise this capability at all.
    pub fn required_roles(&self) -> &'static [MemberRole] {
        match self {
            Capability::RegisterForEvents
            | Capability::SubmitSurveys
            | Capability::EditProfile
            | Capability::EditMilestones => MEMBERS,
            Capability::CheckInParticipants
            | Capability::CloseEvents
            | Capability::ManageEvents
            | Capability::ManageMembers
            | Capability::ManageDonations
            | Capability::ViewAllParticipants => ADMIN_ONLY,
        }
    }

    pub fn ownership(&self) -> Ownership {
        match self {
            Capability::SubmitSurveys => Ownership::SelfOnly,
            Capability::RegisterForEvents
            | Capability::EditProfile
            | Capability::EditMilestones => Ownership::SelfOrAdmin,
            _ => Ownership::Unscoped,
        }
    }

    pub fn requires_admin(&self) -> bool {
        self.required_roles() == ADMIN_ONLY
    }
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Capability::RegisterForEvents => "register for events",
            Capability::SubmitSurveys => "submit surveys",
            Capability::CheckInParticipants => "check in participants",
            Capability::CloseEvents => "close events",
            Capability::ManageEvents => "manage events",
            Capability::ManageMembers => "manage members",
            Capability::ManageDonations => "manage donations",
            Capability::ViewAllParticipants => "view all participants",
            Capability::EditProfile => "edit profiles",
            Capability::EditMilestones => "edit milestones",
        };
        f.write_str(name)
    }
}
