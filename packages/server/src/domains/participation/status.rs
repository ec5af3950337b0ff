//! Registration status and the participation state machine.
//!
//! `RegistrationStatus` is what the `registrations` table stores.
//! `WorkflowState` adds the two states that are derived rather than stored:
//! `NotRegistered` (no participation row) and `Surveyed` (attended with a
//! survey on file). Every transition goes through [`WorkflowState::apply`].

use serde::{Deserialize, Serialize};
use sqlx::encode::IsNull;
use sqlx::error::BoxDynError;
use sqlx::postgres::{PgArgumentBuffer, PgTypeInfo, PgValueRef, Postgres};
use sqlx::{Decode, Encode, Type};

use super::errors::WorkflowError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, juniper::GraphQLEnum)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationStatus {
    SignedUp,
    Attended,
    Cancelled,
    NoShow,
}

impl RegistrationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegistrationStatus::SignedUp => "signed_up",
            RegistrationStatus::Attended => "attended",
            RegistrationStatus::Cancelled => "cancelled",
            RegistrationStatus::NoShow => "no_show",
        }
    }

    /// Display order for participant listings
    pub fn sort_priority(&self) -> u8 {
        match self {
            RegistrationStatus::SignedUp => 1,
            RegistrationStatus::Attended => 2,
            RegistrationStatus::Cancelled => 3,
            RegistrationStatus::NoShow => 4,
        }
    }
}

impl std::fmt::Display for RegistrationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RegistrationStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "signed_up" => Ok(RegistrationStatus::SignedUp),
            "attended" => Ok(RegistrationStatus::Attended),
            "cancelled" => Ok(RegistrationStatus::Cancelled),
            "no_show" => Ok(RegistrationStatus::NoShow),
            _ => Err(anyhow::anyhow!("Invalid registration status: {}", s)),
        }
    }
}

impl Type<Postgres> for RegistrationStatus {
    fn type_info() -> PgTypeInfo {
        <&str as Type<Postgres>>::type_info()
    }

    fn compatible(ty: &PgTypeInfo) -> bool {
        <&str as Type<Postgres>>::compatible(ty)
    }
}

impl Encode<'_, Postgres> for RegistrationStatus {
    fn encode_by_ref(&self, buf: &mut PgArgumentBuffer) -> Result<IsNull, BoxDynError> {
        <&str as Encode<Postgres>>::encode_by_ref(&self.as_str(), buf)
    }
}

impl Decode<'_, Postgres> for RegistrationStatus {
    fn decode(value: PgValueRef<'_>) -> Result<Self, BoxDynError> {
        let raw = <&str as Decode<Postgres>>::decode(value)?;
        Ok(raw.parse()?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, juniper::GraphQLEnum)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowState {
    NotRegistered,
    SignedUp,
    Attended,
    Cancelled,
    NoShow,
    /// Attended and a survey exists. Terminal.
    Surveyed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkflowAction {
    Register,
    Cancel,
    /// Toggles between attended and cancelled; doubles as check-out.
    CheckIn,
    MarkNoShow,
    SubmitSurvey,
}

impl std::fmt::Display for WorkflowAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            WorkflowAction::Register => "register",
            WorkflowAction::Cancel => "cancel",
            WorkflowAction::CheckIn => "check in",
            WorkflowAction::MarkNoShow => "mark no-show",
            WorkflowAction::SubmitSurvey => "submit survey",
        };
        f.write_str(name)
    }
}

impl std::fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            WorkflowState::NotRegistered => "not_registered",
            WorkflowState::SignedUp => "signed_up",
            WorkflowState::Attended => "attended",
            WorkflowState::Cancelled => "cancelled",
            WorkflowState::NoShow => "no_show",
            WorkflowState::Surveyed => "surveyed",
        };
        f.write_str(name)
    }
}

impl From<RegistrationStatus> for WorkflowState {
    fn from(status: RegistrationStatus) -> Self {
        match status {
            RegistrationStatus::SignedUp => WorkflowState::SignedUp,
            RegistrationStatus::Attended => WorkflowState::Attended,
            RegistrationStatus::Cancelled => WorkflowState::Cancelled,
            RegistrationStatus::NoShow => WorkflowState::NoShow,
        }
    }
}

impl WorkflowState {
    pub fn from_parts(status: Option<RegistrationStatus>, has_survey: bool) -> Self {
        match status {
            None => WorkflowState::NotRegistered,
            Some(RegistrationStatus::Attended) if has_survey => WorkflowState::Surveyed,
            Some(status) => status.into(),
        }
    }

    /// The stored status for this state, if there is a row behind it.
    pub fn registration_status(&self) -> Option<RegistrationStatus> {
        match self {
            WorkflowState::NotRegistered => None,
            WorkflowState::SignedUp => Some(RegistrationStatus::SignedUp),
            WorkflowState::Attended | WorkflowState::Surveyed => Some(RegistrationStatus::Attended),
            WorkflowState::Cancelled => Some(RegistrationStatus::Cancelled),
            WorkflowState::NoShow => Some(RegistrationStatus::NoShow),
        }
    }

    /// Transition table. Time guards and authorization are checked by the
    /// workflow operations; this only decides whether `action` is legal here.
    pub fn apply(self, action: WorkflowAction) -> Result<WorkflowState, WorkflowError> {
        use WorkflowAction as A;
        use WorkflowState as S;

        match (self, action) {
            (S::NotRegistered, A::Register) => Ok(S::SignedUp),
            (S::NotRegistered, _) => Err(WorkflowError::NotRegistered),
            (_, A::Register) => Err(WorkflowError::AlreadyRegistered),

            (S::SignedUp, A::Cancel) => Ok(S::Cancelled),
            (S::SignedUp, A::MarkNoShow) => Ok(S::NoShow),

            (S::Attended, A::CheckIn) => Ok(S::Cancelled),
            (S::SignedUp | S::Cancelled | S::NoShow, A::CheckIn) => Ok(S::Attended),

            (S::Attended, A::SubmitSurvey) => Ok(S::Surveyed),
            (S::Surveyed, A::SubmitSurvey) => Err(WorkflowError::SurveyAlreadySubmitted),
            (_, A::SubmitSurvey) => Err(WorkflowError::SurveyNotAvailable),

            (from, action) => Err(WorkflowError::InvalidTransition { from, action }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_STATES: [WorkflowState; 6] = [
        WorkflowState::NotRegistered,
        WorkflowState::SignedUp,
        WorkflowState::Attended,
        WorkflowState::Cancelled,
        WorkflowState::NoShow,
        WorkflowState::Surveyed,
    ];

    #[test]
    fn status_round_trips_through_storage_text() {
        for status in [
            RegistrationStatus::SignedUp,
            RegistrationStatus::Attended,
            RegistrationStatus::Cancelled,
            RegistrationStatus::NoShow,
        ] {
            assert_eq!(status.as_str().parse::<RegistrationStatus>().unwrap(), status);
        }
        assert!("signed-up".parse::<RegistrationStatus>().is_err());
    }

    #[test]
    fn register_only_from_not_registered() {
        assert_eq!(
            WorkflowState::NotRegistered.apply(WorkflowAction::Register).unwrap(),
            WorkflowState::SignedUp
        );
        for state in &ALL_STATES[1..] {
            assert!(matches!(
                state.apply(WorkflowAction::Register),
                Err(WorkflowError::AlreadyRegistered)
            ));
        }
    }

    #[test]
    fn nothing_but_register_without_a_row() {
        for action in [
            WorkflowAction::Cancel,
            WorkflowAction::CheckIn,
            WorkflowAction::MarkNoShow,
            WorkflowAction::SubmitSurvey,
        ] {
            assert!(matches!(
                WorkflowState::NotRegistered.apply(action),
                Err(WorkflowError::NotRegistered)
            ));
        }
    }

    #[test]
    fn cancel_and_no_show_only_from_signed_up() {
        assert_eq!(
            WorkflowState::SignedUp.apply(WorkflowAction::Cancel).unwrap(),
            WorkflowState::Cancelled
        );
        assert_eq!(
            WorkflowState::SignedUp.apply(WorkflowAction::MarkNoShow).unwrap(),
            WorkflowState::NoShow
        );
        for state in [
            WorkflowState::Attended,
            WorkflowState::Cancelled,
            WorkflowState::NoShow,
            WorkflowState::Surveyed,
        ] {
            assert!(matches!(
                state.apply(WorkflowAction::Cancel),
                Err(WorkflowError::InvalidTransition { .. })
            ));
            assert!(matches!(
                state.apply(WorkflowAction::MarkNoShow),
                Err(WorkflowError::InvalidTransition { .. })
            ));
        }
    }

    #[test]
    fn check_in_toggle_is_its_own_inverse() {
        for start in [WorkflowState::Attended, WorkflowState::Cancelled] {
            let once = start.apply(WorkflowAction::CheckIn).unwrap();
            let twice = once.apply(WorkflowAction::CheckIn).unwrap();
            assert_ne!(once, start);
            assert_eq!(twice, start);
        }
    }

    #[test]
    fn check_in_from_signed_up_and_no_show() {
        for start in [WorkflowState::SignedUp, WorkflowState::NoShow] {
            assert_eq!(
                start.apply(WorkflowAction::CheckIn).unwrap(),
                WorkflowState::Attended
            );
        }
        assert!(matches!(
            WorkflowState::Surveyed.apply(WorkflowAction::CheckIn),
            Err(WorkflowError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn survey_only_after_attending() {
        assert_eq!(
            WorkflowState::Attended.apply(WorkflowAction::SubmitSurvey).unwrap(),
            WorkflowState::Surveyed
        );
        assert!(matches!(
            WorkflowState::Surveyed.apply(WorkflowAction::SubmitSurvey),
            Err(WorkflowError::SurveyAlreadySubmitted)
        ));
        for state in [
            WorkflowState::SignedUp,
            WorkflowState::Cancelled,
            WorkflowState::NoShow,
        ] {
            assert!(matches!(
                state.apply(WorkflowAction::SubmitSurvey),
                Err(WorkflowError::SurveyNotAvailable)
            ));
        }
    }

    #[test]
    fn derived_states() {
        assert_eq!(WorkflowState::from_parts(None, false), WorkflowState::NotRegistered);
        assert_eq!(
            WorkflowState::from_parts(Some(RegistrationStatus::Attended), true),
            WorkflowState::Surveyed
        );
        assert_eq!(
            WorkflowState::from_parts(Some(RegistrationStatus::Attended), false),
            WorkflowState::Attended
        );
        for state in ALL_STATES {
            let status = state.registration_status();
            let has_survey = state == WorkflowState::Surveyed;
            assert_eq!(WorkflowState::from_parts(status, has_survey), state);
        }
    }
}
