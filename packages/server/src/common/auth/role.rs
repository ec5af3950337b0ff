use serde::{Deserialize, Serialize};
use sqlx::encode::IsNull;
use sqlx::error::BoxDynError;
use sqlx::postgres::{PgArgumentBuffer, PgTypeInfo, PgValueRef, Postgres};
use sqlx::{Decode, Encode, Type};

/// Role attached to a member row and carried in the JWT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, juniper::GraphQLEnum)]
#[serde(rename_all = "snake_case")]
pub enum MemberRole {
    /// Read-only access to public listings.
    Visitor,
    /// Registers for events, takes surveys, manages own profile and milestones.
    Participant,
    /// Unrestricted.
    Admin,
}

impl MemberRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberRole::Visitor => "visitor",
            MemberRole::Participant => "participant",
            MemberRole::Admin => "admin",
        }
    }
}

impl std::fmt::Display for MemberRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MemberRole {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "visitor" => Ok(MemberRole::Visitor),
            "participant" => Ok(MemberRole::Participant),
            "admin" => Ok(MemberRole::Admin),
            _ => Err(anyhow::anyhow!("Invalid member role: {}", s)),
        }
    }
}

// Stored as TEXT (see the CHECK constraint on members.role).

impl Type<Postgres> for MemberRole {
    fn type_info() -> PgTypeInfo {
        <&str as Type<Postgres>>::type_info()
    }

    fn compatible(ty: &PgTypeInfo) -> bool {
        <&str as Type<Postgres>>::compatible(ty)
    }
}

impl Encode<'_, Postgres> for MemberRole {
    fn encode_by_ref(&self, buf: &mut PgArgumentBuffer) -> Result<IsNull, BoxDynError> {
        <&str as Encode<Postgres>>::encode_by_ref(&self.as_str(), buf)
    }
}

impl Decode<'_, Postgres> for MemberRole {
    fn decode(value: PgValueRef<'_>) -> Result<Self, BoxDynError> {
        let raw = <&str as Decode<Postgres>>::decode(value)?;
        Ok(raw.parse()?)
    }
}
