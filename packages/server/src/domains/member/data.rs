use chrono::{DateTime, Utc};
use juniper::{GraphQLInputObject, GraphQLObject};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::MemberRole;
use crate::domains::member::models::{Member, UpdateProfile};

/// Member GraphQL data type
#[derive(Debug, Clone, Serialize, Deserialize, GraphQLObject)]
#[graphql(description = "A registered member of the organization")]
pub struct MemberData {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub role: MemberRole,
    pub created_at: DateTime<Utc>,
}

impl From<Member> for MemberData {
    fn from(member: Member) -> Self {
        Self {
            id: member.id.into_uuid(),
            email: member.email,
            first_name: member.first_name,
            last_name: member.last_name,
            phone: member.phone,
            city: member.city,
            state: member.state,
            zip: member.zip,
            role: member.role,
            created_at: member.created_at,
        }
    }
}

/// Input for editing a profile
#[derive(Debug, Clone, Default, Serialize, Deserialize, GraphQLInputObject)]
pub struct UpdateProfileInput {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
}

impl From<UpdateProfileInput> for UpdateProfile {
    fn from(input: UpdateProfileInput) -> Self {
        Self {
            first_name: input.first_name,
            last_name: input.last_name,
            phone: input.phone,
            city: input.city,
            state: input.state,
            zip: input.zip,
        }
    }
}
