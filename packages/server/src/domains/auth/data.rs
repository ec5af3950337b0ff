use juniper::{GraphQLInputObject, GraphQLObject};

use crate::domains::auth::actions::SignUp;
use crate::domains::member::MemberData;

#[derive(Debug, Clone, GraphQLInputObject)]
pub struct SignUpInput {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
}

impl From<SignUpInput> for SignUp {
    fn from(input: SignUpInput) -> Self {
        Self {
            email: input.email,
            password: input.password,
            first_name: input.first_name,
            last_name: input.last_name,
            phone: input.phone,
            city: input.city,
            state: input.state,
            zip: input.zip,
        }
    }
}

/// Bearer token plus the member it was issued for
#[derive(Debug, Clone, GraphQLObject)]
pub struct AuthPayload {
    pub token: String,
    pub member: MemberData,
}
