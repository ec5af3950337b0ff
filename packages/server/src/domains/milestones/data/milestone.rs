use chrono::NaiveDate;
use juniper::{GraphQLInputObject, GraphQLObject};
use uuid::Uuid;

use crate::domains::milestones::models::{CreateMilestone, Milestone, UpdateMilestone};

#[derive(Debug, Clone, GraphQLObject)]
#[graphql(description = "Something a member achieved")]
pub struct MilestoneData {
    pub id: Uuid,
    pub member_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub achieved_on: NaiveDate,
}

impl From<Milestone> for MilestoneData {
    fn from(m: Milestone) -> Self {
        Self {
            id: m.id.into_uuid(),
            member_id: m.member_id.into_uuid(),
            title: m.title,
            description: m.description,
            achieved_on: m.achieved_on,
        }
    }
}

#[derive(Debug, Clone, GraphQLInputObject)]
pub struct CreateMilestoneInput {
    pub title: String,
    pub description: Option<String>,
    pub achieved_on: NaiveDate,
}

impl From<CreateMilestoneInput> for CreateMilestone {
    fn from(input: CreateMilestoneInput) -> Self {
        Self {
            title: input.title.trim().to_string(),
            description: input.description,
            achieved_on: input.achieved_on,
        }
    }
}

#[derive(Debug, Clone, Default, GraphQLInputObject)]
pub struct UpdateMilestoneInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub achieved_on: Option<NaiveDate>,
}

impl From<UpdateMilestoneInput> for UpdateMilestone {
    fn from(input: UpdateMilestoneInput) -> Self {
        Self {
            title: input.title.map(|t| t.trim().to_string()),
            description: input.description,
            achieved_on: input.achieved_on,
        }
    }
}
