//! GraphQL schema definition.
//!
//! Resolvers are thin: they turn arguments into typed ids and inputs, call a
//! domain action with the verified actor, and map errors to coded
//! `FieldError`s.

use super::context::GraphQLContext;
use super::errors::{internal_error, not_found};
use chrono::{DateTime, Utc};
use juniper::{EmptySubscription, FieldResult, IntoFieldError, RootNode};
use uuid::Uuid;

use crate::common::{
    DonationId, EventId, EventTemplateId, MemberId, MemberRole, MilestoneId, ParticipationId,
};

// Domain actions
use crate::domains::auth::actions as auth_actions;
use crate::domains::donations::actions as donation_actions;
use crate::domains::events::actions as event_actions;
use crate::domains::member::actions as member_actions;
use crate::domains::milestones::actions as milestone_actions;
use crate::domains::participation::workflow;

// Domain data types (GraphQL types)
use crate::domains::auth::{AuthPayload, SignUpInput};
use crate::domains::donations::{DonationData, DonationTotalData, RecordDonationInput};
use crate::domains::events::data::{
    CreateEventInput, CreateEventTemplateInput, EventData, EventTemplateData, UpdateEventInput,
    UpdateEventTemplateInput,
};
use crate::domains::member::{MemberData, UpdateProfileInput};
use crate::domains::milestones::{CreateMilestoneInput, MilestoneData, UpdateMilestoneInput};
use crate::domains::participation::{ParticipationData, SurveyData, SurveyInput};

/// One page of members plus the total count
#[derive(Debug, Clone, juniper::GraphQLObject)]
pub struct MemberPage {
    pub members: Vec<MemberData>,
    pub total_count: i32,
}

pub struct Query;

#[juniper::graphql_object(context = GraphQLContext)]
impl Query {
    /// The logged-in member
    async fn me(ctx: &GraphQLContext) -> FieldResult<MemberData> {
        let actor = ctx.require_actor()?;
        member_actions::get_member(actor, actor.member_id(), &ctx.db_pool)
            .await
            .map_err(|e| e.into_field_error())?
            .map(MemberData::from)
            .ok_or_else(|| not_found("member"))
    }

    /// A member's profile (own profile, or any for admins)
    async fn member(ctx: &GraphQLContext, id: Uuid) -> FieldResult<Option<MemberData>> {
        let actor = ctx.require_actor()?;
        let member = member_actions::get_member(actor, MemberId::from_uuid(id), &ctx.db_pool)
            .await
            .map_err(|e| e.into_field_error())?;
        Ok(member.map(MemberData::from))
    }

    /// All members, by last name (admin only)
    async fn members(
        ctx: &GraphQLContext,
        limit: Option<i32>,
        offset: Option<i32>,
    ) -> FieldResult<MemberPage> {
        let actor = ctx.require_actor()?;
        let (members, total) = member_actions::list_members(
            actor,
            limit.map(i64::from),
            offset.map(i64::from),
            &ctx.db_pool,
        )
        .await
        .map_err(|e| e.into_field_error())?;

        Ok(MemberPage {
            members: members.into_iter().map(MemberData::from).collect(),
            total_count: i32::try_from(total).unwrap_or(i32::MAX),
        })
    }

    async fn event_templates(ctx: &GraphQLContext) -> FieldResult<Vec<EventTemplateData>> {
        let templates = event_actions::list_templates(&ctx.db_pool)
            .await
            .map_err(internal_error)?;
        Ok(templates.into_iter().map(EventTemplateData::from).collect())
    }

    async fn event_template(
        ctx: &GraphQLContext,
        id: Uuid,
    ) -> FieldResult<Option<EventTemplateData>> {
        let template = event_actions::get_template(EventTemplateId::from_uuid(id), &ctx.db_pool)
            .await
            .map_err(internal_error)?;
        Ok(template.map(EventTemplateData::from))
    }

    /// Events that have not ended, soonest first
    async fn upcoming_events(ctx: &GraphQLContext) -> FieldResult<Vec<EventData>> {
        let events = event_actions::list_upcoming_events(Utc::now(), &ctx.db_pool)
            .await
            .map_err(internal_error)?;
        Ok(events.into_iter().map(EventData::from).collect())
    }

    /// Ended events, most recent first
    async fn past_events(ctx: &GraphQLContext, limit: Option<i32>) -> FieldResult<Vec<EventData>> {
        let events =
            event_actions::list_past_events(Utc::now(), limit.map(i64::from), &ctx.db_pool)
                .await
                .map_err(internal_error)?;
        Ok(events.into_iter().map(EventData::from).collect())
    }

    async fn event(ctx: &GraphQLContext, id: Uuid) -> FieldResult<EventData> {
        event_actions::get_event(EventId::from_uuid(id), &ctx.db_pool)
            .await
            .map_err(internal_error)?
            .map(EventData::from)
            .ok_or_else(|| not_found("event"))
    }

    /// A participation's survey (owner or admin)
    async fn survey(ctx: &GraphQLContext, participation_id: Uuid) -> FieldResult<Option<SurveyData>> {
        let actor = ctx.require_actor()?;
        let survey = workflow::get_survey(
            ctx.participation_store(),
            actor,
            ParticipationId::from_uuid(participation_id),
        )
        .await
        .map_err(|e| e.into_field_error())?;
        Ok(survey.map(SurveyData::from))
    }

    /// Every survey for an event (admin only)
    async fn event_surveys(ctx: &GraphQLContext, event_id: Uuid) -> FieldResult<Vec<SurveyData>> {
        let actor = ctx.require_actor()?;
        let surveys =
            workflow::list_surveys(ctx.participation_store(), actor, EventId::from_uuid(event_id))
                .await
                .map_err(|e| e.into_field_error())?;
        Ok(surveys.into_iter().map(SurveyData::from).collect())
    }

    /// All donations (admin only)
    async fn donations(
        ctx: &GraphQLContext,
        limit: Option<i32>,
        offset: Option<i32>,
    ) -> FieldResult<Vec<DonationData>> {
        let actor = ctx.require_actor()?;
        let donations = donation_actions::list_donations(
            actor,
            limit.map(i64::from),
            offset.map(i64::from),
            &ctx.db_pool,
        )
        .await
        .map_err(|e| e.into_field_error())?;
        Ok(donations.into_iter().map(DonationData::from).collect())
    }

    /// A member's donations; defaults to the caller
    async fn member_donations(
        ctx: &GraphQLContext,
        member_id: Option<Uuid>,
    ) -> FieldResult<Vec<DonationData>> {
        let actor = ctx.require_actor()?;
        let member_id = member_id.map_or(actor.member_id(), MemberId::from_uuid);
        let donations = donation_actions::list_member_donations(actor, member_id, &ctx.db_pool)
            .await
            .map_err(|e| e.into_field_error())?;
        Ok(donations.into_iter().map(DonationData::from).collect())
    }

    /// Donation sum, optionally since a point in time (admin only)
    async fn donation_total(
        ctx: &GraphQLContext,
        since: Option<DateTime<Utc>>,
    ) -> FieldResult<DonationTotalData> {
        let actor = ctx.require_actor()?;
        let total = donation_actions::donation_total(actor, since, &ctx.db_pool)
            .await
            .map_err(|e| e.into_field_error())?;
        Ok(total.into())
    }

    /// A member's milestones; defaults to the caller
    async fn milestones(
        ctx: &GraphQLContext,
        member_id: Option<Uuid>,
    ) -> FieldResult<Vec<MilestoneData>> {
        let actor = ctx.require_actor()?;
        let member_id = member_id.map_or(actor.member_id(), MemberId::from_uuid);
        let milestones = milestone_actions::list_milestones(actor, member_id, &ctx.db_pool)
            .await
            .map_err(|e| e.into_field_error())?;
        Ok(milestones.into_iter().map(MilestoneData::from).collect())
    }
}

pub struct Mutation;

#[juniper::graphql_object(context = GraphQLContext)]
impl Mutation {
    // =========================================================================
    // Auth
    // =========================================================================

    /// Create a participant account and log it in
    async fn sign_up(ctx: &GraphQLContext, input: SignUpInput) -> FieldResult<AuthPayload> {
        let member = auth_actions::sign_up(input.into(), &ctx.db_pool)
            .await
            .map_err(|e| e.into_field_error())?;
        let token = ctx
            .jwt_service()
            .create_token(member.id.into_uuid(), member.email.clone(), member.role)
            .map_err(internal_error)?;

        Ok(AuthPayload {
            token,
            member: member.into(),
        })
    }

    async fn login(ctx: &GraphQLContext, email: String, password: String) -> FieldResult<AuthPayload> {
        let session = auth_actions::login(&email, &password, ctx.jwt_service(), &ctx.db_pool)
            .await
            .map_err(|e| e.into_field_error())?;

        Ok(AuthPayload {
            token: session.token,
            member: session.member.into(),
        })
    }

    // =========================================================================
    // Members
    // =========================================================================

    /// Edit a profile; defaults to the caller's own
    async fn update_profile(
        ctx: &GraphQLContext,
        member_id: Option<Uuid>,
        input: UpdateProfileInput,
    ) -> FieldResult<MemberData> {
        let actor = ctx.require_actor()?;
        let member_id = member_id.map_or(actor.member_id(), MemberId::from_uuid);
        member_actions::update_profile(actor, member_id, input.into(), &ctx.db_pool)
            .await
            .map_err(|e| e.into_field_error())?
            .map(MemberData::from)
            .ok_or_else(|| not_found("member"))
    }

    async fn update_member_role(
        ctx: &GraphQLContext,
        member_id: Uuid,
        role: MemberRole,
    ) -> FieldResult<MemberData> {
        let actor = ctx.require_admin()?;
        member_actions::update_member_role(actor, MemberId::from_uuid(member_id), role, &ctx.db_pool)
            .await
            .map_err(|e| e.into_field_error())?
            .map(MemberData::from)
            .ok_or_else(|| not_found("member"))
    }

    async fn delete_member(ctx: &GraphQLContext, member_id: Uuid) -> FieldResult<bool> {
        let actor = ctx.require_admin()?;
        member_actions::delete_member(actor, MemberId::from_uuid(member_id), &ctx.db_pool)
            .await
            .map_err(|e| e.into_field_error())
    }

    // =========================================================================
    // Event templates and events
    // =========================================================================

    async fn create_event_template(
        ctx: &GraphQLContext,
        input: CreateEventTemplateInput,
    ) -> FieldResult<EventTemplateData> {
        let actor = ctx.require_admin()?;
        let template = event_actions::create_template(actor, input.into(), &ctx.db_pool)
            .await
            .map_err(|e| e.into_field_error())?;
        Ok(template.into())
    }

    async fn update_event_template(
        ctx: &GraphQLContext,
        id: Uuid,
        input: UpdateEventTemplateInput,
    ) -> FieldResult<EventTemplateData> {
        let actor = ctx.require_admin()?;
        event_actions::update_template(
            actor,
            EventTemplateId::from_uuid(id),
            input.into(),
            &ctx.db_pool,
        )
        .await
        .map_err(|e| e.into_field_error())?
        .map(EventTemplateData::from)
        .ok_or_else(|| not_found("event template"))
    }

    async fn delete_event_template(ctx: &GraphQLContext, id: Uuid) -> FieldResult<bool> {
        let actor = ctx.require_admin()?;
        event_actions::delete_template(actor, EventTemplateId::from_uuid(id), &ctx.db_pool)
            .await
            .map_err(|e| e.into_field_error())
    }

    async fn create_event(ctx: &GraphQLContext, input: CreateEventInput) -> FieldResult<EventData> {
        let actor = ctx.require_admin()?;
        let event = event_actions::create_event(actor, input.into(), &ctx.db_pool)
            .await
            .map_err(|e| e.into_field_error())?;
        Ok(event.into())
    }

    async fn update_event(
        ctx: &GraphQLContext,
        id: Uuid,
        input: UpdateEventInput,
    ) -> FieldResult<EventData> {
        let actor = ctx.require_admin()?;
        event_actions::update_event(actor, EventId::from_uuid(id), input.into(), &ctx.db_pool)
            .await
            .map_err(|e| e.into_field_error())?
            .map(EventData::from)
            .ok_or_else(|| not_found("event"))
    }

    async fn delete_event(ctx: &GraphQLContext, id: Uuid) -> FieldResult<bool> {
        let actor = ctx.require_admin()?;
        event_actions::delete_event(actor, EventId::from_uuid(id), &ctx.db_pool)
            .await
            .map_err(|e| e.into_field_error())
    }

    // =========================================================================
    // Participation workflow
    // =========================================================================

    /// Register for an event; admins may pass another member's id
    async fn register_for_event(
        ctx: &GraphQLContext,
        event_id: Uuid,
        member_id: Option<Uuid>,
    ) -> FieldResult<ParticipationData> {
        let actor = ctx.require_actor()?;
        let participation = workflow::register(
            ctx.participation_store(),
            actor,
            EventId::from_uuid(event_id),
            member_id.map(MemberId::from_uuid),
            Utc::now(),
        )
        .await
        .map_err(|e| e.into_field_error())?;
        Ok(participation.into())
    }

    async fn cancel_registration(
        ctx: &GraphQLContext,
        event_id: Uuid,
        member_id: Option<Uuid>,
    ) -> FieldResult<ParticipationData> {
        let actor = ctx.require_actor()?;
        let participation = workflow::cancel(
            ctx.participation_store(),
            actor,
            EventId::from_uuid(event_id),
            member_id.map(MemberId::from_uuid),
            Utc::now(),
        )
        .await
        .map_err(|e| e.into_field_error())?;
        Ok(participation.into())
    }

    /// Check a participant in, or out if already checked in (admin only)
    async fn toggle_check_in(
        ctx: &GraphQLContext,
        participation_id: Uuid,
    ) -> FieldResult<ParticipationData> {
        let actor = ctx.require_admin()?;
        let participation = workflow::toggle_check_in(
            ctx.participation_store(),
            actor,
            ParticipationId::from_uuid(participation_id),
            Utc::now(),
        )
        .await
        .map_err(|e| e.into_field_error())?;
        Ok(participation.into())
    }

    /// Mark remaining sign-ups as no-shows; returns how many changed
    async fn end_event(ctx: &GraphQLContext, event_id: Uuid) -> FieldResult<i32> {
        let actor = ctx.require_admin()?;
        let changed =
            workflow::end_event(ctx.participation_store(), actor, EventId::from_uuid(event_id))
                .await
                .map_err(|e| e.into_field_error())?;
        Ok(i32::try_from(changed).unwrap_or(i32::MAX))
    }

    async fn submit_survey(
        ctx: &GraphQLContext,
        participation_id: Uuid,
        input: SurveyInput,
    ) -> FieldResult<SurveyData> {
        let actor = ctx.require_actor()?;
        let survey = workflow::submit_survey(
            ctx.participation_store(),
            actor,
            ParticipationId::from_uuid(participation_id),
            input.into(),
            Utc::now(),
        )
        .await
        .map_err(|e| e.into_field_error())?;
        Ok(survey.into())
    }

    // =========================================================================
    // Donations
    // =========================================================================

    async fn record_donation(
        ctx: &GraphQLContext,
        input: RecordDonationInput,
    ) -> FieldResult<DonationData> {
        let actor = ctx.require_admin()?;
        let donation = donation_actions::record_donation(actor, input.into(), &ctx.db_pool)
            .await
            .map_err(|e| e.into_field_error())?;
        Ok(donation.into())
    }

    async fn delete_donation(ctx: &GraphQLContext, id: Uuid) -> FieldResult<bool> {
        let actor = ctx.require_admin()?;
        donation_actions::delete_donation(actor, DonationId::from_uuid(id), &ctx.db_pool)
            .await
            .map_err(|e| e.into_field_error())
    }

    // =========================================================================
    // Milestones
    // =========================================================================

    /// Add a milestone; defaults to the caller's own record
    async fn create_milestone(
        ctx: &GraphQLContext,
        member_id: Option<Uuid>,
        input: CreateMilestoneInput,
    ) -> FieldResult<MilestoneData> {
        let actor = ctx.require_actor()?;
        let member_id = member_id.map_or(actor.member_id(), MemberId::from_uuid);
        let milestone =
            milestone_actions::create_milestone(actor, member_id, input.into(), &ctx.db_pool)
                .await
                .map_err(|e| e.into_field_error())?;
        Ok(milestone.into())
    }

    async fn update_milestone(
        ctx: &GraphQLContext,
        id: Uuid,
        input: UpdateMilestoneInput,
    ) -> FieldResult<MilestoneData> {
        let actor = ctx.require_actor()?;
        milestone_actions::update_milestone(actor, MilestoneId::from_uuid(id), input.into(), &ctx.db_pool)
            .await
            .map_err(|e| e.into_field_error())?
            .map(MilestoneData::from)
            .ok_or_else(|| not_found("milestone"))
    }

    async fn delete_milestone(ctx: &GraphQLContext, id: Uuid) -> FieldResult<bool> {
        let actor = ctx.require_actor()?;
        milestone_actions::delete_milestone(actor, MilestoneId::from_uuid(id), &ctx.db_pool)
            .await
            .map_err(|e| e.into_field_error())
    }
}

pub type Schema = RootNode<'static, Query, Mutation, EmptySubscription<GraphQLContext>>;

pub fn create_schema() -> Schema {
    Schema::new(Query, Mutation, EmptySubscription::new())
}
