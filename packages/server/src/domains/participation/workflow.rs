//! Participation workflow operations.
//!
//! Each operation takes the verified actor and the current time, checks
//! authorization first, loads state through [`BaseParticipationStore`], asks
//! [`WorkflowState::apply`] whether the action is legal, applies the time
//! guards, and only then writes. Status writes are compare-and-set on the
//! status that was read, so a concurrent change surfaces as
//! `InvalidTransition` instead of being overwritten.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use super::errors::WorkflowError;
use super::models::{ParticipantRow, Participation, Survey, SurveyScores};
use super::status::{WorkflowAction, WorkflowState};
use super::view::{visible_participants, RegistrationView};
use crate::common::{Actor, Capability, EventId, MemberId, ParticipationId};
use crate::domains::events::models::Event;
use crate::kernel::BaseParticipationStore;

async fn load_event(
    store: &dyn BaseParticipationStore,
    event_id: EventId,
) -> Result<Event, WorkflowError> {
    store
        .find_event(event_id)
        .await?
        .ok_or_else(|| WorkflowError::NotFound("event".to_string()))
}

async fn load_participation(
    store: &dyn BaseParticipationStore,
    id: ParticipationId,
) -> Result<Participation, WorkflowError> {
    store
        .find_participation_by_id(id)
        .await?
        .ok_or_else(|| WorkflowError::NotFound("participation".to_string()))
}

async fn current_state(
    store: &dyn BaseParticipationStore,
    participation: Option<&Participation>,
) -> Result<WorkflowState, WorkflowError> {
    let Some(participation) = participation else {
        return Ok(WorkflowState::NotRegistered);
    };
    let has_survey = store.find_survey(participation.id).await?.is_some();
    Ok(WorkflowState::from_parts(Some(participation.status), has_survey))
}

/// Persist `from -> to` as a conditional update on the status that was read.
async fn commit_transition(
    store: &dyn BaseParticipationStore,
    participation: &Participation,
    from: WorkflowState,
    to: WorkflowState,
    action: WorkflowAction,
    now: DateTime<Utc>,
) -> Result<Participation, WorkflowError> {
    let next = to
        .registration_status()
        .ok_or(WorkflowError::InvalidTransition { from, action })?;
    let checked_in_at = (to == WorkflowState::Attended).then_some(now);

    store
        .transition_status(participation.id, participation.status, next, checked_in_at)
        .await?
        .ok_or(WorkflowError::InvalidTransition { from, action })
}

/// Register `member_id` (default: the actor) for an event.
pub async fn register(
    store: &dyn BaseParticipationStore,
    actor: Actor,
    event_id: EventId,
    member_id: Option<MemberId>,
    now: DateTime<Utc>,
) -> Result<Participation, WorkflowError> {
    let member_id = member_id.unwrap_or(actor.member_id());
    actor
        .can(Capability::RegisterForEvents)
        .for_member(member_id)
        .check()?;

    let event = load_event(store, event_id).await?;

    let existing = store.find_participation(member_id, event_id).await?;
    current_state(store, existing.as_ref())
        .await?
        .apply(WorkflowAction::Register)?;

    if !event.is_registration_open(now) {
        return Err(WorkflowError::RegistrationClosed);
    }

    // Lost a race with a concurrent register: the unique constraint held.
    let participation = store
        .create_participation(member_id, event_id)
        .await?
        .ok_or(WorkflowError::AlreadyRegistered)?;

    info!(
        member_id = %member_id,
        event_id = %event_id,
        participation_id = %participation.id,
        actor = %actor.member_id(),
        "Registered for event"
    );
    Ok(participation)
}

/// Cancel a signed-up registration. After the event has ended this is a
/// no-op that returns the participation unchanged.
pub async fn cancel(
    store: &dyn BaseParticipationStore,
    actor: Actor,
    event_id: EventId,
    member_id: Option<MemberId>,
    now: DateTime<Utc>,
) -> Result<Participation, WorkflowError> {
    let member_id = member_id.unwrap_or(actor.member_id());
    actor
        .can(Capability::RegisterForEvents)
        .for_member(member_id)
        .check()?;

    let event = load_event(store, event_id).await?;
    let participation = store
        .find_participation(member_id, event_id)
        .await?
        .ok_or(WorkflowError::NotRegistered)?;

    if event.has_ended(now) {
        debug!(participation_id = %participation.id, "Event has ended, cancel ignored");
        return Ok(participation);
    }

    let from = current_state(store, Some(&participation)).await?;
    let to = from.apply(WorkflowAction::Cancel)?;
    let participation =
        commit_transition(store, &participation, from, to, WorkflowAction::Cancel, now).await?;

    info!(
        member_id = %member_id,
        event_id = %event_id,
        actor = %actor.member_id(),
        "Cancelled registration"
    );
    Ok(participation)
}

/// Admin check-in toggle: attended becomes cancelled (check-out), anything
/// else checkable becomes attended with the check-in time stamped.
pub async fn toggle_check_in(
    store: &dyn BaseParticipationStore,
    actor: Actor,
    participation_id: ParticipationId,
    now: DateTime<Utc>,
) -> Result<Participation, WorkflowError> {
    actor.can(Capability::CheckInParticipants).check()?;

    let participation = load_participation(store, participation_id).await?;
    let from = current_state(store, Some(&participation)).await?;
    let to = from.apply(WorkflowAction::CheckIn)?;
    let participation =
        commit_transition(store, &participation, from, to, WorkflowAction::CheckIn, now).await?;

    info!(
        participation_id = %participation_id,
        from = %from,
        to = %to,
        "Toggled check-in"
    );
    Ok(participation)
}

/// Close an event: every registration still signed up becomes a no-show.
/// Returns how many changed; a second call changes none.
pub async fn end_event(
    store: &dyn BaseParticipationStore,
    actor: Actor,
    event_id: EventId,
) -> Result<u64, WorkflowError> {
    actor.can(Capability::CloseEvents).check()?;

    load_event(store, event_id).await?;
    let changed = store.mark_no_shows(event_id).await?;

    info!(event_id = %event_id, no_shows = changed, "Ended event");
    Ok(changed)
}

/// Submit the owning member's survey for an attended, ended event.
pub async fn submit_survey(
    store: &dyn BaseParticipationStore,
    actor: Actor,
    participation_id: ParticipationId,
    scores: SurveyScores,
    now: DateTime<Utc>,
) -> Result<Survey, WorkflowError> {
    let participation = load_participation(store, participation_id).await?;
    actor
        .can(Capability::SubmitSurveys)
        .for_member(participation.member_id)
        .check()?;

    current_state(store, Some(&participation))
        .await?
        .apply(WorkflowAction::SubmitSurvey)?;

    let event = load_event(store, participation.event_id).await?;
    if !event.has_ended(now) {
        return Err(WorkflowError::SurveyNotAvailable);
    }

    scores.validate().map_err(WorkflowError::InvalidSurvey)?;

    let Some(survey) = store.create_survey(participation_id, &scores).await? else {
        // Lost a race: either another submit or a check-out got there first.
        return Err(match store.find_survey(participation_id).await? {
            Some(_) => WorkflowError::SurveyAlreadySubmitted,
            None => WorkflowError::SurveyNotAvailable,
        });
    };

    info!(
        participation_id = %participation_id,
        overall_score = survey.overall_score,
        "Survey submitted"
    );
    Ok(survey)
}

/// Registration page flags for the caller (anonymous when `actor` is `None`).
pub async fn registration_view(
    store: &dyn BaseParticipationStore,
    actor: Option<Actor>,
    event_id: EventId,
    now: DateTime<Utc>,
) -> Result<RegistrationView, WorkflowError> {
    let event = load_event(store, event_id).await?;
    let ended = event.has_ended(now);

    let Some(actor) = actor.filter(|a| a.can(Capability::RegisterForEvents).check().is_ok())
    else {
        return Ok(RegistrationView::from_state(
            WorkflowState::NotRegistered,
            ended,
            false,
        ));
    };

    let participation = store.find_participation(actor.member_id(), event_id).await?;
    let state = current_state(store, participation.as_ref()).await?;

    let mut view = RegistrationView::from_state(state, ended, true);
    view.participation_id = participation.map(|p| p.id);
    Ok(view)
}

/// Participants of an event as the caller may see them, in display order.
pub async fn list_participants(
    store: &dyn BaseParticipationStore,
    actor: Option<Actor>,
    event_id: EventId,
    now: DateTime<Utc>,
) -> Result<Vec<ParticipantRow>, WorkflowError> {
    let event = load_event(store, event_id).await?;
    let rows = store.list_participants(event_id).await?;
    let is_admin = actor.is_some_and(|a| a.is_admin());

    Ok(visible_participants(rows, is_admin, event.has_ended(now)))
}

/// A participation's survey; readable by its owner or an admin.
pub async fn get_survey(
    store: &dyn BaseParticipationStore,
    actor: Actor,
    participation_id: ParticipationId,
) -> Result<Option<Survey>, WorkflowError> {
    let participation = load_participation(store, participation_id).await?;
    if participation.member_id != actor.member_id() {
        actor.can(Capability::ViewAllParticipants).check()?;
    }

    Ok(store.find_survey(participation_id).await?)
}

/// Every survey submitted for an event (admin only)
pub async fn list_surveys(
    store: &dyn BaseParticipationStore,
    actor: Actor,
    event_id: EventId,
) -> Result<Vec<Survey>, WorkflowError> {
    actor.can(Capability::ViewAllParticipants).check()?;

    load_event(store, event_id).await?;
    Ok(store.list_surveys(event_id).await?)
}
