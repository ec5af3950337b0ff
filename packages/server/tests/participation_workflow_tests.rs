//! Participation workflow against Postgres
//!
//! Exercises the workflow operations through `PgParticipationStore` so the
//! unique constraints, compare-and-set updates and check constraints are
//! the real ones.

mod common;

use chrono::{Duration, Utc};
use membership_core::common::{Actor, MemberRole};
use membership_core::domains::participation::workflow;
use membership_core::kernel::BaseParticipationStore;
use membership_core::domains::participation::{
    RegistrationStatus, SurveyScores, WorkflowError, WorkflowState,
};
use test_context::test_context;

use crate::common::{
    create_event_at, create_member, create_named_member, create_past_event,
    create_upcoming_event, TestHarness,
};

fn actor_for(member: &membership_core::domains::member::Member) -> Actor {
    Actor::new(member.id, member.role)
}

fn scores(satisfaction: i16, usefulness: i16, instructor: i16, recommendation: i16) -> SurveyScores {
    SurveyScores {
        satisfaction,
        usefulness,
        instructor,
        recommendation,
        overall: None,
        comments: Some("Great session".to_string()),
    }
}

#[test_context(TestHarness)]
#[tokio::test]
async fn register_then_cancel_then_register_again_is_rejected(ctx: &TestHarness) {
    let store = ctx.store();
    let member = create_member(&ctx.db_pool, MemberRole::Participant).await.unwrap();
    let event = create_upcoming_event(&ctx.db_pool).await.unwrap();
    let actor = actor_for(&member);
    let now = Utc::now();

    let registered = workflow::register(&store, actor, event.id, None, now).await.unwrap();
    assert_eq!(registered.status, RegistrationStatus::SignedUp);
    assert_eq!(registered.member_id, member.id);

    let cancelled = workflow::cancel(&store, actor, event.id, None, now).await.unwrap();
    assert_eq!(cancelled.id, registered.id);
    assert_eq!(cancelled.status, RegistrationStatus::Cancelled);

    let again = workflow::register(&store, actor, event.id, None, now).await;
    assert!(matches!(again, Err(WorkflowError::AlreadyRegistered)));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn concurrent_registrations_create_one_participation(ctx: &TestHarness) {
    let store = ctx.store();
    let member = create_member(&ctx.db_pool, MemberRole::Participant).await.unwrap();
    let event = create_upcoming_event(&ctx.db_pool).await.unwrap();
    let actor = actor_for(&member);
    let now = Utc::now();

    let (first, second) = tokio::join!(
        workflow::register(&store, actor, event.id, None, now),
        workflow::register(&store, actor, event.id, None, now),
    );

    let successes = [first.is_ok(), second.is_ok()].iter().filter(|ok| **ok).count();
    assert_eq!(successes, 1, "exactly one registration should win");
    for result in [first, second] {
        if let Err(err) = result {
            assert!(matches!(err, WorkflowError::AlreadyRegistered), "got {err:?}");
        }
    }

    let rows = workflow::list_participants(&store, Some(actor), event.id, now)
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn registration_closes_at_the_deadline(ctx: &TestHarness) {
    let store = ctx.store();
    let member = create_member(&ctx.db_pool, MemberRole::Participant).await.unwrap();
    let starts_at = Utc::now() + Duration::days(2);
    let deadline = Utc::now() - Duration::minutes(5);
    let event = create_event_at(&ctx.db_pool, starts_at, starts_at + Duration::hours(1), Some(deadline))
        .await
        .unwrap();

    let result = workflow::register(&store, actor_for(&member), event.id, None, Utc::now()).await;
    assert!(matches!(result, Err(WorkflowError::RegistrationClosed)));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn participants_cannot_register_someone_else(ctx: &TestHarness) {
    let store = ctx.store();
    let member = create_member(&ctx.db_pool, MemberRole::Participant).await.unwrap();
    let other = create_member(&ctx.db_pool, MemberRole::Participant).await.unwrap();
    let event = create_upcoming_event(&ctx.db_pool).await.unwrap();

    let result =
        workflow::register(&store, actor_for(&member), event.id, Some(other.id), Utc::now()).await;
    assert!(matches!(result, Err(WorkflowError::Unauthorized)));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn check_in_toggle_round_trips_through_cancelled(ctx: &TestHarness) {
    let store = ctx.store();
    let admin = create_member(&ctx.db_pool, MemberRole::Admin).await.unwrap();
    let member = create_member(&ctx.db_pool, MemberRole::Participant).await.unwrap();
    let event = create_upcoming_event(&ctx.db_pool).await.unwrap();
    let now = Utc::now();

    let registered = workflow::register(&store, actor_for(&member), event.id, None, now)
        .await
        .unwrap();

    let attended = workflow::toggle_check_in(&store, actor_for(&admin), registered.id, now)
        .await
        .unwrap();
    assert_eq!(attended.status, RegistrationStatus::Attended);
    assert!(attended.checked_in_at.is_some());

    let checked_out = workflow::toggle_check_in(&store, actor_for(&admin), registered.id, now)
        .await
        .unwrap();
    assert_eq!(checked_out.status, RegistrationStatus::Cancelled);
    assert!(checked_out.checked_in_at.is_none());

    let back_in = workflow::toggle_check_in(&store, actor_for(&admin), registered.id, now)
        .await
        .unwrap();
    assert_eq!(back_in.status, RegistrationStatus::Attended);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn participants_cannot_check_in(ctx: &TestHarness) {
    let store = ctx.store();
    let member = create_member(&ctx.db_pool, MemberRole::Participant).await.unwrap();
    let event = create_upcoming_event(&ctx.db_pool).await.unwrap();
    let now = Utc::now();

    let registered = workflow::register(&store, actor_for(&member), event.id, None, now)
        .await
        .unwrap();
    let result = workflow::toggle_check_in(&store, actor_for(&member), registered.id, now).await;

    assert!(matches!(result, Err(WorkflowError::Unauthorized)));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn end_event_marks_only_signed_up_as_no_show(ctx: &TestHarness) {
    let store = ctx.store();
    let admin = create_member(&ctx.db_pool, MemberRole::Admin).await.unwrap();
    let came = create_member(&ctx.db_pool, MemberRole::Participant).await.unwrap();
    let stayed_home = create_member(&ctx.db_pool, MemberRole::Participant).await.unwrap();
    let event = create_past_event(&ctx.db_pool).await.unwrap();
    let before = event.starts_at - Duration::days(1);

    let attended = workflow::register(&store, actor_for(&came), event.id, None, before)
        .await
        .unwrap();
    workflow::toggle_check_in(&store, actor_for(&admin), attended.id, event.starts_at)
        .await
        .unwrap();
    let absent = workflow::register(&store, actor_for(&stayed_home), event.id, None, before)
        .await
        .unwrap();

    let changed = workflow::end_event(&store, actor_for(&admin), event.id).await.unwrap();
    assert_eq!(changed, 1);

    let rows = workflow::list_participants(&store, Some(actor_for(&admin)), event.id, Utc::now())
        .await
        .unwrap();
    let status_of = |id| {
        rows.iter()
            .find(|row| row.participation.id == id)
            .map(|row| row.participation.status)
    };
    assert_eq!(status_of(attended.id), Some(RegistrationStatus::Attended));
    assert_eq!(status_of(absent.id), Some(RegistrationStatus::NoShow));

    // Idempotent
    let changed = workflow::end_event(&store, actor_for(&admin), event.id).await.unwrap();
    assert_eq!(changed, 0);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn survey_is_accepted_once_after_attending(ctx: &TestHarness) {
    let store = ctx.store();
    let admin = create_member(&ctx.db_pool, MemberRole::Admin).await.unwrap();
    let member = create_member(&ctx.db_pool, MemberRole::Participant).await.unwrap();
    let event = create_past_event(&ctx.db_pool).await.unwrap();
    let actor = actor_for(&member);

    let participation = workflow::register(&store, actor, event.id, None, event.starts_at - Duration::days(1))
        .await
        .unwrap();
    workflow::toggle_check_in(&store, actor_for(&admin), participation.id, event.starts_at)
        .await
        .unwrap();

    let survey = workflow::submit_survey(&store, actor, participation.id, scores(4, 5, 3, 4), Utc::now())
        .await
        .unwrap();
    assert_eq!(survey.participation_id, participation.id);
    assert!((survey.overall_score - 4.0).abs() < f64::EPSILON);

    let view = workflow::registration_view(&store, Some(actor), event.id, Utc::now())
        .await
        .unwrap();
    assert_eq!(view.state, WorkflowState::Surveyed);
    assert!(view.survey_submitted);
    assert!(!view.show_take_survey);

    let again = workflow::submit_survey(&store, actor, participation.id, scores(1, 1, 1, 1), Utc::now()).await;
    assert!(matches!(again, Err(WorkflowError::SurveyAlreadySubmitted)));

    let surveys = workflow::list_surveys(&store, actor_for(&admin), event.id).await.unwrap();
    assert_eq!(surveys.len(), 1);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn survey_requires_attendance(ctx: &TestHarness) {
    let store = ctx.store();
    let member = create_member(&ctx.db_pool, MemberRole::Participant).await.unwrap();
    let event = create_past_event(&ctx.db_pool).await.unwrap();
    let actor = actor_for(&member);

    let participation = workflow::register(&store, actor, event.id, None, event.starts_at - Duration::days(1))
        .await
        .unwrap();

    let result = workflow::submit_survey(&store, actor, participation.id, scores(5, 5, 5, 5), Utc::now()).await;
    assert!(matches!(result, Err(WorkflowError::SurveyNotAvailable)));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn store_keeps_survey_and_attendance_consistent(ctx: &TestHarness) {
    let store = ctx.store();
    let admin = create_member(&ctx.db_pool, MemberRole::Admin).await.unwrap();
    let surveyed = create_member(&ctx.db_pool, MemberRole::Participant).await.unwrap();
    let checked_out = create_member(&ctx.db_pool, MemberRole::Participant).await.unwrap();
    let event = create_past_event(&ctx.db_pool).await.unwrap();
    let signup_at = event.starts_at - Duration::days(1);

    let first = workflow::register(&store, actor_for(&surveyed), event.id, None, signup_at)
        .await
        .unwrap();
    let second = workflow::register(&store, actor_for(&checked_out), event.id, None, signup_at)
        .await
        .unwrap();
    for id in [first.id, second.id] {
        workflow::toggle_check_in(&store, actor_for(&admin), id, event.starts_at)
            .await
            .unwrap();
    }

    // Check-out after the survey landed: the status write must not happen
    store.create_survey(first.id, &scores(4, 4, 4, 4)).await.unwrap().unwrap();
    let written = store
        .transition_status(first.id, RegistrationStatus::Attended, RegistrationStatus::Cancelled, None)
        .await
        .unwrap();
    assert!(written.is_none());
    let row = store.find_participation_by_id(first.id).await.unwrap().unwrap();
    assert_eq!(row.status, RegistrationStatus::Attended);

    // Survey after the check-out landed: the insert must not happen
    store
        .transition_status(second.id, RegistrationStatus::Attended, RegistrationStatus::Cancelled, None)
        .await
        .unwrap()
        .unwrap();
    let survey = store.create_survey(second.id, &scores(5, 5, 5, 5)).await.unwrap();
    assert!(survey.is_none());
    assert!(store.find_survey(second.id).await.unwrap().is_none());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn cancel_after_the_event_is_a_no_op(ctx: &TestHarness) {
    let store = ctx.store();
    let member = create_member(&ctx.db_pool, MemberRole::Participant).await.unwrap();
    let event = create_past_event(&ctx.db_pool).await.unwrap();
    let actor = actor_for(&member);

    let participation = workflow::register(&store, actor, event.id, None, event.starts_at - Duration::days(1))
        .await
        .unwrap();

    let after = workflow::cancel(&store, actor, event.id, None, Utc::now()).await.unwrap();
    assert_eq!(after.id, participation.id);
    assert_eq!(after.status, RegistrationStatus::SignedUp);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn participant_list_is_ordered_by_status_then_name(ctx: &TestHarness) {
    let store = ctx.store();
    let admin = create_member(&ctx.db_pool, MemberRole::Admin).await.unwrap();
    let zed = create_named_member(&ctx.db_pool, "Zed", "Adams", MemberRole::Participant).await.unwrap();
    let amy = create_named_member(&ctx.db_pool, "Amy", "baker", MemberRole::Participant).await.unwrap();
    let cal = create_named_member(&ctx.db_pool, "Cal", "Carter", MemberRole::Participant).await.unwrap();
    let event = create_upcoming_event(&ctx.db_pool).await.unwrap();
    let now = Utc::now();

    for member in [&zed, &amy, &cal] {
        workflow::register(&store, actor_for(member), event.id, None, now).await.unwrap();
    }
    let carter = workflow::list_participants(&store, Some(actor_for(&admin)), event.id, now)
        .await
        .unwrap()
        .into_iter()
        .find(|row| row.participation.member_id == cal.id)
        .unwrap();
    workflow::toggle_check_in(&store, actor_for(&admin), carter.participation.id, now)
        .await
        .unwrap();

    let names: Vec<String> = workflow::list_participants(&store, Some(actor_for(&admin)), event.id, now)
        .await
        .unwrap()
        .into_iter()
        .map(|row| row.last_name)
        .collect();

    // Signed up first (Adams, baker), then attended (Carter)
    assert_eq!(names, vec!["Adams", "baker", "Carter"]);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn unknown_event_is_not_found(ctx: &TestHarness) {
    let store = ctx.store();
    let member = create_member(&ctx.db_pool, MemberRole::Participant).await.unwrap();

    let result = workflow::register(
        &store,
        actor_for(&member),
        membership_core::common::EventId::new(),
        None,
        Utc::now(),
    )
    .await;
    assert!(matches!(result, Err(WorkflowError::NotFound(_))));
}
