use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{PgExecutor, PgPool};

use crate::common::{EventId, MemberId, ParticipationId};
use crate::domains::participation::status::RegistrationStatus;

// participant_events joined with its registrations row
const SELECT_PARTICIPATION: &str = "SELECT pe.id, pe.member_id, pe.event_id, pe.registered_at,
        r.status, r.checked_in_at
     FROM participant_events pe
     JOIN registrations r ON r.participation_id = pe.id";

/// A member's registration for one event
#[derive(sqlx::FromRow, Debug, Clone, PartialEq)]
pub struct Participation {
    pub id: ParticipationId,
    pub member_id: MemberId,
    pub event_id: EventId,
    pub status: RegistrationStatus,
    /// Set exactly when status is attended
    pub checked_in_at: Option<DateTime<Utc>>,
    pub registered_at: DateTime<Utc>,
}

/// Participation plus the member fields shown in listings
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct ParticipantRow {
    #[sqlx(flatten)]
    pub participation: Participation,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl Participation {
    pub async fn find_by_id<'e, E>(id: ParticipationId, executor: E) -> Result<Option<Self>>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Self>(&format!("{SELECT_PARTICIPATION} WHERE pe.id = $1"))
            .bind(id)
            .fetch_optional(executor)
            .await
            .map_err(Into::into)
    }

    pub async fn find_for_member(
        member_id: MemberId,
        event_id: EventId,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(&format!(
            "{SELECT_PARTICIPATION} WHERE pe.member_id = $1 AND pe.event_id = $2"
        ))
        .bind(member_id)
        .bind(event_id)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    /// Insert the participation and its signed-up registration in one
    /// transaction. Returns `None` if the member is already registered.
    pub async fn register(
        member_id: MemberId,
        event_id: EventId,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        let mut tx = pool.begin().await.context("begin register transaction")?;

        let inserted: Option<(ParticipationId, DateTime<Utc>)> = sqlx::query_as(
            "INSERT INTO participant_events (id, member_id, event_id)
             VALUES ($1, $2, $3)
             ON CONFLICT (member_id, event_id) DO NOTHING
             RETURNING id, registered_at",
        )
        .bind(ParticipationId::new())
        .bind(member_id)
        .bind(event_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some((id, registered_at)) = inserted else {
            tx.rollback().await?;
            return Ok(None);
        };

        sqlx::query("INSERT INTO registrations (participation_id, status) VALUES ($1, $2)")
            .bind(id)
            .bind(RegistrationStatus::SignedUp)
            .execute(&mut *tx)
            .await?;

        tx.commit().await.context("commit register transaction")?;

        Ok(Some(Self {
            id,
            member_id,
            event_id,
            status: RegistrationStatus::SignedUp,
            checked_in_at: None,
            registered_at,
        }))
    }

    /// Compare-and-set status update. Returns `None` when the stored status
    /// is no longer `expected`, or when leaving `attended` after a survey
    /// was submitted.
    ///
    /// The registration row is locked first; survey inserts take the same
    /// lock, so the survey check below sees any survey committed before us.
    pub async fn transition(
        id: ParticipationId,
        expected: RegistrationStatus,
        next: RegistrationStatus,
        checked_in_at: Option<DateTime<Utc>>,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        let mut tx = pool.begin().await.context("begin transition transaction")?;

        let current: Option<RegistrationStatus> = sqlx::query_scalar(
            "SELECT status FROM registrations WHERE participation_id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        if current != Some(expected) {
            tx.rollback().await?;
            return Ok(None);
        }

        if expected == RegistrationStatus::Attended && next != RegistrationStatus::Attended {
            let surveyed: bool = sqlx::query_scalar(
                "SELECT EXISTS (SELECT 1 FROM surveys WHERE participation_id = $1)",
            )
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

            if surveyed {
                tx.rollback().await?;
                return Ok(None);
            }
        }

        sqlx::query(
            "UPDATE registrations
             SET status = $2, checked_in_at = $3, updated_at = NOW()
             WHERE participation_id = $1",
        )
        .bind(id)
        .bind(next)
        .bind(checked_in_at)
        .execute(&mut *tx)
        .await?;

        let participation = Self::find_by_id(id, &mut *tx).await?;
        tx.commit().await.context("commit transition transaction")?;
        Ok(participation)
    }

    /// Move every still signed-up registration for the event to no-show.
    pub async fn mark_no_shows(event_id: EventId, pool: &PgPool) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE registrations r
             SET status = 'no_show', updated_at = NOW()
             FROM participant_events pe
             WHERE pe.id = r.participation_id
               AND pe.event_id = $1
               AND r.status = 'signed_up'",
        )
        .bind(event_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn list_for_event(event_id: EventId, pool: &PgPool) -> Result<Vec<ParticipantRow>> {
        sqlx::query_as::<_, ParticipantRow>(
            "SELECT pe.id, pe.member_id, pe.event_id, pe.registered_at,
                    r.status, r.checked_in_at,
                    m.first_name, m.last_name, m.email
             FROM participant_events pe
             JOIN registrations r ON r.participation_id = pe.id
             JOIN members m ON m.id = pe.member_id
             WHERE pe.event_id = $1",
        )
        .bind(event_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }
}
