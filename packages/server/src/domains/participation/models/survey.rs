use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::common::{EventId, ParticipationId, SurveyId};
use crate::domains::participation::status::RegistrationStatus;

pub const MIN_SCORE: i16 = 1;
pub const MAX_SCORE: i16 = 5;

/// Post-event feedback, one per attended participation
#[derive(sqlx::FromRow, Debug, Clone, PartialEq)]
pub struct Survey {
    pub id: SurveyId,
    pub participation_id: ParticipationId,
    pub satisfaction: i16,
    pub usefulness: i16,
    pub instructor: i16,
    pub recommendation: i16,
    pub overall_score: f64,
    pub comments: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

/// Scores as submitted by a member
#[derive(Debug, Clone, PartialEq)]
pub struct SurveyScores {
    pub satisfaction: i16,
    pub usefulness: i16,
    pub instructor: i16,
    pub recommendation: i16,
    /// Overrides the computed mean when present
    pub overall: Option<f64>,
    pub comments: Option<String>,
}

impl SurveyScores {
    fn sub_scores(&self) -> [(&'static str, i16); 4] {
        [
            ("satisfaction", self.satisfaction),
            ("usefulness", self.usefulness),
            ("instructor", self.instructor),
            ("recommendation", self.recommendation),
        ]
    }

    /// Every score must lie in 1..=5.
    pub fn validate(&self) -> Result<(), String> {
        for (name, score) in self.sub_scores() {
            if !(MIN_SCORE..=MAX_SCORE).contains(&score) {
                return Err(format!(
                    "{name} must be between {MIN_SCORE} and {MAX_SCORE}, got {score}"
                ));
            }
        }
        if let Some(overall) = self.overall {
            if !overall.is_finite() || overall < f64::from(MIN_SCORE) || overall > f64::from(MAX_SCORE)
            {
                return Err(format!(
                    "overall must be between {MIN_SCORE} and {MAX_SCORE}, got {overall}"
                ));
            }
        }
        Ok(())
    }

    /// The provided overall score, else the mean of the four sub-scores.
    pub fn overall_score(&self) -> f64 {
        self.overall.unwrap_or_else(|| {
            let sum: i32 = self.sub_scores().iter().map(|(_, s)| i32::from(*s)).sum();
            f64::from(sum) / 4.0
        })
    }
}

impl Survey {
    pub async fn find_by_participation(
        participation_id: ParticipationId,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM surveys WHERE participation_id = $1")
            .bind(participation_id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// Insert the survey while holding the registration row lock.
    ///
    /// `None` if a survey already exists or the registration is no longer
    /// attended (a concurrent check-out won).
    pub async fn create(
        participation_id: ParticipationId,
        scores: &SurveyScores,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        let mut tx = pool.begin().await.context("begin survey transaction")?;

        let status: Option<RegistrationStatus> = sqlx::query_scalar(
            "SELECT status FROM registrations WHERE participation_id = $1 FOR UPDATE",
        )
        .bind(participation_id)
        .fetch_optional(&mut *tx)
        .await?;

        if status != Some(RegistrationStatus::Attended) {
            tx.rollback().await?;
            return Ok(None);
        }

        let survey = sqlx::query_as::<_, Self>(
            "INSERT INTO surveys
                (id, participation_id, satisfaction, usefulness, instructor, recommendation,
                 overall_score, comments)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             ON CONFLICT (participation_id) DO NOTHING
             RETURNING *",
        )
        .bind(SurveyId::new())
        .bind(participation_id)
        .bind(scores.satisfaction)
        .bind(scores.usefulness)
        .bind(scores.instructor)
        .bind(scores.recommendation)
        .bind(scores.overall_score())
        .bind(&scores.comments)
        .fetch_optional(&mut *tx)
        .await?;

        tx.commit().await.context("commit survey transaction")?;
        Ok(survey)
    }

    pub async fn list_for_event(event_id: EventId, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT s.* FROM surveys s
             JOIN participant_events pe ON pe.id = s.participation_id
             WHERE pe.event_id = $1
             ORDER BY s.submitted_at",
        )
        .bind(event_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(s: [i16; 4], overall: Option<f64>) -> SurveyScores {
        SurveyScores {
            satisfaction: s[0],
            usefulness: s[1],
            instructor: s[2],
            recommendation: s[3],
            overall,
            comments: None,
        }
    }

    #[test]
    fn overall_defaults_to_mean() {
        assert_eq!(scores([4, 5, 3, 4], None).overall_score(), 4.0);
        assert_eq!(scores([1, 2, 2, 2], None).overall_score(), 1.75);
    }

    #[test]
    fn provided_overall_wins() {
        assert_eq!(scores([4, 5, 3, 4], Some(2.5)).overall_score(), 2.5);
    }

    #[test]
    fn rejects_out_of_range_scores() {
        assert!(scores([1, 5, 3, 4], None).validate().is_ok());
        assert!(scores([0, 5, 3, 4], None).validate().is_err());
        assert!(scores([4, 6, 3, 4], None).validate().is_err());
        assert!(scores([4, 5, 3, 4], Some(5.5)).validate().is_err());
        assert!(scores([4, 5, 3, 4], Some(f64::NAN)).validate().is_err());
    }
}
