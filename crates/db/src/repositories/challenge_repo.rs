//! Repository for the `challenges` and `challenge_participants` tables.

use chrono::NaiveDate;
use habitforge_core::community::ChallengeStatus;
use habitforge_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::challenge::{Challenge, CreateChallenge, JoinOutcome};

const COLUMNS: &str = "c.id, c.creator_id, c.title, c.description, c.category, \
                        c.duration_days, c.start_date, c.end_date, c.difficulty, c.status, \
                        c.max_participants, \
                        (SELECT COUNT(*) FROM challenge_participants p \
                          WHERE p.challenge_id = c.id) AS participant_count, \
                        c.created_at, c.updated_at";

pub struct ChallengeRepo;

impl ChallengeRepo {
    /// Create a challenge and enroll its creator, in one transaction.
    pub async fn create(pool: &PgPool, input: &CreateChallenge) -> Result<Challenge, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let id: DbId = sqlx::query_scalar(
            "INSERT INTO challenges
                (creator_id, title, description, category, duration_days, start_date,
                 end_date, difficulty, status, max_participants)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING id",
        )
        .bind(input.creator_id)
        .bind(&input.title)
        .bind(&input.description)
        .bind(&input.category)
        .bind(input.duration_days)
        .bind(input.start_date)
        .bind(input.end_date)
        .bind(&input.difficulty)
        .bind(&input.status)
        .bind(input.max_participants)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("INSERT INTO challenge_participants (challenge_id, user_id) VALUES ($1, $2)")
            .bind(id)
            .bind(input.creator_id)
            .execute(&mut *tx)
            .await?;

        let challenge = Self::fetch(&mut *tx, id).await?;
        tx.commit().await?;
        challenge.ok_or(sqlx::Error::RowNotFound)
    }

    async fn fetch<'e, E: PgExecutor<'e>>(
        executor: E,
        id: DbId,
    ) -> Result<Option<Challenge>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM challenges c WHERE c.id = $1");
        sqlx::query_as::<_, Challenge>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Challenge>, sqlx::Error> {
        Self::fetch(pool, id).await
    }

    /// List challenges by start date, optionally filtered by the status
    /// their dates imply on `today`. A stored `cancelled` always wins.
    pub async fn list(
        pool: &PgPool,
        status: Option<ChallengeStatus>,
        today: NaiveDate,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Challenge>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM challenges c
             WHERE $1::TEXT IS NULL OR $1 = CASE
                    WHEN c.status = 'cancelled' THEN 'cancelled'
                    WHEN $2 < c.start_date THEN 'upcoming'
                    WHEN $2 > c.end_date THEN 'completed'
                    ELSE 'active' END
             ORDER BY c.start_date, c.id
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, Challenge>(&query)
            .bind(status.map(|s| s.as_str()))
            .bind(today)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Join a challenge, respecting its status, dates and capacity.
    ///
    /// The challenge row is locked for the duration of the check so
    /// concurrent joins cannot exceed `max_participants`.
    pub async fn join(
        pool: &PgPool,
        challenge_id: DbId,
        user_id: DbId,
        today: NaiveDate,
    ) -> Result<JoinOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let row: Option<(String, NaiveDate, NaiveDate, i32)> = sqlx::query_as(
            "SELECT status, start_date, end_date, max_participants
             FROM challenges WHERE id = $1 FOR UPDATE",
        )
        .bind(challenge_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some((status, start, end, max_participants)) = row else {
            return Ok(JoinOutcome::NotFound);
        };

        let status = ChallengeStatus::effective(&status, start, end, today);
        if !status.is_joinable() {
            return Ok(JoinOutcome::NotJoinable(status));
        }

        let (already, count): (bool, i64) = sqlx::query_as(
            "SELECT COALESCE(BOOL_OR(user_id = $2), false), COUNT(*)
             FROM challenge_participants WHERE challenge_id = $1",
        )
        .bind(challenge_id)
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        if already {
            return Ok(JoinOutcome::AlreadyJoined);
        }
        if count >= i64::from(max_participants) {
            return Ok(JoinOutcome::Full);
        }

        sqlx::query("INSERT INTO challenge_participants (challenge_id, user_id) VALUES ($1, $2)")
            .bind(challenge_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(JoinOutcome::Joined)
    }

    /// Leave a challenge. Returns `false` if the user was not a participant.
    pub async fn leave(pool: &PgPool, challenge_id: DbId, user_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM challenge_participants WHERE challenge_id = $1 AND user_id = $2",
        )
        .bind(challenge_id)
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM challenges WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
