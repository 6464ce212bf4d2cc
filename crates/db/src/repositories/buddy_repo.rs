//! Repository for the `buddy_matches` table.

use habitforge_core::community::BuddyStatus;
use habitforge_core::types::DbId;
use sqlx::PgPool;

use crate::models::buddy::{BuddyMatch, BuddyView, CandidateRow};

const COLUMNS: &str = "id, requester_id, recipient_id, score, status, created_at, updated_at";

pub struct BuddyRepo;

impl BuddyRepo {
    /// Active users with no match row of any status with `user_id`, in
    /// either direction.
    pub async fn candidates(
        pool: &PgPool,
        user_id: DbId,
        limit: i64,
    ) -> Result<Vec<CandidateRow>, sqlx::Error> {
        sqlx::query_as::<_, CandidateRow>(
            "SELECT u.id AS user_id, u.display_name, u.preferences, u.accountability_score,
                    ARRAY(SELECT DISTINCT h.category FROM habits h
                           WHERE h.user_id = u.id AND h.status <> 'archived') AS categories
             FROM users u
             WHERE u.id <> $1
               AND u.is_active = true
               AND NOT EXISTS (
                   SELECT 1 FROM buddy_matches b
                    WHERE (b.requester_id = $1 AND b.recipient_id = u.id)
                       OR (b.recipient_id = $1 AND b.requester_id = u.id))
             ORDER BY u.accountability_score DESC, u.id
             LIMIT $2",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    /// The match between two users in either direction, if any.
    pub async fn find_between(
        pool: &PgPool,
        a: DbId,
        b: DbId,
    ) -> Result<Option<BuddyMatch>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM buddy_matches
             WHERE (requester_id = $1 AND recipient_id = $2)
                OR (requester_id = $2 AND recipient_id = $1)"
        );
        sqlx::query_as::<_, BuddyMatch>(&query)
            .bind(a)
            .bind(b)
            .fetch_optional(pool)
            .await
    }

    /// Create a pending request. A duplicate pair fails on `uq_buddy_matches_pair`.
    pub async fn create_request(
        pool: &PgPool,
        requester_id: DbId,
        recipient_id: DbId,
        score: i32,
    ) -> Result<BuddyMatch, sqlx::Error> {
        let query = format!(
            "INSERT INTO buddy_matches (requester_id, recipient_id, score)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BuddyMatch>(&query)
            .bind(requester_id)
            .bind(recipient_id)
            .bind(score)
            .fetch_one(pool)
            .await
    }

    /// Pending requests addressed to `user_id`.
    pub async fn incoming(pool: &PgPool, user_id: DbId) -> Result<Vec<BuddyView>, sqlx::Error> {
        sqlx::query_as::<_, BuddyView>(
            "SELECT b.id AS match_id, u.id AS user_id, u.display_name, b.score, b.status,
                    b.created_at
             FROM buddy_matches b
             JOIN users u ON u.id = b.requester_id
             WHERE b.recipient_id = $1 AND b.status = 'pending'
             ORDER BY b.created_at DESC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Accepted buddies of `user_id`, whichever side sent the request.
    pub async fn accepted(pool: &PgPool, user_id: DbId) -> Result<Vec<BuddyView>, sqlx::Error> {
        sqlx::query_as::<_, BuddyView>(
            "SELECT b.id AS match_id, u.id AS user_id, u.display_name, b.score, b.status,
                    b.created_at
             FROM buddy_matches b
             JOIN users u
               ON u.id = CASE WHEN b.requester_id = $1 THEN b.recipient_id ELSE b.requester_id END
             WHERE (b.requester_id = $1 OR b.recipient_id = $1) AND b.status = 'accepted'
             ORDER BY u.display_name",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Accept or decline a pending request addressed to `recipient_id`.
    ///
    /// Returns `None` when no such pending request exists.
    pub async fn respond(
        pool: &PgPool,
        id: DbId,
        recipient_id: DbId,
        status: BuddyStatus,
    ) -> Result<Option<BuddyMatch>, sqlx::Error> {
        let query = format!(
            "UPDATE buddy_matches SET status = $3
             WHERE id = $1 AND recipient_id = $2 AND status = 'pending'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BuddyMatch>(&query)
            .bind(id)
            .bind(recipient_id)
            .bind(status.as_str())
            .fetch_optional(pool)
            .await
    }
}
