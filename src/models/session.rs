use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::auth::token::TokenCodec;
use crate::error::AppError;

/// One issued bearer token, persisted for introspection and logout.
///
/// Rows are created at login/registration and removed on logout or explicit
/// deletion. Expired rows are not pruned here: token verification never
/// consults this table, so a row outliving its token is harmless and a
/// deleted row does not invalidate an outstanding token before its TTL.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct AuthSession {
    pub id: Uuid,
    pub token: String,
    pub user_id: i32,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl AuthSession {
    /// Signs a fresh token for the user and persists the matching session
    /// row. The row's expiry mirrors the token's embedded TTL.
    pub async fn issue(
        pool: &PgPool,
        codec: &TokenCodec,
        user_id: i32,
        email: &str,
    ) -> Result<AuthSession, AppError> {
        let token = codec.sign(user_id, email)?;
        let expires_at = Utc::now() + codec.ttl();

        let session = sqlx::query_as::<_, AuthSession>(
            "INSERT INTO auth_sessions (id, token, user_id, expires_at)
             VALUES ($1, $2, $3, $4)
             RETURNING id, token, user_id, expires_at, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(&token)
        .bind(user_id)
        .bind(expires_at)
        .fetch_one(pool)
        .await?;

        Ok(session)
    }

    pub async fn find_by_token(pool: &PgPool, token: &str) -> Result<Option<AuthSession>, AppError> {
        let session = sqlx::query_as::<_, AuthSession>(
            "SELECT id, token, user_id, expires_at, created_at
             FROM auth_sessions WHERE token = $1",
        )
        .bind(token)
        .fetch_optional(pool)
        .await?;

        Ok(session)
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<AuthSession>, AppError> {
        let session = sqlx::query_as::<_, AuthSession>(
            "SELECT id, token, user_id, expires_at, created_at
             FROM auth_sessions WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(session)
    }

    /// All sessions belonging to a user, newest first.
    pub async fn list_for_user(pool: &PgPool, user_id: i32) -> Result<Vec<AuthSession>, AppError> {
        let sessions = sqlx::query_as::<_, AuthSession>(
            "SELECT id, token, user_id, expires_at, created_at
             FROM auth_sessions WHERE user_id = $1
             ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(sessions)
    }

    /// Idempotent: deleting a token with no session row is not an error.
    pub async fn delete_by_token(pool: &PgPool, token: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM auth_sessions WHERE token = $1")
            .bind(token)
            .execute(pool)
            .await?;

        Ok(())
    }

    /// Idempotent: deleting an id with no session row is not an error.
    pub async fn delete_by_id(pool: &PgPool, id: Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM auth_sessions WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(())
    }
}
