use crate::{auth::AuthClaims, error::AppError, models::AuthSession};
use actix_web::{delete, get, web, HttpResponse, Responder};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

/// Lists the caller's sessions, newest first.
#[get("")]
pub async fn list_sessions(
    pool: web::Data<PgPool>,
    claims: AuthClaims,
) -> Result<impl Responder, AppError> {
    let sessions = AuthSession::list_for_user(&pool, claims.subject()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": sessions
    })))
}

/// Fetches one of the caller's sessions by id.
///
/// A session that does not exist and a session owned by someone else are both
/// 404: session ids do not leak ownership.
#[get("/{id}")]
pub async fn get_session(
    pool: web::Data<PgPool>,
    session_id: web::Path<Uuid>,
    claims: AuthClaims,
) -> Result<impl Responder, AppError> {
    let session = AuthSession::find_by_id(&pool, session_id.into_inner()).await?;

    match session {
        Some(session) if session.user_id == claims.subject() => {
            Ok(HttpResponse::Ok().json(json!({
                "success": true,
                "data": session
            })))
        }
        _ => Err(AppError::NotFound("Session not found".into())),
    }
}

/// Deletes one of the caller's sessions by id (revoking that session's
/// stored record; see the token codec docs for what that does and does not
/// revoke).
#[delete("/{id}")]
pub async fn delete_session(
    pool: web::Data<PgPool>,
    session_id: web::Path<Uuid>,
    claims: AuthClaims,
) -> Result<impl Responder, AppError> {
    let session_id = session_id.into_inner();
    let session = AuthSession::find_by_id(&pool, session_id).await?;

    match session {
        Some(session) if session.user_id == claims.subject() => {
            AuthSession::delete_by_id(&pool, session_id).await?;
            Ok(HttpResponse::Ok().json(json!({
                "success": true,
                "data": { "id": session_id }
            })))
        }
        _ => Err(AppError::NotFound("Session not found".into())),
    }
}
