use crate::{
    auth::{hash_password, AuthClaims, RegisterRequest},
    error::AppError,
    models::{UpdateUserRequest, User},
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use serde_json::json;
use sqlx::PgPool;
use validator::Validate;

/// Lists every user, newest first.
///
/// Any valid token grants access; the listing is not scoped to the caller.
#[get("")]
pub async fn list_users(
    pool: web::Data<PgPool>,
    _claims: AuthClaims,
) -> Result<impl Responder, AppError> {
    let users = sqlx::query_as::<_, User>(
        "SELECT id, name, email, created_at, updated_at FROM users ORDER BY created_at DESC",
    )
    .fetch_all(&**pool)
    .await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": users
    })))
}

/// Creates a user account on behalf of an authenticated caller.
///
/// Same shape and validation as registration, but no session is issued for
/// the new account.
#[post("")]
pub async fn create_user(
    pool: web::Data<PgPool>,
    user_data: web::Json<RegisterRequest>,
    _claims: AuthClaims,
) -> Result<impl Responder, AppError> {
    user_data.validate()?;

    let existing: Option<(i32,)> = sqlx::query_as("SELECT id FROM users WHERE email = $1")
        .bind(&user_data.email)
        .fetch_optional(&**pool)
        .await?;

    if existing.is_some() {
        return Err(AppError::BadRequest("Email already registered".into()));
    }

    let password_hash = hash_password(&user_data.password)?;

    let user = sqlx::query_as::<_, User>(
        "INSERT INTO users (name, email, password_hash) VALUES ($1, $2, $3)
         RETURNING id, name, email, created_at, updated_at",
    )
    .bind(&user_data.name)
    .bind(&user_data.email)
    .bind(&password_hash)
    .fetch_one(&**pool)
    .await?;

    Ok(HttpResponse::Created().json(json!({
        "success": true,
        "data": user
    })))
}

/// Fetches a user by id. Self only: the path id must match the verified
/// subject, checked before the record is even loaded, so the response does
/// not reveal whether another id exists.
#[get("/{id}")]
pub async fn get_user(
    pool: web::Data<PgPool>,
    user_id: web::Path<i32>,
    claims: AuthClaims,
) -> Result<impl Responder, AppError> {
    let user_id = user_id.into_inner();
    if user_id != claims.subject() {
        return Err(AppError::Forbidden("Forbidden".into()));
    }

    let user = sqlx::query_as::<_, User>(
        "SELECT id, name, email, created_at, updated_at FROM users WHERE id = $1",
    )
    .bind(user_id)
    .fetch_optional(&**pool)
    .await?;

    match user {
        Some(user) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": user
        }))),
        None => Err(AppError::NotFound("User not found".into())),
    }
}

/// Updates the caller's own profile. Absent fields are left unchanged; a new
/// password is hashed before storage.
#[put("/{id}")]
pub async fn update_user(
    pool: web::Data<PgPool>,
    user_id: web::Path<i32>,
    user_data: web::Json<UpdateUserRequest>,
    claims: AuthClaims,
) -> Result<impl Responder, AppError> {
    let user_id = user_id.into_inner();
    if user_id != claims.subject() {
        return Err(AppError::Forbidden("Forbidden".into()));
    }

    user_data.validate()?;

    let password_hash = match &user_data.password {
        Some(password) => Some(hash_password(password)?),
        None => None,
    };

    let user = sqlx::query_as::<_, User>(
        "UPDATE users SET
             name = COALESCE($1, name),
             email = COALESCE($2, email),
             password_hash = COALESCE($3, password_hash),
             updated_at = NOW()
         WHERE id = $4
         RETURNING id, name, email, created_at, updated_at",
    )
    .bind(&user_data.name)
    .bind(&user_data.email)
    .bind(password_hash)
    .bind(user_id)
    .fetch_optional(&**pool)
    .await?;

    match user {
        Some(user) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": user
        }))),
        None => Err(AppError::NotFound("User not found".into())),
    }
}

/// Deletes the caller's own account. The ownership comparison happens before
/// any lookup, so deleting someone else's id is 403 whether or not it exists.
#[delete("/{id}")]
pub async fn delete_user(
    pool: web::Data<PgPool>,
    user_id: web::Path<i32>,
    claims: AuthClaims,
) -> Result<impl Responder, AppError> {
    let user_id = user_id.into_inner();
    if user_id != claims.subject() {
        return Err(AppError::Forbidden("Forbidden".into()));
    }

    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(user_id)
        .execute(&**pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("User not found".into()));
    }

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": { "id": user_id }
    })))
}
