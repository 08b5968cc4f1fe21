use crate::{
    auth::{
        bearer_token, hash_password, verify_password, AuthClaims, AuthResponse, LoginRequest,
        RegisterRequest, TokenCodec,
    },
    error::AppError,
    models::{AuthSession, User, UserRecord},
};
use actix_web::{get, http::header, post, web, HttpRequest, HttpResponse, Responder};
use serde_json::json;
use sqlx::PgPool;
use validator::Validate;

/// Register a new user
///
/// Creates a new user account, issues a session, and returns the public user
/// record with a bearer token.
#[post("/register")]
pub async fn register(
    pool: web::Data<PgPool>,
    codec: web::Data<TokenCodec>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    register_data.validate()?;

    let existing: Option<(i32,)> = sqlx::query_as("SELECT id FROM users WHERE email = $1")
        .bind(&register_data.email)
        .fetch_optional(&**pool)
        .await?;

    if existing.is_some() {
        return Err(AppError::BadRequest("Email already registered".into()));
    }

    let password_hash = hash_password(&register_data.password)?;

    let user = sqlx::query_as::<_, User>(
        "INSERT INTO users (name, email, password_hash) VALUES ($1, $2, $3)
         RETURNING id, name, email, created_at, updated_at",
    )
    .bind(&register_data.name)
    .bind(&register_data.email)
    .bind(&password_hash)
    .fetch_one(&**pool)
    .await?;

    let session = AuthSession::issue(&pool, &codec, user.id, &user.email).await?;

    Ok(HttpResponse::Created().json(json!({
        "success": true,
        "data": AuthResponse {
            user,
            token: session.token,
        }
    })))
}

/// Login user
///
/// Authenticates a user, issues a session, and returns the public user record
/// with a bearer token. Unknown emails and wrong passwords are
/// indistinguishable to the caller.
#[post("/login")]
pub async fn login(
    pool: web::Data<PgPool>,
    codec: web::Data<TokenCodec>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    login_data.validate()?;

    let record = sqlx::query_as::<_, UserRecord>(
        "SELECT id, name, email, password_hash, created_at, updated_at
         FROM users WHERE email = $1",
    )
    .bind(&login_data.email)
    .fetch_optional(&**pool)
    .await?;

    let record = match record {
        Some(record) if verify_password(&login_data.password, &record.password_hash) => record,
        _ => return Err(AppError::Unauthorized("Invalid credentials".into())),
    };

    let user: User = record.into();
    let session = AuthSession::issue(&pool, &codec, user.id, &user.email).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": AuthResponse {
            user,
            token: session.token,
        }
    })))
}

/// Logout
///
/// Deletes the session row for the presented token. The token itself stays
/// cryptographically valid until its TTL elapses; only the stored session is
/// revoked.
#[post("/logout")]
pub async fn logout(pool: web::Data<PgPool>, req: HttpRequest) -> Result<impl Responder, AppError> {
    let token = bearer_token(
        req.headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok()),
    )
    .ok_or_else(|| AppError::Unauthorized("Unauthorized".into()))?;

    AuthSession::delete_by_token(&pool, token).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": { "message": "Logged out" }
    })))
}

/// Fetch the authenticated user's own profile.
#[get("/me")]
pub async fn me(pool: web::Data<PgPool>, claims: AuthClaims) -> Result<impl Responder, AppError> {
    let user = sqlx::query_as::<_, User>(
        "SELECT id, name, email, created_at, updated_at FROM users WHERE id = $1",
    )
    .bind(claims.subject())
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
