use actix_web::{get, web, HttpResponse, Responder};
use chrono::Utc;
use serde_json::json;
use sqlx::PgPool;

/// Health check endpoint
///
/// Pings the database and reports status with a timestamp.
#[get("/health")]
pub async fn health(pool: web::Data<PgPool>) -> impl Responder {
    match sqlx::query_scalar::<_, i32>("SELECT 1").fetch_one(&**pool).await {
        Ok(_) => HttpResponse::Ok().json(json!({
            "success": true,
            "data": {
                "status": "ok",
                "timestamp": Utc::now(),
                "db": "ok"
            }
        })),
        Err(_) => HttpResponse::InternalServerError().json(json!({
            "success": false,
            "error": "Database unreachable"
        })),
    }
}
