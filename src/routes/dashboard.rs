use crate::{
    auth::AuthClaims,
    error::AppError,
    models::{Task, TaskRow},
};
use actix_web::{get, web, HttpResponse, Responder};
use chrono::{Duration, Utc};
use serde::Deserialize;
use serde_json::json;
use sqlx::PgPool;

#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    /// Lookback window in days for `recent_tasks`. Defaults to 7.
    pub period: Option<i64>,
}

/// Summarizes the caller's tasks: totals by status, the five tasks due
/// soonest within the next week (overdue included), and the five most
/// recently created within the period.
#[get("")]
pub async fn summary(
    pool: web::Data<PgPool>,
    query_params: web::Query<DashboardQuery>,
    claims: AuthClaims,
) -> Result<impl Responder, AppError> {
    let user_id = claims.subject();
    let period = query_params.period.unwrap_or(7);
    let now = Utc::now();
    let since = now - Duration::days(period);
    let due_soon_cutoff = now + Duration::days(7);

    let total_tasks =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM tasks WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&**pool)
            .await?;

    let todo_count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM tasks WHERE user_id = $1 AND status = 'todo'",
    )
    .bind(user_id)
    .fetch_one(&**pool)
    .await?;

    let in_progress_count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM tasks WHERE user_id = $1 AND status = 'in_progress'",
    )
    .bind(user_id)
    .fetch_one(&**pool)
    .await?;

    let done_count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM tasks WHERE user_id = $1 AND status = 'done'",
    )
    .bind(user_id)
    .fetch_one(&**pool)
    .await?;

    let due_soon = sqlx::query_as::<_, TaskRow>(
        "SELECT id, user_id, title, description, status, priority, tags, due_date, completed_at, is_private, created_at, updated_at \
         FROM tasks WHERE user_id = $1 AND due_date IS NOT NULL AND due_date <= $2 \
         ORDER BY due_date ASC LIMIT 5",
    )
    .bind(user_id)
    .bind(due_soon_cutoff)
    .fetch_all(&**pool)
    .await?;

    let recent_tasks = sqlx::query_as::<_, TaskRow>(
        "SELECT id, user_id, title, description, status, priority, tags, due_date, completed_at, is_private, created_at, updated_at \
         FROM tasks WHERE user_id = $1 AND created_at >= $2 \
         ORDER BY created_at DESC LIMIT 5",
    )
    .bind(user_id)
    .bind(since)
    .fetch_all(&**pool)
    .await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": {
            "total_tasks": total_tasks,
            "by_status": {
                "todo": todo_count,
                "in_progress": in_progress_count,
                "done": done_count
            },
            "due_soon": due_soon.into_iter().map(Task::from).collect::<Vec<_>>(),
            "recent_tasks": recent_tasks.into_iter().map(Task::from).collect::<Vec<_>>()
        }
    })))
}
