use crate::{
    auth::AuthClaims,
    error::AppError,
    models::{Task, TaskInput, TaskQuery, TaskRow, TaskUpdate},
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

/// Retrieves a page of tasks for the authenticated user.
///
/// Only the caller's own tasks are visible. Results can be filtered by
/// `status`, `priority`, `due_before` (tasks due strictly earlier), and `q`
/// (case-insensitive substring match over title and description), and are
/// ordered by creation date descending.
///
/// ## Query Parameters:
/// - `page` (optional): 1-based page number, defaults to 1.
/// - `limit` (optional): page size, clamped to 1..=50, defaults to 10.
/// - `status`, `priority`, `due_before`, `q` (optional): filters.
///
/// ## Responses:
/// - `200 OK`: `{items, total, page, limit, total_pages}`.
/// - `401 Unauthorized`: missing or invalid token.
/// - `500 Internal Server Error`: database errors.
#[get("")]
pub async fn get_tasks(
    pool: web::Data<PgPool>,
    query_params: web::Query<TaskQuery>,
    claims: AuthClaims,
) -> Result<impl Responder, AppError> {
    let page = query_params.page.unwrap_or(1).max(1);
    let limit = query_params.limit.unwrap_or(10).clamp(1, 50);

    // Filter conditions are appended positionally; the same clause string
    // backs both the count and the page query.
    let mut where_clause = String::from(" WHERE user_id = $1");
    let mut param_count = 2;

    if query_params.status.is_some() {
        where_clause.push_str(&format!(" AND status = ${}", param_count));
        param_count += 1;
    }
    if query_params.priority.is_some() {
        where_clause.push_str(&format!(" AND priority = ${}", param_count));
        param_count += 1;
    }
    if query_params.due_before.is_some() {
        where_clause.push_str(&format!(" AND due_date < ${}", param_count));
        param_count += 1;
    }
    if query_params.q.is_some() {
        where_clause.push_str(&format!(
            " AND (title ILIKE ${} OR description ILIKE ${})",
            param_count,
            param_count + 1
        ));
        param_count += 2;
    }

    let count_sql = format!("SELECT COUNT(*) FROM tasks{}", where_clause);
    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql).bind(claims.subject());

    if let Some(status) = &query_params.status {
        count_query = count_query.bind(status.clone());
    }
    if let Some(priority) = &query_params.priority {
        count_query = count_query.bind(priority.clone());
    }
    if let Some(due_before) = query_params.due_before {
        count_query = count_query.bind(due_before);
    }
    if let Some(q) = &query_params.q {
        let pattern = format!("%{}%", q);
        count_query = count_query.bind(pattern.clone());
        count_query = count_query.bind(pattern);
    }

    let total = count_query.fetch_one(&**pool).await?;

    let select_sql = format!(
        "SELECT id, user_id, title, description, status, priority, tags, due_date, completed_at, is_private, created_at, updated_at \
         FROM tasks{} ORDER BY created_at DESC LIMIT ${} OFFSET ${}",
        where_clause,
        param_count,
        param_count + 1
    );
    let mut select_query = sqlx::query_as::<_, TaskRow>(&select_sql).bind(claims.subject());

    if let Some(status) = &query_params.status {
        select_query = select_query.bind(status.clone());
    }
    if let Some(priority) = &query_params.priority {
        select_query = select_query.bind(priority.clone());
    }
    if let Some(due_before) = query_params.due_before {
        select_query = select_query.bind(due_before);
    }
    if let Some(q) = &query_params.q {
        let pattern = format!("%{}%", q);
        select_query = select_query.bind(pattern.clone());
        select_query = select_query.bind(pattern);
    }

    let rows = select_query
        .bind(limit)
        .bind((page - 1) * limit)
        .fetch_all(&**pool)
        .await?;

    let items: Vec<Task> = rows.into_iter().map(Task::from).collect();
    let total_pages = ((total + limit - 1) / limit).max(1);

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": {
            "items": items,
            "total": total,
            "page": page,
            "limit": limit,
            "total_pages": total_pages
        }
    })))
}

/// Creates a new task for the authenticated user.
///
/// The task is owned by the caller; status starts at `todo` and priority
/// defaults to `medium`.
///
/// ## Responses:
/// - `201 Created`: the new task.
/// - `400 Bad Request`: validation failure (e.g. empty title).
/// - `401 Unauthorized`: missing or invalid token.
/// - `500 Internal Server Error`: database errors.
#[post("")]
pub async fn create_task(
    pool: web::Data<PgPool>,
    task_data: web::Json<TaskInput>,
    claims: AuthClaims,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;

    let task = Task::new(task_data.into_inner(), claims.subject());

    let row = sqlx::query_as::<_, TaskRow>(
        "INSERT INTO tasks (id, user_id, title, description, status, priority, tags, due_date, is_private)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
         RETURNING id, user_id, title, description, status, priority, tags, due_date, completed_at, is_private, created_at, updated_at",
    )
    .bind(task.id)
    .bind(task.user_id)
    .bind(&task.title)
    .bind(&task.description)
    .bind(task.status.clone())
    .bind(task.priority.clone())
    .bind(task.tags_json())
    .bind(task.due_date)
    .bind(task.is_private)
    .fetch_one(&**pool)
    .await?;

    Ok(HttpResponse::Created().json(json!({
        "success": true,
        "data": Task::from(row)
    })))
}

/// Retrieves a specific task by its ID.
///
/// Existence is checked before ownership: an id that matches no task yields
/// 404 for every authenticated caller, and a task owned by someone else
/// yields 403.
#[get("/{id}")]
pub async fn get_task(
    pool: web::Data<PgPool>,
    task_id: web::Path<Uuid>,
    claims: AuthClaims,
) -> Result<impl Responder, AppError> {
    let row = sqlx::query_as::<_, TaskRow>(
        "SELECT id, user_id, title, description, status, priority, tags, due_date, completed_at, is_private, created_at, updated_at \
         FROM tasks WHERE id = $1",
    )
    .bind(task_id.into_inner())
    .fetch_optional(&**pool)
    .await?;

    let row = row.ok_or_else(|| AppError::NotFound("Task not found".into()))?;
    if row.user_id != claims.subject() {
        return Err(AppError::Forbidden("Forbidden".into()));
    }

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": Task::from(row)
    })))
}

/// Updates an existing task owned by the caller.
///
/// All fields are optional; absent fields are left unchanged. Setting
/// `status` to `done` stamps `completed_at`; setting it to any other status
/// clears it; omitting `status` leaves the stamp untouched.
///
/// ## Responses:
/// - `200 OK`: the updated task.
/// - `400 Bad Request`: validation failure.
/// - `401 Unauthorized`: missing or invalid token.
/// - `403 Forbidden`: the task belongs to another user.
/// - `404 Not Found`: no task with that id.
#[put("/{id}")]
pub async fn update_task(
    pool: web::Data<PgPool>,
    task_id: web::Path<Uuid>,
    task_data: web::Json<TaskUpdate>,
    claims: AuthClaims,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;
    let task_uuid = task_id.into_inner();

    let existing: Option<(i32,)> = sqlx::query_as("SELECT user_id FROM tasks WHERE id = $1")
        .bind(task_uuid)
        .fetch_optional(&**pool)
        .await?;

    let (owner_id,) = existing.ok_or_else(|| AppError::NotFound("Task not found".into()))?;
    if owner_id != claims.subject() {
        return Err(AppError::Forbidden("Forbidden".into()));
    }

    let tags_json = task_data
        .tags
        .as_ref()
        .map(|tags| serde_json::to_string(tags).unwrap_or_else(|_| "[]".to_string()));

    let row = sqlx::query_as::<_, TaskRow>(
        "UPDATE tasks SET
             title = COALESCE($1, title),
             description = COALESCE($2, description),
             status = COALESCE($3, status),
             priority = COALESCE($4, priority),
             tags = COALESCE($5, tags),
             due_date = COALESCE($6, due_date),
             is_private = COALESCE($7, is_private),
             completed_at = CASE
                 WHEN $3::task_status IS NULL THEN completed_at
                 WHEN $3::task_status = 'done' THEN NOW()
                 ELSE NULL
             END,
             updated_at = NOW()
         WHERE id = $8
         RETURNING id, user_id, title, description, status, priority, tags, due_date, completed_at, is_private, created_at, updated_at",
    )
    .bind(&task_data.title)
    .bind(&task_data.description)
    .bind(task_data.status.clone())
    .bind(task_data.priority.clone())
    .bind(tags_json)
    .bind(task_data.due_date)
    .bind(task_data.is_private)
    .bind(task_uuid)
    .fetch_one(&**pool)
    .await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": Task::from(row)
    })))
}

/// Deletes a task owned by the caller.
///
/// Same existence-then-ownership order as fetching: 404 for unknown ids,
/// 403 for tasks owned by someone else.
#[delete("/{id}")]
pub async fn delete_task(
    pool: web::Data<PgPool>,
    task_id: web::Path<Uuid>,
    claims: AuthClaims,
) -> Result<impl Responder, AppError> {
    let task_uuid = task_id.into_inner();

    let existing: Option<(i32,)> = sqlx::query_as("SELECT user_id FROM tasks WHERE id = $1")
        .bind(task_uuid)
        .fetch_optional(&**pool)
        .await?;

    let (owner_id,) = existing.ok_or_else(|| AppError::NotFound("Task not found".into()))?;
    if owner_id != claims.subject() {
        return Err(AppError::Forbidden("Forbidden".into()));
    }

    sqlx::query("DELETE FROM tasks WHERE id = $1")
        .bind(task_uuid)
        .execute(&**pool)
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": { "id": task_uuid }
    })))
}
