use crate::{
    auth::{ensure_owner, CurrentUser},
    error::AppError,
    models::{Task, TaskCreate, TaskFilter, TaskQuery, TaskSort, TaskUpdate},
    security::{sanitize_search, validate_search},
};
use actix_web::{delete, get, patch, post, put, web, HttpResponse, Responder};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

const TASK_COLUMNS: &str = "id, user_id, title, description, completed, created_at, updated_at";

/// Fetches a task by id, independent of ownership.
///
/// A missing row is a 404; whether the caller may touch the task is decided
/// afterwards by [`ensure_owner`], so existing-but-foreign ids answer 403.
async fn load_task(pool: &PgPool, task_id: Uuid) -> Result<Task, AppError> {
    let task = sqlx::query_as::<_, Task>(&format!(
        "SELECT {} FROM tasks WHERE id = $1",
        TASK_COLUMNS
    ))
    .bind(task_id)
    .fetch_optional(pool)
    .await?;

    task.ok_or_else(|| AppError::NotFound("Task not found".into()))
}

/// Retrieves the authenticated user's tasks.
///
/// Supports a completion `filter` (all | completed | pending), a `sort_by`
/// order (created_at | title | updated_at) and a case-insensitive `search`
/// over titles and descriptions. Other users' tasks are never included,
/// whatever the parameters.
///
/// ## Responses:
/// - `200 OK`: Returns a JSON array of `Task` objects.
/// - `400 Bad Request`: If the search term is rejected by input hardening.
/// - `401 Unauthorized`: If the request lacks a valid authentication token.
/// - `500 Internal Server Error`: For database errors or other unexpected issues.
#[get("")]
pub async fn get_tasks(
    pool: web::Data<PgPool>,
    query_params: web::Query<TaskQuery>,
    current_user: CurrentUser,
) -> Result<impl Responder, AppError> {
    // Validate and sanitize the search term if provided
    let search = match &query_params.search {
        Some(term) => {
            if validate_search(term).is_err() {
                return Err(AppError::BadRequest("Invalid search query".into()));
            }
            Some(sanitize_search(term))
        }
        None => None,
    };

    // Base query scoped to the caller; filter, search and ordering are
    // appended dynamically.
    let mut sql = format!("SELECT {} FROM tasks WHERE user_id = $1", TASK_COLUMNS);

    match query_params.filter {
        Some(TaskFilter::Completed) => sql.push_str(" AND completed = TRUE"),
        Some(TaskFilter::Pending) => sql.push_str(" AND completed = FALSE"),
        Some(TaskFilter::All) | None => {}
    }

    if search.is_some() {
        sql.push_str(" AND (title ILIKE $2 OR description ILIKE $2)");
    }

    match query_params.sort_by {
        Some(TaskSort::Title) => sql.push_str(" ORDER BY title"),
        Some(TaskSort::UpdatedAt) => sql.push_str(" ORDER BY updated_at DESC"),
        Some(TaskSort::CreatedAt) | None => sql.push_str(" ORDER BY created_at DESC"),
    }

    let mut query_builder = sqlx::query_as::<_, Task>(&sql).bind(current_user.0.id);

    if let Some(search) = &search {
        query_builder = query_builder.bind(format!("%{}%", search));
    }

    let tasks = query_builder.fetch_all(&**pool).await?;

    Ok(HttpResponse::Ok().json(tasks))
}

/// Creates a new task owned by the authenticated user.
///
/// ## Request Body:
/// - `title`: The title of the task (required).
/// - `description` (optional): A description of the task.
///
/// New tasks start with `completed = false`.
///
/// ## Responses:
/// - `201 Created`: Returns the newly created `Task` object as JSON.
/// - `401 Unauthorized`: If the request lacks a valid authentication token.
/// - `422 Unprocessable Entity`: If input validation on `TaskCreate` fails.
/// - `500 Internal Server Error`: For database errors or other unexpected issues.
#[post("")]
pub async fn create_task(
    pool: web::Data<PgPool>,
    task_data: web::Json<TaskCreate>,
    current_user: CurrentUser,
) -> Result<impl Responder, AppError> {
    // Validate input
    task_data.validate()?;

    let task = Task::new(task_data.into_inner(), current_user.0.id);

    let result = sqlx::query_as::<_, Task>(&format!(
        "INSERT INTO tasks (id, user_id, title, description, completed) \
         VALUES ($1, $2, $3, $4, $5) \
         RETURNING {}",
        TASK_COLUMNS
    ))
    .bind(task.id)
    .bind(task.user_id)
    .bind(task.title)
    .bind(task.description)
    .bind(task.completed)
    .fetch_one(&**pool)
    .await?;

    Ok(HttpResponse::Created().json(result))
}

/// Retrieves a specific task by its ID.
///
/// ## Responses:
/// - `200 OK`: Returns the `Task` object as JSON.
/// - `401 Unauthorized`: If the request lacks a valid authentication token.
/// - `403 Forbidden`: If the task exists but is owned by another user.
/// - `404 Not Found`: If no task with the given ID exists.
/// - `500 Internal Server Error`: For database errors or other unexpected issues.
#[get("/{id}")]
pub async fn get_task(
    pool: web::Data<PgPool>,
    task_id: web::Path<Uuid>,
    current_user: CurrentUser,
) -> Result<impl Responder, AppError> {
    let task = load_task(&pool, task_id.into_inner()).await?;
    ensure_owner(&current_user.0, &task, "access")?;

    Ok(HttpResponse::Ok().json(task))
}

/// Applies a partial update to a task the authenticated user owns.
///
/// Absent fields keep their stored values; `updated_at` is bumped on every
/// successful update.
///
/// ## Responses:
/// - `200 OK`: Returns the updated `Task` object as JSON.
/// - `401 Unauthorized`: If the request lacks a valid authentication token.
/// - `403 Forbidden`: If the task exists but is owned by another user.
/// - `404 Not Found`: If no task with the given ID exists.
/// - `422 Unprocessable Entity`: If input validation on `TaskUpdate` fails.
/// - `500 Internal Server Error`: For database errors or other unexpected issues.
#[put("/{id}")]
pub async fn update_task(
    pool: web::Data<PgPool>,
    task_id: web::Path<Uuid>,
    task_data: web::Json<TaskUpdate>,
    current_user: CurrentUser,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;

    let task_uuid = task_id.into_inner();
    let task = load_task(&pool, task_uuid).await?;
    ensure_owner(&current_user.0, &task, "modify")?;

    let result = sqlx::query_as::<_, Task>(&format!(
        "UPDATE tasks \
         SET title = COALESCE($1, title), \
             description = COALESCE($2, description), \
             completed = COALESCE($3, completed), \
             updated_at = NOW() \
         WHERE id = $4 \
         RETURNING {}",
        TASK_COLUMNS
    ))
    .bind(&task_data.title)
    .bind(&task_data.description)
    .bind(task_data.completed)
    .bind(task_uuid)
    .fetch_one(&**pool)
    .await?;

    Ok(HttpResponse::Ok().json(result))
}

/// Toggles a task's completion flag.
///
/// ## Responses:
/// - `200 OK`: Returns the toggled `Task` object as JSON.
/// - `401 Unauthorized`: If the request lacks a valid authentication token.
/// - `403 Forbidden`: If the task exists but is owned by another user.
/// - `404 Not Found`: If no task with the given ID exists.
/// - `500 Internal Server Error`: For database errors or other unexpected issues.
#[patch("/{id}/complete")]
pub async fn toggle_task(
    pool: web::Data<PgPool>,
    task_id: web::Path<Uuid>,
    current_user: CurrentUser,
) -> Result<impl Responder, AppError> {
    let task_uuid = task_id.into_inner();
    let task = load_task(&pool, task_uuid).await?;
    ensure_owner(&current_user.0, &task, "modify")?;

    let result = sqlx::query_as::<_, Task>(&format!(
        "UPDATE tasks SET completed = NOT completed, updated_at = NOW() \
         WHERE id = $1 \
         RETURNING {}",
        TASK_COLUMNS
    ))
    .bind(task_uuid)
    .fetch_one(&**pool)
    .await?;

    Ok(HttpResponse::Ok().json(result))
}

/// Deletes a task the authenticated user owns.
///
/// ## Responses:
/// - `204 No Content`: On successful deletion.
/// - `401 Unauthorized`: If the request lacks a valid authentication token.
/// - `403 Forbidden`: If the task exists but is owned by another user.
/// - `404 Not Found`: If no task with the given ID exists.
/// - `500 Internal Server Error`: For database errors or other unexpected issues.
#[delete("/{id}")]
pub async fn delete_task(
    pool: web::Data<PgPool>,
    task_id: web::Path<Uuid>,
    current_user: CurrentUser,
) -> Result<impl Responder, AppError> {
    let task_uuid = task_id.into_inner();
    let task = load_task(&pool, task_uuid).await?;
    ensure_owner(&current_user.0, &task, "delete")?;

    sqlx::query("DELETE FROM tasks WHERE id = $1")
        .bind(task_uuid)
        .execute(&**pool)
        .await?;

    Ok(HttpResponse::NoContent().finish())
}
