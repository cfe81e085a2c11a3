use crate::{
    auth::AuthenticatedUser,
    error::AppError,
    models::{Task, TaskInput, TaskQuery, TaskUpdate},
};
use actix_web::{delete, get, patch, post, web, HttpResponse, Responder};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

const TASK_COLUMNS: &str = "id, description, completed, user_id, created_at, updated_at";

/// Retrieves a list of tasks for the authenticated user.
///
/// Only tasks owned by the authenticated user are ever candidates: filtering,
/// sorting, and pagination all operate strictly within that owned subset. An
/// empty result is a normal 200 with `[]`.
///
/// ## Query Parameters:
/// - `completed` (optional): `"true"` or `"false"`, exact-match filter on the
///   completed flag.
/// - `sortBy` (optional): `field:direction` with field one of `description`,
///   `completed`, `createdAt`, `updatedAt` and direction `asc` or `desc`.
///   Default order is creation time, ascending.
/// - `limit` (optional): positive integer capping the result count.
/// - `skip` (optional): non-negative integer pagination offset.
///
/// Malformed parameter values are rejected with 400 rather than ignored.
///
/// ## Responses:
/// - `200 OK`: Returns a JSON array of `Task` objects.
/// - `400 Bad Request`: A query parameter value is malformed.
/// - `401 Unauthorized`: If the request lacks a valid bearer token.
/// - `500 Internal Server Error`: For database errors.
#[get("")]
pub async fn get_tasks(
    pool: web::Data<PgPool>,
    query_params: web::Query<TaskQuery>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let options = query_params.parse()?;

    // Base query scoped to the owner; filter, order, and page clauses are
    // appended per supplied parameter. Sort column and direction come from
    // closed enums, never from raw client input.
    let mut sql = format!("SELECT {} FROM tasks WHERE user_id = $1", TASK_COLUMNS);
    let mut param_count = 2;

    if options.completed.is_some() {
        sql.push_str(&format!(" AND completed = ${}", param_count));
        param_count += 1;
    }

    match options.sort {
        Some(sort) => sql.push_str(&format!(
            " ORDER BY {} {}",
            sort.field.column(),
            sort.direction.keyword()
        )),
        None => sql.push_str(" ORDER BY created_at ASC"),
    }

    if options.limit.is_some() {
        sql.push_str(&format!(" LIMIT ${}", param_count));
        param_count += 1;
    }
    sql.push_str(&format!(" OFFSET ${}", param_count));

    let mut query_builder = sqlx::query_as::<_, Task>(&sql);

    query_builder = query_builder.bind(user.user_id);
    if let Some(completed) = options.completed {
        query_builder = query_builder.bind(completed);
    }
    if let Some(limit) = options.limit {
        query_builder = query_builder.bind(limit);
    }
    query_builder = query_builder.bind(options.skip);

    let tasks = query_builder.fetch_all(&**pool).await?;

    Ok(HttpResponse::Ok().json(tasks))
}

/// Creates a new task for the authenticated user.
///
/// The owner is always the authenticated user; a client-supplied owner field
/// is an unknown field and rejected.
///
/// ## Request Body:
/// - `description`: required non-empty string.
/// - `completed` (optional): boolean, defaults to false.
///
/// ## Responses:
/// - `201 Created`: Returns the persisted `Task`, including the
///   server-assigned id and timestamps.
/// - `400 Bad Request`: Missing/empty description, non-boolean `completed`,
///   or an unrecognized field.
/// - `401 Unauthorized`: If the request lacks a valid bearer token.
/// - `500 Internal Server Error`: For database errors.
#[post("")]
pub async fn create_task(
    pool: web::Data<PgPool>,
    task_data: web::Json<TaskInput>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;

    let task = Task::new(task_data.into_inner(), user.user_id);

    let result = sqlx::query_as::<_, Task>(&format!(
        "INSERT INTO tasks (id, description, completed, user_id) \
         VALUES ($1, $2, $3, $4) \
         RETURNING {}",
        TASK_COLUMNS
    ))
    .bind(task.id)
    .bind(task.description)
    .bind(task.completed)
    .bind(task.user_id)
    .fetch_one(&**pool)
    .await?;

    Ok(HttpResponse::Created().json(result))
}

/// Retrieves a specific task by its ID.
///
/// ## Responses:
/// - `200 OK`: The task exists and is owned by the authenticated user.
/// - `401 Unauthorized`: If the request lacks a valid bearer token.
/// - `404 Not Found`: The id does not exist or the task belongs to another
///   user; the two cases are indistinguishable to the caller.
#[get("/{id}")]
pub async fn get_task(
    pool: web::Data<PgPool>,
    task_id: web::Path<Uuid>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let task = sqlx::query_as::<_, Task>(&format!(
        "SELECT {} FROM tasks WHERE id = $1 AND user_id = $2",
        TASK_COLUMNS
    ))
    .bind(task_id.into_inner())
    .bind(user.user_id)
    .fetch_optional(&**pool)
    .await?;

    match task {
        Some(task) => Ok(HttpResponse::Ok().json(task)),
        None => Err(AppError::NotFound("Task not found".into())),
    }
}

/// Partially updates an existing task.
///
/// Body shape is validated first: an unknown field or a wrongly-typed value
/// (e.g. `completed` as a string) is a 400 regardless of whether the task
/// exists. Ownership is then enforced by the update itself; an id owned by
/// someone else behaves exactly like a missing id. Only the supplied fields
/// are written, and `updated_at` is refreshed.
///
/// ## Responses:
/// - `200 OK`: Returns the updated `Task`.
/// - `400 Bad Request`: Unknown field or invalid value in the body.
/// - `401 Unauthorized`: If the request lacks a valid bearer token.
/// - `404 Not Found`: Missing id or task owned by another user.
#[patch("/{id}")]
pub async fn update_task(
    pool: web::Data<PgPool>,
    task_id: web::Path<Uuid>,
    task_data: web::Json<TaskUpdate>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;
    let update = task_data.into_inner();
    let task_uuid = task_id.into_inner();

    // A well-formed empty body changes nothing; still subject to the
    // ownership check.
    if update.is_empty() {
        let task = sqlx::query_as::<_, Task>(&format!(
            "SELECT {} FROM tasks WHERE id = $1 AND user_id = $2",
            TASK_COLUMNS
        ))
        .bind(task_uuid)
        .bind(user.user_id)
        .fetch_optional(&**pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".into()))?;
        return Ok(HttpResponse::Ok().json(task));
    }

    let mut sets: Vec<String> = Vec::new();
    let mut param_count = 1;

    if update.description.is_some() {
        sets.push(format!("description = ${}", param_count));
        param_count += 1;
    }
    if update.completed.is_some() {
        sets.push(format!("completed = ${}", param_count));
        param_count += 1;
    }
    sets.push("updated_at = now()".to_string());

    let sql = format!(
        "UPDATE tasks SET {} WHERE id = ${} AND user_id = ${} RETURNING {}",
        sets.join(", "),
        param_count,
        param_count + 1,
        TASK_COLUMNS
    );

    let mut query_builder = sqlx::query_as::<_, Task>(&sql);
    if let Some(description) = &update.description {
        query_builder = query_builder.bind(description.trim().to_string());
    }
    if let Some(completed) = update.completed {
        query_builder = query_builder.bind(completed);
    }

    let task = query_builder
        .bind(task_uuid)
        .bind(user.user_id)
        .fetch_optional(&**pool)
        .await?;

    match task {
        Some(task) => Ok(HttpResponse::Ok().json(task)),
        None => Err(AppError::NotFound("Task not found".into())),
    }
}

/// Deletes a task by its ID.
///
/// The deletion is permanent; there is no soft-delete. The removed task's
/// representation is returned to the caller.
///
/// ## Responses:
/// - `200 OK`: Returns the deleted `Task`.
/// - `401 Unauthorized`: If the request lacks a valid bearer token.
/// - `404 Not Found`: Missing id or task owned by another user.
#[delete("/{id}")]
pub async fn delete_task(
    pool: web::Data<PgPool>,
    task_id: web::Path<Uuid>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let task = sqlx::query_as::<_, Task>(&format!(
        "DELETE FROM tasks WHERE id = $1 AND user_id = $2 RETURNING {}",
        TASK_COLUMNS
    ))
    .bind(task_id.into_inner())
    .bind(user.user_id)
    .fetch_optional(&**pool)
    .await?;

    match task {
        Some(task) => Ok(HttpResponse::Ok().json(task)),
        None => Err(AppError::NotFound("Task not found".into())),
    }
}
