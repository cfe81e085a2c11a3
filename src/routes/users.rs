use crate::{
    auth::{hash_password, AuthenticatedUser},
    error::AppError,
    models::{User, UserRecord, UserUpdate},
};
use actix_web::{delete, get, patch, web, HttpResponse, Responder};
use sqlx::PgPool;
use validator::Validate;

/// Returns the authenticated user's own profile.
#[get("/me")]
pub async fn me(
    pool: web::Data<PgPool>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let profile = sqlx::query_as::<_, User>(
        "SELECT id, name, email, created_at FROM users WHERE id = $1",
    )
    .bind(user.user_id)
    .fetch_one(&**pool)
    .await?;

    Ok(HttpResponse::Ok().json(profile))
}

/// Updates the authenticated user's profile.
///
/// Allowed fields: `name`, `email`, `password`. Any other field in the body
/// is rejected with 400 before anything is written. A new password is hashed
/// before storage; changing the email re-checks uniqueness.
///
/// ## Responses:
/// - `200 OK`: Returns the updated profile.
/// - `400 Bad Request`: Unknown field, invalid value, or email already taken.
/// - `401 Unauthorized`: Missing or invalid bearer token.
#[patch("/me")]
pub async fn update_me(
    pool: web::Data<PgPool>,
    update_data: web::Json<UserUpdate>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    update_data.validate()?;
    let update = update_data.into_inner();

    if update.is_empty() {
        let profile = sqlx::query_as::<_, User>(
            "SELECT id, name, email, created_at FROM users WHERE id = $1",
        )
        .bind(user.user_id)
        .fetch_one(&**pool)
        .await?;
        return Ok(HttpResponse::Ok().json(profile));
    }

    if let Some(email) = &update.email {
        let taken = sqlx::query_as::<_, (i32,)>("SELECT id FROM users WHERE email = $1 AND id <> $2")
            .bind(email)
            .bind(user.user_id)
            .fetch_optional(&**pool)
            .await?;
        if taken.is_some() {
            return Err(AppError::BadRequest("Email already registered".into()));
        }
    }

    // SET clauses are appended per supplied field, mirroring the dynamic
    // filter construction in the task listing.
    let mut sets: Vec<String> = Vec::new();
    let mut param_count = 1;

    if update.name.is_some() {
        sets.push(format!("name = ${}", param_count));
        param_count += 1;
    }
    if update.email.is_some() {
        sets.push(format!("email = ${}", param_count));
        param_count += 1;
    }
    if update.password.is_some() {
        sets.push(format!("password_hash = ${}", param_count));
        param_count += 1;
    }

    let sql = format!(
        "UPDATE users SET {} WHERE id = ${} RETURNING id, name, email, created_at",
        sets.join(", "),
        param_count
    );

    let mut query_builder = sqlx::query_as::<_, User>(&sql);
    if let Some(name) = &update.name {
        query_builder = query_builder.bind(name.trim().to_string());
    }
    if let Some(email) = &update.email {
        query_builder = query_builder.bind(email.clone());
    }
    if let Some(password) = &update.password {
        query_builder = query_builder.bind(hash_password(password)?);
    }

    let profile = query_builder
        .bind(user.user_id)
        .fetch_one(&**pool)
        .await?;

    Ok(HttpResponse::Ok().json(profile))
}

/// Deletes the authenticated user's account.
///
/// Sessions and owned tasks are removed with it (foreign keys cascade), so
/// every outstanding token stops authenticating immediately. Returns the
/// deleted profile.
#[delete("/me")]
pub async fn delete_me(
    pool: web::Data<PgPool>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let record = sqlx::query_as::<_, UserRecord>(
        "DELETE FROM users WHERE id = $1 RETURNING id, name, email, password_hash, created_at",
    )
    .bind(user.user_id)
    .fetch_optional(&**pool)
    .await?
    .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    Ok(HttpResponse::Ok().json(record.into_profile()))
}
