use crate::{
    auth::{
        generate_token, hash_password, verify_password, AuthResponse, AuthenticatedUser,
        LoginRequest, RegisterRequest,
    },
    error::AppError,
    models::UserRecord,
};
use actix_web::{post, web, HttpResponse, Responder};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

/// Issues a fresh token for the user and records it as an active session.
///
/// The token only authenticates requests while its session row exists;
/// logout and account deletion remove rows and thereby revoke tokens.
async fn issue_session(pool: &PgPool, user_id: i32) -> Result<String, AppError> {
    let token = generate_token(user_id)?;

    sqlx::query("INSERT INTO sessions (id, user_id, token) VALUES ($1, $2, $3)")
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(&token)
        .execute(pool)
        .await?;

    Ok(token)
}

/// Register a new user
///
/// Creates a new user account, opens a session, and returns the bearer token
/// together with the new user's profile.
#[post("")]
pub async fn register(
    pool: web::Data<PgPool>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    register_data.validate()?;

    // Check if email already exists
    let existing_user = sqlx::query_as::<_, (i32,)>("SELECT id FROM users WHERE email = $1")
        .bind(&register_data.email)
        .fetch_optional(&**pool)
        .await?;

    if existing_user.is_some() {
        return Err(AppError::BadRequest("Email already registered".into()));
    }

    let password_hash = hash_password(&register_data.password)?;

    let record = sqlx::query_as::<_, UserRecord>(
        "INSERT INTO users (name, email, password_hash) VALUES ($1, $2, $3) \
         RETURNING id, name, email, password_hash, created_at",
    )
    .bind(register_data.name.trim())
    .bind(&register_data.email)
    .bind(&password_hash)
    .fetch_one(&**pool)
    .await?;

    let token = issue_session(&pool, record.id).await?;

    Ok(HttpResponse::Created().json(AuthResponse {
        token,
        user: record.into_profile(),
    }))
}

/// Login user
///
/// Authenticates a user, opens a new session, and returns the bearer token.
/// Each login adds a token to the user's active set; sessions on other
/// devices remain valid.
#[post("/login")]
pub async fn login(
    pool: web::Data<PgPool>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    login_data.validate()?;

    let user = sqlx::query_as::<_, UserRecord>(
        "SELECT id, name, email, password_hash, created_at FROM users WHERE email = $1",
    )
    .bind(&login_data.email)
    .fetch_optional(&**pool)
    .await?;

    // Unknown email and wrong password are indistinguishable to the caller.
    let user = user.ok_or_else(|| AppError::Unauthorized("Invalid credentials".into()))?;

    if !verify_password(&login_data.password, &user.password_hash)? {
        return Err(AppError::Unauthorized("Invalid credentials".into()));
    }

    let token = issue_session(&pool, user.id).await?;

    Ok(HttpResponse::Ok().json(AuthResponse {
        token,
        user: user.into_profile(),
    }))
}

/// Logout the current session
///
/// Removes the token that authenticated this request from the user's active
/// sessions. Other sessions stay valid.
#[post("/logout")]
pub async fn logout(
    pool: web::Data<PgPool>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    sqlx::query("DELETE FROM sessions WHERE user_id = $1 AND token = $2")
        .bind(user.user_id)
        .bind(&user.token)
        .execute(&**pool)
        .await?;

    Ok(HttpResponse::Ok().finish())
}

/// Logout everywhere
///
/// Removes every active session for the user, revoking all issued tokens.
#[post("/logout-all")]
pub async fn logout_all(
    pool: web::Data<PgPool>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    sqlx::query("DELETE FROM sessions WHERE user_id = $1")
        .bind(user.user_id)
        .execute(&**pool)
        .await?;

    Ok(HttpResponse::Ok().finish())
}
