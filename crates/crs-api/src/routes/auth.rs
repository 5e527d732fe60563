//! Authentication and profile routes

use crate::auth::{self, AuthUser, TOKEN_TTL_SECS};
use crate::db::schema::User;
use crate::error::{ApiError, ApiResult};
use crate::models::{AuthResponse, LoginRequest, ProfileResponse, SignupRequest, UserResponse};
use crate::AppState;
use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

pub async fn signup(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SignupRequest>,
) -> ApiResult<Json<AuthResponse>> {
    if !payload.email.contains('@') {
        return Err(ApiError::Validation("invalid email address".into()));
    }
    if payload.password.len() < 6 {
        return Err(ApiError::Validation(
            "password must be at least 6 characters".into(),
        ));
    }
    if payload.full_name.trim().is_empty() {
        return Err(ApiError::Validation("full name is required".into()));
    }

    let password_hash = auth::hash_password(&payload.password)?;

    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (id, email, full_name, password_hash)
        VALUES ($1, $2, $3, $4)
        RETURNING id, email, full_name, password_hash, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(payload.email.trim())
    .bind(payload.full_name.trim())
    .bind(&password_hash)
    .fetch_one(&state.db)
    .await
    .map_err(|e| match e.as_database_error() {
        Some(db_err) if db_err.is_unique_violation() => {
            ApiError::Validation("email already registered".into())
        }
        _ => ApiError::Database(e),
    })?;

    info!("Created account for {}", user.email);

    let token = auth::create_token(user.id, &user.email, &state.config.jwt_secret)?;
    Ok(Json(AuthResponse {
        token,
        expires_in: TOKEN_TTL_SECS,
        user: user.into(),
    }))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let user = sqlx::query_as::<_, User>(
        "SELECT id, email, full_name, password_hash, created_at FROM users WHERE email = $1",
    )
    .bind(payload.email.trim())
    .fetch_optional(&state.db)
    .await?
    .ok_or(ApiError::Unauthorized("invalid email or password"))?;

    if !auth::verify_password(&payload.password, &user.password_hash) {
        return Err(ApiError::Unauthorized("invalid email or password"));
    }

    let token = auth::create_token(user.id, &user.email, &state.config.jwt_secret)?;
    Ok(Json(AuthResponse {
        token,
        expires_in: TOKEN_TTL_SECS,
        user: user.into(),
    }))
}

pub async fn me(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> ApiResult<Json<UserResponse>> {
    let user = fetch_user(&state, user.id).await?;
    Ok(Json(user.into()))
}

pub async fn logout(_user: AuthUser) -> StatusCode {
    // Sessions are stateless JWTs; the client discards the token.
    StatusCode::NO_CONTENT
}

pub async fn profile(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> ApiResult<Json<ProfileResponse>> {
    let row = fetch_user(&state, user.id).await?;

    let project_count =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM projects WHERE user_id = $1")
            .bind(user.id)
            .fetch_one(&state.db)
            .await?;

    Ok(Json(ProfileResponse {
        user: row.into(),
        project_count,
    }))
}

async fn fetch_user(state: &AppState, id: Uuid) -> ApiResult<User> {
    sqlx::query_as::<_, User>(
        "SELECT id, email, full_name, password_hash, created_at FROM users WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(&state.db)
    .await?
    .ok_or(ApiError::NotFound("user"))
}
