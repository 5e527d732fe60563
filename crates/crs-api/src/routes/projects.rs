//! Project management routes

use crate::auth::AuthUser;
use crate::db::schema::{Project, ProjectWithLatestScan};
use crate::error::{ApiError, ApiResult};
use crate::models::{CreateProjectRequest, ProjectResponse};
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

pub async fn list_projects(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> ApiResult<Json<Vec<ProjectResponse>>> {
    let rows = sqlx::query_as::<_, ProjectWithLatestScan>(
        r#"
        SELECT p.id, p.project_name, p.github_url, p.last_scan, p.created_at,
               s.id AS scan_id, s.security_score, s.code_quality_score, s.scan_date
        FROM projects p
        LEFT JOIN LATERAL (
            SELECT id, security_score, code_quality_score, scan_date
            FROM scans
            WHERE project_id = p.id
            ORDER BY scan_date DESC
            LIMIT 1
        ) s ON true
        WHERE p.user_id = $1
        ORDER BY p.created_at DESC
        "#,
    )
    .bind(user.id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(rows.into_iter().map(ProjectResponse::from).collect()))
}

pub async fn create_project(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(payload): Json<CreateProjectRequest>,
) -> ApiResult<Json<Project>> {
    let name = payload.project_name.trim();
    if name.is_empty() {
        return Err(ApiError::Validation("project name is required".into()));
    }

    let github_url = payload
        .github_url
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty());

    let project = sqlx::query_as::<_, Project>(
        r#"
        INSERT INTO projects (id, user_id, project_name, github_url)
        VALUES ($1, $2, $3, $4)
        RETURNING id, user_id, project_name, github_url, last_scan, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user.id)
    .bind(name)
    .bind(github_url)
    .fetch_one(&state.db)
    .await?;

    info!("Created project {} ({})", project.project_name, project.id);

    Ok(Json(project))
}

pub async fn get_project(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Project>> {
    let project = sqlx::query_as::<_, Project>(
        r#"
        SELECT id, user_id, project_name, github_url, last_scan, created_at
        FROM projects
        WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(id)
    .bind(user.id)
    .fetch_optional(&state.db)
    .await?
    .ok_or(ApiError::NotFound("project"))?;

    Ok(Json(project))
}

pub async fn delete_project(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let result = sqlx::query("DELETE FROM projects WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user.id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound("project"));
    }

    info!("Deleted project {}", id);

    Ok(StatusCode::NO_CONTENT)
}
