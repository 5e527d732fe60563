//! Scan routes
//!
//! `run_scan` is the editor screen's submit action; the rest are reads over
//! persisted scans. Aggregate reads fetch scans joined with their owning
//! project and retain rows by owner before reducing.

use crate::auth::AuthUser;
use crate::db::schema::{Scan, ScanWithProject, Suggestion};
use crate::error::{ApiError, ApiResult};
use crate::models::{ListQuery, RunScanRequest, RunScanResponse, ScanListItem, SuggestionResponse};
use crate::{orchestrator, AppState};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use crs_core::stats;
use std::sync::Arc;
use uuid::Uuid;

pub async fn run_scan(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(payload): Json<RunScanRequest>,
) -> ApiResult<Json<RunScanResponse>> {
    if payload.code.trim().is_empty() {
        return Err(ApiError::Validation("code is required".into()));
    }

    let run = orchestrator::run_scan(&state, &user, payload.project_id, &payload.code).await?;

    let message = format!(
        "Security: {}% | Quality: {}%",
        run.scan.security_score, run.scan.code_quality_score
    );

    Ok(Json(RunScanResponse {
        scan_id: run.scan.id,
        project_id: run.scan.project_id,
        security_score: run.scan.security_score,
        code_quality_score: run.scan.code_quality_score,
        security_reported: run.security_reported,
        quality_reported: run.quality_reported,
        message,
        suggestions: run.suggestions.into_iter().map(SuggestionResponse::from).collect(),
        analysis: run.analysis_text,
    }))
}

pub async fn list_scans(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<ScanListItem>>> {
    let limit = query.limit.unwrap_or(20).clamp(1, 100) as usize;

    let points = stats::retain_owned(user.id, fetch_scan_points(&state).await?);

    Ok(Json(
        points.into_iter().take(limit).map(ScanListItem::from).collect(),
    ))
}

pub async fn get_scan(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Scan>> {
    let scan = fetch_owned_scan(&state, &user, id).await?;
    Ok(Json(scan))
}

pub async fn get_suggestions(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Vec<SuggestionResponse>>> {
    let scan = fetch_owned_scan(&state, &user, id).await?;

    let suggestions = sqlx::query_as::<_, Suggestion>(
        r#"
        SELECT id, scan_id, line_number, severity, message, file_path, status, created_at
        FROM ai_suggestions
        WHERE scan_id = $1
        ORDER BY created_at, id
        "#,
    )
    .bind(scan.id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(
        suggestions.into_iter().map(SuggestionResponse::from).collect(),
    ))
}

/// All scans joined with their owning project, newest first. Quick scans
/// have no project and therefore no owner; they never join in.
pub(crate) async fn fetch_scan_points(
    state: &AppState,
) -> ApiResult<Vec<crs_core::ScanPoint>> {
    let rows = sqlx::query_as::<_, ScanWithProject>(
        r#"
        SELECT s.id, s.project_id, p.user_id AS owner_id, p.project_name,
               s.security_score, s.code_quality_score, s.scan_date
        FROM scans s
        JOIN projects p ON p.id = s.project_id
        ORDER BY s.scan_date DESC
        "#,
    )
    .fetch_all(&state.db)
    .await?;

    Ok(rows.into_iter().map(Into::into).collect())
}

/// Fetch a scan by id, visible only when owned through its project.
pub(crate) async fn fetch_owned_scan(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> ApiResult<Scan> {
    sqlx::query_as::<_, Scan>(
        r#"
        SELECT s.id, s.project_id, s.security_score, s.code_quality_score,
               s.vulnerabilities, s.suggestions, s.scan_date
        FROM scans s
        JOIN projects p ON p.id = s.project_id
        WHERE s.id = $1 AND p.user_id = $2
        "#,
    )
    .bind(id)
    .bind(user.id)
    .fetch_optional(&state.db)
    .await?
    .ok_or(ApiError::NotFound("scan"))
}
