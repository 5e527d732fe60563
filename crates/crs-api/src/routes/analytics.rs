//! Analytics read model

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::models::AnalyticsResponse;
use crate::AppState;
use axum::{extract::State, Json};
use crs_core::stats;
use std::sync::Arc;
use uuid::Uuid;

pub async fn overview(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> ApiResult<Json<AnalyticsResponse>> {
    let scans = stats::retain_owned(user.id, super::scans::fetch_scan_points(&state).await?);

    let projects = sqlx::query_as::<_, (Uuid, String)>(
        "SELECT id, project_name FROM projects WHERE user_id = $1",
    )
    .bind(user.id)
    .fetch_all(&state.db)
    .await?;

    let open_issues = super::dashboard::count_open_issues(&state, &user).await?;

    Ok(Json(AnalyticsResponse {
        avg_quality: stats::average_quality(&scans),
        avg_security: stats::average_security(&scans),
        open_issues,
        total_scans: scans.len() as i64,
        trend: stats::trend(&scans),
        top_projects: stats::leaderboard(&projects, &scans),
    }))
}
