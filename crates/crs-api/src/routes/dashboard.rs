//! Dashboard read model

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::models::{DashboardResponse, ScanListItem};
use crate::AppState;
use axum::{extract::State, Json};
use crs_core::stats;
use std::sync::Arc;

/// Number of recent-scan cards on the dashboard.
const RECENT_SCANS: usize = 4;

pub async fn overview(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> ApiResult<Json<DashboardResponse>> {
    let scans = stats::retain_owned(user.id, super::scans::fetch_scan_points(&state).await?);

    let total_projects =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM projects WHERE user_id = $1")
            .bind(user.id)
            .fetch_one(&state.db)
            .await?;

    let open_issues = count_open_issues(&state, &user).await?;

    Ok(Json(DashboardResponse {
        total_projects,
        open_issues,
        avg_security: stats::average_security(&scans),
        total_scans: scans.len() as i64,
        recent_scans: scans
            .into_iter()
            .take(RECENT_SCANS)
            .map(ScanListItem::from)
            .collect(),
    }))
}

/// Pending suggestions owned by the user, transitively through
/// suggestion -> scan -> project.
pub(crate) async fn count_open_issues(state: &AppState, user: &AuthUser) -> ApiResult<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*)
        FROM ai_suggestions sg
        JOIN scans s ON s.id = sg.scan_id
        JOIN projects p ON p.id = s.project_id
        WHERE p.user_id = $1 AND sg.status = $2
        "#,
    )
    .bind(user.id)
    .bind(crs_core::SUGGESTION_STATUS_PENDING)
    .fetch_one(&state.db)
    .await?;

    Ok(count)
}
