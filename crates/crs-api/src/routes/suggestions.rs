//! Suggestion status mutation

use crate::auth::AuthUser;
use crate::db::schema::Suggestion;
use crate::error::{ApiError, ApiResult};
use crate::models::{SuggestionResponse, UpdateSuggestionRequest};
use crate::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use crs_core::{SUGGESTION_STATUS_FIXED, SUGGESTION_STATUS_IGNORED};
use std::sync::Arc;
use uuid::Uuid;

pub async fn update_status(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateSuggestionRequest>,
) -> ApiResult<Json<SuggestionResponse>> {
    if payload.status != SUGGESTION_STATUS_FIXED && payload.status != SUGGESTION_STATUS_IGNORED {
        return Err(ApiError::Validation(format!(
            "status must be \"{}\" or \"{}\"",
            SUGGESTION_STATUS_FIXED, SUGGESTION_STATUS_IGNORED
        )));
    }

    // Ownership runs transitively: suggestion -> scan -> project -> user.
    let suggestion = sqlx::query_as::<_, Suggestion>(
        r#"
        UPDATE ai_suggestions AS sg
        SET status = $1
        FROM scans s
        JOIN projects p ON p.id = s.project_id
        WHERE sg.id = $2 AND sg.scan_id = s.id AND p.user_id = $3
        RETURNING sg.id, sg.scan_id, sg.line_number, sg.severity, sg.message,
                  sg.file_path, sg.status, sg.created_at
        "#,
    )
    .bind(&payload.status)
    .bind(id)
    .bind(user.id)
    .fetch_optional(&state.db)
    .await?
    .ok_or(ApiError::NotFound("suggestion"))?;

    Ok(Json(suggestion.into()))
}
