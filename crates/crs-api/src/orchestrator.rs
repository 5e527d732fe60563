//! Scan orchestration
//!
//! Drives one scan-submit-to-display cycle: call the remote analyzer,
//! normalize the response, persist the scan and its suggestion rows in one
//! transaction, then reload the rows for display. Any failure aborts the
//! cycle; the transaction guarantees no partial scan is left behind.

use crate::auth::AuthUser;
use crate::db::schema::{Scan, Suggestion};
use crate::error::{ApiError, ApiResult};
use crate::AppState;
use crs_core::normalize;
use tracing::{info, warn};
use uuid::Uuid;

pub struct ScanRun {
    pub scan: Scan,
    pub suggestions: Vec<Suggestion>,
    pub security_reported: bool,
    pub quality_reported: bool,
    pub analysis_text: Option<String>,
}

pub async fn run_scan(
    state: &AppState,
    user: &AuthUser,
    project_id: Option<Uuid>,
    code: &str,
) -> ApiResult<ScanRun> {
    // A scan may target one of the caller's projects, or none (quick scan).
    if let Some(project_id) = project_id {
        sqlx::query_scalar::<_, Uuid>("SELECT id FROM projects WHERE id = $1 AND user_id = $2")
            .bind(project_id)
            .bind(user.id)
            .fetch_optional(&state.db)
            .await?
            .ok_or(ApiError::NotFound("project"))?;
    }

    let raw = state.analyzer.analyze(code).await?;

    let outcome = normalize::scan_outcome(&raw);
    if !outcome.security_reported {
        warn!("Analyzer omitted security score, using placeholder {}", outcome.security_score);
    }
    if !outcome.quality_reported {
        warn!("Analyzer omitted quality score, using placeholder {}", outcome.code_quality_score);
    }

    let rows = normalize::suggestion_rows(&raw);

    let mut tx = state.db.begin().await?;

    let scan = sqlx::query_as::<_, Scan>(
        r#"
        INSERT INTO scans (id, project_id, security_score, code_quality_score, vulnerabilities, suggestions)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, project_id, security_score, code_quality_score, vulnerabilities, suggestions, scan_date
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(project_id)
    .bind(outcome.security_score)
    .bind(outcome.code_quality_score)
    .bind(&outcome.vulnerabilities)
    .bind(&outcome.raw_suggestions)
    .fetch_one(&mut *tx)
    .await?;

    if let Some(project_id) = project_id {
        sqlx::query("UPDATE projects SET last_scan = now() WHERE id = $1")
            .bind(project_id)
            .execute(&mut *tx)
            .await?;
    }

    for row in &rows {
        sqlx::query(
            r#"
            INSERT INTO ai_suggestions (id, scan_id, line_number, severity, message, file_path, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(scan.id)
        .bind(row.line_number)
        .bind(&row.severity)
        .bind(&row.message)
        .bind(&row.file_path)
        .bind(crs_core::SUGGESTION_STATUS_PENDING)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    // Display state comes from the persisted rows, not the raw payload.
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

    info!(
        "Scan {} completed: security {}%, quality {}%, {} suggestions",
        scan.id,
        scan.security_score,
        scan.code_quality_score,
        suggestions.len()
    );

    Ok(ScanRun {
        scan,
        suggestions,
        security_reported: outcome.security_reported,
        quality_reported: outcome.quality_reported,
        analysis_text: outcome.analysis_text,
    })
}
