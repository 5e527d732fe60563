//! Scan report routes

use crate::auth::AuthUser;
use crate::db::schema::{ScanWithProject, Suggestion};
use crate::error::{ApiError, ApiResult};
use crate::models::{ReportResponse, ReportSection, SuggestionResponse};
use crate::AppState;
use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::Response,
    Json,
};
use crs_core::stats::{self, SeverityClass};
use crs_core::DEFAULT_SEVERITY;
use std::sync::Arc;
use uuid::Uuid;

pub async fn get_report(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ReportResponse>> {
    let scan = fetch_report_scan(&state, &user, id).await?;
    let report = build_report(&state, scan).await?;
    Ok(Json(report))
}

/// Report screen opened without a scan id: the most recent owned scan.
pub async fn latest_report(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> ApiResult<Json<ReportResponse>> {
    let scan = sqlx::query_as::<_, ScanWithProject>(
        r#"
        SELECT s.id, s.project_id, p.user_id AS owner_id, p.project_name,
               s.security_score, s.code_quality_score, s.scan_date
        FROM scans s
        JOIN projects p ON p.id = s.project_id
        WHERE p.user_id = $1
        ORDER BY s.scan_date DESC
        LIMIT 1
        "#,
    )
    .bind(user.id)
    .fetch_optional(&state.db)
    .await?
    .ok_or(ApiError::NotFound("scan"))?;

    let report = build_report(&state, scan).await?;
    Ok(Json(report))
}

pub async fn download_report(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Response> {
    let scan = fetch_report_scan(&state, &user, id).await?;
    let report = build_report(&state, scan).await?;

    let mut content = format!(
        r#"# Code Review Scan Report

**Scan ID:** {}
**Project:** {}
**Date:** {}
**Security Score:** {}%
**Code Quality:** {}%
**Overall Health:** {}%
"#,
        report.scan_id,
        report.project_name,
        report.scan_date,
        report.security_score,
        report.code_quality_score,
        report.overall_health,
    );

    for section in &report.sections {
        let title = match section.class {
            SeverityClass::Security => "Security Vulnerabilities",
            SeverityClass::Warning => "Warnings",
            SeverityClass::Info => "Info & Suggestions",
        };
        content.push_str(&format!("\n## {} ({})\n\n", title, section.items.len()));
        for item in &section.items {
            let line = item
                .line_number
                .map(|n| format!(" (line {})", n))
                .unwrap_or_default();
            content.push_str(&format!(
                "- {}{}\n",
                item.message.as_deref().unwrap_or(""),
                line
            ));
        }
    }

    let filename = format!("scan_report_{}.md", report.scan_id);

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/markdown")
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", filename),
        )
        .body(Body::from(content))
        .map_err(|e| ApiError::Internal(e.to_string()))
}

async fn fetch_report_scan(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> ApiResult<ScanWithProject> {
    sqlx::query_as::<_, ScanWithProject>(
        r#"
        SELECT s.id, s.project_id, p.user_id AS owner_id, p.project_name,
               s.security_score, s.code_quality_score, s.scan_date
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

async fn build_report(state: &AppState, scan: ScanWithProject) -> ApiResult<ReportResponse> {
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

    let severity_counts = stats::severity_counts(
        suggestions
            .iter()
            .map(|s| s.severity.as_deref().unwrap_or(DEFAULT_SEVERITY)),
    );

    let mut sections = Vec::new();
    for class in [SeverityClass::Security, SeverityClass::Warning, SeverityClass::Info] {
        let items: Vec<SuggestionResponse> = suggestions
            .iter()
            .filter(|s| {
                stats::classify_severity(s.severity.as_deref().unwrap_or(DEFAULT_SEVERITY)) == class
            })
            .map(|s| SuggestionResponse {
                id: s.id,
                scan_id: s.scan_id,
                line_number: s.line_number,
                severity: s.severity.clone(),
                message: s.message.clone(),
                file_path: s.file_path.clone(),
                status: s.status.clone(),
            })
            .collect();
        if !items.is_empty() {
            sections.push(ReportSection { class, items });
        }
    }

    Ok(ReportResponse {
        scan_id: scan.id,
        project_name: scan.project_name,
        scan_date: scan.scan_date,
        security_score: scan.security_score,
        code_quality_score: scan.code_quality_score,
        overall_health: stats::overall_health(scan.security_score, scan.code_quality_score),
        severity_counts,
        sections,
    })
}
