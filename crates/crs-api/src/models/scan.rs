//! Scan and suggestion models

use chrono::{DateTime, Utc};
use crs_core::ScoreBand;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct RunScanRequest {
    pub code: String,
    pub project_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct RunScanResponse {
    pub scan_id: Uuid,
    pub project_id: Option<Uuid>,
    pub security_score: i32,
    pub code_quality_score: i32,
    /// False when the analyzer omitted the score and a placeholder was used.
    pub security_reported: bool,
    pub quality_reported: bool,
    pub message: String,
    pub suggestions: Vec<SuggestionResponse>,
    /// Free-text analysis body from the analyzer, when it sent one.
    pub analysis: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SuggestionResponse {
    pub id: Uuid,
    pub scan_id: Uuid,
    pub line_number: Option<i32>,
    pub severity: Option<String>,
    pub message: Option<String>,
    pub file_path: Option<String>,
    pub status: String,
}

impl From<crate::db::schema::Suggestion> for SuggestionResponse {
    fn from(row: crate::db::schema::Suggestion) -> Self {
        Self {
            id: row.id,
            scan_id: row.scan_id,
            line_number: row.line_number,
            severity: row.severity,
            message: row.message,
            file_path: row.file_path,
            status: row.status,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateSuggestionRequest {
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct ScanListItem {
    pub id: Uuid,
    pub project_id: Uuid,
    pub project_name: String,
    pub security_score: i32,
    pub code_quality_score: i32,
    pub scan_date: DateTime<Utc>,
    pub band: ScoreBand,
}

impl From<crs_core::ScanPoint> for ScanListItem {
    fn from(point: crs_core::ScanPoint) -> Self {
        Self {
            id: point.scan_id,
            project_id: point.project_id,
            project_name: point.project_name,
            band: crs_core::stats::score_band(point.security_score),
            security_score: point.security_score,
            code_quality_score: point.code_quality_score,
            scan_date: point.scan_date,
        }
    }
}
