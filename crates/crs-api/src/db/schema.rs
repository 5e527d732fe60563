//! Database schema types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, FromRow, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub user_id: Uuid,
    pub project_name: String,
    pub github_url: Option<String>,
    pub last_scan: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, FromRow, Serialize, Deserialize)]
pub struct Scan {
    pub id: Uuid,
    pub project_id: Option<Uuid>,
    pub security_score: i32,
    pub code_quality_score: i32,
    pub vulnerabilities: Option<serde_json::Value>,
    pub suggestions: Option<serde_json::Value>,
    pub scan_date: DateTime<Utc>,
}

#[derive(Debug, FromRow, Serialize, Deserialize)]
pub struct Suggestion {
    pub id: Uuid,
    pub scan_id: Uuid,
    pub line_number: Option<i32>,
    pub severity: Option<String>,
    pub message: Option<String>,
    pub file_path: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// A scan row joined with its owning project; feeds the aggregation views.
#[derive(Debug, FromRow)]
pub struct ScanWithProject {
    pub id: Uuid,
    pub project_id: Uuid,
    pub owner_id: Uuid,
    pub project_name: String,
    pub security_score: i32,
    pub code_quality_score: i32,
    pub scan_date: DateTime<Utc>,
}

impl From<ScanWithProject> for crs_core::ScanPoint {
    fn from(row: ScanWithProject) -> Self {
        crs_core::ScanPoint {
            scan_id: row.id,
            project_id: row.project_id,
            owner_id: row.owner_id,
            project_name: row.project_name,
            security_score: row.security_score,
            code_quality_score: row.code_quality_score,
            scan_date: row.scan_date,
        }
    }
}

/// A project row joined with its most recent scan, if any.
#[derive(Debug, FromRow)]
pub struct ProjectWithLatestScan {
    pub id: Uuid,
    pub project_name: String,
    pub github_url: Option<String>,
    pub last_scan: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub scan_id: Option<Uuid>,
    pub security_score: Option<i32>,
    pub code_quality_score: Option<i32>,
    pub scan_date: Option<DateTime<Utc>>,
}
