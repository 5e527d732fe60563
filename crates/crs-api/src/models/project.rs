//! Project models

use chrono::{DateTime, Utc};
use crs_core::ScoreBand;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct CreateProjectRequest {
    pub project_name: String,
    pub github_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProjectResponse {
    pub id: Uuid,
    pub project_name: String,
    pub github_url: Option<String>,
    pub last_scan: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub latest_scan: Option<LatestScan>,
}

/// Most recent scan summary shown on a project card.
#[derive(Debug, Serialize)]
pub struct LatestScan {
    pub scan_id: Uuid,
    pub security_score: i32,
    pub code_quality_score: i32,
    pub scan_date: DateTime<Utc>,
    pub band: ScoreBand,
}

impl From<crate::db::schema::ProjectWithLatestScan> for ProjectResponse {
    fn from(row: crate::db::schema::ProjectWithLatestScan) -> Self {
        let latest_scan = match (row.scan_id, row.security_score, row.code_quality_score, row.scan_date) {
            (Some(scan_id), Some(security), Some(quality), Some(date)) => Some(LatestScan {
                scan_id,
                security_score: security,
                code_quality_score: quality,
                scan_date: date,
                band: crs_core::stats::score_band(security),
            }),
            _ => None,
        };

        Self {
            id: row.id,
            project_name: row.project_name,
            github_url: row.github_url,
            last_scan: row.last_scan,
            created_at: row.created_at,
            latest_scan,
        }
    }
}
