//! Report and read-model responses

use chrono::{DateTime, Utc};
use crs_core::stats::{ProjectScore, TrendPoint};
use crs_core::SeverityClass;
use serde::Serialize;
use std::collections::HashMap;
use uuid::Uuid;

use super::scan::{ScanListItem, SuggestionResponse};

/// Report screen read model for one scan.
#[derive(Debug, Serialize)]
pub struct ReportResponse {
    pub scan_id: Uuid,
    pub project_name: String,
    pub scan_date: DateTime<Utc>,
    pub security_score: i32,
    pub code_quality_score: i32,
    pub overall_health: i32,
    pub severity_counts: HashMap<String, usize>,
    pub sections: Vec<ReportSection>,
}

/// One severity-bucketed section of the report.
#[derive(Debug, Serialize)]
pub struct ReportSection {
    pub class: SeverityClass,
    pub items: Vec<SuggestionResponse>,
}

/// Dashboard read model.
#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub total_projects: i64,
    pub open_issues: i64,
    pub avg_security: i32,
    pub total_scans: i64,
    pub recent_scans: Vec<ScanListItem>,
}

/// Analytics read model.
#[derive(Debug, Serialize)]
pub struct AnalyticsResponse {
    pub avg_quality: i32,
    pub avg_security: i32,
    pub open_issues: i64,
    pub total_scans: i64,
    pub trend: Vec<TrendPoint>,
    pub top_projects: Vec<ProjectScore>,
}
