//! Aggregation reductions for the read models
//!
//! Dashboard, analytics and report screens all render simple synchronous
//! reductions over already-fetched rows: averages, a date-ordered trend
//! series, a latest-scan-per-project leaderboard, severity buckets and
//! score banding. They operate on [`ScanPoint`] records, scan rows joined
//! with their owning project.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use uuid::Uuid;

/// One scan row joined with its owning project.
#[derive(Debug, Clone)]
pub struct ScanPoint {
    pub scan_id: Uuid,
    pub project_id: Uuid,
    pub owner_id: Uuid,
    pub project_name: String,
    pub security_score: i32,
    pub code_quality_score: i32,
    pub scan_date: DateTime<Utc>,
}

/// Traffic-light banding applied to scores across the screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreBand {
    Success,
    Warning,
    Danger,
}

/// Report-screen grouping of free-form severity labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityClass {
    Security,
    Warning,
    Info,
}

/// One point of the analytics trend chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub scan_date: DateTime<Utc>,
    pub security: i32,
    pub quality: i32,
}

/// One leaderboard entry: a project and its latest security score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectScore {
    pub project_id: Uuid,
    pub project_name: String,
    pub score: i32,
}

/// Drop every scan not owned by `owner`. Ownership of a scan is transitive
/// through its project; rows reach this function already joined.
pub fn retain_owned(owner: Uuid, mut scans: Vec<ScanPoint>) -> Vec<ScanPoint> {
    scans.retain(|s| s.owner_id == owner);
    scans
}

pub fn average_security(scans: &[ScanPoint]) -> i32 {
    average(scans.iter().map(|s| s.security_score))
}

pub fn average_quality(scans: &[ScanPoint]) -> i32 {
    average(scans.iter().map(|s| s.code_quality_score))
}

/// Overall health shown on the report screen.
pub fn overall_health(security_score: i32, code_quality_score: i32) -> i32 {
    ((security_score + code_quality_score) as f64 / 2.0).round() as i32
}

/// Trend series for the analytics chart, ordered by scan date ascending.
pub fn trend(scans: &[ScanPoint]) -> Vec<TrendPoint> {
    let mut points: Vec<TrendPoint> = scans
        .iter()
        .map(|s| TrendPoint {
            scan_date: s.scan_date,
            security: s.security_score,
            quality: s.code_quality_score,
        })
        .collect();
    points.sort_by_key(|p| p.scan_date);
    points
}

/// Rank projects by the security score of their most recent scan,
/// descending. Projects with no scans rank with a score of zero.
pub fn leaderboard(projects: &[(Uuid, String)], scans: &[ScanPoint]) -> Vec<ProjectScore> {
    let mut ranked: Vec<ProjectScore> = projects
        .iter()
        .map(|(id, name)| {
            let latest = scans
                .iter()
                .filter(|s| s.project_id == *id)
                .max_by_key(|s| s.scan_date);
            ProjectScore {
                project_id: *id,
                project_name: name.clone(),
                score: latest.map(|s| s.security_score).unwrap_or(0),
            }
        })
        .collect();
    ranked.sort_by(|a, b| b.score.cmp(&a.score));
    ranked
}

/// Band a 0-100 score: >= 80 passes, >= 60 warns, anything lower is danger.
pub fn score_band(score: i32) -> ScoreBand {
    if score >= 80 {
        ScoreBand::Success
    } else if score >= 60 {
        ScoreBand::Warning
    } else {
        ScoreBand::Danger
    }
}

/// Bucket a free-form severity label. The store enforces no enumeration, so
/// unknown labels land in the info bucket.
pub fn classify_severity(severity: &str) -> SeverityClass {
    match severity {
        "danger" | "error" | "critical" => SeverityClass::Security,
        "warning" => SeverityClass::Warning,
        _ => SeverityClass::Info,
    }
}

/// Count suggestions per raw severity label.
pub fn severity_counts<'a, I>(severities: I) -> HashMap<String, usize>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts = HashMap::new();
    for severity in severities {
        *counts.entry(severity.to_owned()).or_insert(0) += 1;
    }
    counts
}

fn average(scores: impl Iterator<Item = i32>) -> i32 {
    let (sum, count) = scores.fold((0i64, 0i64), |(sum, count), s| (sum + s as i64, count + 1));
    if count == 0 {
        0
    } else {
        (sum as f64 / count as f64).round() as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn point(owner: Uuid, project: Uuid, security: i32, quality: i32, day: u32) -> ScanPoint {
        ScanPoint {
            scan_id: Uuid::new_v4(),
            project_id: project,
            owner_id: owner,
            project_name: "demo".into(),
            security_score: security,
            code_quality_score: quality,
            scan_date: Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_retain_owned_drops_foreign_scans() {
        let me = Uuid::new_v4();
        let someone_else = Uuid::new_v4();
        let project = Uuid::new_v4();
        let scans = vec![
            point(me, project, 80, 80, 1),
            point(someone_else, project, 10, 10, 2),
            point(me, project, 90, 90, 3),
        ];

        let mine = retain_owned(me, scans);
        assert_eq!(mine.len(), 2);
        assert!(mine.iter().all(|s| s.owner_id == me));
    }

    #[test]
    fn test_averages_round_and_default_to_zero() {
        assert_eq!(average_security(&[]), 0);

        let owner = Uuid::new_v4();
        let project = Uuid::new_v4();
        let scans = vec![point(owner, project, 80, 70, 1), point(owner, project, 85, 72, 2)];
        // (80 + 85) / 2 = 82.5 rounds up
        assert_eq!(average_security(&scans), 83);
        assert_eq!(average_quality(&scans), 71);
    }

    #[test]
    fn test_overall_health_rounds() {
        assert_eq!(overall_health(80, 70), 75);
        assert_eq!(overall_health(81, 70), 76);
    }

    #[test]
    fn test_trend_is_date_ascending() {
        let owner = Uuid::new_v4();
        let project = Uuid::new_v4();
        let scans = vec![
            point(owner, project, 50, 50, 20),
            point(owner, project, 60, 60, 5),
            point(owner, project, 70, 70, 12),
        ];

        let series = trend(&scans);
        assert_eq!(series.len(), 3);
        assert!(series.windows(2).all(|w| w[0].scan_date <= w[1].scan_date));
        assert_eq!(series[0].security, 60);
        assert_eq!(series[2].security, 50);
    }

    #[test]
    fn test_leaderboard_uses_latest_scan_and_sorts_descending() {
        let owner = Uuid::new_v4();
        let alpha = Uuid::new_v4();
        let beta = Uuid::new_v4();
        let unscanned = Uuid::new_v4();
        let projects = vec![
            (alpha, "alpha".to_string()),
            (beta, "beta".to_string()),
            (unscanned, "gamma".to_string()),
        ];
        let scans = vec![
            point(owner, alpha, 95, 90, 1),
            point(owner, alpha, 40, 40, 9), // latest for alpha
            point(owner, beta, 70, 70, 2),
        ];

        let ranked = leaderboard(&projects, &scans);
        assert_eq!(ranked[0].project_name, "beta");
        assert_eq!(ranked[0].score, 70);
        assert_eq!(ranked[1].project_name, "alpha");
        assert_eq!(ranked[1].score, 40);
        assert_eq!(ranked[2].score, 0);
    }

    #[test]
    fn test_score_bands() {
        assert_eq!(score_band(80), ScoreBand::Success);
        assert_eq!(score_band(79), ScoreBand::Warning);
        assert_eq!(score_band(60), ScoreBand::Warning);
        assert_eq!(score_band(59), ScoreBand::Danger);
    }

    #[test]
    fn test_severity_classification() {
        assert_eq!(classify_severity("critical"), SeverityClass::Security);
        assert_eq!(classify_severity("danger"), SeverityClass::Security);
        assert_eq!(classify_severity("error"), SeverityClass::Security);
        assert_eq!(classify_severity("warning"), SeverityClass::Warning);
        assert_eq!(classify_severity("info"), SeverityClass::Info);
        assert_eq!(classify_severity("style-nit"), SeverityClass::Info);
    }

    #[test]
    fn test_severity_counts() {
        let counts = severity_counts(["warning", "info", "warning"]);
        assert_eq!(counts.get("warning"), Some(&2));
        assert_eq!(counts.get("info"), Some(&1));
    }
}
