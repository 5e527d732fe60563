//! Analyzer response normalization
//!
//! The remote analyzer does not commit to a response shape: scores and
//! suggestion fields arrive under one of several alternate names, or not at
//! all. All alias tolerance lives here, as one mapping layer producing
//! canonical records, so the rest of the pipeline only ever sees the
//! canonical shape.
//!
//! Precedence rules, in order:
//! - security score: `securityScore`, then `security_score`, then a
//!   placeholder drawn from [60,100)
//! - quality score: `codeQualityScore`, then `code_quality_score`, then a
//!   placeholder drawn from [70,100)
//! - raw suggestions payload (stored verbatim): `suggestions`, then `response`
//! - suggestion rows: `suggestions`, then `issues`; only arrays produce rows
//! - per entry: line `line_number` then `line`; severity defaults to "info";
//!   message `message`, then `description`, then `title`, then empty;
//!   file path `file_path` then `file`

use rand::Rng;
use serde_json::Value;

use crate::DEFAULT_SEVERITY;

/// Canonical result of one analyzer call, ready to persist as a scan row.
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    pub security_score: i32,
    pub code_quality_score: i32,
    /// False when the analyzer omitted the score and a placeholder was drawn.
    pub security_reported: bool,
    pub quality_reported: bool,
    /// Verbatim `vulnerabilities` payload, if any.
    pub vulnerabilities: Option<Value>,
    /// Verbatim suggestions payload (`suggestions` or `response`), if any.
    pub raw_suggestions: Option<Value>,
    /// Free-text analysis body (`response` or `analysis`), when a string.
    pub analysis_text: Option<String>,
}

/// One suggestion entry after alias resolution. Status is not part of the
/// normalized record: rows are always inserted as pending.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedSuggestion {
    pub line_number: Option<i32>,
    pub severity: String,
    pub message: String,
    pub file_path: Option<String>,
}

/// Map a raw analyzer response to the canonical scan outcome.
pub fn scan_outcome(response: &Value) -> ScanOutcome {
    let security = score_field(response, "securityScore", "security_score");
    let quality = score_field(response, "codeQualityScore", "code_quality_score");

    let mut rng = rand::thread_rng();
    let (security_score, security_reported) = match security {
        Some(score) => (score, true),
        None => (rng.gen_range(60..100), false),
    };
    let (code_quality_score, quality_reported) = match quality {
        Some(score) => (score, true),
        None => (rng.gen_range(70..100), false),
    };

    ScanOutcome {
        security_score,
        code_quality_score,
        security_reported,
        quality_reported,
        vulnerabilities: present(response, "vulnerabilities").cloned(),
        raw_suggestions: present(response, "suggestions")
            .or_else(|| present(response, "response"))
            .cloned(),
        analysis_text: present(response, "response")
            .or_else(|| present(response, "analysis"))
            .and_then(Value::as_str)
            .map(str::to_owned),
    }
}

/// Extract the suggestion rows from a raw analyzer response.
///
/// A present-but-non-array list (for example a markdown string under
/// `suggestions`) yields no rows; the raw payload still lands on the scan
/// record via [`scan_outcome`].
pub fn suggestion_rows(response: &Value) -> Vec<NormalizedSuggestion> {
    let list = present(response, "suggestions").or_else(|| present(response, "issues"));

    match list {
        Some(Value::Array(entries)) => entries.iter().map(suggestion_row).collect(),
        _ => Vec::new(),
    }
}

fn suggestion_row(entry: &Value) -> NormalizedSuggestion {
    NormalizedSuggestion {
        line_number: present(entry, "line_number")
            .or_else(|| present(entry, "line"))
            .and_then(as_int),
        severity: present(entry, "severity")
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_SEVERITY)
            .to_owned(),
        message: present(entry, "message")
            .or_else(|| present(entry, "description"))
            .or_else(|| present(entry, "title"))
            .map(text)
            .unwrap_or_default(),
        file_path: present(entry, "file_path")
            .or_else(|| present(entry, "file"))
            .and_then(Value::as_str)
            .map(str::to_owned),
    }
}

/// A field counts as present only when it exists and is not JSON null.
fn present<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    value.get(key).filter(|v| !v.is_null())
}

fn score_field(response: &Value, camel: &str, snake: &str) -> Option<i32> {
    present(response, camel)
        .or_else(|| present(response, snake))
        .and_then(as_int)
}

fn as_int(value: &Value) -> Option<i32> {
    value
        .as_i64()
        .or_else(|| value.as_f64().map(|f| f as i64))
        .map(|v| v as i32)
}

fn text(value: &Value) -> String {
    match value.as_str() {
        Some(s) => s.to_owned(),
        None => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_explicit_scores_pass_through_exactly() {
        let outcome = scan_outcome(&json!({"securityScore": 42, "codeQualityScore": 88}));
        assert_eq!(outcome.security_score, 42);
        assert_eq!(outcome.code_quality_score, 88);
        assert!(outcome.security_reported);
        assert!(outcome.quality_reported);
    }

    #[test]
    fn test_snake_case_score_aliases() {
        let outcome = scan_outcome(&json!({"security_score": 10, "code_quality_score": 20}));
        assert_eq!(outcome.security_score, 10);
        assert_eq!(outcome.code_quality_score, 20);
    }

    #[test]
    fn test_camel_case_wins_over_snake_case() {
        let outcome = scan_outcome(&json!({"securityScore": 1, "security_score": 99}));
        assert_eq!(outcome.security_score, 1);
    }

    #[test]
    fn test_missing_scores_fall_back_to_placeholder_ranges() {
        // Placeholders are random; assert the range, not a value.
        for _ in 0..50 {
            let outcome = scan_outcome(&json!({}));
            assert!((60..100).contains(&outcome.security_score));
            assert!((70..100).contains(&outcome.code_quality_score));
            assert!(!outcome.security_reported);
            assert!(!outcome.quality_reported);
        }
    }

    #[test]
    fn test_null_score_counts_as_absent() {
        let outcome = scan_outcome(&json!({"securityScore": null}));
        assert!(!outcome.security_reported);
        assert!((60..100).contains(&outcome.security_score));
    }

    #[test]
    fn test_raw_suggestions_prefers_suggestions_over_response() {
        let outcome = scan_outcome(&json!({
            "suggestions": [{"message": "x"}],
            "response": "## markdown"
        }));
        assert_eq!(outcome.raw_suggestions, Some(json!([{"message": "x"}])));

        let outcome = scan_outcome(&json!({"response": "## markdown"}));
        assert_eq!(outcome.raw_suggestions, Some(json!("## markdown")));
    }

    #[test]
    fn test_analysis_text_only_from_strings() {
        let outcome = scan_outcome(&json!({"response": "All clear."}));
        assert_eq!(outcome.analysis_text.as_deref(), Some("All clear."));

        let outcome = scan_outcome(&json!({"response": {"nested": true}, "analysis": "notes"}));
        assert_eq!(outcome.analysis_text.as_deref(), Some("notes"));
    }

    #[test]
    fn test_suggestion_rows_from_suggestions_field() {
        let rows = suggestion_rows(&json!({
            "suggestions": [{"line": 10, "severity": "warning", "message": "x"}]
        }));
        assert_eq!(
            rows,
            vec![NormalizedSuggestion {
                line_number: Some(10),
                severity: "warning".into(),
                message: "x".into(),
                file_path: None,
            }]
        );
    }

    #[test]
    fn test_suggestion_rows_from_issues_field() {
        let rows = suggestion_rows(&json!({
            "issues": [{"line_number": 3, "description": "y", "file": "src/app.js"}]
        }));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].line_number, Some(3));
        assert_eq!(rows[0].message, "y");
        assert_eq!(rows[0].file_path.as_deref(), Some("src/app.js"));
    }

    #[test]
    fn test_non_array_suggestions_yield_no_rows() {
        // A markdown string under `suggestions` shadows `issues` entirely.
        let rows = suggestion_rows(&json!({
            "suggestions": "use parameterized queries",
            "issues": [{"message": "ignored"}]
        }));
        assert!(rows.is_empty());
    }

    #[test]
    fn test_empty_response_yields_no_rows() {
        assert!(suggestion_rows(&json!({})).is_empty());
    }

    #[test]
    fn test_suggestion_defaults() {
        let rows = suggestion_rows(&json!({"suggestions": [{}]}));
        assert_eq!(
            rows,
            vec![NormalizedSuggestion {
                line_number: None,
                severity: "info".into(),
                message: String::new(),
                file_path: None,
            }]
        );
    }

    #[test]
    fn test_message_fallback_chain() {
        let rows = suggestion_rows(&json!({
            "suggestions": [
                {"title": "t only"},
                {"description": "d", "title": "t"},
                {"message": "m", "description": "d", "title": "t"}
            ]
        }));
        assert_eq!(rows[0].message, "t only");
        assert_eq!(rows[1].message, "d");
        assert_eq!(rows[2].message, "m");
    }

    #[test]
    fn test_fractional_line_numbers_truncate() {
        let rows = suggestion_rows(&json!({"suggestions": [{"line": 12.7}]}));
        assert_eq!(rows[0].line_number, Some(12));
    }
}
