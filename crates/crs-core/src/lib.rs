//! Code Review Scan core logic
//!
//! This crate holds the pieces of the scan pipeline that are pure data
//! transformations:
//! - Normalization of the remote analyzer's loosely-shaped JSON response
//!   into canonical scan/suggestion records
//! - The aggregation reductions behind the dashboard, analytics and report
//!   read models

pub mod normalize;
pub mod stats;

pub use normalize::{suggestion_rows, scan_outcome, NormalizedSuggestion, ScanOutcome};
pub use stats::{ScanPoint, ScoreBand, SeverityClass};

/// Status a suggestion row is created with. The user moves it to
/// "fixed" or "ignored" afterwards; the analyzer payload never does.
pub const SUGGESTION_STATUS_PENDING: &str = "pending";
pub const SUGGESTION_STATUS_FIXED: &str = "fixed";
pub const SUGGESTION_STATUS_IGNORED: &str = "ignored";

/// Severity label used when the analyzer omits one.
pub const DEFAULT_SEVERITY: &str = "info";
