//! Remote analyzer client
//!
//! One call: POST the submitted source text to the hosted analysis endpoint
//! and hand back the JSON body untouched. Normalization of the response
//! shape is crs-core's job, not this crate's.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Scan request failed: {status} {body}")]
    RequestFailed { status: u16, body: String },
}

pub type AnalyzerResult<T> = Result<T, AnalyzerError>;

/// Configuration for the analyzer client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Scan endpoint URL.
    pub endpoint: String,

    /// Optional bearer token. The endpoint is public by default; when a
    /// token is configured it is attached to every request.
    pub bearer_token: Option<String>,

    /// Request timeout in seconds. None leaves the request unbounded.
    pub timeout_secs: Option<u64>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8787/scan".to_string(),
            bearer_token: None,
            timeout_secs: None,
        }
    }
}

#[derive(Serialize)]
struct ScanRequest<'a> {
    #[serde(rename = "codeSnippet")]
    code_snippet: &'a str,
}

/// Main analyzer interface.
#[derive(Debug, Clone)]
pub struct AnalyzerClient {
    config: AnalyzerConfig,
    client: reqwest::Client,
}

impl AnalyzerClient {
    pub fn new(config: AnalyzerConfig) -> AnalyzerResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(std::time::Duration::from_secs(secs));
        }
        let client = builder.build()?;

        Ok(Self { config, client })
    }

    /// Submit source text for analysis and return the raw JSON response.
    ///
    /// A non-success status fails with the status code and body text; no
    /// retry is attempted.
    pub async fn analyze(&self, code: &str) -> AnalyzerResult<Value> {
        tracing::info!("Submitting {} bytes to analyzer", code.len());

        let mut request = self
            .client
            .post(&self.config.endpoint)
            .json(&ScanRequest { code_snippet: code });
        if let Some(token) = &self.config.bearer_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AnalyzerError::RequestFailed {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json().await?)
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_has_no_token_or_timeout() {
        let config = AnalyzerConfig::default();
        assert!(config.bearer_token.is_none());
        assert!(config.timeout_secs.is_none());
    }

    #[test]
    fn test_request_payload_field_name() {
        let payload = serde_json::to_value(ScanRequest { code_snippet: "let x = 1;" }).unwrap();
        assert_eq!(payload, serde_json::json!({"codeSnippet": "let x = 1;"}));
    }

    #[test]
    fn test_request_failed_message_carries_status_and_body() {
        let err = AnalyzerError::RequestFailed {
            status: 503,
            body: "overloaded".into(),
        };
        assert_eq!(err.to_string(), "Scan request failed: 503 overloaded");
    }
}
