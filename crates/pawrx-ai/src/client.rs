//! Blocking HTTP client for the remote analysis service.

use std::time::Duration;

use serde::Serialize;

use crate::analysis::{
    parse_analysis, AiAnalysis, AnalysisError, AnalysisGateway, AnalysisRequest, AnalysisResult,
};
use crate::prompts::SYSTEM_PROMPT;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;

/// Endpoint path for regimen analysis.
const ANALYZE_PATH: &str = "/analyze-medications";

/// Request body: the structured request plus the rendered prompts, so the
/// service can forward them to its model unchanged.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeBody<'a> {
    #[serde(flatten)]
    request: &'a AnalysisRequest,
    system_prompt: &'static str,
    prompt: String,
}

impl<'a> AnalyzeBody<'a> {
    fn new(request: &'a AnalysisRequest) -> Self {
        Self {
            request,
            system_prompt: SYSTEM_PROMPT,
            prompt: request.prompt(),
        }
    }
}

/// Client for the analysis service.
pub struct HttpAnalysisClient {
    base_url: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl HttpAnalysisClient {
    /// Create a client for the service at `base_url`.
    pub fn new(base_url: &str, timeout_secs: u64) -> AnalysisResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| AnalysisError::HttpClient(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            timeout_secs,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }
}

impl AnalysisGateway for HttpAnalysisClient {
    fn analyze(&self, request: &AnalysisRequest) -> AnalysisResult<AiAnalysis> {
        let url = format!("{}{}", self.base_url, ANALYZE_PATH);
        tracing::debug!(
            url = %url,
            medications = request.medications.len(),
            "Requesting AI analysis"
        );

        let response = self
            .client
            .post(&url)
            .json(&AnalyzeBody::new(request))
            .send()
            .map_err(|e| {
                if e.is_connect() {
                    AnalysisError::Connection(self.base_url.clone())
                } else if e.is_timeout() {
                    AnalysisError::Timeout(self.timeout_secs)
                } else {
                    AnalysisError::HttpClient(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(AnalysisError::Service {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().map_err(|e| {
            if e.is_timeout() {
                AnalysisError::Timeout(self.timeout_secs)
            } else {
                AnalysisError::HttpClient(e.to_string())
            }
        })?;

        parse_analysis(&body)
    }
}
