//! Medication analysis requests, responses and the degraded-mode fallback.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Analysis errors.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Invalid response format: {0}")]
    InvalidFormat(String),

    #[error("Cannot reach analysis service at {0}")]
    Connection(String),

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("Analysis service returned {status}: {body}")]
    Service { status: u16, body: String },

    #[error("HTTP client error: {0}")]
    HttpClient(String),
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Risk level reported when no analysis could be obtained.
pub const UNKNOWN_RISK: &str = "unknown";

/// Allergies and chronic conditions sent with the pet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalHistory {
    #[serde(default)]
    pub allergies: Vec<String>,
    #[serde(default)]
    pub chronic_conditions: Vec<String>,
}

/// Pet details the analysis is run against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PetContext {
    pub species: String,
    pub breed: Option<String>,
    pub weight: f64,
    pub weight_unit: String,
    pub age: f64,
    pub age_unit: String,
    pub medical_history: Option<MedicalHistory>,
}

/// A medication in the regimen being analyzed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicationContext {
    pub name: String,
    pub brand_name: Option<String>,
    pub dosage: Option<String>,
    pub frequency: Option<String>,
    pub route: Option<String>,
}

impl MedicationContext {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            brand_name: None,
            dosage: None,
            frequency: None,
            route: None,
        }
    }
}

/// Body posted to the analysis service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub pet: PetContext,
    pub medications: Vec<MedicationContext>,
    pub query: String,
}

impl AnalysisRequest {
    pub fn new(pet: PetContext, medications: Vec<MedicationContext>, query: Option<&str>) -> Self {
        Self {
            pet,
            medications,
            query: query
                .map(str::trim)
                .filter(|q| !q.is_empty())
                .unwrap_or(crate::prompts::DEFAULT_QUERY)
                .to_string(),
        }
    }

    /// Rendered user prompt for the regimen.
    pub fn prompt(&self) -> String {
        crate::prompts::make_analysis_prompt(&self.pet, &self.medications, Some(&self.query))
    }
}

/// Free-text safety narrative returned by the analysis service.
///
/// The content is surfaced to the owner as-is and never drives the
/// rule-based risk level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiAnalysis {
    pub analysis: String,
    #[serde(default)]
    pub risk_level: String,
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(default)]
    pub alternatives: Vec<String>,
    #[serde(default)]
    pub warnings: Vec<String>,
    #[serde(default)]
    pub sources: Vec<String>,
}

impl AiAnalysis {
    /// Payload substituted when the analysis service fails.
    pub fn fallback() -> Self {
        Self {
            analysis: "AI service is currently unavailable. Please use the basic interaction checker."
                .into(),
            risk_level: UNKNOWN_RISK.into(),
            recommendations: vec![
                "Consult with your veterinarian for medication safety".into(),
                "Monitor your pet for any adverse reactions".into(),
                "Keep a record of all medications and dosages".into(),
            ],
            alternatives: Vec::new(),
            warnings: Vec::new(),
            sources: Vec::new(),
        }
    }

    /// Strip stray quoting and empty entries left by the model.
    fn cleaned(mut self) -> Self {
        fn clean(s: &str) -> String {
            s.trim().trim_matches('"').replace("\\\"", "\"")
        }
        fn clean_list(items: Vec<String>) -> Vec<String> {
            items
                .iter()
                .map(|s| clean(s))
                .filter(|s| !s.is_empty())
                .collect()
        }

        self.analysis = clean(&self.analysis);
        self.risk_level = clean(&self.risk_level);
        self.recommendations = clean_list(self.recommendations);
        self.alternatives = clean_list(self.alternatives);
        self.warnings = clean_list(self.warnings);
        self.sources = clean_list(self.sources);
        self
    }
}

/// Parse a service or model response into an analysis.
///
/// Tolerates markdown code fences and text around the JSON object.
pub fn parse_analysis(response: &str) -> AnalysisResult<AiAnalysis> {
    // Try to find JSON in the response (in case the model adds extra text)
    let json_start = response.find('{').ok_or_else(|| {
        AnalysisError::InvalidFormat("No JSON object found in response".into())
    })?;
    let json_end = response.rfind('}').ok_or_else(|| {
        AnalysisError::InvalidFormat("No closing brace found in response".into())
    })?;
    if json_end < json_start {
        return Err(AnalysisError::InvalidFormat(
            "Closing brace precedes opening brace".into(),
        ));
    }

    let analysis: AiAnalysis = serde_json::from_str(&response[json_start..=json_end])?;
    Ok(analysis.cleaned())
}

/// Remote analysis service.
pub trait AnalysisGateway {
    fn analyze(&self, request: &AnalysisRequest) -> AnalysisResult<AiAnalysis>;
}

/// Analysis result, flagged when the fallback was substituted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisOutcome {
    #[serde(flatten)]
    pub analysis: AiAnalysis,
    pub degraded: bool,
}

/// Run an analysis, substituting [`AiAnalysis::fallback`] on any failure.
///
/// There is no retry.
pub fn analyze_or_fallback(
    gateway: &dyn AnalysisGateway,
    request: &AnalysisRequest,
) -> AnalysisOutcome {
    match gateway.analyze(request) {
        Ok(analysis) => {
            tracing::info!(
                species = %request.pet.species,
                medications = request.medications.len(),
                risk = %analysis.risk_level,
                "AI analysis complete"
            );
            AnalysisOutcome {
                analysis,
                degraded: false,
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "AI analysis unavailable, using fallback");
            AnalysisOutcome {
                analysis: AiAnalysis::fallback(),
                degraded: true,
            }
        }
    }
}

/// Mock analyzer for testing without the remote service.
pub struct MockAnalyzer {
    response: String,
}

impl MockAnalyzer {
    /// Analyzer that answers every request with `response`.
    pub fn new(response: &str) -> Self {
        Self {
            response: response.to_string(),
        }
    }

    /// Analyzer that returns a short low-risk analysis.
    pub fn low_risk() -> Self {
        Self::new(
            r#"{"analysis":"No significant concerns identified.","riskLevel":"Low","recommendations":["Continue routine monitoring"]}"#,
        )
    }
}

impl AnalysisGateway for MockAnalyzer {
    fn analyze(&self, _request: &AnalysisRequest) -> AnalysisResult<AiAnalysis> {
        parse_analysis(&self.response)
    }
}
