//! Reference records for drug-drug interactions and species toxicity.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::species::{Species, SpeciesScope};

/// Clinical severity of an interaction, as authored in the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Mild,
    Moderate,
    Major,
    Contraindicated,
}

/// Risk level used for aggregation.
///
/// Ordered from least to most severe so `max()` gives the worst level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::Critical => "critical",
        }
    }

    /// High and critical results are the ones that warrant an alert.
    pub fn is_alerting(&self) -> bool {
        matches!(self, RiskLevel::High | RiskLevel::Critical)
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A known interaction between two drugs.
///
/// The pair is unordered: (drug1, drug2) and (drug2, drug1) describe the same
/// interaction. Severity and risk level are authored independently.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InteractionRecord {
    pub drug1: String,
    pub drug2: String,
    /// Species this record applies to; `all` covers every species
    pub species: Vec<SpeciesScope>,
    pub severity: Severity,
    pub risk_level: RiskLevel,
    pub mechanism: String,
    #[serde(default)]
    pub clinical_effects: Vec<String>,
    pub management: String,
    #[serde(default)]
    pub alternatives: Vec<String>,
    #[serde(default)]
    pub monitoring_required: bool,
}

impl InteractionRecord {
    /// Whether this record applies to the given species.
    pub fn applies_to(&self, species: Species) -> bool {
        self.species.iter().any(|scope| scope.covers(species))
    }

    /// Label used in alerts and recommendation text.
    pub fn pair_label(&self) -> String {
        format!("{} + {}", self.drug1, self.drug2)
    }
}

/// A medication that is toxic to a particular species.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ToxicityRecord {
    pub name: String,
    #[serde(default, alias = "brand_names")]
    pub brand_names: Vec<String>,
    /// Free-text descriptor, e.g. "highly" or "extremely"
    #[serde(alias = "toxicity_level")]
    pub toxicity_level: String,
    pub reason: String,
}

impl ToxicityRecord {
    /// Case-insensitive match on the name or any brand alias.
    pub fn matches(&self, medication: &str) -> bool {
        let lower = medication.trim().to_lowercase();
        self.name.to_lowercase() == lower
            || self.brand_names.iter().any(|b| b.to_lowercase() == lower)
    }
}
