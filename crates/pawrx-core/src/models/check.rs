//! Interaction check requests and results.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::interaction::{InteractionRecord, RiskLevel, Severity, ToxicityRecord};

/// A medication as submitted for checking.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MedicationEntry {
    pub name: String,
    pub dosage: Option<String>,
    pub frequency: Option<String>,
}

impl MedicationEntry {
    /// Entry with only a name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dosage: None,
            frequency: None,
        }
    }
}

/// Request to check a pet's medications.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InteractionCheckRequest {
    pub pet_id: String,
    pub medications: Vec<MedicationEntry>,
}

impl InteractionCheckRequest {
    /// Medication names in request order.
    pub fn medication_names(&self) -> Vec<String> {
        self.medications.iter().map(|m| m.name.clone()).collect()
    }
}

/// A matched drug-drug interaction as reported to the caller.
///
/// `drug1`/`drug2` follow the reference record, not the input order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DrugInteraction {
    pub drug1: String,
    pub drug2: String,
    pub severity: Severity,
    pub risk_level: RiskLevel,
    pub mechanism: String,
    pub clinical_effects: Vec<String>,
    pub management: String,
    pub alternatives: Vec<String>,
    pub monitoring_required: bool,
}

impl From<&InteractionRecord> for DrugInteraction {
    fn from(record: &InteractionRecord) -> Self {
        Self {
            drug1: record.drug1.clone(),
            drug2: record.drug2.clone(),
            severity: record.severity,
            risk_level: record.risk_level,
            mechanism: record.mechanism.clone(),
            clinical_effects: record.clinical_effects.clone(),
            management: record.management.clone(),
            alternatives: record.alternatives.clone(),
            monitoring_required: record.monitoring_required,
        }
    }
}

impl DrugInteraction {
    pub fn pair_label(&self) -> String {
        format!("{} + {}", self.drug1, self.drug2)
    }
}

/// A medication flagged as toxic for the pet's species.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ToxicMedication {
    /// The name as submitted
    pub medication: String,
    pub toxic_data: ToxicityRecord,
}

/// Category of a recommendation, most severe first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationType {
    Critical,
    High,
    Medium,
    Low,
    Monitoring,
    Info,
}

/// Action the owner is asked to take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendedAction {
    ImmediateVetContact,
    EmergencyVetContact,
    UrgentVetConsultation,
    IncreasedMonitoring,
    CloseMonitoring,
    ConsiderAlternatives,
    RegularCheckups,
    RoutineMonitoring,
}

impl RecommendedAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecommendedAction::ImmediateVetContact => "immediate_vet_contact",
            RecommendedAction::EmergencyVetContact => "emergency_vet_contact",
            RecommendedAction::UrgentVetConsultation => "urgent_vet_consultation",
            RecommendedAction::IncreasedMonitoring => "increased_monitoring",
            RecommendedAction::CloseMonitoring => "close_monitoring",
            RecommendedAction::ConsiderAlternatives => "consider_alternatives",
            RecommendedAction::RegularCheckups => "regular_checkups",
            RecommendedAction::RoutineMonitoring => "routine_monitoring",
        }
    }
}

/// A single recommendation line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    #[serde(rename = "type")]
    pub kind: RecommendationType,
    pub message: String,
    pub action: RecommendedAction,
}

/// Outcome of an interaction check.
///
/// Built once by the engine and never modified afterwards. Contains no
/// timestamps, so identical inputs serialize to identical bytes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InteractionCheckResult {
    pub medications_checked: Vec<String>,
    pub drug_interactions: Vec<DrugInteraction>,
    pub toxic_medications: Vec<ToxicMedication>,
    /// Names not recognised by any reference dataset. These are never flagged.
    pub unmatched_medications: Vec<String>,
    pub overall_risk_level: RiskLevel,
    pub recommendations: Vec<Recommendation>,
}

impl InteractionCheckResult {
    /// Whether the result should trigger an owner alert.
    pub fn requires_alert(&self) -> bool {
        self.overall_risk_level.is_alerting()
    }

    /// Medications and pairs named in an alert: toxic names, then every
    /// high or critical interaction pair.
    pub fn alert_subjects(&self) -> Vec<String> {
        self.toxic_medications
            .iter()
            .map(|t| t.medication.clone())
            .chain(
                self.drug_interactions
                    .iter()
                    .filter(|i| i.risk_level.is_alerting())
                    .map(DrugInteraction::pair_label),
            )
            .collect()
    }

    /// Whether nothing at all was matched.
    pub fn is_clear(&self) -> bool {
        self.drug_interactions.is_empty() && self.toxic_medications.is_empty()
    }

    /// Serialize to canonical JSON for fingerprinting.
    pub fn to_canonical_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Hex-encoded SHA-256 of a result's canonical JSON.
pub fn fingerprint(result: &InteractionCheckResult) -> Result<String, serde_json::Error> {
    let json = result.to_canonical_json()?;
    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}

/// A stored interaction check.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CheckRecord {
    pub id: String,
    pub pet_id: String,
    /// User who ran the check
    pub checked_by: String,
    pub result: InteractionCheckResult,
    /// SHA-256 of the result's canonical JSON
    pub fingerprint: String,
    pub checked_at: String,
}

impl CheckRecord {
    pub fn new(
        pet_id: String,
        checked_by: String,
        result: InteractionCheckResult,
        checked_at: String,
    ) -> Result<Self, serde_json::Error> {
        let fingerprint = fingerprint(&result)?;
        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            pet_id,
            checked_by,
            result,
            fingerprint,
            checked_at,
        })
    }

    /// Whether the stored result still matches its fingerprint.
    pub fn verify(&self) -> bool {
        fingerprint(&self.result).is_ok_and(|f| f == self.fingerprint)
    }
}
