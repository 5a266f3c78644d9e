//! Interaction checks, check history and AI analysis.

use pawrx_ai::{
    analyze_or_fallback, AnalysisGateway, AnalysisOutcome, AnalysisRequest, MedicalHistory,
    MedicationContext, PetContext,
};
use serde::{Deserialize, Serialize};

use super::{Caller, SafetyService, ServiceError, ServiceResult};
use crate::models::{
    CheckRecord, InteractionCheckRequest, InteractionCheckResult, MedicationEntry, Pet,
    PetMedication, Species,
};
use crate::notify::{dispatch, InteractionAlert, Notification};

/// Spelling suggestions offered per unrecognised medication.
const SUGGESTION_LIMIT: usize = 3;

/// Close catalog names for a medication the engine did not recognise.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NameSuggestion {
    pub medication: String,
    pub candidates: Vec<String>,
}

/// A check result together with the pet it was run for.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InteractionReport {
    pub pet_id: String,
    pub pet_name: String,
    pub species: Species,
    #[serde(flatten)]
    pub result: InteractionCheckResult,
    pub suggestions: Vec<NameSuggestion>,
    /// Whether an owner alert was delivered
    pub alert_sent: bool,
    /// Stored check ID, when checks are recorded
    pub check_id: Option<String>,
    pub checked_at: String,
}

fn validate_request(request: &InteractionCheckRequest) -> ServiceResult<()> {
    if request.pet_id.trim().is_empty() {
        return Err(ServiceError::InvalidInput("Pet ID is required".into()));
    }
    if request.medications.is_empty() {
        return Err(ServiceError::InvalidInput(
            "At least one medication is required".into(),
        ));
    }
    if let Some(index) = request
        .medications
        .iter()
        .position(|m| m.name.trim().is_empty())
    {
        return Err(ServiceError::InvalidInput(format!(
            "Medication {} has no name",
            index + 1
        )));
    }
    Ok(())
}

impl From<&Pet> for PetContext {
    fn from(pet: &Pet) -> Self {
        PetContext {
            species: pet.species.as_str().to_string(),
            breed: pet.breed.clone(),
            weight: pet.weight,
            weight_unit: pet.weight_unit.as_str().to_string(),
            age: pet.age,
            age_unit: pet.age_unit.as_str().to_string(),
            medical_history: Some(MedicalHistory {
                allergies: pet.allergies.clone(),
                chronic_conditions: pet.chronic_conditions.clone(),
            }),
        }
    }
}

impl From<&PetMedication> for MedicationContext {
    fn from(med: &PetMedication) -> Self {
        MedicationContext {
            name: med.name.clone(),
            brand_name: med.brand_name.clone(),
            dosage: med.dosage.clone(),
            frequency: med.frequency.clone(),
            route: Some(med.route.as_str().to_string()),
        }
    }
}

impl From<&MedicationEntry> for MedicationContext {
    fn from(entry: &MedicationEntry) -> Self {
        MedicationContext {
            name: entry.name.trim().to_string(),
            brand_name: None,
            dosage: entry.dosage.clone(),
            frequency: entry.frequency.clone(),
            route: None,
        }
    }
}

impl SafetyService<'_> {
    /// Check the submitted medications for a pet.
    ///
    /// The request is validated before the pet is loaded. Polypharmacy is
    /// judged on the pet's active medications on record.
    pub fn check_interactions(
        &self,
        caller: &Caller,
        request: &InteractionCheckRequest,
    ) -> ServiceResult<InteractionReport> {
        validate_request(request)?;
        let pet = self.authorized_pet(caller, &request.pet_id)?;
        let active_count = self.db.count_active_medications(&pet.id)?;

        let names: Vec<String> = request
            .medications
            .iter()
            .map(|m| m.name.trim().to_string())
            .collect();
        self.run_check(caller, &pet, &names, active_count)
    }

    /// Check a pet's active medications plus any proposed additions.
    pub fn check_pet_medications(
        &self,
        caller: &Caller,
        pet_id: &str,
        proposed: &[String],
    ) -> ServiceResult<InteractionReport> {
        if proposed.iter().any(|name| name.trim().is_empty()) {
            return Err(ServiceError::InvalidInput(
                "Proposed medication has no name".into(),
            ));
        }
        let pet = self.authorized_pet(caller, pet_id)?;
        let active = self.db.list_active_medications(&pet.id)?;

        let names: Vec<String> = active
            .iter()
            .map(|m| m.name.clone())
            .chain(proposed.iter().map(|name| name.trim().to_string()))
            .collect();
        if names.is_empty() {
            return Err(ServiceError::InvalidInput(
                "No medications to check".into(),
            ));
        }
        self.run_check(caller, &pet, &names, active.len())
    }

    fn run_check(
        &self,
        caller: &Caller,
        pet: &Pet,
        names: &[String],
        active_count: usize,
    ) -> ServiceResult<InteractionReport> {
        let result = self
            .engine
            .check_interactions_for_pet(pet.species, names, active_count);
        let checked_at = chrono::Utc::now().to_rfc3339();

        tracing::info!(
            pet_id = %pet.id,
            user_id = %caller.user_id,
            species = %pet.species,
            medications = names.len(),
            interactions = result.drug_interactions.len(),
            toxic = result.toxic_medications.len(),
            risk = %result.overall_risk_level,
            "Interaction check complete"
        );

        let suggestions = result
            .unmatched_medications
            .iter()
            .filter_map(|name| {
                let candidates = self.engine.catalog().suggest(name, SUGGESTION_LIMIT);
                (!candidates.is_empty()).then(|| NameSuggestion {
                    medication: name.clone(),
                    candidates,
                })
            })
            .collect();

        let alert_sent = result.requires_alert()
            && dispatch(
                self.notifier,
                &Notification::Interaction(InteractionAlert {
                    owner_id: pet.owner_id.clone(),
                    pet_id: pet.id.clone(),
                    pet_name: pet.name.clone(),
                    risk_level: result.overall_risk_level,
                    subjects: result.alert_subjects(),
                    checked_at: checked_at.clone(),
                }),
            );

        let check_id = if self.record_checks {
            self.record_check(caller, pet, &result, &checked_at)
        } else {
            None
        };

        Ok(InteractionReport {
            pet_id: pet.id.clone(),
            pet_name: pet.name.clone(),
            species: pet.species,
            result,
            suggestions,
            alert_sent,
            check_id,
            checked_at,
        })
    }

    /// Store a completed check. A failure here is logged and leaves the
    /// report without a check ID.
    fn record_check(
        &self,
        caller: &Caller,
        pet: &Pet,
        result: &InteractionCheckResult,
        checked_at: &str,
    ) -> Option<String> {
        let stored = CheckRecord::new(
            pet.id.clone(),
            caller.user_id.clone(),
            result.clone(),
            checked_at.to_string(),
        )
        .map_err(ServiceError::from)
        .and_then(|record| {
            self.db.insert_check(&record)?;
            Ok(record.id)
        });

        match stored {
            Ok(id) => Some(id),
            Err(e) => {
                tracing::warn!(pet_id = %pet.id, error = %e, "Failed to record interaction check");
                None
            }
        }
    }

    /// Recorded checks for a pet, newest first.
    pub fn check_history(
        &self,
        caller: &Caller,
        pet_id: &str,
        limit: usize,
    ) -> ServiceResult<Vec<CheckRecord>> {
        let pet = self.authorized_pet(caller, pet_id)?;
        Ok(self.db.list_checks(&pet.id, limit)?)
    }

    /// Build the AI analysis request for a pet's regimen.
    ///
    /// Uses `medications` when given, otherwise the pet's active medications.
    /// Only this step touches the store, so callers holding a lock can release
    /// it before the remote call.
    pub fn prepare_analysis(
        &self,
        caller: &Caller,
        pet_id: &str,
        medications: &[MedicationEntry],
        query: Option<&str>,
    ) -> ServiceResult<AnalysisRequest> {
        let pet = self.authorized_pet(caller, pet_id)?;

        let regimen: Vec<MedicationContext> = if medications.is_empty() {
            self.db
                .list_active_medications(&pet.id)?
                .iter()
                .map(MedicationContext::from)
                .collect()
        } else {
            medications
                .iter()
                .filter(|m| !m.name.trim().is_empty())
                .map(MedicationContext::from)
                .collect()
        };
        if regimen.is_empty() {
            return Err(ServiceError::InvalidInput(
                "No medications to analyze".into(),
            ));
        }

        Ok(AnalysisRequest::new(PetContext::from(&pet), regimen, query))
    }

    /// Ask the AI service about a regimen.
    ///
    /// Service failures yield the fallback analysis flagged as degraded.
    pub fn analyze_medications(
        &self,
        caller: &Caller,
        pet_id: &str,
        medications: &[MedicationEntry],
        analyzer: &dyn AnalysisGateway,
        query: Option<&str>,
    ) -> ServiceResult<AnalysisOutcome> {
        let request = self.prepare_analysis(caller, pet_id, medications, query)?;
        Ok(analyze_or_fallback(analyzer, &request))
    }
}
