//! Medication catalog lookups.

use super::{SafetyService, ServiceError, ServiceResult};
use crate::models::{MedicationReference, Species};

impl SafetyService<'_> {
    /// Autocomplete over the catalog. Queries under two characters return nothing.
    pub fn search_medications(
        &self,
        query: &str,
        species: Option<Species>,
    ) -> Vec<MedicationReference> {
        self.engine.catalog().search(query, species)
    }

    /// Typical dose strengths for a medication or brand name.
    pub fn common_doses(&self, name: &str) -> Vec<String> {
        self.engine.catalog().common_doses(name)
    }

    /// Medications that could replace `medication`, optionally for a condition.
    pub fn medication_alternatives(
        &self,
        medication: &str,
        species: Option<Species>,
        condition: Option<&str>,
    ) -> ServiceResult<Vec<MedicationReference>> {
        if medication.trim().is_empty() {
            return Err(ServiceError::InvalidInput("Medication name is required".into()));
        }
        Ok(self
            .engine
            .catalog()
            .alternatives(medication, species, condition))
    }
}
