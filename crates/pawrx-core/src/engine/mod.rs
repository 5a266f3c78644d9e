//! Interaction-checking engine.
//!
//! Pipeline: Normalization → Pair Matching → Toxicity Matching → Risk → Recommendations

mod matcher;
mod normalizer;
mod recommendations;

pub use matcher::*;
pub use normalizer::*;
pub use recommendations::*;

use std::sync::{Arc, PoisonError, RwLock};

use crate::models::{InteractionCheckResult, Species};
use crate::reference::{MedicationCatalog, ReferenceData, ReferenceResult};

/// Checks medication lists against immutable reference data.
///
/// Built once; every check is a pure function of its arguments.
#[derive(Debug, Clone)]
pub struct InteractionEngine {
    data: ReferenceData,
    catalog: MedicationCatalog,
    normalizer: NameNormalizer,
    pairs: PairIndex,
}

impl InteractionEngine {
    /// Build an engine over the given datasets.
    pub fn new(data: ReferenceData, catalog: MedicationCatalog) -> Self {
        let normalizer = NameNormalizer::new(&data, &catalog);
        let pairs = PairIndex::new(&data, &normalizer);
        tracing::debug!(
            pairs = pairs.len(),
            aliases = normalizer.alias_count(),
            "Built interaction index"
        );
        Self {
            data,
            catalog,
            normalizer,
            pairs,
        }
    }

    /// Engine over the datasets bundled with the crate.
    pub fn builtin() -> ReferenceResult<Self> {
        Ok(Self::new(
            ReferenceData::builtin()?,
            MedicationCatalog::builtin()?,
        ))
    }

    /// Check a medication list for a species.
    ///
    /// The polypharmacy rule counts the submitted names.
    pub fn check_interactions<S: AsRef<str>>(
        &self,
        species: Species,
        medications: &[S],
    ) -> InteractionCheckResult {
        self.check_interactions_for_pet(species, medications, medications.len())
    }

    /// Check a medication list for a pet with `active_medication_count`
    /// current medications on record.
    pub fn check_interactions_for_pet<S: AsRef<str>>(
        &self,
        species: Species,
        medications: &[S],
        active_medication_count: usize,
    ) -> InteractionCheckResult {
        let keys: Vec<String> = medications
            .iter()
            .map(|m| self.normalizer.normalize(m.as_ref()))
            .collect();

        let drug_interactions = match_pairs(&self.pairs, &self.data, &keys, species);
        let toxic_medications = match_toxicity(&self.data, medications, &keys, species);
        let overall_risk_level = aggregate_risk(&drug_interactions, &toxic_medications);
        let recommendations = build_recommendations(
            &drug_interactions,
            &toxic_medications,
            species,
            active_medication_count,
        );

        let unmatched_medications = medications
            .iter()
            .map(AsRef::as_ref)
            .filter(|name| !self.normalizer.is_known(name))
            .map(str::to_string)
            .collect();

        InteractionCheckResult {
            medications_checked: medications.iter().map(|m| m.as_ref().to_string()).collect(),
            drug_interactions,
            toxic_medications,
            unmatched_medications,
            overall_risk_level,
            recommendations,
        }
    }

    pub fn catalog(&self) -> &MedicationCatalog {
        &self.catalog
    }

    pub fn reference(&self) -> &ReferenceData {
        &self.data
    }

    pub fn normalizer(&self) -> &NameNormalizer {
        &self.normalizer
    }
}

/// Shared handle to the current engine.
///
/// Replacing the datasets swaps the whole engine; checks already running keep
/// the snapshot they started with.
#[derive(Debug)]
pub struct SharedEngine {
    current: RwLock<Arc<InteractionEngine>>,
}

impl SharedEngine {
    pub fn new(engine: InteractionEngine) -> Self {
        Self {
            current: RwLock::new(Arc::new(engine)),
        }
    }

    /// Snapshot of the engine in use.
    pub fn current(&self) -> Arc<InteractionEngine> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Install a new engine, returning the previous one.
    pub fn swap(&self, engine: InteractionEngine) -> Arc<InteractionEngine> {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *guard, Arc::new(engine))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RecommendationType, RecommendedAction, RiskLevel};

    fn engine() -> InteractionEngine {
        InteractionEngine::builtin().unwrap()
    }

    #[test]
    fn test_rimadyl_aspirin_dog() {
        let result = engine().check_interactions(Species::Dog, &["Rimadyl", "Aspirin"]);

        assert_eq!(result.drug_interactions.len(), 1);
        assert_eq!(result.drug_interactions[0].risk_level, RiskLevel::Critical);
        assert_eq!(result.overall_risk_level, RiskLevel::High);
        assert!(result
            .recommendations
            .iter()
            .any(|r| r.kind == RecommendationType::Critical));
        assert_eq!(result.medications_checked, vec!["Rimadyl", "Aspirin"]);
        assert!(result.unmatched_medications.is_empty());
    }

    #[test]
    fn test_acetaminophen_cat() {
        let result = engine().check_interactions(Species::Cat, &["Acetaminophen"]);

        assert_eq!(result.toxic_medications.len(), 1);
        assert_eq!(result.overall_risk_level, RiskLevel::Critical);
        assert_eq!(
            result.recommendations[0].action,
            RecommendedAction::ImmediateVetContact
        );
    }

    #[test]
    fn test_unknown_names_are_unmatched() {
        let result = engine().check_interactions(Species::Dog, &["Unobtainium", "Carprofen"]);
        assert!(result.is_clear());
        assert_eq!(result.unmatched_medications, vec!["Unobtainium"]);
        assert_eq!(result.overall_risk_level, RiskLevel::Low);
    }

    #[test]
    fn test_empty_input() {
        let empty: [&str; 0] = [];
        let result = engine().check_interactions(Species::Dog, &empty);
        assert_eq!(result.overall_risk_level, RiskLevel::Low);
        assert_eq!(result.recommendations.len(), 1);
        assert_eq!(result.recommendations[0].kind, RecommendationType::Low);
    }

    #[test]
    fn test_pet_active_count_drives_polypharmacy() {
        let engine = engine();
        let few = engine.check_interactions_for_pet(Species::Dog, &["Gabapentin"], 2);
        assert!(few
            .recommendations
            .iter()
            .all(|r| r.action != RecommendedAction::RegularCheckups));

        let many = engine.check_interactions_for_pet(Species::Dog, &["Gabapentin"], 6);
        assert!(many
            .recommendations
            .iter()
            .any(|r| r.action == RecommendedAction::RegularCheckups));
    }

    #[test]
    fn test_shared_engine_swap() {
        let shared = SharedEngine::new(engine());
        let before = shared.current();

        let empty = InteractionEngine::new(ReferenceData::default(), MedicationCatalog::default());
        let old = shared.swap(empty);

        assert!(Arc::ptr_eq(&before, &old));
        // The old snapshot still answers with the old data
        assert_eq!(
            before
                .check_interactions(Species::Dog, &["Carprofen", "Aspirin"])
                .drug_interactions
                .len(),
            1
        );
        assert!(shared
            .current()
            .check_interactions(Species::Dog, &["Carprofen", "Aspirin"])
            .is_clear());
    }
}
