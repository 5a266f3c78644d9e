//! Interaction and toxicity datasets.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde::Deserialize;

use super::{read_fixture, ReferenceError, ReferenceResult};
use crate::models::{InteractionRecord, Species, ToxicityRecord};

/// Dataset shipped with the crate.
const BUILTIN_REFERENCE: &str = include_str!("../../data/reference.json");

/// On-disk shape of the reference fixture.
#[derive(Debug, Deserialize)]
struct ReferenceFile {
    #[serde(default)]
    drug_interactions: Vec<InteractionRecord>,
    /// Species tag → toxic medications. BTreeMap keeps load order stable.
    #[serde(default)]
    toxic_medications: BTreeMap<String, Vec<ToxicityRecord>>,
}

/// Validated interaction and toxicity records.
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    interactions: Vec<InteractionRecord>,
    toxicity: HashMap<Species, Vec<ToxicityRecord>>,
}

impl ReferenceData {
    /// Load the dataset bundled with the crate.
    pub fn builtin() -> ReferenceResult<Self> {
        Self::from_json(BUILTIN_REFERENCE)
    }

    /// Load a dataset from a JSON file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> ReferenceResult<Self> {
        Self::from_json(&read_fixture(path.as_ref())?)
    }

    /// Parse and validate a dataset.
    pub fn from_json(json: &str) -> ReferenceResult<Self> {
        let file: ReferenceFile = serde_json::from_str(json)?;

        let mut toxicity = HashMap::new();
        for (tag, records) in file.toxic_medications {
            let species: Species = tag
                .parse()
                .map_err(|_| ReferenceError::UnknownSpecies(tag.clone()))?;
            toxicity.insert(species, records);
        }

        Self::new(file.drug_interactions, toxicity)
    }

    /// Build from records, rejecting any that violate dataset invariants.
    pub fn new(
        interactions: Vec<InteractionRecord>,
        toxicity: HashMap<Species, Vec<ToxicityRecord>>,
    ) -> ReferenceResult<Self> {
        for (index, record) in interactions.iter().enumerate() {
            let reason = if record.drug1.trim().is_empty() || record.drug2.trim().is_empty() {
                Some("drug names must not be blank")
            } else if record.drug1.trim().eq_ignore_ascii_case(record.drug2.trim()) {
                Some("a drug cannot interact with itself")
            } else if record.species.is_empty() {
                Some("species list must not be empty")
            } else {
                None
            };

            if let Some(reason) = reason {
                return Err(ReferenceError::InvalidInteraction {
                    index,
                    drug1: record.drug1.clone(),
                    drug2: record.drug2.clone(),
                    reason: reason.to_string(),
                });
            }
        }

        Ok(Self {
            interactions,
            toxicity,
        })
    }

    /// Interaction records in dataset order.
    pub fn interactions(&self) -> &[InteractionRecord] {
        &self.interactions
    }

    /// Toxic medications for a species (empty if none are listed).
    pub fn toxicity_for(&self, species: Species) -> &[ToxicityRecord] {
        self.toxicity
            .get(&species)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Every toxicity record across all species.
    pub fn all_toxicity(&self) -> impl Iterator<Item = &ToxicityRecord> {
        self.toxicity.values().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_loads() {
        let data = ReferenceData::builtin().unwrap();
        assert!(!data.interactions().is_empty());
        assert!(!data.toxicity_for(Species::Cat).is_empty());
        assert!(!data.toxicity_for(Species::GuineaPig).is_empty());
        assert!(data.toxicity_for(Species::Other).is_empty());
    }

    #[test]
    fn test_rejects_self_interaction() {
        let json = r#"{
            "drug_interactions": [{
                "drug1": "Carprofen", "drug2": "CARPROFEN",
                "species": ["dog"], "severity": "major", "riskLevel": "high",
                "mechanism": "-", "management": "-"
            }]
        }"#;

        let err = ReferenceData::from_json(json).unwrap_err();
        assert!(matches!(err, ReferenceError::InvalidInteraction { index: 0, .. }));
    }

    #[test]
    fn test_rejects_unknown_species_scope() {
        let json = r#"{
            "drug_interactions": [{
                "drug1": "A", "drug2": "B",
                "species": ["dragon"], "severity": "major", "riskLevel": "high",
                "mechanism": "-", "management": "-"
            }]
        }"#;

        assert!(matches!(
            ReferenceData::from_json(json),
            Err(ReferenceError::Json(_))
        ));
    }

    #[test]
    fn test_rejects_unknown_toxicity_species() {
        let json = r#"{ "toxic_medications": { "unicorn": [] } }"#;
        assert!(matches!(
            ReferenceData::from_json(json),
            Err(ReferenceError::UnknownSpecies(tag)) if tag == "unicorn"
        ));
    }

    #[test]
    fn test_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reference.json");
        std::fs::write(&path, r#"{ "drug_interactions": [], "toxic_medications": {} }"#).unwrap();

        let data = ReferenceData::from_path(&path).unwrap();
        assert!(data.interactions().is_empty());

        let missing = ReferenceData::from_path(dir.path().join("missing.json"));
        assert!(matches!(missing, Err(ReferenceError::Io { .. })));
    }
}
