//! Pairwise interaction and single-drug toxicity matching.

use std::collections::{HashMap, HashSet};

use super::normalizer::NameNormalizer;
use crate::models::{DrugInteraction, InteractionRecord, Species, ToxicMedication};
use crate::reference::ReferenceData;

/// Order-independent key for a drug pair.
pub type PairKey = (String, String);

/// Build the key for two normalized names.
pub fn pair_key(a: &str, b: &str) -> PairKey {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

/// Index from drug pair to interaction records.
#[derive(Debug, Clone, Default)]
pub struct PairIndex {
    /// Record positions per pair, in dataset order
    pairs: HashMap<PairKey, Vec<usize>>,
}

impl PairIndex {
    pub fn new(data: &ReferenceData, normalizer: &NameNormalizer) -> Self {
        let mut pairs: HashMap<PairKey, Vec<usize>> = HashMap::new();
        for (position, record) in data.interactions().iter().enumerate() {
            let key = pair_key(
                &normalizer.normalize(&record.drug1),
                &normalizer.normalize(&record.drug2),
            );
            pairs.entry(key).or_default().push(position);
        }
        Self { pairs }
    }

    /// First record for the pair, in dataset order, that applies to `species`.
    pub fn find<'d>(
        &self,
        data: &'d ReferenceData,
        a: &str,
        b: &str,
        species: Species,
    ) -> Option<&'d InteractionRecord> {
        self.pairs
            .get(&pair_key(a, b))?
            .iter()
            .filter_map(|&position| data.interactions().get(position))
            .find(|record| record.applies_to(species))
    }

    /// Number of distinct pairs indexed.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Match every unordered pair of `keys` (i < j) against the index.
///
/// `keys` are normalized names in input order. A pair that normalizes to the
/// same drug twice is skipped, and each drug pair is reported at most once
/// even when a brand and its generic are both submitted.
pub fn match_pairs(
    index: &PairIndex,
    data: &ReferenceData,
    keys: &[String],
    species: Species,
) -> Vec<DrugInteraction> {
    let mut matches = Vec::new();
    let mut seen: HashSet<PairKey> = HashSet::new();
    for (i, a) in keys.iter().enumerate() {
        for b in &keys[i + 1..] {
            if a == b || !seen.insert(pair_key(a, b)) {
                continue;
            }
            if let Some(record) = index.find(data, a, b, species) {
                matches.push(DrugInteraction::from(record));
            }
        }
    }
    matches
}

/// Flag each submitted name that is toxic to `species`.
///
/// Checks the name as given and its normalized form against the species'
/// toxicity records. The first matching record is reported.
pub fn match_toxicity<S: AsRef<str>>(
    data: &ReferenceData,
    names: &[S],
    keys: &[String],
    species: Species,
) -> Vec<ToxicMedication> {
    let records = data.toxicity_for(species);
    names
        .iter()
        .zip(keys)
        .filter_map(|(name, key)| {
            let name = name.as_ref();
            records
                .iter()
                .find(|record| record.matches(name) || record.matches(key))
                .map(|record| ToxicMedication {
                    medication: name.to_string(),
                    toxic_data: record.clone(),
                })
        })
        .collect()
}
