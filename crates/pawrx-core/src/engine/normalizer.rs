//! Medication name normalizer.
//!
//! Maps submitted names onto the lowercase canonical names used as match keys:
//! - Case folding and whitespace trimming
//! - Brand expansion (rimadyl→carprofen, tylenol→acetaminophen)
//!
//! Matching is exact after folding. Nothing here is fuzzy.

use std::collections::{HashMap, HashSet};

use crate::reference::{MedicationCatalog, ReferenceData};

/// Lowercase, trimmed form of a name.
pub fn fold(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Normalizer for medication names.
#[derive(Debug, Clone, Default)]
pub struct NameNormalizer {
    /// Canonical names; never rewritten to something else
    canonical: HashSet<String>,
    /// Alias map: brand name → canonical name
    aliases: HashMap<String, String>,
}

impl NameNormalizer {
    /// Build the alias table from the catalog and toxicity records.
    ///
    /// Catalog brands are registered before toxicity brands, and the first
    /// registration of a brand wins.
    pub fn new(data: &ReferenceData, catalog: &MedicationCatalog) -> Self {
        let mut canonical = HashSet::new();
        for record in data.interactions() {
            canonical.insert(fold(&record.drug1));
            canonical.insert(fold(&record.drug2));
        }
        for record in data.all_toxicity() {
            canonical.insert(fold(&record.name));
        }
        for name in catalog.canonical_names() {
            canonical.insert(fold(name));
        }

        let mut normalizer = Self {
            canonical,
            aliases: HashMap::new(),
        };

        for (brand, name) in catalog.aliases() {
            normalizer.add_alias(&brand, &name);
        }
        let mut toxicity: Vec<_> = data.all_toxicity().collect();
        toxicity.sort_by(|a, b| a.name.cmp(&b.name));
        for record in toxicity {
            for brand in &record.brand_names {
                normalizer.add_alias(brand, &record.name);
            }
        }

        normalizer
    }

    /// Register `brand` as another name for `canonical`.
    ///
    /// Ignored if the brand is itself a canonical name or is already mapped.
    pub fn add_alias(&mut self, brand: &str, canonical: &str) {
        let brand = fold(brand);
        let canonical = fold(canonical);
        if brand.is_empty() || brand == canonical || self.canonical.contains(&brand) {
            return;
        }
        self.aliases.entry(brand).or_insert(canonical);
    }

    /// Canonical match key for a submitted name.
    pub fn normalize(&self, name: &str) -> String {
        let folded = fold(name);
        match self.aliases.get(&folded) {
            Some(canonical) => canonical.clone(),
            None => folded,
        }
    }

    /// Whether the name appears in any reference dataset.
    pub fn is_known(&self, name: &str) -> bool {
        let folded = fold(name);
        self.canonical.contains(&folded) || self.aliases.contains_key(&folded)
    }

    /// Number of registered brand aliases.
    pub fn alias_count(&self) -> usize {
        self.aliases.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builtin() -> NameNormalizer {
        NameNormalizer::new(
            &ReferenceData::builtin().unwrap(),
            &MedicationCatalog::builtin().unwrap(),
        )
    }

    #[test]
    fn test_brand_expansion() {
        let normalizer = builtin();
        assert_eq!(normalizer.normalize("Rimadyl"), "carprofen");
        assert_eq!(normalizer.normalize("  METACAM "), "meloxicam");
        assert_eq!(normalizer.normalize("Tylenol"), "acetaminophen");
    }

    #[test]
    fn test_canonical_names_pass_through() {
        let normalizer = builtin();
        assert_eq!(normalizer.normalize("Carprofen"), "carprofen");
        // Apoquel is a catalog medication in its own right
        assert_eq!(normalizer.normalize("Apoquel"), "apoquel");
    }

    #[test]
    fn test_unknown_names_fold_only() {
        let normalizer = builtin();
        assert_eq!(normalizer.normalize("Unobtainium"), "unobtainium");
        assert!(!normalizer.is_known("Unobtainium"));
        assert!(normalizer.is_known("rimadyl"));
        assert!(normalizer.is_known("Aspirin"));
    }

    #[test]
    fn test_first_alias_wins() {
        let mut normalizer = NameNormalizer::default();
        normalizer.add_alias("Novox", "Carprofen");
        normalizer.add_alias("Novox", "Meloxicam");
        assert_eq!(normalizer.normalize("novox"), "carprofen");
        assert_eq!(normalizer.alias_count(), 1);
    }
}
