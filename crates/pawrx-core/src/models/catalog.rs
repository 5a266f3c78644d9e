//! Medication catalog models.

use serde::{Deserialize, Serialize};

/// A known medication, used for autocomplete and brand-name aliasing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MedicationReference {
    /// Generic name (case-insensitive match key)
    pub canonical_name: String,
    /// Brand names this medication is sold under
    pub brand_names: Vec<String>,
    /// Therapeutic category (e.g., "Anti-inflammatory")
    pub category: Option<String>,
    /// Typical dose strengths (e.g., ["25mg", "75mg"])
    pub common_doses: Vec<String>,
}

impl MedicationReference {
    /// Create a reference with only a canonical name.
    pub fn new(canonical_name: impl Into<String>) -> Self {
        Self {
            canonical_name: canonical_name.into(),
            brand_names: Vec::new(),
            category: None,
            common_doses: Vec::new(),
        }
    }

    /// Exact, case-insensitive match on canonical or brand name.
    pub fn is_named(&self, name: &str) -> bool {
        let lower = name.trim().to_lowercase();
        self.canonical_name.to_lowercase() == lower
            || self.brand_names.iter().any(|b| b.to_lowercase() == lower)
    }

    /// Case-insensitive substring match over name, brand names and category.
    ///
    /// `query_lower` must already be lowercase.
    pub fn contains(&self, query_lower: &str) -> bool {
        self.canonical_name.to_lowercase().contains(query_lower)
            || self
                .brand_names
                .iter()
                .any(|b| b.to_lowercase().contains(query_lower))
            || self
                .category
                .as_ref()
                .is_some_and(|c| c.to_lowercase().contains(query_lower))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn carprofen() -> MedicationReference {
        let mut med = MedicationReference::new("Carprofen");
        med.brand_names = vec!["Rimadyl".into()];
        med.category = Some("Anti-inflammatory".into());
        med.common_doses = vec!["25mg".into(), "75mg".into(), "100mg".into()];
        med
    }

    #[test]
    fn test_is_named() {
        let med = carprofen();
        assert!(med.is_named("carprofen"));
        assert!(med.is_named("RIMADYL"));
        assert!(!med.is_named("carp"));
    }

    #[test]
    fn test_contains() {
        let med = carprofen();
        assert!(med.contains("carp"));
        assert!(med.contains("madyl"));
        assert!(med.contains("inflamm"));
        assert!(!med.contains("steroid"));
    }

    #[test]
    fn test_missing_category_never_matches() {
        let med = MedicationReference::new("Tetracycline");
        assert!(!med.contains("antibiotic"));
        assert!(med.contains("tetra"));
    }
}
