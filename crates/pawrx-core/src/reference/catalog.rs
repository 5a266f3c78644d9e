//! Static medication catalog for autocomplete, dosing hints and brand aliasing.

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;
use strsim::jaro_winkler;

use super::{read_fixture, ReferenceResult};
use crate::models::{MedicationReference, Species};

const BUILTIN_CATALOG: &str = include_str!("../../data/catalog.json");

/// Maximum number of search results.
pub const SEARCH_LIMIT: usize = 15;

/// Maximum number of alternatives suggested.
pub const ALTERNATIVES_LIMIT: usize = 5;

/// Minimum query length for search.
const MIN_QUERY_LEN: usize = 2;

/// Similarity threshold for "did you mean" suggestions.
const SUGGESTION_THRESHOLD: f64 = 0.85;

/// A catalog entry as stored in the fixture.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CatalogEntry {
    name: String,
    #[serde(default)]
    brand_name: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    common_doses: Vec<String>,
}

impl From<CatalogEntry> for MedicationReference {
    fn from(entry: CatalogEntry) -> Self {
        Self {
            canonical_name: entry.name,
            brand_names: entry
                .brand_name
                .into_iter()
                .filter(|b| !b.trim().is_empty())
                .collect(),
            category: entry.category,
            common_doses: entry.common_doses,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    dog: Vec<CatalogEntry>,
    #[serde(default)]
    cat: Vec<CatalogEntry>,
    #[serde(default)]
    all: Vec<CatalogEntry>,
}

/// Known medications grouped into dog, cat and all-species lists.
#[derive(Debug, Clone, Default)]
pub struct MedicationCatalog {
    dog: Vec<MedicationReference>,
    cat: Vec<MedicationReference>,
    all: Vec<MedicationReference>,
}

impl MedicationCatalog {
    /// Load the catalog bundled with the crate.
    pub fn builtin() -> ReferenceResult<Self> {
        Self::from_json(BUILTIN_CATALOG)
    }

    /// Load a catalog from a JSON file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> ReferenceResult<Self> {
        Self::from_json(&read_fixture(path.as_ref())?)
    }

    pub fn from_json(json: &str) -> ReferenceResult<Self> {
        let file: CatalogFile = serde_json::from_str(json)?;
        Ok(Self {
            dog: file.dog.into_iter().map(Into::into).collect(),
            cat: file.cat.into_iter().map(Into::into).collect(),
            all: file.all.into_iter().map(Into::into).collect(),
        })
    }

    /// Entries visible for a species: the all-species list first, then the
    /// species list. Species other than dog and cat see both lists.
    fn candidates(&self, species: Option<Species>) -> impl Iterator<Item = &MedicationReference> {
        let none: &[MedicationReference] = &[];
        let (dog, cat) = match species {
            Some(Species::Dog) => (self.dog.as_slice(), none),
            Some(Species::Cat) => (none, self.cat.as_slice()),
            _ => (self.dog.as_slice(), self.cat.as_slice()),
        };
        self.all.iter().chain(dog).chain(cat)
    }

    /// Every entry, all-species list first.
    fn entries(&self) -> impl Iterator<Item = &MedicationReference> {
        self.all.iter().chain(&self.dog).chain(&self.cat)
    }

    /// Substring search over name, brand name and category.
    ///
    /// Results keep catalog order, drop repeated names and stop at
    /// [`SEARCH_LIMIT`]. Queries shorter than two characters return nothing.
    pub fn search(&self, query: &str, species: Option<Species>) -> Vec<MedicationReference> {
        let query = query.trim().to_lowercase();
        if query.chars().count() < MIN_QUERY_LEN {
            return Vec::new();
        }

        let mut seen = HashSet::new();
        self.candidates(species)
            .filter(|med| seen.insert(med.canonical_name.to_lowercase()))
            .filter(|med| med.contains(&query))
            .take(SEARCH_LIMIT)
            .cloned()
            .collect()
    }

    /// Find an entry by exact name or brand name.
    pub fn lookup(&self, name: &str) -> Option<&MedicationReference> {
        self.entries().find(|med| med.is_named(name))
    }

    /// Common doses for a medication, empty if it is not in the catalog.
    pub fn common_doses(&self, name: &str) -> Vec<String> {
        self.lookup(name)
            .map(|med| med.common_doses.clone())
            .unwrap_or_default()
    }

    /// Brand name → canonical name pairs in catalog order.
    pub fn aliases(&self) -> Vec<(String, String)> {
        self.entries()
            .flat_map(|med| {
                med.brand_names
                    .iter()
                    .map(move |brand| (brand.clone(), med.canonical_name.clone()))
            })
            .collect()
    }

    /// Generic names in catalog order, repeats included.
    pub fn canonical_names(&self) -> impl Iterator<Item = &str> {
        self.entries().map(|med| med.canonical_name.as_str())
    }

    /// Every canonical and brand name in the catalog.
    pub fn known_names(&self) -> impl Iterator<Item = &str> {
        self.entries().flat_map(|med| {
            std::iter::once(med.canonical_name.as_str())
                .chain(med.brand_names.iter().map(String::as_str))
        })
    }

    /// Medications that could stand in for `medication`.
    ///
    /// Matches entries in the same category, or whose name or category
    /// contains `condition`. The medication itself is never returned.
    pub fn alternatives(
        &self,
        medication: &str,
        species: Option<Species>,
        condition: Option<&str>,
    ) -> Vec<MedicationReference> {
        let category = self
            .candidates(species)
            .find(|med| med.is_named(medication))
            .and_then(|med| med.category.as_ref())
            .map(|c| c.to_lowercase());
        let condition = condition
            .map(|c| c.trim().to_lowercase())
            .filter(|c| !c.is_empty());

        if category.is_none() && condition.is_none() {
            return Vec::new();
        }

        let mut seen = HashSet::new();
        self.candidates(species)
            .filter(|med| !med.is_named(medication))
            .filter(|med| {
                let med_category = med.category.as_deref().unwrap_or("").to_lowercase();
                let same_category = category.as_deref() == Some(med_category.as_str());
                let fits_condition = condition.as_deref().is_some_and(|c| {
                    med_category.contains(c) || med.canonical_name.to_lowercase().contains(c)
                });
                same_category || fits_condition
            })
            .filter(|med| seen.insert(med.canonical_name.to_lowercase()))
            .take(ALTERNATIVES_LIMIT)
            .cloned()
            .collect()
    }

    /// Close catalog names for an unrecognised medication, best first.
    pub fn suggest(&self, name: &str, limit: usize) -> Vec<String> {
        let lower = name.trim().to_lowercase();
        if lower.is_empty() {
            return Vec::new();
        }

        let mut scored: Vec<(f64, &str)> = Vec::new();
        for candidate in self.known_names() {
            let score = jaro_winkler(&lower, &candidate.to_lowercase());
            if score >= SUGGESTION_THRESHOLD
                && !scored.iter().any(|(_, c)| c.eq_ignore_ascii_case(candidate))
            {
                scored.push((score, candidate));
            }
        }

        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        scored
            .into_iter()
            .take(limit)
            .map(|(_, c)| c.to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> MedicationCatalog {
        MedicationCatalog::builtin().unwrap()
    }

    #[test]
    fn test_short_query_returns_nothing() {
        let catalog = catalog();
        assert!(catalog.search("", None).is_empty());
        assert!(catalog.search("c", Some(Species::Dog)).is_empty());
    }

    #[test]
    fn test_search_by_brand_name() {
        let results = catalog().search("rimadyl", Some(Species::Dog));
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].canonical_name, "Carprofen");
    }

    #[test]
    fn test_search_is_capped() {
        let results = catalog().search("an", None);
        assert_eq!(results.len(), SEARCH_LIMIT);
    }

    #[test]
    fn test_search_has_no_duplicate_names() {
        let results = catalog().search("in", None);
        let names: HashSet<_> = results.iter().map(|m| m.canonical_name.to_lowercase()).collect();
        assert_eq!(names.len(), results.len());
    }

    #[test]
    fn test_search_species_filter() {
        let catalog = catalog();
        // Pimobendan is only listed for dogs
        assert!(catalog.search("pimobendan", Some(Species::Cat)).is_empty());
        assert!(!catalog.search("pimobendan", Some(Species::Dog)).is_empty());
        assert!(!catalog.search("pimobendan", Some(Species::Rabbit)).is_empty());
    }

    #[test]
    fn test_common_doses() {
        let catalog = catalog();
        assert_eq!(
            catalog.common_doses("DERAMAXX"),
            vec!["12mg".to_string(), "25mg".into(), "75mg".into()]
        );
        // The all-species entry is listed first
        assert_eq!(catalog.common_doses("Rimadyl"), vec!["Various".to_string()]);
        assert!(catalog.common_doses("unobtainium").is_empty());
    }

    #[test]
    fn test_aliases_include_brands() {
        let aliases = catalog().aliases();
        assert!(aliases
            .iter()
            .any(|(brand, canonical)| brand == "Rimadyl" && canonical == "Carprofen"));
    }

    #[test]
    fn test_alternatives_same_category() {
        let alts = catalog().alternatives("Deracoxib", Some(Species::Dog), None);
        assert!(!alts.is_empty());
        assert!(alts.len() <= ALTERNATIVES_LIMIT);
        assert!(alts.iter().all(|m| !m.is_named("Deracoxib")));
        assert!(alts
            .iter()
            .all(|m| m.category.as_deref() == Some("Anti-inflammatory")));
    }

    #[test]
    fn test_alternatives_unknown_without_condition() {
        assert!(catalog().alternatives("unobtainium", None, None).is_empty());
    }

    #[test]
    fn test_suggest() {
        let suggestions = catalog().suggest("carprofin", 3);
        assert_eq!(suggestions.first().map(String::as_str), Some("Carprofen"));
        assert!(catalog().suggest("zzzzzz", 3).is_empty());
    }

    #[test]
    fn test_from_json_minimal() {
        let json = r#"{ "all": [{ "name": "Aspirin", "brandName": "Bayer", "commonDoses": [] }] }"#;
        let catalog = MedicationCatalog::from_json(json).unwrap();
        assert_eq!(catalog.lookup("bayer").map(|m| m.canonical_name.as_str()), Some("Aspirin"));
        assert!(catalog.search("asp", Some(Species::Dog)).len() == 1);
    }
}
