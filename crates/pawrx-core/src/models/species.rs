//! Species tags for pets and reference records.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Species string did not match any known tag.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown species: {0}")]
pub struct ParseSpeciesError(pub String);

/// Species a pet can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Species {
    Dog,
    Cat,
    Bird,
    Rabbit,
    Hamster,
    GuineaPig,
    Ferret,
    /// Anything else; only `all`-scoped reference records apply
    Other,
}

impl Species {
    /// Every species, in display order.
    pub const ALL: [Species; 8] = [
        Species::Dog,
        Species::Cat,
        Species::Bird,
        Species::Rabbit,
        Species::Hamster,
        Species::GuineaPig,
        Species::Ferret,
        Species::Other,
    ];

    /// Canonical lowercase tag, as stored in fixtures and the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Species::Dog => "dog",
            Species::Cat => "cat",
            Species::Bird => "bird",
            Species::Rabbit => "rabbit",
            Species::Hamster => "hamster",
            Species::GuineaPig => "guinea pig",
            Species::Ferret => "ferret",
            Species::Other => "other",
        }
    }

    /// Plural form for user-facing messages ("toxic to cats").
    pub fn plural(&self) -> String {
        format!("{}s", self.as_str())
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Species {
    type Err = ParseSpeciesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase().replace(&['_', '-'][..], " ");
        Species::ALL
            .iter()
            .copied()
            .find(|species| species.as_str() == lower)
            .ok_or_else(|| ParseSpeciesError(s.to_string()))
    }
}

impl TryFrom<String> for Species {
    type Error = ParseSpeciesError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Species> for String {
    fn from(species: Species) -> Self {
        species.as_str().to_string()
    }
}

/// Species scope of a reference record: one species, or every species.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SpeciesScope {
    All,
    Only(Species),
}

impl SpeciesScope {
    /// Whether this scope covers the given species.
    pub fn covers(&self, species: Species) -> bool {
        match self {
            SpeciesScope::All => true,
            SpeciesScope::Only(s) => *s == species,
        }
    }
}

impl FromStr for SpeciesScope {
    type Err = ParseSpeciesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(SpeciesScope::All);
        }
        s.parse().map(SpeciesScope::Only)
    }
}

impl TryFrom<String> for SpeciesScope {
    type Error = ParseSpeciesError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SpeciesScope> for String {
    fn from(scope: SpeciesScope) -> Self {
        match scope {
            SpeciesScope::All => "all".to_string(),
            SpeciesScope::Only(species) => species.into(),
        }
    }
}
