//! Static reference data: interaction and toxicity datasets, medication catalog.
//!
//! Both are loaded once, validated, and never modified afterwards.

mod catalog;
mod dataset;

pub use catalog::*;
pub use dataset::*;

use thiserror::Error;

/// Reference data loading errors.
#[derive(Error, Debug)]
pub enum ReferenceError {
    #[error("Failed to read reference file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed reference data: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid interaction record #{index} ({drug1} + {drug2}): {reason}")]
    InvalidInteraction {
        index: usize,
        drug1: String,
        drug2: String,
        reason: String,
    },

    #[error("Unknown species in toxicity table: {0}")]
    UnknownSpecies(String),
}

pub type ReferenceResult<T> = Result<T, ReferenceError>;

pub(crate) fn read_fixture(path: &std::path::Path) -> ReferenceResult<String> {
    std::fs::read_to_string(path).map_err(|source| ReferenceError::Io {
        path: path.display().to_string(),
        source,
    })
}
