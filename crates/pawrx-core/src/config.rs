//! Runtime configuration.

use std::path::PathBuf;

use crate::reference::{MedicationCatalog, ReferenceData, ReferenceResult};

/// Default database file.
pub const DEFAULT_DB_PATH: &str = "pawrx.db";

/// Default tracing filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,pawrx_core=info,pawrx_ai=info";

/// Service configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// SQLite database path
    pub db_path: PathBuf,
    /// Interaction/toxicity fixture overriding the bundled one
    pub reference_path: Option<PathBuf>,
    /// Medication catalog fixture overriding the bundled one
    pub catalog_path: Option<PathBuf>,
    /// Base URL of the AI analysis service; None disables it
    pub ai_url: Option<String>,
    pub ai_timeout_secs: u64,
    /// Record every interaction check with its fingerprint
    pub record_checks: bool,
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            reference_path: None,
            catalog_path: None,
            ai_url: None,
            ai_timeout_secs: pawrx_ai::DEFAULT_TIMEOUT_SECS,
            record_checks: true,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from any key lookup, falling back to defaults.
    ///
    /// Unparseable numbers and flags keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(val) = get("PAWRX_DB_PATH") {
            config.db_path = PathBuf::from(val);
        }
        if let Some(val) = get("PAWRX_REFERENCE_PATH") {
            config.reference_path = Some(PathBuf::from(val));
        }
        if let Some(val) = get("PAWRX_CATALOG_PATH") {
            config.catalog_path = Some(PathBuf::from(val));
        }
        if let Some(val) = get("PAWRX_AI_URL").or_else(|| get("ML_SERVICE_URL")) {
            config.ai_url = Some(val);
        }
        if let Some(val) = get("PAWRX_AI_TIMEOUT_SECS") {
            config.ai_timeout_secs = val.parse().unwrap_or(config.ai_timeout_secs);
        }
        if let Some(val) = get("PAWRX_RECORD_CHECKS") {
            config.record_checks = val.parse().unwrap_or(config.record_checks);
        }
        if let Some(val) = get("PAWRX_LOG") {
            config.log_filter = val;
        }

        config
    }

    /// Interaction and toxicity data, from the override path if set.
    pub fn load_reference(&self) -> ReferenceResult<ReferenceData> {
        match &self.reference_path {
            Some(path) => ReferenceData::from_path(path),
            None => ReferenceData::builtin(),
        }
    }

    /// Medication catalog, from the override path if set.
    pub fn load_catalog(&self) -> ReferenceResult<MedicationCatalog> {
        match &self.catalog_path {
            Some(path) => MedicationCatalog::from_path(path),
            None => MedicationCatalog::builtin(),
        }
    }
}

/// Install a global `tracing` subscriber.
///
/// `RUST_LOG` takes precedence over `default_filter`. Does nothing if a
/// subscriber is already installed.
pub fn init_tracing(default_filter: &str) {
    use tracing_subscriber::EnvFilter;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[]));
        assert_eq!(config, Config::default());
        assert_eq!(config.ai_timeout_secs, 20);
        assert!(config.ai_url.is_none());
    }

    #[test]
    fn test_env_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("PAWRX_DB_PATH", "/tmp/pets.db"),
            ("ML_SERVICE_URL", "http://ml:8000"),
            ("PAWRX_AI_TIMEOUT_SECS", "5"),
            ("PAWRX_RECORD_CHECKS", "false"),
        ]));

        assert_eq!(config.db_path, PathBuf::from("/tmp/pets.db"));
        assert_eq!(config.ai_url.as_deref(), Some("http://ml:8000"));
        assert_eq!(config.ai_timeout_secs, 5);
        assert!(!config.record_checks);
    }

    #[test]
    fn test_pawrx_ai_url_wins() {
        let config = Config::from_lookup(lookup(&[
            ("PAWRX_AI_URL", "http://local:9000"),
            ("ML_SERVICE_URL", "http://ml:8000"),
        ]));
        assert_eq!(config.ai_url.as_deref(), Some("http://local:9000"));
    }

    #[test]
    fn test_bad_values_keep_defaults() {
        let config = Config::from_lookup(lookup(&[
            ("PAWRX_AI_TIMEOUT_SECS", "soon"),
            ("PAWRX_DB_PATH", "   "),
        ]));
        assert_eq!(config.ai_timeout_secs, 20);
        assert_eq!(config.db_path, PathBuf::from(DEFAULT_DB_PATH));
    }

    #[test]
    fn test_load_builtin_datasets() {
        let config = Config::default();
        assert!(!config.load_reference().unwrap().interactions().is_empty());
        assert!(!config.load_catalog().unwrap().search("carprofen", None).is_empty());
    }
}
