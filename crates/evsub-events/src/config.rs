//! Hub configuration.
//!
//! The serializable part of a hub's construction options. Options that
//! are closures (the dynamic prefix and the logger hook) are set on the
//! [`HubBuilder`](crate::HubBuilder) instead.

use std::collections::HashSet;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ConfigError, ConfigResult};
use crate::store::DEFAULT_PRESERVE_LIMIT;
use crate::value::EventName;

/// Maximum config file size accepted by [`HubConfig::load_file`] (1 MiB).
const MAX_CONFIG_FILE_SIZE: u64 = 1_048_576;

/// Serializable hub options.
///
/// ```toml
/// preserve = ["log", "progress"]
/// preserve_limit = 200
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, bound(deserialize = "N: Deserialize<'de>"))]
pub struct HubConfig<N = String> {
    /// Events whose full history is kept for `on_with_preserve`.
    pub preserve: Vec<N>,
    /// Maximum number of history entries per event.
    pub preserve_limit: usize,
}

impl<N> Default for HubConfig<N> {
    fn default() -> Self {
        Self {
            preserve: Vec::new(),
            preserve_limit: DEFAULT_PRESERVE_LIMIT,
        }
    }
}

impl<N: EventName> HubConfig<N> {
    /// Create a config with default limits and no preserved events.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep the history of the given events. Names already listed are
    /// skipped.
    #[must_use]
    pub fn with_preserve(mut self, names: impl IntoIterator<Item = impl Into<N>>) -> Self {
        self.preserve.extend(names.into_iter().map(Into::into));
        self.dedup_preserve();
        self
    }

    /// Drop repeated `preserve` entries, keeping first occurrences.
    pub(crate) fn dedup_preserve(&mut self) {
        let mut seen = HashSet::with_capacity(self.preserve.len());
        self.preserve.retain(|name| seen.insert(name.clone()));
    }

    /// Set the per-event history cap.
    #[must_use]
    pub fn with_preserve_limit(mut self, limit: usize) -> Self {
        self.preserve_limit = limit;
        self
    }

    /// Check field ranges and cross-field invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] when the history cap is
    /// zero.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.preserve_limit == 0 {
            return Err(ConfigError::ValidationError {
                field: "preserve_limit".to_owned(),
                message: "history needs at least one slot per event".to_owned(),
            });
        }

        Ok(())
    }
}

impl<N: EventName + DeserializeOwned> HubConfig<N> {
    /// Parse and validate a TOML document.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the document is malformed or fails
    /// validation.
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        Self::parse(content, "<inline>")
    }

    /// Read, parse, and validate a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file cannot be read, exceeds the
    /// size limit, is malformed, or fails validation.
    pub fn load_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.display().to_string(),
            source: e,
        })?;

        // Check size after reading to avoid TOCTOU between stat and read.
        if content.len() as u64 > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::ValidationError {
                field: path.display().to_string(),
                message: format!(
                    "config file is {} bytes, exceeding the {} byte limit",
                    content.len(),
                    MAX_CONFIG_FILE_SIZE
                ),
            });
        }

        let config = Self::parse(&content, &path.display().to_string())?;
        debug!(path = %path.display(), preserve = config.preserve.len(), "loaded hub config");
        Ok(config)
    }

    fn parse(content: &str, origin: &str) -> ConfigResult<Self> {
        let mut config: Self = toml::from_str(content).map_err(|e| ConfigError::ParseError {
            path: origin.to_owned(),
            source: e,
        })?;
        config.dedup_preserve();
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config: HubConfig = HubConfig::default();
        assert!(config.preserve.is_empty());
        assert_eq!(config.preserve_limit, 500);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_methods() {
        let config: HubConfig = HubConfig::new()
            .with_preserve(["log", "progress"])
            .with_preserve_limit(3);
        assert_eq!(config.preserve, vec!["log".to_owned(), "progress".to_owned()]);
        assert_eq!(config.preserve_limit, 3);
    }

    #[test]
    fn test_zero_limit_rejected() {
        let config: HubConfig = HubConfig::new().with_preserve_limit(0);
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError { ref field, .. } if field == "preserve_limit"));
        assert!(err.to_string().contains("at least one slot"));
    }

    #[test]
    fn test_duplicate_preserve_collapsed() {
        let config: HubConfig = HubConfig::new()
            .with_preserve(["log", "log"])
            .with_preserve(["progress", "log"]);
        assert_eq!(config.preserve, vec!["log".to_owned(), "progress".to_owned()]);
        assert!(config.validate().is_ok());

        let parsed: HubConfig = HubConfig::from_toml_str(r#"preserve = ["log", "log"]"#).unwrap();
        assert_eq!(parsed.preserve, vec!["log".to_owned()]);
    }

    #[test]
    fn test_from_toml_str() {
        let config: HubConfig = HubConfig::from_toml_str(
            r#"
            preserve = ["log"]
            preserve_limit = 20
            "#,
        )
        .unwrap();
        assert_eq!(config.preserve, vec!["log".to_owned()]);
        assert_eq!(config.preserve_limit, 20);
    }

    #[test]
    fn test_from_toml_str_uses_defaults() {
        let config: HubConfig = HubConfig::from_toml_str("").unwrap();
        assert_eq!(config, HubConfig::default());
    }

    #[test]
    fn test_from_toml_str_invalid() {
        let result: ConfigResult<HubConfig> = HubConfig::from_toml_str("preserve = 12");
        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    }

    #[test]
    fn test_integer_event_names() {
        let config: HubConfig<u32> = HubConfig::from_toml_str("preserve = [1, 2]").unwrap();
        assert_eq!(config.preserve, vec![1, 2]);
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hub.toml");
        std::fs::write(&path, "preserve = [\"log\"]\npreserve_limit = 2\n").unwrap();

        let config: HubConfig = HubConfig::load_file(&path).unwrap();
        assert_eq!(config.preserve_limit, 2);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result: ConfigResult<HubConfig> = HubConfig::load_file(&dir.path().join("nope.toml"));
        assert!(matches!(result, Err(ConfigError::ReadError { .. })));
    }

    #[test]
    fn test_oversized_config_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("huge.toml");
        let data = "x = \"".to_owned() + &"a".repeat(1_100_000) + "\"";
        std::fs::write(&path, data).unwrap();

        let result: ConfigResult<HubConfig> = HubConfig::load_file(&path);
        assert!(matches!(result, Err(ConfigError::ValidationError { .. })));
    }
}
