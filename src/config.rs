//! Configuration for the Timescape query cache.
//!
//! Settings are plain serde types so they can be loaded from JSON or, with
//! the `toml` feature, from TOML.
use serde::de::Error;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How a freshly fetched coverage region is folded into its time bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FoldPolicy {
    /// Replace or merge with the first matching entry only; append otherwise.
    #[default]
    FirstMatch,
    /// Absorb every subsumed or overlapping entry until none is left.
    Transitive,
}

/// Query cache configuration.
///
/// # Example
///
/// ```rust
/// use timescape::{Config, FoldPolicy};
///
/// let json = r#"{
///     "fetch_limit": 200,
///     "fold_policy": "transitive"
/// }"#;
/// let config = Config::from_json(json).unwrap();
/// assert_eq!(config.fetch_limit, 200);
/// assert_eq!(config.fold_policy, FoldPolicy::Transitive);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Maximum number of records requested per fetch
    #[serde(default = "Config::default_fetch_limit")]
    pub fetch_limit: usize,

    #[serde(default)]
    pub fold_policy: FoldPolicy,

    /// Settings for the Wikidata source (used with the `wikidata` feature)
    #[serde(default)]
    pub wikidata: WikidataConfig,
}

impl Config {
    const fn default_fetch_limit() -> usize {
        500
    }

    pub fn with_fetch_limit(mut self, limit: usize) -> Self {
        assert!(limit > 0, "Fetch limit must be greater than zero");
        self.fetch_limit = limit;
        self
    }

    pub fn with_fold_policy(mut self, policy: FoldPolicy) -> Self {
        self.fold_policy = policy;
        self
    }

    pub fn with_wikidata(mut self, config: WikidataConfig) -> Self {
        self.wikidata = config;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.fetch_limit == 0 {
            return Err("Fetch limit must be greater than zero".to_string());
        }
        self.wikidata.validate()
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let config: Config = serde_json::from_str(json)?;
        if let Err(e) = config.validate() {
            return Err(Error::custom(e));
        }
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    #[cfg(feature = "toml")]
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let config: Config = toml::from_str(toml_str)?;
        if let Err(e) = config.validate() {
            return Err(toml::de::Error::custom(e));
        }
        Ok(config)
    }

    #[cfg(feature = "toml")]
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fetch_limit: Self::default_fetch_limit(),
            fold_policy: FoldPolicy::default(),
            wikidata: WikidataConfig::default(),
        }
    }
}

/// Connection settings for the Wikidata SPARQL endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WikidataConfig {
    #[serde(default = "WikidataConfig::default_endpoint")]
    pub endpoint: String,

    /// Label language list passed to the label service
    #[serde(default = "WikidataConfig::default_language")]
    pub language: String,

    /// Wikimedia asks clients to identify themselves
    #[serde(default = "WikidataConfig::default_user_agent")]
    pub user_agent: String,

    #[serde(default = "WikidataConfig::default_timeout_secs")]
    pub timeout_secs: u64,
}

impl WikidataConfig {
    fn default_endpoint() -> String {
        "https://query.wikidata.org/sparql".to_string()
    }

    fn default_language() -> String {
        "[AUTO_LANGUAGE],mul,en".to_string()
    }

    fn default_user_agent() -> String {
        format!("timescape/{}", env!("CARGO_PKG_VERSION"))
    }

    const fn default_timeout_secs() -> u64 {
        30
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://")) {
            return Err(format!("Endpoint must be an http(s) URL, got '{}'", self.endpoint));
        }
        if self.language.trim().is_empty() {
            return Err("Label language must not be empty".to_string());
        }
        if self.timeout_secs == 0 {
            return Err("Timeout must be greater than zero".to_string());
        }
        Ok(())
    }
}

impl Default for WikidataConfig {
    fn default() -> Self {
        Self {
            endpoint: Self::default_endpoint(),
            language: Self::default_language(),
            user_agent: Self::default_user_agent(),
            timeout_secs: Self::default_timeout_secs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.fetch_limit, 500);
        assert_eq!(config.fold_policy, FoldPolicy::FirstMatch);
        assert_eq!(config.wikidata.endpoint, "https://query.wikidata.org/sparql");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default()
            .with_fetch_limit(50)
            .with_fold_policy(FoldPolicy::Transitive);

        let json = config.to_json().unwrap();
        let deserialized = Config::from_json(&json).unwrap();

        assert_eq!(deserialized.fetch_limit, 50);
        assert_eq!(deserialized.fold_policy, FoldPolicy::Transitive);
    }

    #[test]
    fn test_config_rejects_invalid() {
        assert!(Config::from_json(r#"{"fetch_limit": 0}"#).is_err());
        assert!(Config::from_json(r#"{"fetch_limt": 10}"#).is_err());
        assert!(Config::from_json(r#"{"wikidata": {"endpoint": "ftp://x"}}"#).is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = Config::from_json(r#"{"wikidata": {"timeout_secs": 5}}"#).unwrap();
        assert_eq!(config.fetch_limit, 500);
        assert_eq!(config.wikidata.timeout(), Duration::from_secs(5));
        assert_eq!(config.wikidata.language, "[AUTO_LANGUAGE],mul,en");
    }

    #[cfg(feature = "toml")]
    #[test]
    fn test_config_toml() {
        let config =
            Config::from_toml("fetch_limit = 20\nfold_policy = \"first_match\"\n").unwrap();
        assert_eq!(config.fetch_limit, 20);
        let round_trip = Config::from_toml(&config.to_toml().unwrap()).unwrap();
        assert_eq!(round_trip.fetch_limit, 20);
    }
}
