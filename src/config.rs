//! Configuration for the search client.
//!
//! Settings are stored in TOML format at `~/.config/sport-search/config.toml`
//! (or XDG equivalent). Everything has a default reproducing the stock
//! deployment: a local engine on port 9200 with a `sports` index searched
//! over `title` and `sport_type`.
//!
//! # Example Configuration
//!
//! ```toml
//! [engine]
//! host = "http://localhost:9200"
//! index = "sports"
//!
//! [[search.fields]]
//! name = "title"
//! weight = 2.0
//!
//! [[search.fields]]
//! name = "sport_type"
//!
//! # Prefix rules route "description:=goal" style input to a single field.
//! [[search.prefixes]]
//! prefix = "description:="
//! field = "description"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when loading or saving configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub engine: EngineConfig,
    pub search: SearchConfig,
    pub autocomplete: AutocompleteConfig,
    pub ui: UiConfig,
}

/// Connection settings for the external search engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Engine base URL.
    pub host: String,
    /// Index name holding the sport documents.
    pub index: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            host: "http://localhost:9200".into(),
            index: "sports".into(),
            timeout_secs: 10,
        }
    }
}

/// Query construction settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Fields searched by the default fuzzy multi-field query.
    pub fields: Vec<SearchField>,
    /// Prefix rules checked in order; first match wins.
    pub prefixes: Vec<PrefixRule>,
    /// Results per page.
    pub page_size: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            fields: vec![SearchField::new("title"), SearchField::new("sport_type")],
            prefixes: vec![
                PrefixRule::new("description:=", "description"),
                PrefixRule::new("content:=", "content"),
                PrefixRule::new("snippet:=", "snippet"),
                PrefixRule::new("d=", "description"),
                PrefixRule::new("c=", "content"),
                PrefixRule::new("s=", "snippet"),
            ],
            page_size: 20,
        }
    }
}

/// A searchable field with an optional relevance boost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchField {
    pub name: String,
    /// Boost factor; fields without one are weighted 1.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f32>,
}

impl SearchField {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            weight: None,
        }
    }

    pub fn weighted(name: impl Into<String>, weight: f32) -> Self {
        Self {
            name: name.into(),
            weight: Some(weight),
        }
    }
}

/// Routes search-box input starting with `prefix` to an exact match on `field`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrefixRule {
    pub prefix: String,
    pub field: String,
}

impl PrefixRule {
    pub fn new(prefix: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            field: field.into(),
        }
    }
}

/// Autocomplete behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AutocompleteConfig {
    /// Minimum typed characters before suggestions are requested.
    pub min_chars: usize,
    /// Number of suggestions to request.
    pub size: usize,
}

impl Default for AutocompleteConfig {
    fn default() -> Self {
        Self {
            min_chars: 3,
            size: 5,
        }
    }
}

/// Interactive UI tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Delay between the last keystroke and the issued query.
    /// Zero fires a query on every change.
    pub debounce_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self { debounce_ms: 0 }
    }
}

impl AppConfig {
    /// Load configuration from the default location.
    ///
    /// Returns the defaults if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &PathBuf) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;

        Ok(config)
    }

    /// Save configuration to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        let config_path = Self::config_path()?;
        self.save_to(&config_path)
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        Ok(())
    }

    /// Get the default configuration file path.
    ///
    /// Uses XDG conventions:
    /// - Primary: `$XDG_CONFIG_HOME/sport-search/config.toml`
    /// - Fallback: platform-specific config dir
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        // Respect XDG_CONFIG_HOME first (important for testing and Linux users)
        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            return Ok(PathBuf::from(xdg_config)
                .join("sport-search")
                .join("config.toml"));
        }

        dirs::config_dir()
            .map(|p| p.join("sport-search").join("config.toml"))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Validate the whole configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.engine.host.is_empty() {
            return Err(ConfigError::Validation("Engine host cannot be empty".into()));
        }
        if !self.engine.host.starts_with("http://") && !self.engine.host.starts_with("https://") {
            return Err(ConfigError::Validation(format!(
                "Engine host must be an http(s) URL, got '{}'",
                self.engine.host
            )));
        }
        if self.engine.index.is_empty() || self.engine.index.contains('/') {
            return Err(ConfigError::Validation(format!(
                "Invalid index name '{}'",
                self.engine.index
            )));
        }

        if self.search.fields.is_empty() {
            return Err(ConfigError::Validation(
                "At least one search field is required".into(),
            ));
        }
        for field in &self.search.fields {
            if field.name.is_empty() {
                return Err(ConfigError::Validation("Search field name cannot be empty".into()));
            }
            if let Some(w) = field.weight
                && w <= 0.0
            {
                return Err(ConfigError::Validation(format!(
                    "Weight for field '{}' must be positive",
                    field.name
                )));
            }
        }

        let mut seen = std::collections::HashSet::new();
        for rule in &self.search.prefixes {
            if rule.prefix.is_empty() || rule.field.is_empty() {
                return Err(ConfigError::Validation(
                    "Prefix rules need a prefix and a field".into(),
                ));
            }
            if !seen.insert(&rule.prefix) {
                return Err(ConfigError::Validation(format!(
                    "Duplicate prefix rule: {}",
                    rule.prefix
                )));
            }
        }

        if self.search.page_size == 0 {
            return Err(ConfigError::Validation("page_size must be at least 1".into()));
        }
        if self.autocomplete.size == 0 {
            return Err(ConfigError::Validation(
                "autocomplete size must be at least 1".into(),
            ));
        }

        Ok(())
    }
}
