//! Dictionary configuration file
//!
//! ```json
//! {
//!   "database": "geo",
//!   "name": "regions",
//!   "layout": "direct",
//!   "lifetime": { "min_sec": 0, "max_sec": 300 },
//!   "structure": {
//!     "id": { "name": "id" },
//!     "attributes": [
//!       { "name": "parent", "type": "uint64", "null_value": 0, "hierarchical": true },
//!       { "name": "region", "type": "string", "null_value": "unknown" }
//!     ]
//!   },
//!   "source": { "type": "file", "path": "regions.json", "format": "json" },
//!   "log_level": "warn"
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::observability::{log_event_with_fields, Event, Severity};
use crate::source::FileFormat;

use super::errors::{DictionaryError, DictionaryResult};
use super::structure::{DictionaryLifetime, DictionaryStructure};

/// Source section of the configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SourceConfig {
    /// Rows read from a JSON file on every scan
    File {
        path: PathBuf,
        #[serde(default)]
        format: FileFormat,
        #[serde(default = "default_block_size")]
        block_size: usize,
    },
}

fn default_block_size() -> usize {
    8192
}

fn default_layout() -> String {
    "direct".to_string()
}

/// Configuration of one dictionary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DictionaryConfig {
    /// Database the dictionary belongs to (optional)
    #[serde(default)]
    pub database: String,

    /// Dictionary name (required)
    pub name: String,

    /// Storage layout, only "direct" is accepted
    #[serde(default = "default_layout")]
    pub layout: String,

    /// Refresh window (optional, passed through)
    #[serde(default)]
    pub lifetime: DictionaryLifetime,

    pub structure: DictionaryStructure,

    pub source: SourceConfig,

    /// Minimum log severity (optional)
    #[serde(default)]
    pub log_level: Option<String>,
}

impl DictionaryConfig {
    /// Load configuration from file
    pub fn load(path: &Path) -> DictionaryResult<Self> {
        let origin = path.display().to_string();
        let content = fs::read_to_string(path).map_err(|e| {
            DictionaryError::invalid_config(&origin, format!("failed to read config: {}", e))
        })?;

        let config = Self::parse(&origin, &content)?;

        log_event_with_fields(
            Event::ConfigLoaded,
            &[("path", &origin), ("dictionary", &config.full_name())],
        );
        Ok(config)
    }

    /// Parse configuration from a JSON string
    pub fn from_json_str(content: &str) -> DictionaryResult<Self> {
        Self::parse("<string>", content)
    }

    fn parse(origin: &str, content: &str) -> DictionaryResult<Self> {
        let config: DictionaryConfig = serde_json::from_str(content).map_err(|e| {
            DictionaryError::invalid_config(origin, format!("invalid config JSON: {}", e))
        })?;

        config.validate(origin)?;
        Ok(config)
    }

    fn validate(&self, origin: &str) -> DictionaryResult<()> {
        if self.name.trim().is_empty() {
            return Err(DictionaryError::invalid_config(origin, "name must not be empty"));
        }

        if self.lifetime.min_sec > self.lifetime.max_sec {
            return Err(DictionaryError::invalid_config(
                origin,
                format!(
                    "lifetime.min_sec ({}) must not exceed lifetime.max_sec ({})",
                    self.lifetime.min_sec, self.lifetime.max_sec
                ),
            ));
        }

        if let SourceConfig::File { block_size: 0, .. } = &self.source {
            return Err(DictionaryError::invalid_config(
                origin,
                "source.block_size must be > 0",
            ));
        }

        if let Some(level) = &self.log_level {
            level
                .parse::<Severity>()
                .map_err(|e| DictionaryError::invalid_config(origin, e))?;
        }

        Ok(())
    }

    /// `database.name`, or `name` without a database
    pub fn full_name(&self) -> String {
        if self.database.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.database, self.name)
        }
    }

    /// Returns the configured log level, if any
    pub fn log_level(&self) -> Option<Severity> {
        self.log_level.as_deref().and_then(|l| l.parse().ok())
    }
}
