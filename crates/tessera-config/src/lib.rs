//! Configuration management for tessera
//!
//! Provides hierarchical configuration loading from multiple sources:
//! 1. Environment variables (TESSERA_* prefix, highest precedence)
//! 2. tessera.local.toml (gitignored, local overrides)
//! 3. tessera.toml (git-tracked, project config)
//! 4. ~/.config/tessera/config.toml (user defaults)
//! 5. Built-in defaults (lowest precedence)
//!
//! Besides engine settings, a configuration may carry seed rules. They are
//! inserted through the regular `add_rule` path in file order, so they obey
//! the same validation and first-match-wins ordering as rules added at
//! runtime. A higher-precedence source that defines `[[rules]]` replaces the
//! whole list from lower sources; lists are never concatenated.
//!
//! ```toml
//! [engine]
//! audit = true
//!
//! [[rules]]
//! action = "read"
//! subject = { role = "admin" }
//! resource = { type = "document" }
//! ```

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tessera_abac::{Policy, PolicyStore, RuleSpec};
use tracing::info;

mod error;
mod loader;
mod paths;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use paths::Paths;

/// Main tessera configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TesseraConfig {
    pub engine: EngineConfig,
    /// Seed rules, in evaluation order.
    pub rules: Vec<RuleSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Log every evaluation (allow at INFO, deny at WARN).
    pub audit: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { audit: true }
    }
}

impl TesseraConfig {
    /// Load configuration from the current directory
    pub fn load() -> Result<Self> {
        ConfigLoader::new().load()
    }

    /// Load configuration from a specific directory
    pub fn load_from_dir(project_dir: impl AsRef<Path>) -> Result<Self> {
        ConfigLoader::new().with_project_dir(project_dir).load()
    }

    /// Parse a single TOML document, without layering.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Read and parse a single TOML file, without layering.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Validate the seed rules and build a policy holding them in order.
    ///
    /// The first invalid rule fails the whole build.
    pub fn build_policy(&self) -> Result<Policy, ConfigError> {
        let mut policy = Policy::new();
        for (index, spec) in self.rules.iter().enumerate() {
            policy
                .add(spec.clone())
                .map_err(|source| ConfigError::InvalidRule { index, source })?;
        }
        Ok(policy)
    }

    /// Build a policy store seeded with the configured rules and engine
    /// settings.
    pub fn build_store(&self) -> Result<PolicyStore, ConfigError> {
        let policy = self.build_policy()?;
        info!(
            rules = policy.len(),
            audit = self.engine.audit,
            "Policy store seeded from configuration"
        );
        Ok(PolicyStore::from(policy).with_audit(self.engine.audit))
    }
}
