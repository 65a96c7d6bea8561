//! Admin → finder routing configuration.
//!
//! Each admin (the CRUD unit bound to one entity type) names the backend
//! finder that serves its search index. The configuration is loaded from
//! TOML and validated before it is handed out:
//!
//! ```toml
//! [admin_finder_services."admin.post"]
//! finder = "finder.post"
//!
//! [search]
//! timeout_ms = 2000
//! ```

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Finder reference for one admin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinderService {
    /// Name of the finder that executes this admin's queries.
    pub finder: String,
}

impl FinderService {
    /// Create a finder reference.
    pub fn new(finder: impl Into<String>) -> Self {
        Self {
            finder: finder.into(),
        }
    }
}

/// Execution defaults applied to every datagrid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchDefaults {
    /// Timeout passed to each transport call, in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

/// Top-level searchgrid configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchGridConfig {
    /// Admin identifier → finder reference.
    #[serde(default)]
    pub admin_finder_services: BTreeMap<String, FinderService>,

    /// Execution defaults.
    #[serde(default)]
    pub search: SearchDefaults,
}

impl SearchGridConfig {
    /// Parse and validate configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| Error::config(format!("Failed to parse configuration: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::io_with_path(e, path))?;
        let config = Self::from_toml_str(&content)?;
        log::info!(
            "Loaded searchgrid config from {}: {} admin(s)",
            path.display(),
            config.admin_finder_services.len()
        );
        Ok(config)
    }

    /// Serialize the configuration back to TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| Error::config(format!("Failed to serialize configuration: {e}")))
    }

    /// Check every entry names a non-empty admin and finder.
    pub fn validate(&self) -> Result<()> {
        for (admin_id, service) in &self.admin_finder_services {
            if admin_id.trim().is_empty() {
                return Err(Error::config("admin_finder_services: empty admin id"));
            }
            if service.finder.trim().is_empty() {
                return Err(Error::config(format!(
                    "admin_finder_services.{admin_id}: finder must not be empty"
                )));
            }
        }
        if self.search.timeout_ms == Some(0) {
            return Err(Error::config("search.timeout_ms must be greater than 0"));
        }
        Ok(())
    }

    /// Finder name configured for an admin.
    pub fn finder_for(&self, admin_id: &str) -> Option<&str> {
        self.admin_finder_services
            .get(admin_id)
            .map(|service| service.finder.as_str())
    }

    /// Add or replace an admin's finder.
    pub fn with_finder(mut self, admin_id: impl Into<String>, finder: impl Into<String>) -> Self {
        self.admin_finder_services
            .insert(admin_id.into(), FinderService::new(finder));
        self
    }

    /// Transport timeout, if configured.
    pub fn timeout(&self) -> Option<Duration> {
        self.search.timeout_ms.map(Duration::from_millis)
    }
}

// ============================================================================
// Tests
// ============================================================================
