//! Finder routing.
//!
//! Each admin is served by one search finder (an index or collection). The
//! configuration names the finder per admin id; the host registers a
//! transport per finder name.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use searchgrid_core::{Error, Result, SearchGridConfig};
use searchgrid_pager::SearchTransport;

/// Looks up the search transport serving an admin.
pub trait FinderProvider: Send + Sync {
    /// Transport for the admin identified by `admin_code`.
    fn finder_for_admin(&self, admin_code: &str) -> Result<Arc<dyn SearchTransport>>;

    /// Deadline applied to every execution against the returned transports.
    fn timeout(&self) -> Option<Duration> {
        None
    }
}

/// Finder routing driven by [`SearchGridConfig`].
#[derive(Clone)]
pub struct ConfiguredFinders {
    config: SearchGridConfig,
    transports: BTreeMap<String, Arc<dyn SearchTransport>>,
}

impl ConfiguredFinders {
    /// Create routing from a validated configuration.
    pub fn new(config: SearchGridConfig) -> Self {
        Self {
            config,
            transports: BTreeMap::new(),
        }
    }

    /// Register the transport behind a finder name.
    pub fn register(
        mut self,
        finder: impl Into<String>,
        transport: Arc<dyn SearchTransport>,
    ) -> Self {
        let finder = finder.into();
        log::info!("Registered finder '{finder}' ({})", transport.name());
        self.transports.insert(finder, transport);
        self
    }

    /// Configuration in use.
    pub fn config(&self) -> &SearchGridConfig {
        &self.config
    }

    /// Finder name configured for an admin.
    pub fn finder_name(&self, admin_code: &str) -> Option<&str> {
        self.config.finder_for(admin_code)
    }

    /// Check that every configured finder has a registered transport.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] naming the first admin whose finder is not
    /// registered.
    pub fn validate(&self) -> Result<()> {
        for (admin, service) in &self.config.admin_finder_services {
            if !self.transports.contains_key(&service.finder) {
                return Err(Error::config(format!(
                    "admin '{admin}' uses finder '{}', which is not registered",
                    service.finder
                )));
            }
        }
        Ok(())
    }
}

impl FinderProvider for ConfiguredFinders {
    fn finder_for_admin(&self, admin_code: &str) -> Result<Arc<dyn SearchTransport>> {
        let finder = self.finder_name(admin_code).ok_or_else(|| {
            Error::config(format!("no finder configured for admin '{admin_code}'"))
        })?;
        self.transports.get(finder).cloned().ok_or_else(|| {
            Error::config(format!(
                "finder '{finder}' for admin '{admin_code}' is not registered"
            ))
        })
    }

    fn timeout(&self) -> Option<Duration> {
        self.config.timeout()
    }
}

impl std::fmt::Debug for ConfiguredFinders {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfiguredFinders")
            .field("config", &self.config)
            .field("transports", &self.transports.keys().collect::<Vec<_>>())
            .finish()
    }
}
