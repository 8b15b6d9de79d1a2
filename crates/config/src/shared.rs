//! Process-wide configuration holder
//!
//! One writer, many readers. [`SharedConfig::load`] builds the new
//! configuration before taking the lock, so a failed load leaves the
//! current value untouched, and readers only ever see whole values.

use crate::schema::Config;
use figment::Provider;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::info;
use types::{Dataset, Result};

static GLOBAL: SharedConfig = SharedConfig::new();

/// Replaceable configuration shared between components
#[derive(Debug)]
pub struct SharedConfig {
    current: RwLock<Option<Arc<Config>>>,
}

impl SharedConfig {
    /// Holder with no configuration loaded yet
    pub const fn new() -> Self {
        Self {
            current: RwLock::new(None),
        }
    }

    /// The process-wide holder behind [`config`] and [`load_config`]
    pub fn global() -> &'static SharedConfig {
        &GLOBAL
    }

    /// Configuration currently installed, if any
    pub fn get(&self) -> Option<Arc<Config>> {
        // Values are replaced whole, a poisoned lock still holds a valid one.
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Build the configuration `selector` names and install it
    ///
    /// Fails with a selector error for an unknown dataset and with a
    /// configuration error for invalid options; in both cases the
    /// installed configuration is left as it was.
    pub fn load<P: Provider>(&self, selector: &str, options: P) -> Result<Arc<Config>> {
        let dataset: Dataset = selector.parse()?;
        let config = Arc::new(Config::from_provider(Some(dataset), options)?);

        let previous = self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(Arc::clone(&config));

        info!(
            variant = config.name(),
            dataset_root = %config.dataset_root().display(),
            replaced = previous.is_some(),
            "Configuration installed"
        );
        Ok(config)
    }
}

impl Default for SharedConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Configuration currently installed in the process-wide holder
pub fn config() -> Option<Arc<Config>> {
    SharedConfig::global().get()
}

/// Build the configuration `selector` names and install it process-wide
pub fn load_config<P: Provider>(selector: &str, options: P) -> Result<Arc<Config>> {
    SharedConfig::global().load(selector, options)
}
