//! Application state management

use std::path::Path;
use std::sync::Arc;

use crate::config::Config;
use crate::convert::{DocumentConverter, SofficeConverter};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    converter: Arc<dyn DocumentConverter>,
}

impl AppState {
    /// Create state that converts with the configured `soffice` program
    pub fn new(config: Config) -> Self {
        let converter = Arc::new(SofficeConverter::from_config(&config.converter));
        Self::with_converter(config, converter)
    }

    /// Create state with an explicit converter
    pub fn with_converter(config: Config, converter: Arc<dyn DocumentConverter>) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, converter }),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the converter
    pub fn converter(&self) -> Arc<dyn DocumentConverter> {
        self.inner.converter.clone()
    }

    pub fn scratch_dir(&self) -> &Path {
        &self.inner.config.converter.scratch_dir
    }
}
