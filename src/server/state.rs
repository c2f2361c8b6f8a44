//! Server state and configuration.

use std::time::Duration;

use crate::export::Exporter;
use crate::render::scheduler::DEFAULT_DEBOUNCE;
use crate::render::{RenderScheduler, StyledRenderer};
use crate::settings::Settings;
use crate::store::SettingsStore;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on (e.g., "127.0.0.1:8080")
    pub listen_addr: String,
    /// Quiet period between the last settings change and the re-render
    pub debounce: Duration,
    /// Settings the session starts with
    pub initial: Settings,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8080".to_string(),
            debounce: DEFAULT_DEBOUNCE,
            initial: Settings::default(),
        }
    }
}

/// Application state shared across handlers.
pub struct AppState {
    pub config: ServerConfig,
    pub store: SettingsStore,
    pub scheduler: RenderScheduler,
    pub exporter: Exporter,
}

impl AppState {
    /// Must be called from within a tokio runtime; starts the render scheduler.
    pub fn new(config: ServerConfig) -> Self {
        let store = SettingsStore::new(config.initial.clone());
        let scheduler = RenderScheduler::spawn(&store, StyledRenderer::new(), config.debounce);
        Self {
            config,
            store,
            scheduler,
            exporter: Exporter::new(),
        }
    }
}
