//! Shared application state for all routes. The registry is sealed before it lands here.

use crate::config::Settings;
use crate::registry::ModelRegistry;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<ModelRegistry>,
    pub settings: Arc<Settings>,
}

impl AppState {
    /// Seal `registry` and wrap both halves for sharing.
    pub fn new(mut registry: ModelRegistry, settings: Settings) -> Self {
        registry.seal();
        AppState {
            registry: Arc::new(registry),
            settings: Arc::new(settings),
        }
    }
}
