//! Application state for dependency injection.

use std::sync::Arc;

use crate::clients::CatalogApi;
use crate::config::GatewayConfig;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn CatalogApi>,
    pub config: GatewayConfig,
}

impl AppState {
    /// Create new app state.
    pub fn new(catalog: Arc<dyn CatalogApi>, config: GatewayConfig) -> Self {
        Self { catalog, config }
    }
}
