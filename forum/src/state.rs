use crate::config::AppConfig;
use crate::services::{ForumService, ServiceRegistry};
use crate::storage::SharedStore;

/// Shared application state across all routes and services.
///
/// Built once at startup and handed to the router; the store handle is
/// closed by the binary on shutdown.
pub struct AppState {
    /// Storage handle
    pub store: SharedStore,

    /// Services registry
    pub services: ServiceRegistry,

    pub config: AppConfig,
}

impl AppState {
    /// Create the state and the services on top of `store`
    pub fn new(store: SharedStore, config: AppConfig) -> Self {
        let services = ServiceRegistry::new(ForumService::new(store.clone()));
        Self {
            store,
            services,
            config,
        }
    }

    pub fn forum(&self) -> &ForumService {
        &self.services.forum
    }
}
