//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use crate::config::Config;
use crate::gateway::Gateway;
use crate::gateway::any::AnyExecutor;

/// Read-only state shared by all requests. Each query opens its own
/// connection, so nothing here is mutated after startup.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Server configuration (env-derived).
    pub config: Arc<Config>,
    /// Safety gate plus database executor.
    pub gateway: Arc<Gateway<AnyExecutor>>,
}

impl AppState {
    pub fn new(config: Config, gateway: Gateway<AnyExecutor>) -> Self {
        Self { config: Arc::new(config), gateway: Arc::new(gateway) }
    }
}
