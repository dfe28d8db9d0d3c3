//! Application state for the web layer.

use std::sync::Arc;

use crate::dispatch::ChannelRegistry;
use crate::planner::RoutePlanner;

/// Shared application state.
///
/// Contains all the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// Route planner over the loaded map
    pub planner: Arc<RoutePlanner>,

    /// Live vehicle and observer channels
    pub registry: Arc<ChannelRegistry>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(planner: RoutePlanner, registry: ChannelRegistry) -> Self {
        Self {
            planner: Arc::new(planner),
            registry: Arc::new(registry),
        }
    }
}
