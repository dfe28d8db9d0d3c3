//! Server configuration from environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::planner::{Heuristic, SearchConfig, UnknownHeuristic};

/// Address to listen on.
pub const BIND_VAR: &str = "DISPATCH_BIND";
/// Path of the road map JSON file.
pub const MAP_VAR: &str = "DISPATCH_MAP";
/// Search heuristic, `euclidean` or `zero`.
pub const HEURISTIC_VAR: &str = "ROUTE_HEURISTIC";

const DEFAULT_BIND: ([u8; 4], u16) = ([127, 0, 0, 1], 3000);
const DEFAULT_MAP: &str = "config/hdmap.json";

/// Errors from reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Bind address does not parse
    #[error("invalid DISPATCH_BIND {value:?}: {source}")]
    InvalidBind {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },

    /// Unknown heuristic name
    #[error("invalid ROUTE_HEURISTIC: {0}")]
    InvalidHeuristic(#[from] UnknownHeuristic),
}

/// Configuration for the dispatch server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the HTTP/WebSocket listener binds to.
    pub bind_addr: SocketAddr,

    /// Road map file, loaded once at startup.
    pub map_path: PathBuf,

    /// Route search parameters.
    pub search: SearchConfig,
}

impl ServerConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through `lookup`, falling back to defaults for
    /// unset or blank variables.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(value) = get(BIND_VAR) {
            config.bind_addr = value
                .trim()
                .parse()
                .map_err(|source| ConfigError::InvalidBind { value, source })?;
        }
        if let Some(value) = get(MAP_VAR) {
            config.map_path = PathBuf::from(value);
        }
        if let Some(value) = get(HEURISTIC_VAR) {
            config.search = SearchConfig::new(value.parse::<Heuristic>()?);
        }

        Ok(config)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(DEFAULT_BIND),
            map_path: PathBuf::from(DEFAULT_MAP),
            search: SearchConfig::default(),
        }
    }
}
