//! Process configuration, read once from the environment at startup.

/// Names the backing store, e.g. `mem://bookstore`.
pub const STORE_URL_VAR: &str = "CONFIG_DDB";
/// Listen address, e.g. `0.0.0.0:8080`.
pub const ADDR_VAR: &str = "BOOKSTORE_ADDR";
/// `tracing` filter directives, e.g. `bookstore=debug,tower_http=info`.
pub const LOG_VAR: &str = "BOOKSTORE_LOG";

pub const DEFAULT_STORE_URL: &str = "mem://bookstore";
pub const DEFAULT_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_LOG: &str = "info";

/// Startup configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Store URL handed to [`crate::store::connect`].
    pub store_url: String,
    pub addr: String,
    pub log: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_url: DEFAULT_STORE_URL.to_string(),
            addr: DEFAULT_ADDR.to_string(),
            log: DEFAULT_LOG.to_string(),
        }
    }
}

impl Config {
    /// Read the process environment.
    pub fn from_env() -> Self {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Read variables through `lookup`. Unset or blank variables fall back
    /// to their defaults.
    pub fn from_vars<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str, default: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Self {
            store_url: var(STORE_URL_VAR, DEFAULT_STORE_URL),
            addr: var(ADDR_VAR, DEFAULT_ADDR),
            log: var(LOG_VAR, DEFAULT_LOG),
        }
    }
}
