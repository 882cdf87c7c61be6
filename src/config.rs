//! Application-level configuration loading.

use std::{env, fs, io::ErrorKind, path::PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "PEO_CHECKIN_CONFIG_PATH";
/// Environment variable that overrides the configured storage backend.
const STORE_ENV: &str = "PEO_STORE";
/// Path prefix every page lives under.
pub const DEFAULT_BASE_PATH: &str = "/PEO";
/// Number of participants the test-data generator creates.
pub const DEFAULT_TEST_DATA_COUNT: usize = 50;

/// Database the participants are kept in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// MongoDB, configured through `MONGO_URI`/`MONGO_DB`.
    Mongo,
    /// CouchDB, configured through the `COUCH_*` variables.
    Couch,
    /// Process memory; nothing survives a restart.
    Memory,
}

impl StoreBackend {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "mongo" | "mongodb" => Some(StoreBackend::Mongo),
            "couch" | "couchdb" => Some(StoreBackend::Couch),
            "memory" => Some(StoreBackend::Memory),
            _ => None,
        }
    }
}

impl Default for StoreBackend {
    fn default() -> Self {
        if cfg!(feature = "mongo-store") {
            StoreBackend::Mongo
        } else if cfg!(feature = "couch-store") {
            StoreBackend::Couch
        } else {
            StoreBackend::Memory
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    /// Prefix of every page URL, without trailing slash.
    pub base_path: String,
    /// Serve the last fetched roster while the database is unreachable.
    pub offline_cache: bool,
    /// How many participants "generate test data" creates.
    pub test_data_count: usize,
    /// Selected storage backend.
    pub store: StoreBackend,
}

impl AppConfig {
    /// Load the configuration from disk, falling back to built-in defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        let mut config = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    info!(path = %path.display(), "loaded configuration file");
                    raw.into()
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        };

        if let Ok(value) = env::var(STORE_ENV) {
            match StoreBackend::parse(&value) {
                Some(store) => config.store = store,
                None => warn!(value = %value, "ignoring unknown {STORE_ENV} value"),
            }
        }

        info!(
            base_path = %config.base_path,
            store = ?config.store,
            offline_cache = config.offline_cache,
            "configuration ready"
        );
        config
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_path: DEFAULT_BASE_PATH.into(),
            offline_cache: true,
            test_data_count: DEFAULT_TEST_DATA_COUNT,
            store: StoreBackend::default(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    base_path: String,
    offline_cache: bool,
    test_data_count: usize,
    store: StoreBackend,
}

impl Default for RawConfig {
    fn default() -> Self {
        let defaults = AppConfig::default();
        Self {
            base_path: defaults.base_path,
            offline_cache: defaults.offline_cache,
            test_data_count: defaults.test_data_count,
            store: defaults.store,
        }
    }
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        Self {
            base_path: normalize_base_path(&value.base_path),
            offline_cache: value.offline_cache,
            test_data_count: value.test_data_count,
            store: value.store,
        }
    }
}

/// Ensure a single leading slash and no trailing one; an empty path means the site root.
fn normalize_base_path(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}
