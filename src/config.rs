//! Configuration Module
//!
//! Handles cache engine settings and the demo server configuration,
//! loaded from environment variables with sensible defaults.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use chrono::Utc;

// == Defaults ==
/// Default admission ceiling on live item count
pub const DEFAULT_MAX_ITEMS: usize = 100_000;

/// Default threshold in bytes above which a value is stored on disk
pub const DEFAULT_SIZE_LIMIT: usize = 500 * 1024;

/// Default sweeper tick period
pub const DEFAULT_CLEANUP_INTERVAL: Duration = Duration::from_secs(1);

/// Prefix of every engine storage directory
const STORAGE_DIR_PREFIX: &str = "_mini_cache_";

// == Cache Config ==
/// Cache engine configuration.
///
/// Zero or empty fields are replaced with defaults by [`CacheConfig::normalized`],
/// which the engine applies at construction time.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Cache identifier, used to name the on-disk storage directory.
    /// Two engines in one process must never share an id: construction
    /// wipes the directory.
    pub id: String,
    /// Maximum number of live items
    pub max_items: usize,
    /// Encoded size in bytes above which a value is file-backed
    pub size_limit: usize,
    /// Interval between expiry sweeps
    pub cleanup_interval: Duration,
    /// Parent directory of the storage directory
    pub storage_root: PathBuf,
}

impl CacheConfig {
    /// Creates a config with the given id and default limits.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_ID` - Cache identifier (default: current timestamp)
    /// - `CACHE_MAX_ITEMS` - Maximum live items (default: 100000)
    /// - `CACHE_SIZE_LIMIT` - File-tier threshold in bytes (default: 512000)
    /// - `CACHE_CLEANUP_INTERVAL_MS` - Sweep interval in milliseconds (default: 1000)
    /// - `CACHE_STORAGE_ROOT` - Parent of the storage directory (default: system temp dir)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            id: env::var("CACHE_ID").unwrap_or_default(),
            max_items: parse_env("CACHE_MAX_ITEMS").unwrap_or(defaults.max_items),
            size_limit: parse_env("CACHE_SIZE_LIMIT").unwrap_or(defaults.size_limit),
            cleanup_interval: parse_env("CACHE_CLEANUP_INTERVAL_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.cleanup_interval),
            storage_root: env::var("CACHE_STORAGE_ROOT")
                .map(PathBuf::from)
                .unwrap_or(defaults.storage_root),
        }
        .normalized()
    }

    // == Normalize ==
    /// Replaces unset or invalid fields with their defaults.
    pub fn normalized(mut self) -> Self {
        if self.id.is_empty() {
            self.id = Utc::now().format("%Y%m%dT%H%M%S%.9fZ").to_string();
        }
        if self.max_items == 0 {
            self.max_items = DEFAULT_MAX_ITEMS;
        }
        if self.size_limit == 0 {
            self.size_limit = DEFAULT_SIZE_LIMIT;
        }
        if self.cleanup_interval.is_zero() {
            self.cleanup_interval = DEFAULT_CLEANUP_INTERVAL;
        }
        self
    }

    // == Storage Directory ==
    /// Returns the directory holding this cache's file-backed items.
    ///
    /// The name is derived deterministically from the id; characters that are
    /// not safe in a single path component are replaced with `_`.
    pub fn storage_dir(&self) -> PathBuf {
        let name: String = self
            .id
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.storage_root.join(format!("{}{}", STORAGE_DIR_PREFIX, name))
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            id: String::new(),
            max_items: DEFAULT_MAX_ITEMS,
            size_limit: DEFAULT_SIZE_LIMIT,
            cleanup_interval: DEFAULT_CLEANUP_INTERVAL,
            storage_root: env::temp_dir(),
        }
    }
}

// == Server Config ==
/// Demo server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Cache engine settings
    pub cache: CacheConfig,
    /// HTTP server port
    pub server_port: u16,
    /// Time-to-live in seconds of memoized responses
    pub response_ttl: u64,
}

impl Config {
    /// Loads the server configuration from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `RESPONSE_TTL` - Cached response TTL in seconds (default: 60)
    /// - plus every variable read by [`CacheConfig::from_env`]
    pub fn from_env() -> Self {
        Self {
            cache: CacheConfig::from_env(),
            server_port: parse_env("SERVER_PORT").unwrap_or(3000),
            response_ttl: parse_env("RESPONSE_TTL").unwrap_or(60),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache: CacheConfig::default(),
            server_port: 3000,
            response_ttl: 60,
        }
    }
}

fn parse_env<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}
