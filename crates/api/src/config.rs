use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use inventra_core::cache::{DEFAULT_NAMESPACE, DEFAULT_TTL};

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// How long to wait for background jobs after the listener closes (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// Seed system categories and locations at startup (default: `true`).
    pub seed_on_startup: bool,
    pub jwt: JwtConfig,
    pub cache: CacheConfig,
    pub storage: StorageConfig,
}

/// Response cache settings.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// When `false` every read misses and nothing is stored.
    pub enabled: bool,
    /// Key prefix, so several deployments can share one backend.
    pub namespace: String,
    pub ttl_secs: u64,
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            namespace: DEFAULT_NAMESPACE.to_string(),
            ttl_secs: DEFAULT_TTL.as_secs(),
        }
    }
}

/// Where uploaded asset images live and the URL prefix they are served under.
///
/// Each owner's images sit in `{upload_dir}/{owner_id}/`.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub upload_dir: String,
    pub public_base_url: String,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                          |
    /// |-------------------------|----------------------------------|
    /// | `HOST`                  | `0.0.0.0`                        |
    /// | `PORT`                  | `3000`                           |
    /// | `CORS_ORIGINS`          | `http://localhost:5173`          |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                             |
    /// | `SHUTDOWN_TIMEOUT_SECS` | `30`                             |
    /// | `SEED_ON_STARTUP`       | `true`                           |
    /// | `CACHE_ENABLED`         | `true`                           |
    /// | `CACHE_NAMESPACE`       | `inventra`                       |
    /// | `CACHE_TTL_SECS`        | `900`                            |
    /// | `UPLOAD_DIR`            | `./uploads`                      |
    /// | `PUBLIC_BASE_URL`       | `http://localhost:3000/uploads`  |
    ///
    /// JWT settings are read by [`JwtConfig::from_env`].
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port: u16 = env_parse("PORT", 3000);

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let defaults = CacheConfig::default();
        let cache = CacheConfig {
            enabled: env_parse("CACHE_ENABLED", defaults.enabled),
            namespace: std::env::var("CACHE_NAMESPACE").unwrap_or(defaults.namespace),
            ttl_secs: env_parse("CACHE_TTL_SECS", defaults.ttl_secs),
        };

        let storage = StorageConfig {
            upload_dir: std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "./uploads".into()),
            public_base_url: std::env::var("PUBLIC_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3000/uploads".into()),
        };

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs: env_parse("REQUEST_TIMEOUT_SECS", 30),
            shutdown_timeout_secs: env_parse("SHUTDOWN_TIMEOUT_SECS", 30),
            seed_on_startup: env_parse("SEED_ON_STARTUP", true),
            jwt: JwtConfig::from_env(),
            cache,
            storage,
        }
    }
}

/// Read and parse an env var, falling back to `default` when unset.
///
/// # Panics
///
/// Panics if the variable is set but does not parse; misconfiguration
/// should stop the server at startup.
fn env_parse<T>(key: &str, default: T) -> T
where
    T: FromStr,
    T::Err: Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|e| panic!("{key} has an invalid value '{raw}': {e}")),
        Err(_) => default,
    }
}
