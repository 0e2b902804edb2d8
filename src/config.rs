//! Connection settings for the store.

use std::env;
use std::time::Duration;

use crate::error::{Result, StoreError};

/// Database used when `DATABASE_URL` is not set.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://hiking_trails.sqlite3?mode=rwc";

/// Settings used by [`crate::connect`].
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use trail_store::StoreConfig;
///
/// let config = StoreConfig::new("sqlite::memory:")
///     .with_max_connections(1)
///     .with_idle_timeout(None)
///     .with_connect_timeout(Duration::from_secs(2));
///
/// assert_eq!(config.max_connections, 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Connection string, e.g. `sqlite://trails.db?mode=rwc`.
    pub database_url: String,
    /// Upper bound of the pool.
    pub max_connections: u32,
    /// Connections kept open while idle.
    pub min_connections: u32,
    /// Time allowed to open a connection.
    pub connect_timeout: Duration,
    /// Time allowed to wait for a pooled connection.
    pub acquire_timeout: Duration,
    /// Idle connections are closed after this long. `None` keeps them.
    pub idle_timeout: Option<Duration>,
    /// Connections are recycled after this long. `None` keeps them.
    pub max_lifetime: Option<Duration>,
    /// Log every statement sqlx runs.
    pub sqlx_logging: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DATABASE_URL)
    }
}

impl StoreConfig {
    /// Default pool settings for `database_url`.
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_connections: 10,
            min_connections: 1,
            connect_timeout: Duration::from_secs(10),
            acquire_timeout: Duration::from_secs(10),
            idle_timeout: Some(Duration::from_secs(10 * 60)),
            max_lifetime: Some(Duration::from_secs(30 * 60)),
            sqlx_logging: false,
        }
    }

    /// Reads `DATABASE_URL` and `DATABASE_MAX_CONNECTIONS`, falling back to
    /// the defaults for anything unset.
    pub fn from_env() -> Result<Self> {
        let mut config = match env::var("DATABASE_URL") {
            Ok(url) if !url.is_empty() => Self::new(url),
            _ => Self::default(),
        };

        if let Ok(raw) = env::var("DATABASE_MAX_CONNECTIONS") {
            let max = raw.parse::<u32>().map_err(|_| {
                StoreError::validation(
                    "DATABASE_MAX_CONNECTIONS",
                    format!("{raw:?} is not a connection count"),
                )
            })?;
            config = config.with_max_connections(max);
        }

        Ok(config)
    }

    /// Sets the pool size. The minimum is lowered to match if needed.
    pub fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self.min_connections = self.min_connections.min(max);
        self
    }

    /// Sets the number of connections kept while idle.
    pub fn with_min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    /// Sets the timeout for opening a connection.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets the timeout for taking a connection from the pool.
    pub fn with_acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }

    /// Sets or clears the idle timeout.
    pub fn with_idle_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.idle_timeout = timeout;
        self
    }

    /// Sets or clears the connection lifetime.
    pub fn with_max_lifetime(mut self, lifetime: Option<Duration>) -> Self {
        self.max_lifetime = lifetime;
        self
    }

    /// Turns statement logging on or off.
    pub fn with_sqlx_logging(mut self, enabled: bool) -> Self {
        self.sqlx_logging = enabled;
        self
    }
}
