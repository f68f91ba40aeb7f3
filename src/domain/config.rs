//! Refresh configuration, built once per process from a [`ConfigPort`].

use crate::domain::error::HolidayError;
use crate::ports::config_port::ConfigPort;

pub const DEFAULT_SOURCE_URL: &str = "https://www.nseindia.com/api/holiday-master?type=trading";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0.0.0 Safari/537.36";
pub const DEFAULT_SEGMENT: &str = "FO";
pub const DEFAULT_SQLITE_POOL_SIZE: i64 = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceConfig {
    pub url: String,
    pub user_agent: String,
    /// Key of the payload array holding the holiday records.
    pub segment: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_SOURCE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            segment: DEFAULT_SEGMENT.to_string(),
        }
    }
}

/// Storage backend selected by the database URL scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseBackend {
    Postgres { url: String },
    SqliteFile { path: String },
    SqliteMemory,
}

impl DatabaseBackend {
    /// A `+driver` suffix on the scheme (`postgresql+psycopg2://`) is
    /// accepted and dropped.
    pub fn from_url(url: &str) -> Result<Self, HolidayError> {
        let url = strip_driver_suffix(url);
        if url.starts_with("postgres://") || url.starts_with("postgresql://") {
            return Ok(DatabaseBackend::Postgres { url });
        }
        if url == "sqlite::memory:" {
            return Ok(DatabaseBackend::SqliteMemory);
        }
        if let Some(path) = url.strip_prefix("sqlite://") {
            if path.is_empty() {
                return Err(invalid("database", "url", "sqlite URL has no path"));
            }
            return Ok(DatabaseBackend::SqliteFile {
                path: path.to_string(),
            });
        }
        Err(invalid(
            "database",
            "url",
            "expected a postgres://, postgresql:// or sqlite:// URL",
        ))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            DatabaseBackend::Postgres { .. } => "postgres",
            DatabaseBackend::SqliteFile { .. } | DatabaseBackend::SqliteMemory => "sqlite",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshConfig {
    pub database_url: String,
    pub backend: DatabaseBackend,
    pub sqlite_pool_size: u32,
    pub source: SourceConfig,
}

pub fn build_refresh_config(config: &dyn ConfigPort) -> Result<RefreshConfig, HolidayError> {
    let database_url = config
        .get_string("database", "url")
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| HolidayError::ConfigMissing {
            section: "database".into(),
            key: "url".into(),
        })?;
    let backend = DatabaseBackend::from_url(database_url.trim())?;

    let pool_size = config.get_int("sqlite", "pool_size", DEFAULT_SQLITE_POOL_SIZE);
    if !(1..=u32::MAX as i64).contains(&pool_size) {
        return Err(invalid("sqlite", "pool_size", "pool_size must be at least 1"));
    }

    let defaults = SourceConfig::default();
    let source = SourceConfig {
        url: config.get_string("source", "url").unwrap_or(defaults.url),
        user_agent: config
            .get_string("source", "user_agent")
            .unwrap_or(defaults.user_agent),
        segment: config
            .get_string("source", "segment")
            .unwrap_or(defaults.segment),
    };
    validate_source(&source)?;

    Ok(RefreshConfig {
        database_url: database_url.trim().to_string(),
        backend,
        sqlite_pool_size: pool_size as u32,
        source,
    })
}

fn validate_source(source: &SourceConfig) -> Result<(), HolidayError> {
    if !(source.url.starts_with("http://") || source.url.starts_with("https://")) {
        return Err(invalid("source", "url", "url must be http:// or https://"));
    }
    if source.user_agent.trim().is_empty() {
        return Err(invalid("source", "user_agent", "user_agent must not be empty"));
    }
    if source.segment.trim().is_empty() {
        return Err(invalid("source", "segment", "segment must not be empty"));
    }
    Ok(())
}

fn strip_driver_suffix(url: &str) -> String {
    match url.split_once("://") {
        Some((scheme, rest)) => match scheme.split_once('+') {
            Some((base, _driver)) => format!("{base}://{rest}"),
            None => url.to_string(),
        },
        None => url.to_string(),
    }
}

fn invalid(section: &str, key: &str, reason: &str) -> HolidayError {
    HolidayError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}
