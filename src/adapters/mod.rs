//! Concrete adapter implementations for ports.

pub mod env_config_adapter;
pub mod file_config_adapter;
pub mod nse_fetcher;
#[cfg(feature = "postgres")]
pub mod postgres_adapter;
#[cfg(feature = "sqlite")]
pub mod sqlite_adapter;

use crate::domain::config::{DatabaseBackend, RefreshConfig};
use crate::domain::error::HolidayError;
use crate::ports::store_port::HolidayStore;

/// Opens the store for the configured backend.
pub fn open_store(config: &RefreshConfig) -> Result<Box<dyn HolidayStore>, HolidayError> {
    match &config.backend {
        #[cfg(feature = "postgres")]
        DatabaseBackend::Postgres { url } => Ok(Box::new(
            postgres_adapter::PostgresHolidayStore::connect(url)?,
        )),
        #[cfg(feature = "sqlite")]
        DatabaseBackend::SqliteFile { path } => Ok(Box::new(
            sqlite_adapter::SqliteHolidayStore::open(path, config.sqlite_pool_size)?,
        )),
        #[cfg(feature = "sqlite")]
        DatabaseBackend::SqliteMemory => Ok(Box::new(sqlite_adapter::SqliteHolidayStore::in_memory()?)),
        #[allow(unreachable_patterns)]
        other => Err(HolidayError::ConfigInvalid {
            section: "database".into(),
            key: "url".into(),
            reason: format!("{} support is not compiled in", other.kind()),
        }),
    }
}
