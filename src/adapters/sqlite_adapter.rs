//! SQLite holiday store adapter.

use crate::domain::dedup::ExistingDates;
use crate::domain::error::HolidayError;
use crate::domain::holiday::{Holiday, STORE_DATE_FORMAT};
use crate::ports::store_port::HolidayStore;
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::params;

pub struct SqliteHolidayStore {
    pool: Pool<SqliteConnectionManager>,
    existing: ExistingDates,
}

impl SqliteHolidayStore {
    /// Opens (creating if needed) a database file and loads the date cache.
    pub fn open(path: &str, pool_size: u32) -> Result<Self, HolidayError> {
        let manager = SqliteConnectionManager::file(path);
        let pool = Pool::builder()
            .max_size(pool_size)
            .build(manager)
            .map_err(|e: r2d2::Error| HolidayError::Database {
                reason: e.to_string(),
            })?;
        Self::with_pool(pool)
    }

    pub fn in_memory() -> Result<Self, HolidayError> {
        let manager = SqliteConnectionManager::memory();
        let pool = Pool::builder()
            .max_size(1)
            .build(manager)
            .map_err(|e: r2d2::Error| HolidayError::Database {
                reason: e.to_string(),
            })?;
        Self::with_pool(pool)
    }

    fn with_pool(pool: Pool<SqliteConnectionManager>) -> Result<Self, HolidayError> {
        let mut store = Self {
            pool,
            existing: ExistingDates::default(),
        };
        store.initialize_schema()?;
        store.reload_existing_dates()?;
        Ok(store)
    }

    fn conn(&self) -> Result<PooledConnection<SqliteConnectionManager>, HolidayError> {
        self.pool.get().map_err(|e: r2d2::Error| HolidayError::Database {
            reason: e.to_string(),
        })
    }

    pub fn initialize_schema(&self) -> Result<(), HolidayError> {
        let conn = self.conn()?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS holidays (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                date TEXT NOT NULL UNIQUE,
                title VARCHAR(100) NOT NULL
            );
            CREATE INDEX IF NOT EXISTS ix_holidays_date ON holidays(date);",
        )
        .map_err(|e: rusqlite::Error| HolidayError::DatabaseQuery {
            reason: e.to_string(),
        })?;
        Ok(())
    }

    /// Replaces the cached date set with what is currently stored.
    pub fn reload_existing_dates(&mut self) -> Result<(), HolidayError> {
        let dates = self.query_existing_holiday_dates()?;
        self.existing.replace(dates);
        Ok(())
    }

    pub fn cached_date_count(&self) -> usize {
        self.existing.len()
    }
}

impl HolidayStore for SqliteHolidayStore {
    fn store_holidays(&mut self, holidays: &[Holiday]) -> Result<usize, HolidayError> {
        let pool = self.pool.clone();
        let new_holidays = self.existing.select_new(holidays, || {
            let conn = pool.get().map_err(|e: r2d2::Error| HolidayError::Database {
                reason: e.to_string(),
            })?;
            query_dates(&conn)
        })?;

        let mut conn = self.conn()?;
        let tx = conn
            .transaction()
            .map_err(|e: rusqlite::Error| HolidayError::DatabaseQuery {
                reason: e.to_string(),
            })?;

        for holiday in &new_holidays {
            tx.execute(
                "INSERT INTO holidays (date, title) VALUES (?1, ?2)",
                params![holiday.date_key(), holiday.title],
            )
            .map_err(|e: rusqlite::Error| HolidayError::DatabaseQuery {
                reason: e.to_string(),
            })?;
        }

        tx.commit()
            .map_err(|e: rusqlite::Error| HolidayError::DatabaseQuery {
                reason: e.to_string(),
            })?;

        tracing::debug!(
            received = holidays.len(),
            inserted = new_holidays.len(),
            "stored holidays in sqlite"
        );
        Ok(new_holidays.len())
    }

    fn query_existing_holiday_dates(&self) -> Result<Vec<String>, HolidayError> {
        let conn = self.conn()?;
        query_dates(&conn)
    }

    fn list_holidays(&self) -> Result<Vec<Holiday>, HolidayError> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare("SELECT date, title FROM holidays ORDER BY date ASC")
            .map_err(|e: rusqlite::Error| HolidayError::DatabaseQuery {
                reason: e.to_string(),
            })?;

        let rows = stmt
            .query_map([], |row| {
                let date_str: String = row.get(0)?;
                let date = chrono::NaiveDate::parse_from_str(&date_str, STORE_DATE_FORMAT)
                    .map_err(|e| {
                        rusqlite::Error::FromSqlConversionFailure(
                            date_str.len(),
                            rusqlite::types::Type::Text,
                            Box::new(e),
                        )
                    })?;
                Ok(Holiday::new(date, row.get::<_, String>(1)?))
            })
            .map_err(|e: rusqlite::Error| HolidayError::DatabaseQuery {
                reason: e.to_string(),
            })?;

        let mut holidays = Vec::new();
        for row in rows {
            holidays.push(row.map_err(|e: rusqlite::Error| HolidayError::DatabaseQuery {
                reason: e.to_string(),
            })?);
        }
        Ok(holidays)
    }
}

fn query_dates(conn: &rusqlite::Connection) -> Result<Vec<String>, HolidayError> {
    let mut stmt = conn
        .prepare("SELECT date FROM holidays")
        .map_err(|e: rusqlite::Error| HolidayError::DatabaseQuery {
            reason: e.to_string(),
        })?;

    let rows = stmt
        .query_map([], |row| row.get::<_, String>(0))
        .map_err(|e: rusqlite::Error| HolidayError::DatabaseQuery {
            reason: e.to_string(),
        })?;

    let mut dates = Vec::new();
    for row in rows {
        dates.push(row.map_err(|e: rusqlite::Error| HolidayError::DatabaseQuery {
            reason: e.to_string(),
        })?);
    }
    Ok(dates)
}
