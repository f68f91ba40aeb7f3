//! PostgreSQL holiday store adapter.
//!
//! Expects an existing `holidays` table:
//! `id SERIAL PRIMARY KEY, date DATE NOT NULL UNIQUE, title VARCHAR(100) NOT NULL`.

use crate::domain::dedup::ExistingDates;
use crate::domain::error::HolidayError;
use crate::domain::holiday::{Holiday, format_store_date};
use crate::ports::store_port::HolidayStore;
use chrono::NaiveDate;
use postgres::{Client, NoTls};
use std::cell::RefCell;

pub struct PostgresHolidayStore {
    client: RefCell<Client>,
    existing: ExistingDates,
}

impl PostgresHolidayStore {
    pub fn connect(url: &str) -> Result<Self, HolidayError> {
        let client = Client::connect(url, NoTls).map_err(|e| HolidayError::Database {
            reason: e.to_string(),
        })?;

        let mut store = Self {
            client: RefCell::new(client),
            existing: ExistingDates::default(),
        };
        store.reload_existing_dates()?;
        tracing::debug!(cached = store.existing.len(), "connected to postgres holiday store");
        Ok(store)
    }

    pub fn reload_existing_dates(&mut self) -> Result<(), HolidayError> {
        let dates = self.query_existing_holiday_dates()?;
        self.existing.replace(dates);
        Ok(())
    }
}

impl HolidayStore for PostgresHolidayStore {
    fn store_holidays(&mut self, holidays: &[Holiday]) -> Result<usize, HolidayError> {
        let client = &self.client;
        let new_holidays = self
            .existing
            .select_new(holidays, || query_dates(&mut client.borrow_mut()))?;

        let mut client = self.client.borrow_mut();
        let mut tx = client.transaction().map_err(|e| HolidayError::Database {
            reason: e.to_string(),
        })?;

        for holiday in &new_holidays {
            tx.execute(
                "INSERT INTO holidays (date, title) VALUES ($1, $2)",
                &[&holiday.date, &holiday.title],
            )
            .map_err(|e| HolidayError::DatabaseQuery {
                reason: e.to_string(),
            })?;
        }

        tx.commit().map_err(|e| HolidayError::DatabaseQuery {
            reason: e.to_string(),
        })?;

        tracing::debug!(
            received = holidays.len(),
            inserted = new_holidays.len(),
            "stored holidays in postgres"
        );
        Ok(new_holidays.len())
    }

    fn query_existing_holiday_dates(&self) -> Result<Vec<String>, HolidayError> {
        query_dates(&mut self.client.borrow_mut())
    }

    fn list_holidays(&self) -> Result<Vec<Holiday>, HolidayError> {
        let rows = self
            .client
            .borrow_mut()
            .query("SELECT date, title FROM holidays ORDER BY date ASC", &[])
            .map_err(|e| HolidayError::DatabaseQuery {
                reason: e.to_string(),
            })?;

        Ok(rows
            .into_iter()
            .map(|row| Holiday::new(row.get::<_, NaiveDate>(0), row.get::<_, String>(1)))
            .collect())
    }
}

fn query_dates(client: &mut Client) -> Result<Vec<String>, HolidayError> {
    let rows = client
        .query("SELECT date FROM holidays", &[])
        .map_err(|e| HolidayError::DatabaseQuery {
            reason: e.to_string(),
        })?;

    Ok(rows
        .into_iter()
        .map(|row| format_store_date(row.get::<_, NaiveDate>(0)))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connect_rejects_malformed_url() {
        match PostgresHolidayStore::connect("postgres://user@host:notaport/db") {
            Err(HolidayError::Database { .. }) => {}
            Err(other) => panic!("expected Database error, got: {other}"),
            Ok(_) => panic!("expected error, got Ok"),
        }
    }

    /// Needs a reachable database with the `holidays` table:
    /// `HOLIDAYS_TEST_DATABASE_URL=postgres://... cargo test -- --ignored`
    #[test]
    #[ignore]
    fn store_round_trip_against_live_database() {
        let url = std::env::var("HOLIDAYS_TEST_DATABASE_URL").unwrap();
        let mut store = PostgresHolidayStore::connect(&url).unwrap();
        store
            .client
            .borrow_mut()
            .execute("DELETE FROM holidays WHERE date = '2099-01-26'", &[])
            .unwrap();
        store.reload_existing_dates().unwrap();

        let holiday = Holiday::new(NaiveDate::from_ymd_opt(2099, 1, 26).unwrap(), "Republic Day\r");
        assert_eq!(store.store_holidays(&[holiday.clone(), holiday]).unwrap(), 1);

        let dates = store.query_existing_holiday_dates().unwrap();
        assert!(dates.contains(&"2099-01-26".to_string()));
    }
}
