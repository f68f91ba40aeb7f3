//! Selection of holidays not yet present in a store.
//!
//! Adapters keep an [`ExistingDates`] cache loaded once at construction and
//! hand it the fetched holidays; what comes back is exactly the set of rows
//! to insert in the next transaction.

use crate::domain::error::HolidayError;
use crate::domain::holiday::Holiday;
use std::collections::HashSet;

/// In-memory set of stored dates, `YYYY-MM-DD`.
///
/// The cache is refreshed only when empty. Dates inserted through the owning
/// store are not added back, so two separate store calls carrying the same
/// date can both try to insert it.
#[derive(Debug, Clone, Default)]
pub struct ExistingDates {
    dates: HashSet<String>,
}

impl ExistingDates {
    pub fn from_dates(dates: Vec<String>) -> Self {
        Self {
            dates: dates.into_iter().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn replace(&mut self, dates: Vec<String>) {
        self.dates = dates.into_iter().collect();
    }

    /// Returns the holidays to insert, titles already cleaned.
    ///
    /// `reload` is consulted once if the cache is empty. Input order is kept
    /// and only the first holiday for a given date survives.
    pub fn select_new<F>(
        &mut self,
        holidays: &[Holiday],
        reload: F,
    ) -> Result<Vec<Holiday>, HolidayError>
    where
        F: FnOnce() -> Result<Vec<String>, HolidayError>,
    {
        if self.is_empty() && !holidays.is_empty() {
            self.replace(reload()?);
        }
        Ok(select_new_holidays(holidays, &self.dates))
    }
}

pub fn select_new_holidays(holidays: &[Holiday], existing: &HashSet<String>) -> Vec<Holiday> {
    let mut queued = HashSet::new();
    let mut selected = Vec::new();

    for holiday in holidays {
        let key = holiday.date_key();
        if existing.contains(&key) || !queued.insert(key) {
            continue;
        }
        selected.push(Holiday::new(holiday.date, holiday.persisted_title()));
    }

    selected
}
