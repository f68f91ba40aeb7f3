//! Holiday persistence port trait.

use crate::domain::error::HolidayError;
use crate::domain::holiday::Holiday;

pub trait HolidayStore {
    /// Inserts holidays whose date is not stored yet, in one transaction.
    /// Returns the number of rows inserted.
    fn store_holidays(&mut self, holidays: &[Holiday]) -> Result<usize, HolidayError>;

    /// All stored dates as `YYYY-MM-DD`, read from storage rather than the cache.
    fn query_existing_holiday_dates(&self) -> Result<Vec<String>, HolidayError>;

    /// Stored holidays ordered by date.
    fn list_holidays(&self) -> Result<Vec<Holiday>, HolidayError>;
}
