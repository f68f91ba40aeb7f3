//! Holiday source port trait.

use crate::domain::error::HolidayError;
use crate::domain::holiday::Holiday;

/// Result of asking a source for its holiday calendar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Fetched(Vec<Holiday>),
    /// The source could not be reached or answered with a non-success
    /// status. `status` is `None` for transport failures.
    Unavailable { status: Option<u16>, reason: String },
}

impl FetchOutcome {
    pub fn is_unavailable(&self) -> bool {
        matches!(self, FetchOutcome::Unavailable { .. })
    }

    /// Collapses the outcome to a list; an unavailable source yields no holidays.
    pub fn into_holidays(self) -> Vec<Holiday> {
        match self {
            FetchOutcome::Fetched(holidays) => holidays,
            FetchOutcome::Unavailable { .. } => Vec::new(),
        }
    }
}

pub trait HolidayFetcher {
    fn fetch_holidays(&self) -> Result<FetchOutcome, HolidayError>;
}
