//! Refresh pipeline: fetch from a source, persist what is new.

use crate::domain::error::HolidayError;
use crate::ports::fetch_port::{FetchOutcome, HolidayFetcher};
use crate::ports::store_port::HolidayStore;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefreshReport {
    pub fetched: usize,
    pub inserted: usize,
    /// Set when the source could not be read; the run stored nothing.
    pub unavailable: Option<String>,
}

impl RefreshReport {
    pub fn source_unavailable(&self) -> bool {
        self.unavailable.is_some()
    }
}

pub fn refresh_holidays(
    fetcher: &dyn HolidayFetcher,
    store: &mut dyn HolidayStore,
) -> Result<RefreshReport, HolidayError> {
    let outcome = fetcher.fetch_holidays()?;

    let unavailable = match &outcome {
        FetchOutcome::Unavailable { reason, .. } => {
            tracing::debug!(reason = %reason, "holiday source unavailable, nothing to store");
            Some(reason.clone())
        }
        FetchOutcome::Fetched(_) => None,
    };

    let holidays = outcome.into_holidays();
    let inserted = store.store_holidays(&holidays)?;
    tracing::info!(fetched = holidays.len(), inserted, "holiday refresh complete");

    Ok(RefreshReport {
        fetched: holidays.len(),
        inserted,
        unavailable,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::holiday::Holiday;
    use chrono::NaiveDate;

    /// `None` simulates an upstream format change.
    struct FixedFetcher(Option<FetchOutcome>);

    impl HolidayFetcher for FixedFetcher {
        fn fetch_holidays(&self) -> Result<FetchOutcome, HolidayError> {
            self.0.clone().ok_or_else(|| HolidayError::DateParse {
                value: "2024-03-25".into(),
                reason: "input contains invalid characters".into(),
            })
        }
    }

    #[derive(Default)]
    struct RecordingStore {
        calls: Vec<Vec<Holiday>>,
    }

    impl HolidayStore for RecordingStore {
        fn store_holidays(&mut self, holidays: &[Holiday]) -> Result<usize, HolidayError> {
            self.calls.push(holidays.to_vec());
            Ok(holidays.len())
        }

        fn query_existing_holiday_dates(&self) -> Result<Vec<String>, HolidayError> {
            Ok(Vec::new())
        }

        fn list_holidays(&self) -> Result<Vec<Holiday>, HolidayError> {
            Ok(self.calls.concat())
        }
    }

    fn holi() -> Holiday {
        Holiday::new(NaiveDate::from_ymd_opt(2024, 3, 25).unwrap(), "Holi")
    }

    #[test]
    fn passes_fetched_holidays_to_store() {
        let fetcher = FixedFetcher(Some(FetchOutcome::Fetched(vec![holi()])));
        let mut store = RecordingStore::default();
        let report = refresh_holidays(&fetcher, &mut store).unwrap();
        assert_eq!(store.calls, vec![vec![holi()]]);
        assert_eq!(
            report,
            RefreshReport {
                fetched: 1,
                inserted: 1,
                unavailable: None
            }
        );
    }

    #[test]
    fn unavailable_source_stores_empty_list() {
        let fetcher = FixedFetcher(Some(FetchOutcome::Unavailable {
            status: Some(503),
            reason: "503 Service Unavailable".into(),
        }));
        let mut store = RecordingStore::default();
        let report = refresh_holidays(&fetcher, &mut store).unwrap();
        assert_eq!(store.calls, vec![Vec::<Holiday>::new()]);
        assert!(report.source_unavailable());
        assert_eq!(report.inserted, 0);
    }

    #[test]
    fn fetch_error_skips_store() {
        let fetcher = FixedFetcher(None);
        let mut store = RecordingStore::default();
        let err = refresh_holidays(&fetcher, &mut store).unwrap_err();
        assert!(matches!(err, HolidayError::DateParse { .. }));
        assert!(store.calls.is_empty());
    }

    #[derive(Clone, Default)]
    struct WarnCounter(std::sync::Arc<std::sync::Mutex<usize>>);

    impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for WarnCounter {
        fn on_event(
            &self,
            event: &tracing::Event<'_>,
            _ctx: tracing_subscriber::layer::Context<'_, S>,
        ) {
            if *event.metadata().level() == tracing::Level::WARN {
                *self.0.lock().unwrap() += 1;
            }
        }
    }

    #[test]
    fn unavailable_source_does_not_warn_again() {
        use tracing_subscriber::layer::SubscriberExt;

        let counter = WarnCounter::default();
        let subscriber = tracing_subscriber::registry().with(counter.clone());
        let fetcher = FixedFetcher(Some(FetchOutcome::Unavailable {
            status: Some(403),
            reason: "403 Forbidden".into(),
        }));
        let mut store = RecordingStore::default();

        let report = tracing::subscriber::with_default(subscriber, || {
            refresh_holidays(&fetcher, &mut store).unwrap()
        });

        assert!(report.source_unavailable());
        assert_eq!(*counter.0.lock().unwrap(), 0);
    }
}
