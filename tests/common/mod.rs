#![allow(dead_code)]

use chrono::NaiveDate;
use holiday_refresh::domain::config::SourceConfig;
use holiday_refresh::domain::error::HolidayError;
pub use holiday_refresh::domain::holiday::Holiday;
use holiday_refresh::ports::fetch_port::{FetchOutcome, HolidayFetcher};

pub struct MockFetcher {
    pub outcome: FetchOutcome,
}

impl MockFetcher {
    pub fn with_holidays(holidays: Vec<Holiday>) -> Self {
        Self {
            outcome: FetchOutcome::Fetched(holidays),
        }
    }

    pub fn unavailable(status: u16) -> Self {
        Self {
            outcome: FetchOutcome::Unavailable {
                status: Some(status),
                reason: format!("status {status}"),
            },
        }
    }
}

impl HolidayFetcher for MockFetcher {
    fn fetch_holidays(&self) -> Result<FetchOutcome, HolidayError> {
        Ok(self.outcome.clone())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn holiday(y: i32, m: u32, d: u32, title: &str) -> Holiday {
    Holiday::new(date(y, m, d), title)
}

pub fn source_for(server: &mockito::Server) -> SourceConfig {
    SourceConfig {
        url: format!("{}/api/holiday-master?type=trading", server.url()),
        user_agent: "holiday-refresh-it/1.0".into(),
        segment: "FO".into(),
    }
}

/// Holiday-master body with `(tradingDate, description)` pairs under `FO`.
pub fn payload(records: &[(&str, &str)]) -> String {
    let fo: Vec<serde_json::Value> = records
        .iter()
        .enumerate()
        .map(|(i, (d, t))| {
            serde_json::json!({
                "Sr_no": i + 1,
                "tradingDate": d,
                "weekDay": "Friday",
                "description": t,
                "morning_session": "",
                "evening_session": ""
            })
        })
        .collect();
    serde_json::json!({ "CM": [], "FO": fo }).to_string()
}
