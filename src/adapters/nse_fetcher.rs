//! HTTP holiday source adapter for the NSE holiday-master API.

use crate::domain::config::SourceConfig;
use crate::domain::error::HolidayError;
use crate::domain::holiday::{Holiday, RawHolidayRecord};
use crate::ports::fetch_port::{FetchOutcome, HolidayFetcher};
use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::USER_AGENT;
use serde::Deserialize;
use serde_json::Value;

pub struct NseHolidayFetcher {
    client: Client,
    source: SourceConfig,
}

impl NseHolidayFetcher {
    pub fn new(source: SourceConfig) -> Result<Self, HolidayError> {
        let client = Client::builder()
            .build()
            .map_err(|e: reqwest::Error| HolidayError::Http {
                reason: e.to_string(),
            })?;
        Ok(Self { client, source })
    }

    pub fn source(&self) -> &SourceConfig {
        &self.source
    }
}

impl HolidayFetcher for NseHolidayFetcher {
    fn fetch_holidays(&self) -> Result<FetchOutcome, HolidayError> {
        tracing::debug!(url = %self.source.url, "fetching holiday calendar");

        let response = match self
            .client
            .get(&self.source.url)
            .header(USER_AGENT, &self.source.user_agent)
            .send()
        {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(url = %self.source.url, error = %e, "holiday request failed");
                return Ok(FetchOutcome::Unavailable {
                    status: None,
                    reason: e.to_string(),
                });
            }
        };

        let status = response.status();
        if status != StatusCode::OK {
            tracing::warn!(url = %self.source.url, status = status.as_u16(), "holiday source returned non-OK status");
            return Ok(FetchOutcome::Unavailable {
                status: Some(status.as_u16()),
                reason: status.to_string(),
            });
        }

        let body = match response.text() {
            Ok(b) => b,
            Err(e) => {
                tracing::warn!(url = %self.source.url, error = %e, "failed to read holiday response body");
                return Ok(FetchOutcome::Unavailable {
                    status: Some(status.as_u16()),
                    reason: e.to_string(),
                });
            }
        };

        let holidays = parse_holiday_payload(&body, &self.source.segment)?;
        tracing::info!(count = holidays.len(), segment = %self.source.segment, "fetched holidays");
        Ok(FetchOutcome::Fetched(holidays))
    }
}

/// Parses a holiday-master body: a JSON object whose `segment` key holds an
/// array of records. A missing or null segment yields no holidays.
pub fn parse_holiday_payload(body: &str, segment: &str) -> Result<Vec<Holiday>, HolidayError> {
    let payload: Value = serde_json::from_str(body).map_err(|e| HolidayError::Payload {
        reason: e.to_string(),
    })?;

    let object = payload.as_object().ok_or_else(|| HolidayError::Payload {
        reason: "expected a JSON object at the top level".into(),
    })?;

    let records = match object.get(segment) {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(v) => Vec::<RawHolidayRecord>::deserialize(v).map_err(|e| HolidayError::Payload {
            reason: format!("segment {segment}: {e}"),
        })?,
    };

    records.iter().map(Holiday::from_record).collect()
}
