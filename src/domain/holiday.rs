//! Trading holiday representation.

use crate::domain::error::HolidayError;
use chrono::NaiveDate;
use serde::Deserialize;

/// Date format used by the holiday source, e.g. `26-Jan-2024`.
pub const SOURCE_DATE_FORMAT: &str = "%d-%b-%Y";

/// Date format used for stored dates, e.g. `2024-01-26`.
pub const STORE_DATE_FORMAT: &str = "%Y-%m-%d";

/// One record of the holiday source payload. Unknown fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawHolidayRecord {
    #[serde(rename = "tradingDate", default)]
    pub trading_date: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Holiday {
    pub date: NaiveDate,
    pub title: String,
}

impl Holiday {
    pub fn new(date: NaiveDate, title: impl Into<String>) -> Self {
        Self {
            date,
            title: title.into(),
        }
    }

    /// Builds a holiday from a source record.
    ///
    /// A date that does not match [`SOURCE_DATE_FORMAT`] is an error: it means
    /// the upstream format changed and the run must not continue silently.
    pub fn from_record(record: &RawHolidayRecord) -> Result<Self, HolidayError> {
        let date = NaiveDate::parse_from_str(&record.trading_date, SOURCE_DATE_FORMAT).map_err(
            |e: chrono::ParseError| HolidayError::DateParse {
                value: record.trading_date.clone(),
                reason: e.to_string(),
            },
        )?;
        Ok(Self::new(date, record.description.as_str()))
    }

    /// `YYYY-MM-DD`
    pub fn date_key(&self) -> String {
        format_store_date(self.date)
    }

    /// Title with carriage returns removed.
    pub fn persisted_title(&self) -> String {
        self.title.replace('\r', "")
    }
}

pub fn format_store_date(date: NaiveDate) -> String {
    date.format(STORE_DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date: &str, description: &str) -> RawHolidayRecord {
        RawHolidayRecord {
            trading_date: date.into(),
            description: description.into(),
        }
    }

    #[test]
    fn from_record_parses_source_format() {
        let h = Holiday::from_record(&record("26-Jan-2024", "Republic Day")).unwrap();
        assert_eq!(h.date, NaiveDate::from_ymd_opt(2024, 1, 26).unwrap());
        assert_eq!(h.title, "Republic Day");
    }

    #[test]
    fn from_record_accepts_single_digit_day() {
        let h = Holiday::from_record(&record("8-Mar-2024", "Mahashivratri")).unwrap();
        assert_eq!(h.date, NaiveDate::from_ymd_opt(2024, 3, 8).unwrap());
    }

    #[test]
    fn from_record_rejects_iso_date() {
        let err = Holiday::from_record(&record("2024-01-26", "Republic Day")).unwrap_err();
        match err {
            HolidayError::DateParse { value, .. } => assert_eq!(value, "2024-01-26"),
            other => panic!("expected DateParse, got: {other}"),
        }
    }

    #[test]
    fn from_record_rejects_missing_date() {
        let err = Holiday::from_record(&record("", "Holi")).unwrap_err();
        assert!(matches!(err, HolidayError::DateParse { .. }));
    }

    #[test]
    fn raw_record_ignores_extra_fields() {
        let json = r#"{"tradingDate":"25-Mar-2024","weekDay":"Monday","description":"Holi","Sr_no":3}"#;
        let rec: RawHolidayRecord = serde_json::from_str(json).unwrap();
        assert_eq!(rec.trading_date, "25-Mar-2024");
        assert_eq!(rec.description, "Holi");
    }

    #[test]
    fn persisted_title_strips_carriage_returns() {
        let h = Holiday::new(NaiveDate::from_ymd_opt(2024, 4, 11).unwrap(), "Id-Ul-Fitr\r (Ramadan Eid)\r");
        assert_eq!(h.persisted_title(), "Id-Ul-Fitr (Ramadan Eid)");
    }

    #[test]
    fn date_key_is_iso() {
        let h = Holiday::new(NaiveDate::from_ymd_opt(2024, 3, 8).unwrap(), "Holi");
        assert_eq!(h.date_key(), "2024-03-08");
    }
}
