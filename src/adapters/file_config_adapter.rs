//! INI file configuration adapter.
//!
//! Blank values read as absent so that `url =` falls back to the same
//! default as an omitted key, matching [`super::env_config_adapter`].

use crate::domain::error::HolidayError;
use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

#[derive(Debug)]
pub struct FileConfigAdapter {
    ini: Ini,
    origin: String,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, HolidayError> {
        let origin = path.as_ref().display().to_string();
        let mut ini = Ini::new();
        ini.load(path.as_ref())
            .map_err(|reason| HolidayError::ConfigParse {
                file: origin.clone(),
                reason,
            })?;
        Ok(Self { ini, origin })
    }

    pub fn from_string(content: &str) -> Result<Self, HolidayError> {
        let origin = "<inline>".to_string();
        let mut ini = Ini::new();
        ini.read(content.to_string())
            .map_err(|reason| HolidayError::ConfigParse {
                file: origin.clone(),
                reason,
            })?;
        Ok(Self { ini, origin })
    }

    /// Path the values were read from, or `<inline>`.
    pub fn origin(&self) -> &str {
        &self.origin
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.ini
            .get(section, key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        match self.ini.getint(section, key) {
            Ok(Some(value)) => value,
            Ok(None) => default,
            Err(reason) => {
                tracing::warn!(
                    file = %self.origin,
                    section,
                    key,
                    %reason,
                    default,
                    "ignoring non-integer config value"
                );
                default
            }
        }
    }
}
