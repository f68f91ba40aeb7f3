//! Environment variable configuration adapter.
//!
//! `(section, key)` is looked up as `SECTION_KEY` in upper case, so
//! `("database", "url")` reads `DATABASE_URL`.

use crate::ports::config_port::ConfigPort;
use std::collections::HashMap;

pub struct EnvConfigAdapter {
    vars: HashMap<String, String>,
}

impl EnvConfigAdapter {
    /// Snapshot of the process environment, after loading `.env` if present.
    pub fn from_env() -> Self {
        match dotenvy::dotenv() {
            Ok(path) => tracing::debug!(path = %path.display(), "loaded .env"),
            Err(e) if e.not_found() => {}
            Err(e) => tracing::warn!(error = %e, "ignoring unreadable .env"),
        }
        Self::from_vars(std::env::vars())
    }

    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: vars
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn var_name(section: &str, key: &str) -> String {
        format!("{section}_{key}").to_uppercase()
    }
}

impl ConfigPort for EnvConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.vars
            .get(&Self::var_name(section, key))
            .filter(|v| !v.is_empty())
            .cloned()
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.get_string(section, key)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }
}
