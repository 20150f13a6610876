//! Application settings, read once at startup from the environment (after `.env`).

use crate::error::ConfigError;
use std::str::FromStr;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    pub app_title: String,
    pub app_description: String,
    pub app_version: String,
    pub debug: bool,
    pub host: String,
    pub port: u16,
    /// When set, the demo server keeps entities in PostgreSQL instead of memory.
    pub database_url: Option<String>,
    pub max_body_bytes: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            app_title: "Dynamic Model Management System".into(),
            app_description: "A metadata-driven generic CRUD backend".into(),
            app_version: "1.0.0".into(),
            debug: true,
            host: "0.0.0.0".into(),
            port: 8000,
            database_url: None,
            max_body_bytes: 1024 * 1024,
        }
    }
}

impl Settings {
    /// Load `.env` (if present) and then read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Settings::default();
        Ok(Settings {
            app_title: lookup("APP_TITLE").unwrap_or(defaults.app_title),
            app_description: lookup("APP_DESCRIPTION").unwrap_or(defaults.app_description),
            app_version: lookup("APP_VERSION").unwrap_or(defaults.app_version),
            debug: match lookup("DEBUG") {
                Some(v) => parse_bool("DEBUG", &v)?,
                None => defaults.debug,
            },
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse_or("PORT", lookup("PORT"), defaults.port)?,
            database_url: lookup("DATABASE_URL").filter(|s| !s.trim().is_empty()),
            max_body_bytes: parse_or("MAX_BODY_BYTES", lookup("MAX_BODY_BYTES"), defaults.max_body_bytes)?,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_bool(key: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            key,
            value: raw.to_string(),
            reason: "expected a boolean".into(),
        }),
    }
}

fn parse_or<T>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            value: raw.clone(),
            reason: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let s = Settings::from_lookup(lookup(&[])).unwrap();
        assert_eq!(s, Settings::default());
        assert_eq!(s.bind_addr(), "0.0.0.0:8000");
    }

    #[test]
    fn reads_overrides() {
        let s = Settings::from_lookup(lookup(&[
            ("APP_TITLE", "Staff Directory"),
            ("DEBUG", "false"),
            ("PORT", "9090"),
            ("DATABASE_URL", "postgres://localhost/crud"),
        ]))
        .unwrap();
        assert_eq!(s.app_title, "Staff Directory");
        assert!(!s.debug);
        assert_eq!(s.port, 9090);
        assert_eq!(s.database_url.as_deref(), Some("postgres://localhost/crud"));
    }

    #[test]
    fn rejects_bad_values() {
        let err = Settings::from_lookup(lookup(&[("PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "PORT", .. }));
        let err = Settings::from_lookup(lookup(&[("DEBUG", "maybe")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "DEBUG", .. }));
    }

    #[test]
    fn blank_database_url_is_none() {
        let s = Settings::from_lookup(lookup(&[("DATABASE_URL", "  ")])).unwrap();
        assert!(s.database_url.is_none());
    }
}
