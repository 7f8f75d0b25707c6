//! Runtime configuration read from the environment (and `.env`).

use std::env;
use std::net::SocketAddr;

use thiserror::Error;

pub const DEFAULT_EVENTBUS_URL: &str = "http://127.0.0.1:50057";
pub const DEFAULT_POOL_SIZE: u32 = 10;
pub const DEFAULT_LOG_FILTER: &str = "kanban=info";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} env variable must be set")]
    Missing(&'static str),

    #[error("invalid value for {var}: {message}")]
    Invalid { var: &'static str, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub app_url: SocketAddr,
    pub database_url: String,
    pub eventbus_url: String,
    pub db_pool_size: u32,
    pub log_filter: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let app_url = lookup("APP_URL")
            .ok_or(ConfigError::Missing("APP_URL"))?
            .parse()
            .map_err(|err: std::net::AddrParseError| ConfigError::Invalid {
                var: "APP_URL",
                message: err.to_string(),
            })?;

        let database_url = lookup("DATABASE_URL")
            .filter(|url| !url.is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let db_pool_size = match lookup("DB_POOL_SIZE") {
            Some(raw) => match raw.parse::<u32>() {
                Ok(size) if size > 0 => size,
                _ => {
                    return Err(ConfigError::Invalid {
                        var: "DB_POOL_SIZE",
                        message: format!("expected a positive integer, got '{}'", raw),
                    })
                }
            },
            None => DEFAULT_POOL_SIZE,
        };

        Ok(Config {
            app_url,
            database_url,
            eventbus_url: lookup("EVENTBUS_URL").unwrap_or_else(|| DEFAULT_EVENTBUS_URL.to_string()),
            db_pool_size,
            log_filter: lookup("RUST_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_apply_to_optional_values() {
        let config = Config::from_lookup(lookup(&[
            ("APP_URL", "127.0.0.1:50051"),
            ("DATABASE_URL", "postgres://localhost/kanban"),
        ]))
        .unwrap();

        assert_eq!(config.app_url, "127.0.0.1:50051".parse().unwrap());
        assert_eq!(config.eventbus_url, DEFAULT_EVENTBUS_URL);
        assert_eq!(config.db_pool_size, DEFAULT_POOL_SIZE);
        assert_eq!(config.log_filter, DEFAULT_LOG_FILTER);
    }

    #[test]
    fn missing_database_url_is_reported() {
        let err = Config::from_lookup(lookup(&[("APP_URL", "127.0.0.1:50051")])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("DATABASE_URL"));
    }

    #[test]
    fn malformed_values_are_rejected() {
        let err = Config::from_lookup(lookup(&[
            ("APP_URL", "not an address"),
            ("DATABASE_URL", "postgres://localhost/kanban"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "APP_URL", .. }));

        let err = Config::from_lookup(lookup(&[
            ("APP_URL", "127.0.0.1:50051"),
            ("DATABASE_URL", "postgres://localhost/kanban"),
            ("DB_POOL_SIZE", "0"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "DB_POOL_SIZE", .. }));
    }
}
