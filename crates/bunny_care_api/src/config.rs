use std::path::PathBuf;

use thiserror::Error;

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";

/// Startup-only failures: configuration is read once in `main`, before any
/// request exists, so these never map to an HTTP response.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),
    #[error("PORT is not a valid port: '{0}'")]
    InvalidPort(String),
}

#[derive(Clone, Debug)]
pub struct Config {
    pub database_path: PathBuf,
    pub host: String,
    pub port: u16,
    pub cors_origin: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_with(|k| std::env::var(k).ok())
    }

    /// Testable helper that reads configuration values using the provided
    /// function. This avoids mutating global environment in tests and keeps
    /// `from_env()` small and safe.
    pub fn from_env_with<F>(mut get: F) -> Result<Self, ConfigError>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let database_path = get("DATABASE_PATH").ok_or(ConfigError::Missing("DATABASE_PATH"))?;
        let port = match get("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };
        let host = get("HOST").unwrap_or_else(|| DEFAULT_HOST.into());
        let cors_origin = get("CORS_ORIGIN").unwrap_or_else(|| DEFAULT_CORS_ORIGIN.into());

        Ok(Self {
            database_path: PathBuf::from(database_path),
            host,
            port,
            cors_origin,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_env_missing_database_path() {
        let get = |k: &str| match k {
            "PORT" => Some("8080".into()),
            _ => None,
        };
        let err = Config::from_env_with(get).unwrap_err();
        assert_eq!(err, ConfigError::Missing("DATABASE_PATH"));
        assert_eq!(err.to_string(), "DATABASE_PATH is not set");
    }

    #[test]
    fn from_env_applies_defaults() {
        let get = |k: &str| match k {
            "DATABASE_PATH" => Some("/tmp/care.db".into()),
            _ => None,
        };
        let cfg = Config::from_env_with(get).expect("cfg");
        assert_eq!(cfg.port, 5000);
        assert_eq!(cfg.host, "127.0.0.1");
        assert_eq!(cfg.cors_origin, "http://localhost:3000");
    }

    #[test]
    fn from_env_reads_values() {
        let get = |k: &str| match k {
            "DATABASE_PATH" => Some("data/care.db".into()),
            "PORT" => Some("9100".into()),
            "HOST" => Some("0.0.0.0".into()),
            "CORS_ORIGIN" => Some("https://carrots.example".into()),
            _ => None,
        };
        let cfg = Config::from_env_with(get).expect("cfg");
        assert_eq!(cfg.database_path, PathBuf::from("data/care.db"));
        assert_eq!(cfg.port, 9100);
        assert_eq!(cfg.cors_origin, "https://carrots.example");
    }

    #[test]
    fn from_env_rejects_bad_port() {
        let get = |k: &str| match k {
            "DATABASE_PATH" => Some("/tmp/care.db".into()),
            "PORT" => Some("carrot".into()),
            _ => None,
        };
        let err = Config::from_env_with(get).unwrap_err();
        assert_eq!(err, ConfigError::InvalidPort("carrot".into()));
    }
}
