use crate::errors::Error;
use std::time::Duration;

/// Default simulated processing time per task
const DEFAULT_PROCESSING_DELAY: &str = "3s";
/// Default number of workers draining the queue
const DEFAULT_WORKER_COUNT: usize = 4;
/// Default port for the HTTP API
const DEFAULT_API_PORT: u16 = 3000;
/// Default path of the SQLite database file
const DEFAULT_DATABASE_PATH: &str = "taskqd.db";

/// Runtime settings for the service, loaded from the environment
///
/// Every variable has a default, so the service starts with no environment
/// at all; a `.env` file is honored when present.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Deployment environment name ("dev", "stag", "prod")
    pub app_env: String,
    /// Logging verbosity passed to the tracing filter
    pub log_level: String,
    /// Path of the SQLite database file
    pub database_path: String,
    /// Port the HTTP API listens on
    pub api_port: u16,
    /// Number of workers draining the queue
    pub worker_count: usize,
    /// Duration of the simulated workload per task
    pub processing_delay: Duration,
}

impl Settings {
    /// Loads settings from process environment variables, falling back to
    /// defaults for unset ones
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` when a set variable fails to parse
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let api_port = match lookup("API_PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|e| Error::Config(format!("API_PORT: {}", e)))?,
            None => DEFAULT_API_PORT,
        };
        let worker_count = match lookup("WORKER_COUNT") {
            Some(raw) => raw
                .parse::<usize>()
                .map_err(|e| Error::Config(format!("WORKER_COUNT: {}", e)))?,
            None => DEFAULT_WORKER_COUNT,
        };
        let raw_delay =
            lookup("PROCESSING_DELAY").unwrap_or_else(|| DEFAULT_PROCESSING_DELAY.to_string());
        let processing_delay = humantime::parse_duration(&raw_delay)
            .map_err(|e| Error::Config(format!("PROCESSING_DELAY: {}", e)))?;

        Ok(Self {
            app_env: lookup("APP_ENV").unwrap_or_else(|| "dev".to_string()),
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            database_path: lookup("DATABASE_PATH")
                .unwrap_or_else(|| DEFAULT_DATABASE_PATH.to_string()),
            api_port,
            worker_count,
            processing_delay,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings_from(vars: &[(&str, &str)]) -> Result<Settings, Error> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn default_values() {
        let settings = settings_from(&[]).unwrap();
        assert_eq!(settings.app_env, "dev");
        assert_eq!(settings.log_level, "info");
        assert_eq!(settings.database_path, "taskqd.db");
        assert_eq!(settings.api_port, 3000);
        assert_eq!(settings.worker_count, 4);
        assert_eq!(settings.processing_delay, Duration::from_secs(3));
    }

    #[test]
    fn overridden_values() {
        let settings = settings_from(&[
            ("APP_ENV", "prod"),
            ("LOG_LEVEL", "warn"),
            ("DATABASE_PATH", "/var/lib/taskqd/tasks.db"),
            ("API_PORT", "8080"),
            ("WORKER_COUNT", "16"),
            ("PROCESSING_DELAY", "250ms"),
        ])
        .unwrap();
        assert_eq!(settings.app_env, "prod");
        assert_eq!(settings.log_level, "warn");
        assert_eq!(settings.database_path, "/var/lib/taskqd/tasks.db");
        assert_eq!(settings.api_port, 8080);
        assert_eq!(settings.worker_count, 16);
        assert_eq!(settings.processing_delay, Duration::from_millis(250));
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(matches!(
            settings_from(&[("API_PORT", "eighty")]).unwrap_err(),
            Error::Config(_)
        ));
        assert!(matches!(
            settings_from(&[("PROCESSING_DELAY", "soon")]).unwrap_err(),
            Error::Config(_)
        ));
    }
}
