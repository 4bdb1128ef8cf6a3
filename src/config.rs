use chrono::NaiveDate;
use std::path::PathBuf;
use std::time::Duration;

/// Default Wolt API host
pub const WOLT_API_BASE: &str = "https://restaurant-api.wolt.com";

/// First day covered by the weekly order report
pub const REPORT_START_DATE: &str = "2019-10-10";

/// Runtime configuration for one pipeline run
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_base: String,
    pub cache_path: PathBuf,   // JSON cache, the only state kept between runs
    pub database_url: String,  // Recreated on every run
    pub report_path: PathBuf,
    pub page_size: usize,
    pub page_delay: Duration, // Pause between two page requests
    pub request_timeout: Duration,
    pub report_start_date: NaiveDate,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base: WOLT_API_BASE.to_string(),
            cache_path: PathBuf::from("orders.json"),
            database_url: "sqlite://wolt.db".to_string(),
            report_path: PathBuf::from("wolt.html"),
            page_size: 50,
            page_delay: Duration::from_secs(1),
            request_timeout: Duration::from_secs(10),
            report_start_date: NaiveDate::parse_from_str(REPORT_START_DATE, "%Y-%m-%d")
                .unwrap_or_default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// Unset variables keep their default; invalid values are logged and
    /// ignored.
    pub fn from_env() -> AppConfig {
        let mut config = AppConfig::default();

        if let Ok(base) = std::env::var("WOLT_API_BASE") {
            let base = base.trim_end_matches('/');
            if base.starts_with("http://") || base.starts_with("https://") {
                config.api_base = base.to_string();
            } else {
                tracing::warn!(
                    "Invalid WOLT_API_BASE value: {} (must be an http(s) URL), using default: {}",
                    base,
                    config.api_base
                );
            }
        }

        if let Ok(path) = std::env::var("WOLT_CACHE_PATH") {
            if !path.is_empty() {
                config.cache_path = PathBuf::from(path);
            }
        }

        if let Ok(url) = std::env::var("DATABASE_URL") {
            if !url.is_empty() {
                config.database_url = url;
            }
        }

        if let Ok(path) = std::env::var("WOLT_REPORT_PATH") {
            if !path.is_empty() {
                config.report_path = PathBuf::from(path);
            }
        }

        if let Ok(size) = std::env::var("WOLT_PAGE_SIZE") {
            match size.parse::<usize>() {
                Ok(value) if value > 0 => config.page_size = value,
                _ => {
                    tracing::warn!(
                        "Invalid WOLT_PAGE_SIZE value: {} (must be a positive integer), using default: {}",
                        size,
                        config.page_size
                    );
                }
            }
        }

        if let Ok(delay) = std::env::var("WOLT_PAGE_DELAY_MS") {
            match delay.parse::<u64>() {
                Ok(value) => config.page_delay = Duration::from_millis(value),
                Err(e) => {
                    tracing::warn!(
                        "Invalid WOLT_PAGE_DELAY_MS value: {} ({}), using default: {:?}",
                        delay,
                        e,
                        config.page_delay
                    );
                }
            }
        }

        if let Ok(timeout) = std::env::var("WOLT_REQUEST_TIMEOUT_SECS") {
            match timeout.parse::<u64>() {
                Ok(value) if value > 0 => config.request_timeout = Duration::from_secs(value),
                _ => {
                    tracing::warn!(
                        "Invalid WOLT_REQUEST_TIMEOUT_SECS value: {}, using default: {:?}",
                        timeout,
                        config.request_timeout
                    );
                }
            }
        }

        if let Ok(start) = std::env::var("WOLT_REPORT_START_DATE") {
            match NaiveDate::parse_from_str(&start, "%Y-%m-%d") {
                Ok(date) => config.report_start_date = date,
                Err(e) => {
                    tracing::warn!(
                        "Failed to parse WOLT_REPORT_START_DATE '{}': {}, using default: {}",
                        start,
                        e,
                        config.report_start_date
                    );
                }
            }
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.api_base, WOLT_API_BASE);
        assert_eq!(config.cache_path, PathBuf::from("orders.json"));
        assert_eq!(config.database_url, "sqlite://wolt.db");
        assert_eq!(config.report_path, PathBuf::from("wolt.html"));
        assert_eq!(config.page_size, 50);
        assert_eq!(config.page_delay, Duration::from_secs(1));
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.report_start_date.to_string(), REPORT_START_DATE);
    }

    #[test]
    fn test_from_env_overrides_and_rejects() {
        // Single test touching the environment so nothing races on these vars
        std::env::set_var("WOLT_PAGE_SIZE", "20");
        std::env::set_var("WOLT_REPORT_START_DATE", "2021-01-04");
        std::env::set_var("WOLT_REQUEST_TIMEOUT_SECS", "0");
        std::env::set_var("WOLT_API_BASE", "not-a-url");
        std::env::set_var("WOLT_PAGE_DELAY_MS", "soon");

        let config = AppConfig::from_env();
        assert_eq!(config.page_size, 20);
        assert_eq!(config.report_start_date.to_string(), "2021-01-04");
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.api_base, WOLT_API_BASE);
        assert_eq!(config.page_delay, Duration::from_secs(1));

        std::env::set_var("WOLT_PAGE_DELAY_MS", "250");
        assert_eq!(AppConfig::from_env().page_delay, Duration::from_millis(250));

        std::env::remove_var("WOLT_PAGE_SIZE");
        std::env::remove_var("WOLT_REPORT_START_DATE");
        std::env::remove_var("WOLT_REQUEST_TIMEOUT_SECS");
        std::env::remove_var("WOLT_API_BASE");
        std::env::remove_var("WOLT_PAGE_DELAY_MS");
    }
}
