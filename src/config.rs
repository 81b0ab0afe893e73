//! Application configuration loaded from environment variables.
//!
//! Every variable is optional:
//! - `TICKERDASH_API_URL`: base URL of the stock-data backend
//! - `TICKERDASH_TICKER`: symbol loaded at startup
//! - `TICKERDASH_LOOKBACK_DAYS`: initial lookback window in days
//! - `TICKERDASH_INTERVAL`: initial sampling interval (e.g. `5m`)
//! - `TICKERDASH_MA_PERIOD`: initial moving-average period
//! - `TICKERDASH_LOG_FILE`: where `tracing` output is written

use std::path::PathBuf;

use crate::DashError;

/// Default backend endpoint.
const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";

/// Default instrument shown at startup.
const DEFAULT_TICKER: &str = "RELIANCE.NS";

const DEFAULT_LOOKBACK_DAYS: u32 = 7;

const DEFAULT_INTERVAL: &str = "5m";

const DEFAULT_MA_PERIOD: usize = 20;

/// Default log destination (the terminal itself belongs to the TUI).
const DEFAULT_LOG_FILE: &str = "tickerdash.log";

/// Top-level application configuration.
#[derive(Debug)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub view: ViewDefaults,
    pub log_file: PathBuf,
}

/// Backend connection settings.
#[derive(Debug)]
pub struct ApiConfig {
    pub base_url: String,
}

/// Initial view parameters applied before the first load.
#[derive(Debug)]
pub struct ViewDefaults {
    pub ticker: String,
    pub lookback_days: u32,
    pub interval: String,
    pub ma_period: usize,
}

/// Loads the application configuration from environment variables.
///
/// Unset or empty variables fall back to their defaults.
///
/// # Errors
///
/// Returns [`DashError::Config`] if the API URL is not an `http(s)` URL or a
/// numeric variable does not parse to a positive integer.
pub fn fetch_config() -> crate::Result<AppConfig> {
    let base_url = non_empty_var("TICKERDASH_API_URL")
        .unwrap_or_else(|| DEFAULT_API_URL.to_string());
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        return Err(DashError::Config(format!(
            "TICKERDASH_API_URL must start with http:// or https://, got {base_url:?}"
        )));
    }

    let ticker = non_empty_var("TICKERDASH_TICKER")
        .map(|t| t.trim().to_uppercase())
        .unwrap_or_else(|| DEFAULT_TICKER.to_string());
    let interval =
        non_empty_var("TICKERDASH_INTERVAL").unwrap_or_else(|| DEFAULT_INTERVAL.to_string());
    let lookback_days = positive_var("TICKERDASH_LOOKBACK_DAYS")?.unwrap_or(DEFAULT_LOOKBACK_DAYS);
    let ma_period = positive_var("TICKERDASH_MA_PERIOD")?.unwrap_or(DEFAULT_MA_PERIOD);
    let log_file = non_empty_var("TICKERDASH_LOG_FILE")
        .unwrap_or_else(|| DEFAULT_LOG_FILE.to_string())
        .into();

    Ok(AppConfig {
        api: ApiConfig {
            base_url: base_url.trim_end_matches('/').to_string(),
        },
        view: ViewDefaults {
            ticker,
            lookback_days,
            interval,
            ma_period,
        },
        log_file,
    })
}

/// Returns the value of an environment variable if it exists and is non-empty.
fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.is_empty())
}

/// Parses an optional strictly positive integer variable.
fn positive_var<T>(name: &str) -> crate::Result<Option<T>>
where
    T: std::str::FromStr + PartialOrd + Default,
{
    let Some(raw) = non_empty_var(name) else {
        return Ok(None);
    };
    match raw.trim().parse::<T>() {
        Ok(value) if value > T::default() => Ok(Some(value)),
        _ => Err(DashError::Config(format!(
            "{name} must be a positive integer, got {raw:?}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_VARS: [&str; 6] = [
        "TICKERDASH_API_URL",
        "TICKERDASH_TICKER",
        "TICKERDASH_LOOKBACK_DAYS",
        "TICKERDASH_INTERVAL",
        "TICKERDASH_MA_PERIOD",
        "TICKERDASH_LOG_FILE",
    ];

    static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

    /// Helper that temporarily sets env vars, runs `f`, then restores originals.
    ///
    /// Variables from [`ALL_VARS`] that are not listed are cleared for the
    /// duration of `f`.
    ///
    /// # Safety
    ///
    /// Callers serialize on [`ENV_LOCK`]; nothing else in the crate reads
    /// these variables from a test thread.
    fn with_env<F: FnOnce()>(vars: &[(&str, Option<&str>)], f: F) {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let originals: Vec<(&str, Option<String>)> = ALL_VARS
            .iter()
            .map(|k| (*k, std::env::var(k).ok()))
            .collect();

        for k in ALL_VARS {
            let value = vars.iter().find(|(name, _)| *name == k).and_then(|(_, v)| *v);
            // SAFETY: serialized by ENV_LOCK.
            unsafe {
                match value {
                    Some(val) => std::env::set_var(k, val),
                    None => std::env::remove_var(k),
                }
            }
        }

        f();

        for (k, original) in originals {
            // SAFETY: restoring original values, same single-threaded context.
            unsafe {
                match original {
                    Some(val) => std::env::set_var(k, val),
                    None => std::env::remove_var(k),
                }
            }
        }
    }

    #[test]
    fn defaults_without_env_vars() {
        with_env(&[], || {
            let config = fetch_config().unwrap();
            assert_eq!(config.api.base_url, DEFAULT_API_URL);
            assert_eq!(config.view.ticker, DEFAULT_TICKER);
            assert_eq!(config.view.lookback_days, 7);
            assert_eq!(config.view.interval, "5m");
            assert_eq!(config.view.ma_period, 20);
            assert_eq!(config.log_file, PathBuf::from(DEFAULT_LOG_FILE));
        });
    }

    #[test]
    fn loads_values_from_env() {
        with_env(
            &[
                ("TICKERDASH_API_URL", Some("https://dash.example.com/")),
                ("TICKERDASH_TICKER", Some(" tcs.ns ")),
                ("TICKERDASH_LOOKBACK_DAYS", Some("30")),
                ("TICKERDASH_INTERVAL", Some("1h")),
                ("TICKERDASH_MA_PERIOD", Some("5")),
            ],
            || {
                let config = fetch_config().unwrap();
                assert_eq!(config.api.base_url, "https://dash.example.com");
                assert_eq!(config.view.ticker, "TCS.NS");
                assert_eq!(config.view.lookback_days, 30);
                assert_eq!(config.view.interval, "1h");
                assert_eq!(config.view.ma_period, 5);
            },
        );
    }

    #[test]
    fn rejects_non_http_url() {
        with_env(&[("TICKERDASH_API_URL", Some("ftp://example.com"))], || {
            let err = fetch_config().unwrap_err();
            assert!(err.to_string().contains("TICKERDASH_API_URL"));
        });
    }

    #[test]
    fn rejects_zero_ma_period() {
        with_env(&[("TICKERDASH_MA_PERIOD", Some("0"))], || {
            let err = fetch_config().unwrap_err();
            assert!(err.to_string().contains("TICKERDASH_MA_PERIOD"));
        });
    }

    #[test]
    fn rejects_unparseable_lookback() {
        with_env(&[("TICKERDASH_LOOKBACK_DAYS", Some("a week"))], || {
            assert!(matches!(fetch_config(), Err(DashError::Config(_))));
        });
    }

    #[test]
    fn empty_values_treated_as_absent() {
        with_env(
            &[
                ("TICKERDASH_API_URL", Some("")),
                ("TICKERDASH_TICKER", Some("")),
                ("TICKERDASH_MA_PERIOD", Some("")),
            ],
            || {
                let config = fetch_config().unwrap();
                assert_eq!(config.api.base_url, DEFAULT_API_URL);
                assert_eq!(config.view.ticker, DEFAULT_TICKER);
                assert_eq!(config.view.ma_period, DEFAULT_MA_PERIOD);
            },
        );
    }
}
