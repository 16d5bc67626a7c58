use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup with context.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding `cv-data-<lang>.json` overrides. Bundled data is used when absent.
    pub data_dir: Option<PathBuf>,
    /// Directory holding `<lang>.json` translation trees. Bundled trees are used when absent.
    pub locales_dir: Option<PathBuf>,
    /// File holding the persisted language preference.
    pub state_path: PathBuf,
    /// Directory that root-relative image paths (`/images/...`) are read from.
    pub asset_root: PathBuf,
    /// Origin prepended to root-relative image paths to make them absolute.
    pub public_origin: String,
    pub port: u16,
    pub rust_log: String,
    pub production: bool,
    pub settle_before_capture: Duration,
    pub settle_after_capture: Duration,
    pub notification_duration: Duration,
    /// Upper bound for one remote image fetch during export.
    pub image_fetch_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            data_dir: optional_env("CV_DATA_DIR").map(PathBuf::from),
            locales_dir: optional_env("CV_LOCALES_DIR").map(PathBuf::from),
            state_path: optional_env("CV_STATE_PATH")
                .unwrap_or_else(|| ".cv-state.json".to_string())
                .into(),
            asset_root: optional_env("CV_ASSET_ROOT")
                .unwrap_or_else(|| "public".to_string())
                .into(),
            public_origin: optional_env("CV_PUBLIC_ORIGIN")
                .unwrap_or_else(|| "http://localhost:8080".to_string())
                .trim_end_matches('/')
                .to_string(),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            production: optional_env("CV_ENV").is_some_and(|v| v.eq_ignore_ascii_case("production")),
            settle_before_capture: millis_env("CV_SETTLE_BEFORE_CAPTURE_MS", 2000)?,
            settle_after_capture: millis_env("CV_SETTLE_AFTER_CAPTURE_MS", 2000)?,
            notification_duration: millis_env("CV_NOTIFICATION_MS", 3000)?,
            image_fetch_timeout: millis_env("CV_IMAGE_FETCH_TIMEOUT_MS", 10_000)?,
        })
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn millis_env(key: &str, default: u64) -> Result<Duration> {
    let millis = match optional_env(key) {
        Some(raw) => raw
            .parse::<u64>()
            .with_context(|| format!("Environment variable '{key}' must be a number of milliseconds"))?,
        None => default,
    };
    Ok(Duration::from_millis(millis))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Bundled content, no settle delays, state file under `dir`.
    pub(crate) fn make_config(dir: &std::path::Path) -> Config {
        Config {
            data_dir: None,
            locales_dir: None,
            state_path: dir.join("state.json"),
            asset_root: dir.join("public"),
            public_origin: "http://127.0.0.1:9".to_string(),
            port: 0,
            rust_log: "info".to_string(),
            production: false,
            settle_before_capture: Duration::ZERO,
            settle_after_capture: Duration::ZERO,
            notification_duration: Duration::from_millis(3000),
            image_fetch_timeout: Duration::from_millis(500),
        }
    }

    #[test]
    fn test_millis_env_default_and_parse() {
        assert_eq!(
            millis_env("CV_TEST_UNSET_DELAY_MS", 2000).unwrap(),
            Duration::from_millis(2000)
        );
        std::env::set_var("CV_TEST_BAD_DELAY_MS", "soon");
        let err = millis_env("CV_TEST_BAD_DELAY_MS", 2000).unwrap_err();
        assert!(err.to_string().contains("CV_TEST_BAD_DELAY_MS"));
    }
}
