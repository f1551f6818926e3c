/// Runtime configuration
///
/// Every value comes from an environment variable and falls back to a
/// logged default when the variable is missing.
use std::path::PathBuf;
use std::time::Duration;

use reqwest::Url;
use tracing::{info, warn};

use crate::error::ConfigError;
use crate::state::notification::NOTIFICATION_TTL;

const DEFAULT_API_URL: &str = "http://localhost:5000";

#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the image collection service, always ending in `/`
    pub api_base_url: Url,
    /// Override for the session database location
    pub session_db_path: Option<PathBuf>,
    /// Keep the admin credential on disk between runs
    pub persist_session: bool,
    /// How long a status notification stays on screen
    pub notification_ttl: Duration,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_url = var(&lookup, "GALLERY_API_URL", DEFAULT_API_URL);
        let api_base_url = parse_base_url(&raw_url)?;

        let session_db_path = lookup("GALLERY_SESSION_DB")
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        let persist_session = match var(&lookup, "GALLERY_PERSIST_SESSION", "true")
            .to_ascii_lowercase()
            .as_str()
        {
            "1" | "true" | "yes" => true,
            "0" | "false" | "no" => false,
            other => {
                return Err(ConfigError::Invalid {
                    key: "GALLERY_PERSIST_SESSION",
                    value: other.to_string(),
                    reason: "expected true or false".to_string(),
                })
            }
        };

        let default_ttl = NOTIFICATION_TTL.as_millis().to_string();
        let ttl_raw = var(&lookup, "GALLERY_NOTIFICATION_MS", &default_ttl);
        let ttl_ms: u64 = ttl_raw.parse().map_err(|e: std::num::ParseIntError| {
            warn!("Invalid GALLERY_NOTIFICATION_MS value: {e}");
            ConfigError::Invalid {
                key: "GALLERY_NOTIFICATION_MS",
                value: ttl_raw.clone(),
                reason: e.to_string(),
            }
        })?;

        Ok(Self {
            api_base_url,
            session_db_path,
            persist_session,
            notification_ttl: Duration::from_millis(ttl_ms),
        })
    }
}

fn var<F>(lookup: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    })
}

/// Parse the service URL and make sure relative joins keep its path
fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::Invalid {
        key: "GALLERY_API_URL",
        value: raw.to_string(),
        reason,
    };

    let mut url = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid("expected an http or https url".to_string()));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
