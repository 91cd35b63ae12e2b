use std::{path::PathBuf, time::Duration};

use crate::osrm::OSRM_DEFAULT_URL;

pub const TOMTOM_API_KEY_ENV_VAR: &str = "COURIER_TOMTOM_API_KEY";
pub const OSRM_URL_ENV_VAR: &str = "COURIER_OSRM_URL";
pub const CACHE_FOLDER_ENV_VAR: &str = "COURIER_CACHE_FOLDER";
pub const REQUEST_TIMEOUT_ENV_VAR: &str = "COURIER_REQUEST_TIMEOUT";

#[derive(Debug, Clone, Default)]
pub struct ProviderConfig {
    pub tomtom_api_key: Option<String>,
    pub osrm_url: Option<String>,
    pub cache_folder: Option<PathBuf>,
    pub request_timeout: Option<Duration>,
}

impl ProviderConfig {
    /// Loads `.env` and `.env.local` if present, then reads the
    /// `COURIER_*` variables.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        dotenvy::from_filename(".env.local").ok();

        let request_timeout = match std::env::var(REQUEST_TIMEOUT_ENV_VAR) {
            Ok(value) => {
                let seconds = value.trim().parse::<f64>().map_err(|_| {
                    anyhow::anyhow!("{REQUEST_TIMEOUT_ENV_VAR} must be a number of seconds")
                })?;
                Some(Duration::try_from_secs_f64(seconds)?)
            }
            Err(_) => None,
        };

        Ok(Self {
            tomtom_api_key: std::env::var(TOMTOM_API_KEY_ENV_VAR).ok(),
            osrm_url: std::env::var(OSRM_URL_ENV_VAR).ok(),
            cache_folder: std::env::var(CACHE_FOLDER_ENV_VAR).ok().map(PathBuf::from),
            request_timeout,
        })
    }

    pub fn osrm_url(&self) -> &str {
        self.osrm_url.as_deref().unwrap_or(OSRM_DEFAULT_URL)
    }
}
