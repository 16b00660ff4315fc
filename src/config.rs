use std::time::Duration;
use std::{env, io};

use secrecy::SecretString;
use serde::Serialize;
use tracing::debug;

const DEFAULT_API_BASE_URL: &str = "http://localhost:3000";
const DEFAULT_SEARCH_PATH: &str = "/api/maps";
const DEFAULT_DETAILS_PATH: &str = "/api/maps/details";
const DEFAULT_DEBOUNCE_MS: u64 = 300;
const DEFAULT_MIN_QUERY_LENGTH: usize = 3;
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api_base_url: String,
    pub search_path: String,
    pub details_path: String,
    pub debounce_ms: u64,
    pub min_query_length: usize,
    pub request_timeout_ms: u64,
    pub google_places_api_key: Option<SecretString>,
}

#[derive(Clone, Debug, Serialize)]
pub struct PublicAppConfig {
    pub api_base_url: String,
    pub search_path: String,
    pub details_path: String,
    pub debounce_ms: u64,
    pub min_query_length: usize,
    pub request_timeout_ms: u64,
    pub has_google_places_key: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            search_path: DEFAULT_SEARCH_PATH.to_string(),
            details_path: DEFAULT_DETAILS_PATH.to_string(),
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            min_query_length: DEFAULT_MIN_QUERY_LENGTH,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            google_places_api_key: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        load_dotenv_if_applicable();
        Self {
            api_base_url: parse_string("ADDRESS_API_BASE_URL", DEFAULT_API_BASE_URL),
            search_path: parse_string("ADDRESS_SEARCH_PATH", DEFAULT_SEARCH_PATH),
            details_path: parse_string("ADDRESS_DETAILS_PATH", DEFAULT_DETAILS_PATH),
            debounce_ms: parse_u64("ADDRESS_DEBOUNCE_MS", DEFAULT_DEBOUNCE_MS),
            min_query_length: parse_usize("ADDRESS_MIN_QUERY_LENGTH", DEFAULT_MIN_QUERY_LENGTH)
                .max(1),
            request_timeout_ms: parse_u64("ADDRESS_REQUEST_TIMEOUT_MS", DEFAULT_REQUEST_TIMEOUT_MS),
            google_places_api_key: env::var("GOOGLE_PLACES_API_KEY")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(SecretString::from),
        }
    }

    pub fn debounce_delay(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn public_profile(&self) -> PublicAppConfig {
        PublicAppConfig {
            api_base_url: self.api_base_url.clone(),
            search_path: self.search_path.clone(),
            details_path: self.details_path.clone(),
            debounce_ms: self.debounce_ms,
            min_query_length: self.min_query_length,
            request_timeout_ms: self.request_timeout_ms,
            has_google_places_key: self.google_places_api_key.is_some(),
        }
    }
}

fn load_dotenv_if_applicable() {
    if !should_load_dotenv() {
        debug!("skipping .env load outside dev mode");
        return;
    }

    if let Err(err) = dotenvy::dotenv() {
        match &err {
            dotenvy::Error::Io(io_err) if io_err.kind() == io::ErrorKind::NotFound => {}
            _ => debug!(?err, "unable to load .env file"),
        }
    }
}

fn should_load_dotenv() -> bool {
    cfg!(debug_assertions) || parse_bool("ALLOW_DOTENV", false)
}

fn parse_bool(key: &str, default: bool) -> bool {
    env::var(key)
        .map(|v| matches!(v.trim(), "1" | "true" | "TRUE" | "True"))
        .unwrap_or(default)
}

fn parse_string(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_u64(key: &str, default: u64) -> u64 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default)
}

fn parse_usize(key: &str, default: usize) -> usize {
    env::var(key)
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(default)
}
