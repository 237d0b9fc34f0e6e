use std::env;
use std::time::Duration;

use logdeck_core::{AppError, AppResult};
use logdeck_infrastructure::RestCredentials;
use tracing_subscriber::EnvFilter;
use url::Url;

const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 15;
const DEFAULT_PER_PAGE: u64 = 50;

/// Runtime configuration for the console binary.
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    pub api_url: Url,
    pub credentials: Option<RestCredentials>,
    pub developer_mode: bool,
    pub http_timeout: Duration,
    pub per_page: u64,
}

impl ConsoleConfig {
    /// Loads configuration from process environment.
    pub fn load() -> AppResult<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Loads configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        let raw_api_url = required_non_empty(&lookup, "LOGDECK_API_URL")?;
        let api_url = Url::parse(raw_api_url.trim()).map_err(|error| {
            AppError::Validation(format!("invalid LOGDECK_API_URL '{raw_api_url}': {error}"))
        })?;
        if api_url.cannot_be_a_base() {
            return Err(AppError::Validation(format!(
                "LOGDECK_API_URL '{raw_api_url}' must be an http(s) URL"
            )));
        }

        let username = optional_non_empty(&lookup, "LOGDECK_USERNAME");
        let password = optional_non_empty(&lookup, "LOGDECK_PASSWORD");
        let credentials = match (username, password) {
            (Some(username), Some(password)) => Some(RestCredentials::new(username, password)),
            (None, None) => None,
            _ => {
                return Err(AppError::Validation(
                    "LOGDECK_USERNAME and LOGDECK_PASSWORD must be set together".to_owned(),
                ));
            }
        };

        let developer_mode = parse_bool(&lookup, "LOGDECK_DEV_MODE", false)?;
        let http_timeout_secs =
            parse_u64(&lookup, "LOGDECK_HTTP_TIMEOUT_SECS", DEFAULT_HTTP_TIMEOUT_SECS)?;
        let per_page = parse_u64(&lookup, "LOGDECK_PER_PAGE", DEFAULT_PER_PAGE)?;

        if http_timeout_secs == 0 {
            return Err(AppError::Validation(
                "LOGDECK_HTTP_TIMEOUT_SECS must be greater than zero".to_owned(),
            ));
        }

        if per_page == 0 {
            return Err(AppError::Validation(
                "LOGDECK_PER_PAGE must be greater than zero".to_owned(),
            ));
        }

        Ok(Self {
            api_url,
            credentials,
            developer_mode,
            http_timeout: Duration::from_secs(http_timeout_secs),
            per_page,
        })
    }
}

/// Initializes compact stderr logging filtered by `RUST_LOG`.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn required_non_empty(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> AppResult<String> {
    let value = lookup(name).ok_or_else(|| AppError::Validation(format!("{name} is required")))?;
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{name} must not be empty")));
    }

    Ok(value)
}

fn optional_non_empty(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<String> {
    lookup(name)
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

fn parse_bool(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: bool,
) -> AppResult<bool> {
    match lookup(name) {
        Some(value) => match value.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            _ => Err(AppError::Validation(format!(
                "invalid {name} value '{value}': expected true or false"
            ))),
        },
        None => Ok(default),
    }
}

fn parse_u64(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: u64) -> AppResult<u64> {
    match lookup(name) {
        Some(value) => value.trim().parse::<u64>().map_err(|error| {
            AppError::Validation(format!("invalid {name} value '{value}': {error}"))
        }),
        None => Ok(default),
    }
}
