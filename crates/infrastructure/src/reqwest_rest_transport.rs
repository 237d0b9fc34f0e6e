use async_trait::async_trait;
use logdeck_application::{RestMethod, RestRequest, RestTransport, RoutePath};
use logdeck_core::{AppError, AppResult};
use reqwest::header::ACCEPT;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

const REQUESTED_BY_HEADER: &str = "X-Requested-By";
const REQUESTED_BY_VALUE: &str = "logdeck";

/// Basic-auth credentials for the console API.
#[derive(Clone)]
pub struct RestCredentials {
    username: String,
    password: String,
}

impl RestCredentials {
    /// Creates credentials.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for RestCredentials {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("RestCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// HTTP implementation of the REST transport port.
pub struct ReqwestRestTransport {
    http_client: reqwest::Client,
    base_url: Url,
    credentials: Option<RestCredentials>,
}

impl ReqwestRestTransport {
    /// Creates a transport resolving paths against `base_url`.
    #[must_use]
    pub fn new(http_client: reqwest::Client, base_url: Url) -> Self {
        Self {
            http_client,
            base_url,
            credentials: None,
        }
    }

    /// Returns a transport that authenticates every request.
    #[must_use]
    pub fn with_credentials(mut self, credentials: RestCredentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Resolves `path` against the base URL, percent-encoding every segment.
    pub fn qualify(&self, path: &RoutePath) -> AppResult<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|()| {
                AppError::Validation(format!(
                    "API base URL '{}' cannot carry a path",
                    self.base_url
                ))
            })?;
            segments.pop_if_empty().extend(path.segments());
        }

        if !path.query_pairs().is_empty() {
            url.query_pairs_mut().extend_pairs(
                path.query_pairs()
                    .iter()
                    .map(|(name, value)| (name.as_str(), value.as_str())),
            );
        }

        Ok(url)
    }
}

#[async_trait]
impl RestTransport for ReqwestRestTransport {
    async fn execute(&self, request: RestRequest) -> AppResult<Option<Value>> {
        let url = self.qualify(&request.path)?;
        let method = match request.method {
            RestMethod::Get => reqwest::Method::GET,
            RestMethod::Post => reqwest::Method::POST,
            RestMethod::Put => reqwest::Method::PUT,
            RestMethod::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self
            .http_client
            .request(method, url)
            .header(ACCEPT, "application/json")
            .header(REQUESTED_BY_HEADER, REQUESTED_BY_VALUE);
        if let Some(credentials) = &self.credentials {
            builder = builder.basic_auth(
                credentials.username.as_str(),
                Some(credentials.password.as_str()),
            );
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        debug!(
            method = request.method.as_str(),
            path = %request.path,
            "dispatching REST request"
        );

        let response = builder.send().await.map_err(|error| {
            warn!(
                method = request.method.as_str(),
                path = %request.path,
                error = %error,
                "REST request failed before a response"
            );
            AppError::Network(format!(
                "{} {} failed: {error}",
                request.method.as_str(),
                request.path
            ))
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|error| {
            AppError::Network(format!("failed to read response body: {error}"))
        })?;

        if !status.is_success() {
            warn!(
                method = request.method.as_str(),
                path = %request.path,
                status = status.as_u16(),
                "REST request returned an error status"
            );
            let message = error_message(text.as_str())
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_owned());
            return Err(AppError::from_status(status.as_u16(), message));
        }

        if text.trim().is_empty() {
            return Ok(None);
        }

        serde_json::from_str(text.as_str())
            .map(Some)
            .map_err(|error| {
                AppError::Decode(format!(
                    "{} {} returned invalid JSON: {error}",
                    request.method.as_str(),
                    request.path
                ))
            })
    }
}

fn error_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    let message = serde_json::from_str::<Value>(trimmed)
        .ok()
        .and_then(|value| value.get("message").and_then(Value::as_str).map(str::to_owned));

    Some(message.unwrap_or_else(|| trimmed.to_owned()))
}
