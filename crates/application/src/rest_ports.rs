use std::fmt::{Display, Formatter};

use async_trait::async_trait;
use logdeck_core::AppResult;
use serde_json::Value;

/// HTTP methods used against the console REST API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RestMethod {
    /// Read a resource.
    Get,
    /// Create a resource.
    Post,
    /// Replace or extend a resource.
    Put,
    /// Remove a resource.
    Delete,
}

impl RestMethod {
    /// Returns the method token.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

/// API path relative to the server base URL.
///
/// Segments are kept raw; the transport percent-encodes each one when it
/// qualifies the path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoutePath {
    segments: Vec<String>,
    query: Vec<(String, String)>,
}

impl RoutePath {
    /// Creates a path from raw segments.
    #[must_use]
    pub fn new(segments: Vec<String>) -> Self {
        Self {
            segments,
            query: Vec::new(),
        }
    }

    /// Returns a copy with one more query pair.
    #[must_use]
    pub fn with_query_pair(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    /// Returns raw path segments.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        self.segments.as_slice()
    }

    /// Returns query pairs in insertion order.
    #[must_use]
    pub fn query_pairs(&self) -> &[(String, String)] {
        self.query.as_slice()
    }
}

impl Display for RoutePath {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "/{}", self.segments.join("/"))?;
        for (index, (name, value)) in self.query.iter().enumerate() {
            let separator = if index == 0 { '?' } else { '&' };
            write!(formatter, "{separator}{name}={value}")?;
        }
        Ok(())
    }
}

/// One request against the REST API.
#[derive(Debug, Clone, PartialEq)]
pub struct RestRequest {
    /// HTTP method.
    pub method: RestMethod,
    /// Path relative to the API base URL.
    pub path: RoutePath,
    /// Optional JSON body.
    pub body: Option<Value>,
}

impl RestRequest {
    /// Creates a request without a body.
    #[must_use]
    pub fn new(method: RestMethod, path: RoutePath) -> Self {
        Self {
            method,
            path,
            body: None,
        }
    }

    /// Returns a copy carrying a JSON body.
    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// Port for issuing REST requests.
///
/// Implementations map non-success statuses with `AppError::from_status`,
/// transport failures to `AppError::Network` and unparseable bodies to
/// `AppError::Decode`. They perform no retries.
#[async_trait]
pub trait RestTransport: Send + Sync {
    /// Sends one request and returns the JSON body, or `None` when it is empty.
    async fn execute(&self, request: RestRequest) -> AppResult<Option<Value>>;
}
