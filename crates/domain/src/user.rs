//! User summary projections used in membership listings.

use chrono::{DateTime, Utc};
use logdeck_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Summary projection of a user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserOverview {
    id: String,
    username: String,
    #[serde(default)]
    full_name: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    roles: Vec<String>,
    #[serde(default)]
    read_only: bool,
    #[serde(default, rename = "external_user")]
    external: bool,
    #[serde(default)]
    session_active: bool,
    #[serde(default)]
    last_activity: Option<DateTime<Utc>>,
}

impl UserOverview {
    /// Creates a user overview with the identity fields only.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        username: impl Into<String>,
        full_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            full_name: full_name.into(),
            email: None,
            roles: Vec::new(),
            read_only: false,
            external: false,
            session_active: false,
            last_activity: None,
        }
    }

    /// Builds a user overview from its JSON wire shape.
    pub fn from_json(value: Value) -> AppResult<Self> {
        serde_json::from_value(value)
            .map_err(|error| AppError::Decode(format!("invalid user overview payload: {error}")))
    }

    /// Returns the stable user identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    /// Returns the login name.
    #[must_use]
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Returns the display name.
    #[must_use]
    pub fn full_name(&self) -> &str {
        self.full_name.as_str()
    }

    /// Returns the email, if the server returned one.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Returns names of roles assigned to the user.
    #[must_use]
    pub fn roles(&self) -> &[String] {
        self.roles.as_slice()
    }

    /// Returns whether the account is system-managed.
    #[must_use]
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Returns whether the account is synchronized from an external directory.
    #[must_use]
    pub fn is_external(&self) -> bool {
        self.external
    }

    /// Returns whether the user currently has a live session.
    #[must_use]
    pub fn is_session_active(&self) -> bool {
        self.session_active
    }

    /// Returns the last recorded activity, if any.
    #[must_use]
    pub fn last_activity(&self) -> Option<DateTime<Utc>> {
        self.last_activity
    }
}
