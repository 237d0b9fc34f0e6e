use serde::{Deserialize, Serialize};

/// Authenticated console user and the permission strings granted to them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    username: String,
    full_name: String,
    permissions: Vec<String>,
}

impl CurrentUser {
    /// Creates a current user from session data.
    #[must_use]
    pub fn new(
        username: impl Into<String>,
        full_name: impl Into<String>,
        permissions: Vec<String>,
    ) -> Self {
        Self {
            username: username.into(),
            full_name: full_name.into(),
            permissions,
        }
    }

    /// Returns the login name.
    #[must_use]
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Returns the display name for the current user.
    #[must_use]
    pub fn full_name(&self) -> &str {
        self.full_name.as_str()
    }

    /// Returns granted permission strings.
    #[must_use]
    pub fn permissions(&self) -> &[String] {
        self.permissions.as_slice()
    }
}
