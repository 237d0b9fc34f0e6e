use logdeck_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Authorization role as served by the roles resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    id: String,
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default)]
    permissions: Vec<String>,
    #[serde(default)]
    read_only: bool,
}

impl Role {
    /// Creates a role from its parts.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: Option<String>,
        permissions: Vec<String>,
        read_only: bool,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description,
            permissions,
            read_only,
        }
    }

    /// Builds a role from its JSON wire shape.
    pub fn from_json(value: Value) -> AppResult<Self> {
        serde_json::from_value(value)
            .map_err(|error| AppError::Decode(format!("invalid role payload: {error}")))
    }

    /// Returns the JSON wire shape of this role.
    #[must_use]
    pub fn to_json(&self) -> Value {
        serde_json::json!({
            "id": self.id,
            "name": self.name,
            "description": self.description,
            "permissions": self.permissions,
            "read_only": self.read_only,
        })
    }

    /// Returns the stable role identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the optional description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns granted permission strings in server order.
    #[must_use]
    pub fn permissions(&self) -> &[String] {
        self.permissions.as_slice()
    }

    /// Returns whether the role is system-managed.
    #[must_use]
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }
}
