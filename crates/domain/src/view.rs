use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use logdeck_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const VIEW_ID_LENGTH: usize = 24;

/// Kind of saved view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViewType {
    /// Saved search.
    Search,
    /// Dashboard of widgets.
    Dashboard,
}

impl ViewType {
    /// Returns stable storage value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Search => "SEARCH",
            Self::Dashboard => "DASHBOARD",
        }
    }

    /// Returns the lowercase label used in user-facing text.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Search => "search",
            Self::Dashboard => "dashboard",
        }
    }
}

impl FromStr for ViewType {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "SEARCH" => Ok(Self::Search),
            "DASHBOARD" => Ok(Self::Dashboard),
            _ => Err(AppError::Validation(format!("unknown view type '{value}'"))),
        }
    }
}

/// Identifier of a saved view.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ViewId(String);

impl ViewId {
    /// Generates a fresh 24 hex character identifier.
    #[must_use]
    pub fn generate() -> Self {
        let mut value = Uuid::new_v4().simple().to_string();
        value.truncate(VIEW_ID_LENGTH);
        Self(value)
    }

    /// Wraps an existing identifier.
    pub fn parse(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(AppError::Validation("view id must not be empty".to_owned()));
        }

        Ok(Self(value))
    }

    /// Returns the identifier string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for ViewId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}

/// Saved search or dashboard.
///
/// Views are immutable values; every edit returns a new view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct View {
    id: ViewId,
    title: String,
    #[serde(rename = "type")]
    view_type: ViewType,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    query: String,
    #[serde(default)]
    parameter_bindings: BTreeMap<String, String>,
}

impl View {
    /// Creates a view with an empty query.
    #[must_use]
    pub fn new(id: ViewId, title: impl Into<String>, view_type: ViewType) -> Self {
        Self {
            id,
            title: title.into(),
            view_type,
            summary: String::new(),
            description: String::new(),
            query: String::new(),
            parameter_bindings: BTreeMap::new(),
        }
    }

    /// Returns a copy carrying a freshly generated identity.
    #[must_use]
    pub fn with_new_identity(&self) -> Self {
        Self {
            id: ViewId::generate(),
            ..self.clone()
        }
    }

    /// Returns a copy with another title.
    #[must_use]
    pub fn with_title(&self, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..self.clone()
        }
    }

    /// Returns a copy with another summary and description.
    #[must_use]
    pub fn with_details(&self, summary: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            description: description.into(),
            ..self.clone()
        }
    }

    /// Returns a copy with another query string.
    #[must_use]
    pub fn with_query(&self, query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..self.clone()
        }
    }

    /// Returns a copy with `name` bound to `value`.
    #[must_use]
    pub fn with_parameter(&self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let mut parameter_bindings = self.parameter_bindings.clone();
        parameter_bindings.insert(name.into(), value.into());
        Self {
            parameter_bindings,
            ..self.clone()
        }
    }

    /// Returns view identifier.
    #[must_use]
    pub fn id(&self) -> &ViewId {
        &self.id
    }

    /// Returns display title.
    #[must_use]
    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    /// Returns view kind.
    #[must_use]
    pub fn view_type(&self) -> ViewType {
        self.view_type
    }

    /// Returns short summary.
    #[must_use]
    pub fn summary(&self) -> &str {
        self.summary.as_str()
    }

    /// Returns long description.
    #[must_use]
    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    /// Returns query string.
    #[must_use]
    pub fn query(&self) -> &str {
        self.query.as_str()
    }

    /// Returns parameter values bound on this view.
    #[must_use]
    pub fn parameter_bindings(&self) -> &BTreeMap<String, String> {
        &self.parameter_bindings
    }
}

#[cfg(test)]
mod tests {
    use super::{View, ViewId, ViewType};

    #[test]
    fn new_identity_keeps_content() {
        let view = View::new(
            ViewId::generate(),
            "Errors by host",
            ViewType::Dashboard,
        )
        .with_query("level:3 AND source:$host$")
        .with_parameter("host", "web-1");

        let copy = view.with_new_identity();

        assert_ne!(copy.id(), view.id());
        assert_eq!(copy.title(), view.title());
        assert_eq!(copy.query(), view.query());
        assert_eq!(copy.parameter_bindings(), view.parameter_bindings());
    }

    #[test]
    fn generated_ids_have_fixed_length() {
        assert_eq!(ViewId::generate().as_str().len(), 24);
    }

    #[test]
    fn view_type_uses_uppercase_wire_names() {
        let encoded = serde_json::to_value(ViewType::Dashboard);
        assert!(encoded.is_ok());
        assert_eq!(
            encoded.unwrap_or_default(),
            serde_json::json!("DASHBOARD")
        );
        assert_eq!(ViewType::Search.label(), "search");
    }
}
