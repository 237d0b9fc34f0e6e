use std::collections::HashMap;

use logdeck_core::{AppError, AppResult};

use crate::role_action_bridge::RoleAction;
use crate::rest_ports::{RestMethod, RestRequest, RoutePath};

#[derive(Debug, Clone, PartialEq, Eq)]
enum TemplateSegment {
    Literal(String),
    Placeholder(String),
}

/// Path template such as `roles/{roleId}/members/{username}`.
///
/// Every placeholder must span a whole segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTemplate {
    source: String,
    segments: Vec<TemplateSegment>,
}

impl RouteTemplate {
    /// Parses a template.
    pub fn parse(source: &str) -> AppResult<Self> {
        let mut segments = Vec::new();
        for raw in source.trim_matches('/').split('/') {
            if raw.is_empty() {
                return Err(AppError::Validation(format!(
                    "route template '{source}' contains an empty segment"
                )));
            }

            if let Some(name) = raw.strip_prefix('{').and_then(|rest| rest.strip_suffix('}')) {
                if name.is_empty() || name.contains(['{', '}']) {
                    return Err(AppError::Validation(format!(
                        "route template '{source}' has an invalid placeholder '{raw}'"
                    )));
                }
                segments.push(TemplateSegment::Placeholder(name.to_owned()));
            } else if raw.contains(['{', '}']) {
                return Err(AppError::Validation(format!(
                    "route template '{source}' must use whole-segment placeholders"
                )));
            } else {
                segments.push(TemplateSegment::Literal(raw.to_owned()));
            }
        }

        Ok(Self {
            source: source.to_owned(),
            segments,
        })
    }

    /// Returns the template text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.source.as_str()
    }

    /// Substitutes placeholders with raw values.
    pub fn expand(&self, params: &[(&str, &str)]) -> AppResult<RoutePath> {
        let mut segments = Vec::with_capacity(self.segments.len());
        for segment in &self.segments {
            match segment {
                TemplateSegment::Literal(value) => segments.push(value.clone()),
                TemplateSegment::Placeholder(name) => {
                    let value = params
                        .iter()
                        .find(|(param, _)| *param == name.as_str())
                        .map(|(_, value)| *value)
                        .ok_or_else(|| {
                            AppError::Validation(format!(
                                "route '{}' requires parameter '{name}'",
                                self.source
                            ))
                        })?;
                    if value.trim().is_empty() {
                        return Err(AppError::Validation(format!(
                            "route '{}' parameter '{name}' must not be empty",
                            self.source
                        )));
                    }
                    segments.push(value.to_owned());
                }
            }
        }

        Ok(RoutePath::new(segments))
    }
}

/// Page selection for paginated listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// One-based page number.
    pub page: u64,
    /// Requested page size.
    pub per_page: u64,
    /// Free-text filter.
    pub query: String,
}

impl PageRequest {
    /// Creates a page request.
    #[must_use]
    pub fn new(page: u64, per_page: u64, query: impl Into<String>) -> Self {
        Self {
            page,
            per_page,
            query: query.into(),
        }
    }

    /// Appends `page`, `per_page` and `query` to `path`.
    #[must_use]
    pub fn apply(&self, path: RoutePath) -> RoutePath {
        path.with_query_pair("page", self.page.to_string())
            .with_query_pair("per_page", self.per_page.to_string())
            .with_query_pair("query", self.query.as_str())
    }
}

/// Route table for the roles resource.
#[derive(Debug, Clone)]
pub struct RoleRoutes {
    templates: HashMap<RoleAction, RouteTemplate>,
}

impl RoleRoutes {
    /// Returns a copy with `action` mapped to another template.
    pub fn with_template(mut self, action: RoleAction, template: &str) -> AppResult<Self> {
        self.templates
            .insert(action, RouteTemplate::parse(template)?);
        Ok(self)
    }

    /// Returns the template registered for `action`.
    #[must_use]
    pub fn template(&self, action: RoleAction) -> Option<&RouteTemplate> {
        self.templates.get(&action)
    }

    /// Returns the HTTP method used by `action`.
    #[must_use]
    pub fn method(action: RoleAction) -> RestMethod {
        match action {
            RoleAction::Load
            | RoleAction::LoadUsersForRole
            | RoleAction::LoadRolesForUser
            | RoleAction::LoadRolesPaginated => RestMethod::Get,
            RoleAction::Delete | RoleAction::RemoveMember => RestMethod::Delete,
            RoleAction::AddMembers => RestMethod::Put,
        }
    }

    /// Builds the request for `action` with placeholder values.
    pub fn request(&self, action: RoleAction, params: &[(&str, &str)]) -> AppResult<RestRequest> {
        let template = self.templates.get(&action).ok_or_else(|| {
            AppError::Validation(format!("no route registered for '{}'", action.as_str()))
        })?;

        Ok(RestRequest::new(
            Self::method(action),
            template.expand(params)?,
        ))
    }

    fn default_template(action: RoleAction) -> &'static str {
        match action {
            RoleAction::Load | RoleAction::Delete => "roles/{roleId}",
            RoleAction::AddMembers => "roles/{roleId}/members",
            RoleAction::RemoveMember => "roles/{roleId}/members/{username}",
            RoleAction::LoadUsersForRole => "roles/{roleId}/users",
            RoleAction::LoadRolesForUser => "users/{username}/roles",
            RoleAction::LoadRolesPaginated => "roles",
        }
    }
}

impl Default for RoleRoutes {
    fn default() -> Self {
        let templates = RoleAction::all()
            .iter()
            .filter_map(|action| {
                RouteTemplate::parse(Self::default_template(*action))
                    .ok()
                    .map(|template| (*action, template))
            })
            .collect();

        Self { templates }
    }
}
