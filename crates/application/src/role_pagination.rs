//! Decoders for the paginated role and user envelopes.
//!
//! The role envelope tolerates a missing `roles` array while the user envelope
//! requires `users`; both mirror what the server sends today. Pagination
//! numbers are passed through as sent, and any that are missing become `None`.

use logdeck_core::{AppError, AppResult};
use logdeck_domain::{Page, Pagination, Role, UserOverview};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
struct PaginatedRolesResponse {
    #[serde(flatten)]
    pagination: Pagination,
    #[serde(default)]
    roles: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct PaginatedUsersResponse {
    #[serde(flatten)]
    pagination: Pagination,
    users: Vec<Value>,
}

/// Decodes a paginated roles envelope; `roles` defaults to empty.
pub fn decode_role_page(body: Value) -> AppResult<Page<Role>> {
    let response: PaginatedRolesResponse = serde_json::from_value(body)
        .map_err(|error| AppError::Decode(format!("invalid paginated roles payload: {error}")))?;

    let list = response
        .roles
        .into_iter()
        .map(Role::from_json)
        .collect::<AppResult<Vec<_>>>()?;

    Ok(Page::new(list, response.pagination))
}

/// Decodes a paginated users envelope; `users` must be present.
pub fn decode_user_page(body: Value) -> AppResult<Page<UserOverview>> {
    let response: PaginatedUsersResponse = serde_json::from_value(body)
        .map_err(|error| AppError::Decode(format!("invalid paginated users payload: {error}")))?;

    let list = response
        .users
        .into_iter()
        .map(UserOverview::from_json)
        .collect::<AppResult<Vec<_>>>()?;

    Ok(Page::new(list, response.pagination))
}
