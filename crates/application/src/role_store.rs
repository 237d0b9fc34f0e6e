use std::collections::BTreeSet;
use std::sync::Arc;

use logdeck_core::{AppError, AppResult};
use logdeck_domain::{Page, Role, UserOverview};
use serde_json::Value;

use crate::role_action_bridge::{RoleAction, RoleActionBridge, RoleActionOutcome};
use crate::role_pagination::{decode_role_page, decode_user_page};
use crate::role_routes::{PageRequest, RoleRoutes};
use crate::rest_ports::{RestRequest, RestTransport};

/// Client for the roles REST resource.
///
/// Each call returns its result to the caller and publishes the same
/// lifecycle to the shared [`RoleActionBridge`]. Failures are never retried.
#[derive(Clone)]
pub struct RoleStore {
    transport: Arc<dyn RestTransport>,
    routes: RoleRoutes,
    bridge: RoleActionBridge,
}

impl RoleStore {
    /// Creates a store from required dependencies.
    #[must_use]
    pub fn new(
        transport: Arc<dyn RestTransport>,
        routes: RoleRoutes,
        bridge: RoleActionBridge,
    ) -> Self {
        Self {
            transport,
            routes,
            bridge,
        }
    }

    /// Returns the bridge this store publishes to.
    #[must_use]
    pub fn bridge(&self) -> &RoleActionBridge {
        &self.bridge
    }

    /// Loads one role by identifier.
    pub async fn load(&self, role_id: &str) -> AppResult<Role> {
        let request = self.routes.request(RoleAction::Load, &[("roleId", role_id)]);
        self.run(RoleAction::Load, request, decode_role, |role| {
            RoleActionOutcome::Role(role.clone())
        })
        .await
    }

    /// Deletes one role.
    pub async fn delete(&self, role_id: &str) -> AppResult<()> {
        let request = self
            .routes
            .request(RoleAction::Delete, &[("roleId", role_id)]);
        self.run(RoleAction::Delete, request, |_| Ok(()), |_| {
            RoleActionOutcome::Deleted
        })
        .await
    }

    /// Adds users to a role and returns the updated role.
    ///
    /// Usernames are sent as given; the server rejects unknown users.
    pub async fn add_members(&self, role_id: &str, usernames: &BTreeSet<String>) -> AppResult<Role> {
        let body = Value::Array(usernames.iter().cloned().map(Value::String).collect());
        let request = self
            .routes
            .request(RoleAction::AddMembers, &[("roleId", role_id)])
            .map(|request| request.with_body(body));
        self.run(RoleAction::AddMembers, request, decode_role, |role| {
            RoleActionOutcome::Role(role.clone())
        })
        .await
    }

    /// Removes one user from a role and returns the updated role.
    pub async fn remove_member(&self, role_id: &str, username: &str) -> AppResult<Role> {
        let request = self.routes.request(
            RoleAction::RemoveMember,
            &[("roleId", role_id), ("username", username)],
        );
        self.run(RoleAction::RemoveMember, request, decode_role, |role| {
            RoleActionOutcome::Role(role.clone())
        })
        .await
    }

    /// Lists users holding a role.
    ///
    /// `role_name` only labels the request; the route is keyed by id.
    pub async fn load_users_for_role(
        &self,
        role_id: &str,
        role_name: &str,
        page: &PageRequest,
    ) -> AppResult<Page<UserOverview>> {
        let request = self
            .routes
            .request(RoleAction::LoadUsersForRole, &[("roleId", role_id)])
            .map(|request| paginate(request, page))
            .map_err(|error| match error {
                AppError::Validation(message) => {
                    AppError::Validation(format!("users of role '{role_name}': {message}"))
                }
                other => other,
            });
        self.run(
            RoleAction::LoadUsersForRole,
            request,
            |body| decode_user_page(required_body(body)?),
            |page| RoleActionOutcome::UserPage(page.clone()),
        )
        .await
    }

    /// Lists roles held by a user.
    pub async fn load_roles_for_user(
        &self,
        username: &str,
        page: &PageRequest,
    ) -> AppResult<Page<Role>> {
        let request = self
            .routes
            .request(RoleAction::LoadRolesForUser, &[("username", username)])
            .map(|request| paginate(request, page));
        self.run(
            RoleAction::LoadRolesForUser,
            request,
            |body| decode_role_page(required_body(body)?),
            |page| RoleActionOutcome::RolePage(page.clone()),
        )
        .await
    }

    /// Lists all roles.
    pub async fn load_roles_paginated(&self, page: &PageRequest) -> AppResult<Page<Role>> {
        let request = self
            .routes
            .request(RoleAction::LoadRolesPaginated, &[])
            .map(|request| paginate(request, page));
        self.run(
            RoleAction::LoadRolesPaginated,
            request,
            |body| decode_role_page(required_body(body)?),
            |page| RoleActionOutcome::RolePage(page.clone()),
        )
        .await
    }

    async fn run<T, D, O>(
        &self,
        action: RoleAction,
        request: AppResult<RestRequest>,
        decode: D,
        outcome: O,
    ) -> AppResult<T>
    where
        T: Send,
        D: FnOnce(Option<Value>) -> AppResult<T> + Send,
        O: FnOnce(&T) -> RoleActionOutcome + Send,
    {
        let invocation = self.bridge.begin(action);

        let result = match request {
            Ok(request) => self.transport.execute(request).await.and_then(decode),
            Err(error) => Err(error),
        };

        match &result {
            Ok(value) => invocation.complete(outcome(value)),
            Err(error) => invocation.fail(error.clone()),
        }

        result
    }
}

fn paginate(request: RestRequest, page: &PageRequest) -> RestRequest {
    RestRequest {
        path: page.apply(request.path),
        ..request
    }
}

fn required_body(body: Option<Value>) -> AppResult<Value> {
    body.ok_or_else(|| AppError::Decode("expected a JSON body but the response was empty".to_owned()))
}

fn decode_role(body: Option<Value>) -> AppResult<Role> {
    Role::from_json(required_body(body)?)
}

#[cfg(test)]
mod tests;
