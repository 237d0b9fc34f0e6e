use std::collections::{BTreeSet, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use logdeck_core::{AppError, AppResult};
use serde_json::{Value, json};
use tokio::sync::Mutex;

use crate::{
    ActionLifecycle, PageRequest, RestMethod, RestRequest, RestTransport, RoleAction,
    RoleActionBridge, RoleActionOutcome, RoleActionSubscription, RoleRoutes,
};

use super::RoleStore;

#[derive(Default)]
struct FakeTransport {
    requests: Mutex<Vec<RestRequest>>,
    responses: Mutex<VecDeque<AppResult<Option<Value>>>>,
}

impl FakeTransport {
    fn with_responses(responses: Vec<AppResult<Option<Value>>>) -> Arc<Self> {
        Arc::new(Self {
            requests: Mutex::new(Vec::new()),
            responses: Mutex::new(responses.into()),
        })
    }
}

#[async_trait]
impl RestTransport for FakeTransport {
    async fn execute(&self, request: RestRequest) -> AppResult<Option<Value>> {
        self.requests.lock().await.push(request);
        self.responses
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Err(AppError::Internal("no scripted response".to_owned())))
    }
}

fn build_store(transport: Arc<FakeTransport>) -> (RoleStore, RoleActionSubscription) {
    let bridge = RoleActionBridge::default();
    let subscription = bridge.subscribe();
    let store = RoleStore::new(transport, RoleRoutes::default(), bridge);
    (store, subscription)
}

fn role_json(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "description": "Grants read access",
        "permissions": ["streams:read", "dashboards:read"],
        "read_only": false,
    })
}

fn drain(subscription: &mut RoleActionSubscription) -> Vec<(RoleAction, ActionLifecycle)> {
    let mut events = Vec::new();
    while let Some(event) = subscription.try_recv() {
        events.push((event.action, event.lifecycle));
    }
    events
}

#[tokio::test]
async fn load_issues_get_and_decodes_role() {
    let transport = FakeTransport::with_responses(vec![Ok(Some(role_json("r-1", "Reader")))]);
    let (store, mut subscription) = build_store(transport.clone());

    let role = store.load("r-1").await;

    assert!(role.is_ok());
    let role = role.unwrap_or_else(|_| unreachable!());
    assert_eq!(role.name(), "Reader");
    assert_eq!(role.permissions().len(), 2);

    let requests = transport.requests.lock().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, RestMethod::Get);
    assert_eq!(requests[0].path.segments(), ["roles", "r-1"]);

    let events = drain(&mut subscription);
    assert_eq!(events.len(), 2);
    assert_eq!(events[0], (RoleAction::Load, ActionLifecycle::Pending));
    assert_eq!(
        events[1],
        (
            RoleAction::Load,
            ActionLifecycle::Completed(RoleActionOutcome::Role(role))
        )
    );
}

#[tokio::test]
async fn load_failure_reaches_caller_and_subscribers() {
    let transport = FakeTransport::with_responses(vec![Err(AppError::NotFound(
        "role r-404".to_owned(),
    ))]);
    let (store, mut subscription) = build_store(transport);

    let result = store.load("r-404").await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
    let events = drain(&mut subscription);
    assert!(matches!(
        events.last(),
        Some((RoleAction::Load, ActionLifecycle::Failed(AppError::NotFound(_))))
    ));
}

#[tokio::test]
async fn add_members_sends_one_put_with_username_array() {
    let transport = FakeTransport::with_responses(vec![Ok(Some(role_json("r-1", "Reader")))]);
    let (store, _subscription) = build_store(transport.clone());
    let usernames: BTreeSet<String> = ["bob", "alice", "alice"]
        .into_iter()
        .map(str::to_owned)
        .collect();

    let role = store.add_members("r-1", &usernames).await;

    assert!(role.is_ok());
    let requests = transport.requests.lock().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, RestMethod::Put);
    assert_eq!(requests[0].path.segments(), ["roles", "r-1", "members"]);
    assert_eq!(requests[0].body, Some(json!(["alice", "bob"])));
}

#[tokio::test]
async fn add_members_conflict_is_surfaced_unchanged() {
    let transport = FakeTransport::with_responses(vec![Err(AppError::Conflict(
        "unknown user 'mallory'".to_owned(),
    ))]);
    let (store, _subscription) = build_store(transport);
    let usernames = BTreeSet::from(["mallory".to_owned()]);

    let result = store.add_members("r-1", &usernames).await;

    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn empty_body_where_role_expected_is_a_decode_error() {
    let transport = FakeTransport::with_responses(vec![Ok(None)]);
    let (store, mut subscription) = build_store(transport);

    let result = store.remove_member("r-1", "alice").await;

    assert!(matches!(result, Err(AppError::Decode(_))));
    assert!(matches!(
        drain(&mut subscription).last(),
        Some((RoleAction::RemoveMember, ActionLifecycle::Failed(AppError::Decode(_))))
    ));
}

#[tokio::test]
async fn remove_member_targets_membership_edge() {
    let transport = FakeTransport::with_responses(vec![Ok(Some(role_json("r-1", "Reader")))]);
    let (store, _subscription) = build_store(transport.clone());

    let result = store.remove_member("r-1", "jane doe").await;

    assert!(result.is_ok());
    let requests = transport.requests.lock().await;
    assert_eq!(requests[0].method, RestMethod::Delete);
    assert_eq!(
        requests[0].path.segments(),
        ["roles", "r-1", "members", "jane doe"]
    );
}

#[tokio::test]
async fn role_page_request_carries_pagination_parameters() {
    let roles: Vec<Value> = (0..10)
        .map(|index| role_json(&format!("r-{index}"), &format!("Admin {index}")))
        .collect();
    let transport = FakeTransport::with_responses(vec![Ok(Some(json!({
        "count": 10,
        "total": 25,
        "page": 2,
        "per_page": 10,
        "query": "admin",
        "roles": roles,
    })))]);
    let (store, mut subscription) = build_store(transport.clone());

    let page = store
        .load_roles_paginated(&PageRequest::new(2, 10, "admin"))
        .await;

    assert!(page.is_ok());
    let Ok(page) = page else {
        return;
    };
    assert_eq!(page.pagination().page, Some(2));
    assert!(page.len() <= 10);

    let requests = transport.requests.lock().await;
    assert_eq!(requests[0].path.to_string(), "/roles?page=2&per_page=10&query=admin");

    assert!(matches!(
        drain(&mut subscription).last(),
        Some((
            RoleAction::LoadRolesPaginated,
            ActionLifecycle::Completed(RoleActionOutcome::RolePage(_))
        ))
    ));
}

#[tokio::test]
async fn users_for_role_are_decoded_from_users_envelope() {
    let transport = FakeTransport::with_responses(vec![Ok(Some(json!({
        "count": 1,
        "total": 1,
        "page": 1,
        "per_page": 5,
        "query": "",
        "users": [{ "id": "u-1", "username": "alice", "full_name": "Alice" }],
    })))]);
    let (store, _subscription) = build_store(transport.clone());

    let page = store
        .load_users_for_role("r-1", "Reader", &PageRequest::new(1, 5, ""))
        .await;

    assert!(page.is_ok());
    let Ok(page) = page else {
        return;
    };
    assert_eq!(page.pagination().per_page, Some(5));
    assert_eq!(page.list()[0].username(), "alice");
    let requests = transport.requests.lock().await;
    assert_eq!(
        requests[0].path.to_string(),
        "/roles/r-1/users?page=1&per_page=5&query="
    );
}

#[tokio::test]
async fn roles_for_user_use_user_route() {
    let transport = FakeTransport::with_responses(vec![Ok(Some(json!({
        "count": 0,
        "total": 0,
        "page": 1,
        "per_page": 20,
        "query": "",
    })))]);
    let (store, _subscription) = build_store(transport.clone());

    let page = store
        .load_roles_for_user("alice", &PageRequest::new(1, 20, ""))
        .await;

    assert!(page.is_ok());
    assert!(page.map(|page| page.is_empty()).unwrap_or(false));
    let requests = transport.requests.lock().await;
    assert_eq!(requests[0].path.segments(), ["users", "alice", "roles"]);
}

#[tokio::test]
async fn invalid_route_parameters_fail_without_a_request() {
    let transport = FakeTransport::with_responses(Vec::new());
    let (store, mut subscription) = build_store(transport.clone());

    let result = store.delete("  ").await;

    assert!(matches!(result, Err(AppError::Validation(_))));
    assert!(transport.requests.lock().await.is_empty());
    assert_eq!(drain(&mut subscription).len(), 2);
}

#[tokio::test]
async fn concurrent_deletes_settle_independently() {
    let transport = FakeTransport::with_responses(vec![
        Ok(None),
        Err(AppError::NotFound("role r-1".to_owned())),
    ]);
    let (store, mut subscription) = build_store(transport.clone());

    let (first, second) = tokio::join!(store.delete("r-1"), store.delete("r-1"));

    assert_eq!(
        [first.is_ok(), second.is_ok()]
            .iter()
            .filter(|succeeded| **succeeded)
            .count(),
        1
    );
    assert_eq!(transport.requests.lock().await.len(), 2);

    let mut terminal_invocations = Vec::new();
    while let Some(event) = subscription.try_recv() {
        if event.lifecycle.is_terminal() {
            assert_eq!(event.action, RoleAction::Delete);
            terminal_invocations.push(event.invocation);
        }
    }
    assert_eq!(terminal_invocations.len(), 2);
    assert_ne!(terminal_invocations[0], terminal_invocations[1]);
}
