//! Lifecycle fan-out for role store operations.
//!
//! Every store call registers one invocation on the bridge, which publishes a
//! `Pending` event immediately and exactly one terminal event when the call
//! settles. Events reach subscribers in publish order, so overlapping calls to
//! the same action surface in completion order. Nothing is de-duplicated and
//! a superseded call still publishes its result.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use logdeck_core::AppError;
use logdeck_domain::{Page, Role, UserOverview};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};

const DEFAULT_EVENT_BUFFER: usize = 64;

/// Named operations of the role store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoleAction {
    /// Load one role.
    Load,
    /// Delete one role.
    Delete,
    /// Add users to a role.
    AddMembers,
    /// Remove one user from a role.
    RemoveMember,
    /// List users holding a role.
    LoadUsersForRole,
    /// List roles held by a user.
    LoadRolesForUser,
    /// List all roles.
    LoadRolesPaginated,
}

impl RoleAction {
    /// Returns the stable action name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Load => "load",
            Self::Delete => "delete",
            Self::AddMembers => "addMembers",
            Self::RemoveMember => "removeMember",
            Self::LoadUsersForRole => "loadUsersForRole",
            Self::LoadRolesForUser => "loadRolesForUser",
            Self::LoadRolesPaginated => "loadRolesPaginated",
        }
    }

    /// Returns all known actions.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[RoleAction] = &[
            RoleAction::Load,
            RoleAction::Delete,
            RoleAction::AddMembers,
            RoleAction::RemoveMember,
            RoleAction::LoadUsersForRole,
            RoleAction::LoadRolesForUser,
            RoleAction::LoadRolesPaginated,
        ];

        ALL
    }
}

/// Identifier of one store call, unique per bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InvocationId(u64);

impl InvocationId {
    /// Returns the raw counter value.
    #[must_use]
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

/// Successful result carried by a completion event.
#[derive(Debug, Clone, PartialEq)]
pub enum RoleActionOutcome {
    /// A single role.
    Role(Role),
    /// A role was deleted.
    Deleted,
    /// One page of roles.
    RolePage(Page<Role>),
    /// One page of users.
    UserPage(Page<UserOverview>),
}

/// Lifecycle stage of one invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionLifecycle {
    /// Request has been issued.
    Pending,
    /// Request settled successfully.
    Completed(RoleActionOutcome),
    /// Request settled with an error.
    Failed(AppError),
}

impl ActionLifecycle {
    /// Returns whether this stage ends the invocation.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// Event published for every lifecycle transition.
#[derive(Debug, Clone, PartialEq)]
pub struct RoleActionEvent {
    /// Invocation the event belongs to.
    pub invocation: InvocationId,
    /// Action that was invoked.
    pub action: RoleAction,
    /// Lifecycle stage reached.
    pub lifecycle: ActionLifecycle,
}

/// Shared lifecycle channel for role store operations.
///
/// Construct one per application and clone it into every consumer; clones
/// publish to and subscribe from the same channel.
#[derive(Clone)]
pub struct RoleActionBridge {
    sender: broadcast::Sender<RoleActionEvent>,
    next_invocation: Arc<AtomicU64>,
}

impl RoleActionBridge {
    /// Creates a bridge buffering up to `capacity` events per slow subscriber.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            sender,
            next_invocation: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Registers a new invocation of `action` and publishes `Pending`.
    #[must_use]
    pub fn begin(&self, action: RoleAction) -> ActionInvocation {
        let invocation = InvocationId(self.next_invocation.fetch_add(1, Ordering::Relaxed));
        self.publish(RoleActionEvent {
            invocation,
            action,
            lifecycle: ActionLifecycle::Pending,
        });

        ActionInvocation {
            bridge: self.clone(),
            invocation,
            action,
        }
    }

    /// Opens a subscription receiving every event published from now on.
    #[must_use]
    pub fn subscribe(&self) -> RoleActionSubscription {
        RoleActionSubscription {
            receiver: self.sender.subscribe(),
            missed_events: 0,
        }
    }

    /// Returns the number of live subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    fn publish(&self, event: RoleActionEvent) {
        // A send without subscribers is not an error.
        let _ = self.sender.send(event);
    }
}

impl Default for RoleActionBridge {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUFFER)
    }
}

/// Handle for one in-flight store call.
///
/// Consuming `complete` or `fail` publishes the single terminal event.
pub struct ActionInvocation {
    bridge: RoleActionBridge,
    invocation: InvocationId,
    action: RoleAction,
}

impl ActionInvocation {
    /// Returns the invocation identifier.
    #[must_use]
    pub fn id(&self) -> InvocationId {
        self.invocation
    }

    /// Publishes a successful completion.
    pub fn complete(self, outcome: RoleActionOutcome) {
        self.settle(ActionLifecycle::Completed(outcome));
    }

    /// Publishes a failure.
    pub fn fail(self, error: AppError) {
        self.settle(ActionLifecycle::Failed(error));
    }

    fn settle(self, lifecycle: ActionLifecycle) {
        self.bridge.publish(RoleActionEvent {
            invocation: self.invocation,
            action: self.action,
            lifecycle,
        });
    }
}

/// Subscriber handle; dropping it or calling `release` unsubscribes.
pub struct RoleActionSubscription {
    receiver: broadcast::Receiver<RoleActionEvent>,
    missed_events: u64,
}

impl RoleActionSubscription {
    /// Waits for the next event; `None` once every bridge handle is gone.
    ///
    /// Events overwritten while this subscriber lagged are skipped and
    /// counted in `missed_events`.
    pub async fn recv(&mut self) -> Option<RoleActionEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(RecvError::Lagged(skipped)) => {
                    self.missed_events = self.missed_events.saturating_add(skipped);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Returns the next buffered event without waiting.
    pub fn try_recv(&mut self) -> Option<RoleActionEvent> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => return Some(event),
                Err(TryRecvError::Lagged(skipped)) => {
                    self.missed_events = self.missed_events.saturating_add(skipped);
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => return None,
            }
        }
    }

    /// Returns how many events were lost to lag.
    #[must_use]
    pub fn missed_events(&self) -> u64 {
        self.missed_events
    }

    /// Releases the subscription.
    pub fn release(self) {}
}
