//! Application services and ports.

#![forbid(unsafe_code)]

mod rest_ports;
mod role_action_bridge;
mod role_pagination;
mod role_routes;
mod role_store;
mod view_actions_menu;
mod view_actions_ports;
mod view_state_store;

pub use rest_ports::{RestMethod, RestRequest, RestTransport, RoutePath};
pub use role_action_bridge::{
    ActionInvocation, ActionLifecycle, InvocationId, RoleAction, RoleActionBridge,
    RoleActionEvent, RoleActionOutcome, RoleActionSubscription,
};
pub use role_pagination::{decode_role_page, decode_user_page};
pub use role_routes::{PageRequest, RoleRoutes, RouteTemplate};
pub use role_store::RoleStore;
pub use view_actions_menu::{
    CsvExportDialog, MenuEntry, MenuEntryKind, OpenDialogs, ShareDialog, ViewActionsMenu,
    ViewPropertiesDialog,
};
pub use view_actions_ports::{OwnershipResolver, SHARE_ENTITY_TYPE, ViewSaveActions};
pub use view_state_store::{ViewSnapshot, ViewStateStore};
