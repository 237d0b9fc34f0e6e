//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod pagination;
mod role;
mod search_metadata;
mod security;
mod user;
mod view;

pub use pagination::{Page, Pagination};
pub use role::Role;
pub use search_metadata::{SearchMetadata, referenced_parameters};
pub use security::{
    PermissionPattern, is_permitted, legacy_dashboard_edit_permission, view_edit_permission,
    view_read_permission,
};
pub use user::UserOverview;
pub use view::{View, ViewId, ViewType};
