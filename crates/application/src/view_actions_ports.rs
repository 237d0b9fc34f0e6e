use async_trait::async_trait;
use logdeck_core::AppResult;
use logdeck_domain::{View, ViewId};

/// Entity type under which views are shared and owned.
pub const SHARE_ENTITY_TYPE: &str = "dashboard";

/// Port for persisting views from the view actions menu.
#[async_trait]
pub trait ViewSaveActions: Send + Sync {
    /// Saves an existing view in place.
    async fn save_view(&self, view: &View) -> AppResult<()>;

    /// Saves a copy of a view under its new identity.
    async fn save_view_as(&self, view: &View) -> AppResult<()>;
}

/// Port answering whether the current user owns an entity.
#[async_trait]
pub trait OwnershipResolver: Send + Sync {
    /// Returns whether the current user may share the entity.
    async fn can_share(&self, entity_id: &ViewId, entity_type: &str) -> AppResult<bool>;
}
