use std::sync::Arc;

use logdeck_core::{AppError, AppResult, CurrentUser};
use logdeck_domain::{
    View, ViewType, is_permitted, legacy_dashboard_edit_permission, view_edit_permission,
};
use tracing::warn;

use crate::view_actions_ports::{OwnershipResolver, SHARE_ENTITY_TYPE, ViewSaveActions};
use crate::view_state_store::ViewSnapshot;

/// Dialogs opened from the menu. Any combination may be open at once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OpenDialogs {
    /// Sharing dialog.
    pub share: bool,
    /// Debug overlay.
    pub debug: bool,
    /// Save-as properties dialog.
    pub save_as: bool,
    /// Edit-metadata properties dialog.
    pub edit: bool,
    /// CSV export dialog.
    pub export: bool,
}

/// Properties dialog for editing or duplicating a view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewPropertiesDialog {
    /// View being edited.
    pub view: View,
    /// Dialog title.
    pub title: String,
}

/// Sharing dialog parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareDialog {
    /// Shared entity id.
    pub entity_id: String,
    /// Shared entity type.
    pub entity_type: &'static str,
    /// Shared entity title.
    pub entity_title: String,
    /// Help text shown above the collaborator search.
    pub description: String,
}

/// CSV export dialog parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExportDialog {
    /// View to export from.
    pub view: View,
}

/// Entries of the actions menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuEntryKind {
    /// Save the view in place.
    Save,
    /// Save a copy under a new identity.
    SaveAs,
    /// Edit title and description.
    EditMetadata,
    /// Share with users and teams.
    Share,
    /// Export results to CSV.
    ExportCsv,
    /// Open the debug overlay.
    Debug,
    /// Configure full-screen display of a dashboard.
    FullScreen,
}

/// One rendered menu entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    /// Entry kind.
    pub kind: MenuEntryKind,
    /// Display label.
    pub label: &'static str,
    /// Whether the entry can be triggered.
    pub enabled: bool,
    /// Explanation shown on a disabled entry.
    pub tooltip: Option<String>,
}

impl MenuEntry {
    fn new(kind: MenuEntryKind, label: &'static str, enabled: bool) -> Self {
        Self {
            kind,
            label,
            enabled,
            tooltip: None,
        }
    }
}

/// Save, share and export actions for the active view.
///
/// Permission and validity flags are derived from the current snapshot on
/// every call; nothing is cached.
pub struct ViewActionsMenu {
    snapshot: ViewSnapshot,
    current_user: Option<CurrentUser>,
    developer_mode: bool,
    save_actions: Arc<dyn ViewSaveActions>,
    ownership: Arc<dyn OwnershipResolver>,
    open: OpenDialogs,
}

impl ViewActionsMenu {
    /// Creates a menu for the given state and collaborators.
    #[must_use]
    pub fn new(
        snapshot: ViewSnapshot,
        current_user: Option<CurrentUser>,
        developer_mode: bool,
        save_actions: Arc<dyn ViewSaveActions>,
        ownership: Arc<dyn OwnershipResolver>,
    ) -> Self {
        Self {
            snapshot,
            current_user,
            developer_mode,
            save_actions,
            ownership,
            open: OpenDialogs::default(),
        }
    }

    /// Replaces the view state after the stores changed.
    pub fn update_state(&mut self, snapshot: ViewSnapshot) {
        self.snapshot = snapshot;
    }

    /// Returns which dialogs are open.
    #[must_use]
    pub fn open_dialogs(&self) -> OpenDialogs {
        self.open
    }

    /// Returns whether the query references unbound parameters.
    #[must_use]
    pub fn has_undeclared_parameters(&self) -> bool {
        self.snapshot.metadata.has_undeclared_parameters()
    }

    /// Returns whether the current user may edit the view.
    ///
    /// Dashboards also accept the legacy `dashboards:edit:<id>` grant.
    #[must_use]
    pub fn allowed_to_edit(&self) -> bool {
        let Some(user) = self.current_user.as_ref() else {
            return false;
        };
        let view = &self.snapshot.view;
        let view_id = view.id().as_str();

        is_permitted(user.permissions(), &[view_edit_permission(view_id)])
            || (view.view_type() == ViewType::Dashboard
                && is_permitted(
                    user.permissions(),
                    &[legacy_dashboard_edit_permission(view_id)],
                ))
    }

    /// Returns whether Save is available.
    #[must_use]
    pub fn save_enabled(&self) -> bool {
        !self.snapshot.is_new && !self.has_undeclared_parameters() && self.allowed_to_edit()
    }

    /// Returns whether Save as is available.
    #[must_use]
    pub fn save_as_enabled(&self) -> bool {
        !self.has_undeclared_parameters()
    }

    /// Returns whether Edit metadata is available.
    #[must_use]
    pub fn edit_enabled(&self) -> bool {
        !self.snapshot.is_new && self.allowed_to_edit()
    }

    /// Returns whether Share is available given the ownership answer.
    #[must_use]
    pub fn share_enabled(&self, can_share: bool) -> bool {
        self.edit_enabled() && can_share
    }

    /// Returns whether the debug entry is shown.
    #[must_use]
    pub fn debug_available(&self) -> bool {
        self.developer_mode
    }

    /// Saves the current view in place.
    pub async fn save(&self) -> AppResult<()> {
        if !self.save_enabled() {
            return Err(AppError::Forbidden(self.denial("save")));
        }

        self.save_actions.save_view(&self.snapshot.view).await
    }

    /// Opens the save-as dialog with a copy under a fresh identity.
    pub fn open_save_as(&mut self) -> AppResult<ViewPropertiesDialog> {
        if !self.save_as_enabled() {
            return Err(AppError::Forbidden(self.denial("save as")));
        }

        self.open.save_as = true;
        Ok(ViewPropertiesDialog {
            view: self.snapshot.view.with_new_identity(),
            title: format!("Save new {}", self.type_label()),
        })
    }

    /// Saves the duplicated view and closes the save-as dialog.
    pub async fn confirm_save_as(&mut self, view: &View) -> AppResult<()> {
        if !self.save_as_enabled() {
            return Err(AppError::Forbidden(self.denial("save as")));
        }

        self.save_actions.save_view_as(view).await?;
        self.open.save_as = false;
        Ok(())
    }

    /// Closes the save-as dialog.
    pub fn close_save_as(&mut self) {
        self.open.save_as = false;
    }

    /// Opens the metadata dialog for the current view.
    pub fn open_edit(&mut self) -> AppResult<ViewPropertiesDialog> {
        if !self.edit_enabled() {
            return Err(AppError::Forbidden(self.denial("edit")));
        }

        self.open.edit = true;
        Ok(ViewPropertiesDialog {
            view: self.snapshot.view.clone(),
            title: format!("Editing {}", self.type_label()),
        })
    }

    /// Saves edited metadata and closes the dialog.
    pub async fn confirm_edit(&mut self, view: &View) -> AppResult<()> {
        if !self.edit_enabled() {
            return Err(AppError::Forbidden(self.denial("edit")));
        }

        self.save_actions.save_view(view).await?;
        self.open.edit = false;
        Ok(())
    }

    /// Closes the metadata dialog.
    pub fn close_edit(&mut self) {
        self.open.edit = false;
    }

    /// Opens the sharing dialog once ownership is confirmed.
    pub async fn open_share(&mut self) -> AppResult<ShareDialog> {
        let can_share = self.resolve_can_share().await?;
        if !self.share_enabled(can_share) {
            return Err(AppError::Forbidden(self.denial("share")));
        }

        let view = &self.snapshot.view;
        let dialog = ShareDialog {
            entity_id: view.id().as_str().to_owned(),
            entity_type: SHARE_ENTITY_TYPE,
            entity_title: view.title().to_owned(),
            description: format!(
                "Search for a User or Team to add as collaborator on this {}.",
                self.type_label()
            ),
        };
        self.open.share = true;
        Ok(dialog)
    }

    /// Closes the sharing dialog.
    pub fn close_share(&mut self) {
        self.open.share = false;
    }

    /// Opens the CSV export dialog.
    pub fn open_export(&mut self) -> CsvExportDialog {
        self.open.export = true;
        CsvExportDialog {
            view: self.snapshot.view.clone(),
        }
    }

    /// Closes the CSV export dialog.
    pub fn close_export(&mut self) {
        self.open.export = false;
    }

    /// Opens the debug overlay when developer mode is on.
    pub fn open_debug(&mut self) -> AppResult<()> {
        if !self.developer_mode {
            return Err(AppError::Forbidden(
                "debug overlay requires developer mode".to_owned(),
            ));
        }

        self.open.debug = true;
        Ok(())
    }

    /// Closes the debug overlay.
    pub fn close_debug(&mut self) {
        self.open.debug = false;
    }

    /// Resolves ownership and returns the rendered entries.
    ///
    /// A failed ownership lookup only disables Share.
    pub async fn render(&self) -> Vec<MenuEntry> {
        let can_share = match self.resolve_can_share().await {
            Ok(can_share) => can_share,
            Err(error) => {
                warn!(
                    view_id = %self.snapshot.view.id(),
                    error = %error,
                    "ownership lookup failed; sharing disabled"
                );
                false
            }
        };

        self.menu_entries(can_share)
    }

    /// Returns entries in display order for a known ownership answer.
    #[must_use]
    pub fn menu_entries(&self, can_share: bool) -> Vec<MenuEntry> {
        let mut share = MenuEntry::new(
            MenuEntryKind::Share,
            "Share",
            self.share_enabled(can_share),
        );
        if !can_share && !self.snapshot.is_new {
            share.tooltip = Some(format!(
                "Only owners of this {} are allowed to share it.",
                self.type_label()
            ));
        }

        let mut entries = vec![
            MenuEntry::new(MenuEntryKind::Save, "Save", self.save_enabled()),
            MenuEntry::new(MenuEntryKind::SaveAs, "Save as", self.save_as_enabled()),
            MenuEntry::new(
                MenuEntryKind::EditMetadata,
                "Edit metadata",
                self.edit_enabled(),
            ),
            share,
            MenuEntry::new(MenuEntryKind::ExportCsv, "Export to CSV", true),
        ];

        if self.developer_mode {
            entries.push(MenuEntry::new(MenuEntryKind::Debug, "Debug", true));
        }

        if self.snapshot.view.view_type() == ViewType::Dashboard {
            entries.push(MenuEntry::new(
                MenuEntryKind::FullScreen,
                "Full screen",
                !self.snapshot.is_new,
            ));
        }

        entries
    }

    async fn resolve_can_share(&self) -> AppResult<bool> {
        if self.snapshot.is_new {
            return Ok(false);
        }

        self.ownership
            .can_share(self.snapshot.view.id(), SHARE_ENTITY_TYPE)
            .await
    }

    fn type_label(&self) -> &'static str {
        self.snapshot.view.view_type().label()
    }

    fn denial(&self, action: &str) -> String {
        let view = &self.snapshot.view;
        if self.snapshot.is_new && action != "save as" {
            return format!("cannot {action} unsaved {} '{}'", self.type_label(), view.title());
        }
        if self.has_undeclared_parameters() && matches!(action, "save" | "save as") {
            let names: Vec<&str> = self
                .snapshot
                .metadata
                .undeclared()
                .iter()
                .map(String::as_str)
                .collect();
            return format!(
                "cannot {action} {} '{}' with undeclared parameters: {}",
                self.type_label(),
                view.title(),
                names.join(", ")
            );
        }

        format!(
            "not allowed to {action} {} '{}'",
            self.type_label(),
            view.title()
        )
    }
}

#[cfg(test)]
mod tests;
