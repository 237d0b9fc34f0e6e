use std::sync::Arc;

use async_trait::async_trait;
use logdeck_core::{AppError, AppResult, CurrentUser};
use logdeck_domain::{View, ViewId, ViewType};
use tokio::sync::Mutex;

use crate::{
    MenuEntryKind, OpenDialogs, OwnershipResolver, ViewSaveActions, ViewSnapshot, ViewStateStore,
};

use super::ViewActionsMenu;

#[derive(Default)]
struct FakeSaveActions {
    saved: Mutex<Vec<View>>,
    saved_as: Mutex<Vec<View>>,
}

#[async_trait]
impl ViewSaveActions for FakeSaveActions {
    async fn save_view(&self, view: &View) -> AppResult<()> {
        self.saved.lock().await.push(view.clone());
        Ok(())
    }

    async fn save_view_as(&self, view: &View) -> AppResult<()> {
        self.saved_as.lock().await.push(view.clone());
        Ok(())
    }
}

struct FakeOwnership {
    owner: bool,
    checked: Mutex<Vec<(String, String)>>,
}

impl FakeOwnership {
    fn new(owner: bool) -> Arc<Self> {
        Arc::new(Self {
            owner,
            checked: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl OwnershipResolver for FakeOwnership {
    async fn can_share(&self, entity_id: &ViewId, entity_type: &str) -> AppResult<bool> {
        self.checked
            .lock()
            .await
            .push((entity_id.as_str().to_owned(), entity_type.to_owned()));
        Ok(self.owner)
    }
}

struct UnreachableOwnership;

#[async_trait]
impl OwnershipResolver for UnreachableOwnership {
    async fn can_share(&self, _entity_id: &ViewId, _entity_type: &str) -> AppResult<bool> {
        Err(AppError::Network("ownership lookup refused".to_owned()))
    }
}

const VIEW_ID: &str = "5f1a2b3c4d5e6f7a8b9c0d1e";

fn view(view_type: ViewType, query: &str) -> View {
    let id = ViewId::parse(VIEW_ID).unwrap_or_else(|_| unreachable!());
    View::new(id, "Failed logins", view_type).with_query(query)
}

fn snapshot(view: View, is_new: bool) -> ViewSnapshot {
    ViewStateStore::new(view, is_new).snapshot()
}

fn user(permissions: &[&str]) -> Option<CurrentUser> {
    Some(CurrentUser::new(
        "alice",
        "Alice",
        permissions.iter().map(|value| (*value).to_owned()).collect(),
    ))
}

fn menu(
    snapshot: ViewSnapshot,
    current_user: Option<CurrentUser>,
    developer_mode: bool,
) -> (ViewActionsMenu, Arc<FakeSaveActions>) {
    let save_actions = Arc::new(FakeSaveActions::default());
    let menu = ViewActionsMenu::new(
        snapshot,
        current_user,
        developer_mode,
        save_actions.clone(),
        FakeOwnership::new(true),
    );
    (menu, save_actions)
}

#[test]
fn view_edit_permission_allows_edit_for_any_view_type() {
    for view_type in [ViewType::Search, ViewType::Dashboard] {
        let (menu, _) = menu(
            snapshot(view(view_type, "*"), false),
            user(&["view:edit:5f1a2b3c4d5e6f7a8b9c0d1e"]),
            false,
        );
        assert!(menu.allowed_to_edit());
    }
}

#[test]
fn legacy_dashboard_permission_only_applies_to_dashboards() {
    let legacy = user(&["dashboards:edit:5f1a2b3c4d5e6f7a8b9c0d1e"]);

    let (dashboard_menu, _) = menu(
        snapshot(view(ViewType::Dashboard, "*"), false),
        legacy.clone(),
        false,
    );
    let (search_menu, _) = menu(snapshot(view(ViewType::Search, "*"), false), legacy, false);

    assert!(dashboard_menu.allowed_to_edit());
    assert!(!search_menu.allowed_to_edit());
}

#[test]
fn missing_user_is_not_allowed_to_edit() {
    let (menu, _) = menu(snapshot(view(ViewType::Dashboard, "*"), false), None, false);
    assert!(!menu.allowed_to_edit());
}

#[test]
fn undeclared_parameters_disable_save_and_save_as() {
    let (menu, _) = menu(
        snapshot(view(ViewType::Search, "source:$host$"), false),
        user(&["*"]),
        false,
    );

    assert!(menu.has_undeclared_parameters());
    assert!(!menu.save_enabled());
    assert!(!menu.save_as_enabled());
}

#[test]
fn save_as_does_not_require_edit_permission() {
    let (menu, _) = menu(
        snapshot(view(ViewType::Search, "source:web"), false),
        user(&[]),
        false,
    );

    assert!(!menu.allowed_to_edit());
    assert!(!menu.save_enabled());
    assert!(menu.save_as_enabled());
}

#[test]
fn new_views_cannot_be_saved_edited_or_shared() {
    let (menu, _) = menu(
        snapshot(view(ViewType::Dashboard, "*"), true),
        user(&["*"]),
        false,
    );

    assert!(!menu.save_enabled());
    assert!(menu.save_as_enabled());
    assert!(!menu.edit_enabled());
    assert!(!menu.share_enabled(true));
}

#[tokio::test]
async fn save_invokes_collaborator_with_current_view() {
    let (menu, save_actions) = menu(
        snapshot(view(ViewType::Dashboard, "*"), false),
        user(&["view:edit:*"]),
        false,
    );

    assert!(menu.save().await.is_ok());

    let saved = save_actions.saved.lock().await;
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].id().as_str(), VIEW_ID);
}

#[tokio::test]
async fn disabled_save_is_rejected_without_calling_collaborator() {
    let (menu, save_actions) = menu(
        snapshot(view(ViewType::Dashboard, "*"), false),
        user(&["view:read:*"]),
        false,
    );

    let result = menu.save().await;

    assert!(matches!(result, Err(AppError::Forbidden(_))));
    assert!(save_actions.saved.lock().await.is_empty());
}

#[tokio::test]
async fn save_as_duplicates_under_new_identity() {
    let (mut menu, save_actions) = menu(
        snapshot(view(ViewType::Dashboard, "*"), false),
        user(&[]),
        false,
    );

    let dialog = menu.open_save_as();
    assert!(dialog.is_ok());
    let Ok(dialog) = dialog else {
        return;
    };
    assert_eq!(dialog.title, "Save new dashboard");
    assert_ne!(dialog.view.id().as_str(), VIEW_ID);
    assert!(menu.open_dialogs().save_as);

    let renamed = dialog.view.with_title("Failed logins (copy)");
    assert!(menu.confirm_save_as(&renamed).await.is_ok());

    assert!(!menu.open_dialogs().save_as);
    let saved_as = save_actions.saved_as.lock().await;
    assert_eq!(saved_as[0].title(), "Failed logins (copy)");
}

#[tokio::test]
async fn edit_metadata_saves_through_save_action() {
    let (mut menu, save_actions) = menu(
        snapshot(view(ViewType::Search, "*"), false),
        user(&["view:edit:5f1a2b3c4d5e6f7a8b9c0d1e"]),
        false,
    );

    let dialog = menu.open_edit();
    assert!(dialog.is_ok());
    let Ok(dialog) = dialog else {
        return;
    };
    assert_eq!(dialog.title, "Editing search");

    let edited = dialog.view.with_details("Logins", "All failed logins");
    assert!(menu.confirm_edit(&edited).await.is_ok());
    assert!(!menu.open_dialogs().edit);
    assert_eq!(save_actions.saved.lock().await[0].summary(), "Logins");
}

#[tokio::test]
async fn share_requires_ownership() {
    let ownership = FakeOwnership::new(false);
    let mut menu = ViewActionsMenu::new(
        snapshot(view(ViewType::Dashboard, "*"), false),
        user(&["*"]),
        false,
        Arc::new(FakeSaveActions::default()),
        ownership.clone(),
    );

    let result = menu.open_share().await;

    assert!(matches!(result, Err(AppError::Forbidden(_))));
    assert!(!menu.open_dialogs().share);
    let checked = ownership.checked.lock().await;
    assert_eq!(
        checked.as_slice(),
        [(VIEW_ID.to_owned(), "dashboard".to_owned())]
    );
}

#[tokio::test]
async fn share_dialog_describes_view_type() {
    let (mut menu, _) = menu(
        snapshot(view(ViewType::Search, "*"), false),
        user(&["view:edit:*"]),
        false,
    );

    let dialog = menu.open_share().await;

    assert!(dialog.is_ok());
    let Ok(dialog) = dialog else {
        return;
    };
    assert_eq!(dialog.entity_id, VIEW_ID);
    assert_eq!(dialog.entity_type, "dashboard");
    assert_eq!(
        dialog.description,
        "Search for a User or Team to add as collaborator on this search."
    );
}

#[test]
fn dialogs_open_independently() {
    let (mut menu, _) = menu(
        snapshot(view(ViewType::Dashboard, "*"), false),
        user(&["*"]),
        true,
    );

    let _export = menu.open_export();
    assert!(menu.open_debug().is_ok());
    assert!(menu.open_edit().is_ok());
    assert_eq!(
        menu.open_dialogs(),
        OpenDialogs {
            share: false,
            debug: true,
            save_as: false,
            edit: true,
            export: true,
        }
    );

    menu.close_debug();
    menu.close_export();
    menu.close_edit();
    assert_eq!(menu.open_dialogs(), OpenDialogs::default());
}

#[test]
fn debug_requires_developer_mode() {
    let (mut menu, _) = menu(snapshot(view(ViewType::Search, "*"), false), user(&["*"]), false);

    assert!(!menu.debug_available());
    assert!(menu.open_debug().is_err());
    assert!(
        !menu
            .menu_entries(true)
            .iter()
            .any(|entry| entry.kind == MenuEntryKind::Debug)
    );
}

#[tokio::test]
async fn rendered_entries_reflect_state() {
    let (menu, _) = menu(
        snapshot(view(ViewType::Dashboard, "*"), false),
        user(&["dashboards:edit:5f1a2b3c4d5e6f7a8b9c0d1e"]),
        true,
    );

    let entries = menu.render().await;

    let kinds: Vec<MenuEntryKind> = entries.iter().map(|entry| entry.kind).collect();
    assert_eq!(
        kinds,
        [
            MenuEntryKind::Save,
            MenuEntryKind::SaveAs,
            MenuEntryKind::EditMetadata,
            MenuEntryKind::Share,
            MenuEntryKind::ExportCsv,
            MenuEntryKind::Debug,
            MenuEntryKind::FullScreen,
        ]
    );
    assert!(entries.iter().all(|entry| entry.enabled));
}

#[test]
fn share_entry_explains_missing_ownership() {
    let (menu, _) = menu(
        snapshot(view(ViewType::Dashboard, "*"), false),
        user(&["*"]),
        false,
    );

    let entries = menu.menu_entries(false);
    let share = entries
        .iter()
        .find(|entry| entry.kind == MenuEntryKind::Share);

    assert!(share.is_some_and(|entry| !entry.enabled));
    assert_eq!(
        share.and_then(|entry| entry.tooltip.as_deref()),
        Some("Only owners of this dashboard are allowed to share it.")
    );
}

#[test]
fn state_updates_are_reflected_immediately() {
    let mut store = ViewStateStore::new(view(ViewType::Search, "source:$host$"), false);
    let (mut menu, _) = menu(store.snapshot(), user(&["*"]), false);
    assert!(!menu.save_enabled());

    store.bind_parameter("host", "web-1");
    menu.update_state(store.snapshot());

    assert!(menu.save_enabled());
}

#[tokio::test]
async fn failed_ownership_lookup_only_disables_share() {
    let menu = ViewActionsMenu::new(
        snapshot(view(ViewType::Dashboard, "*"), false),
        user(&["*"]),
        false,
        Arc::new(FakeSaveActions::default()),
        Arc::new(UnreachableOwnership),
    );

    let entries = menu.render().await;

    let enabled: Vec<(MenuEntryKind, bool)> = entries
        .iter()
        .map(|entry| (entry.kind, entry.enabled))
        .collect();
    assert_eq!(
        enabled,
        [
            (MenuEntryKind::Save, true),
            (MenuEntryKind::SaveAs, true),
            (MenuEntryKind::EditMetadata, true),
            (MenuEntryKind::Share, false),
            (MenuEntryKind::ExportCsv, true),
            (MenuEntryKind::FullScreen, true),
        ]
    );
}

#[tokio::test]
async fn failed_ownership_lookup_fails_open_share() {
    let mut menu = ViewActionsMenu::new(
        snapshot(view(ViewType::Search, "*"), false),
        user(&["*"]),
        false,
        Arc::new(FakeSaveActions::default()),
        Arc::new(UnreachableOwnership),
    );

    let result = menu.open_share().await;

    assert!(matches!(result, Err(AppError::Network(_))));
    assert!(!menu.open_dialogs().share);
}
