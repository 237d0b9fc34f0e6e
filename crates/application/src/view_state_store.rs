use logdeck_domain::{SearchMetadata, View};

/// Owned copy of the view state consumed by the actions menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewSnapshot {
    /// Current view.
    pub view: View,
    /// Whether the view has never been saved.
    pub is_new: bool,
    /// Parameter analysis of the current query.
    pub metadata: SearchMetadata,
}

/// Holds the active view and keeps its search metadata current.
///
/// Metadata is recomputed on every change to the view.
#[derive(Debug, Clone)]
pub struct ViewStateStore {
    view: View,
    is_new: bool,
    metadata: SearchMetadata,
}

impl ViewStateStore {
    /// Creates a store holding `view`.
    #[must_use]
    pub fn new(view: View, is_new: bool) -> Self {
        let metadata = SearchMetadata::analyze(&view);
        Self {
            view,
            is_new,
            metadata,
        }
    }

    /// Replaces the active view.
    pub fn load(&mut self, view: View, is_new: bool) {
        self.metadata = SearchMetadata::analyze(&view);
        self.view = view;
        self.is_new = is_new;
    }

    /// Changes the query of the active view.
    pub fn update_query(&mut self, query: &str) {
        let view = self.view.with_query(query);
        self.load(view, self.is_new);
    }

    /// Binds a parameter value on the active view.
    pub fn bind_parameter(&mut self, name: &str, value: &str) {
        let view = self.view.with_parameter(name, value);
        self.load(view, self.is_new);
    }

    /// Records that `view` was persisted and is now the active view.
    pub fn mark_saved(&mut self, view: View) {
        self.load(view, false);
    }

    /// Returns the active view.
    #[must_use]
    pub fn view(&self) -> &View {
        &self.view
    }

    /// Returns the current search metadata.
    #[must_use]
    pub fn metadata(&self) -> &SearchMetadata {
        &self.metadata
    }

    /// Returns an owned copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> ViewSnapshot {
        ViewSnapshot {
            view: self.view.clone(),
            is_new: self.is_new,
            metadata: self.metadata.clone(),
        }
    }
}
