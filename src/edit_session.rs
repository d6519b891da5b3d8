//! Form mode and preview selection.
//!
//! The todo form is either creating a new todo ([`EditMode::Idle`]) or editing
//! an existing one ([`EditMode::Editing`]). Separately, `active_id` names the todo
//! shown in the preview. Neither is persisted.
//!
//! This type only tracks the state. [`crate::App`] applies the authentication
//! guard and talks to the todo store.

use serde::Serialize;

/// Which todo the form targets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", content = "id", rename_all = "snake_case")]
pub enum EditMode {
    /// Form creates a new todo on submit
    #[default]
    Idle,
    /// Form is pre-filled from this todo and updates it on submit
    Editing(String),
}

/// Transient edit and preview state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EditSession {
    mode: EditMode,
    active_id: Option<String>,
}

impl EditSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> &EditMode {
        &self.mode
    }

    /// Id of the todo being edited, if any.
    pub fn editing_id(&self) -> Option<&str> {
        match &self.mode {
            EditMode::Idle => None,
            EditMode::Editing(id) => Some(id),
        }
    }

    /// Id of the todo selected for preview, if any.
    pub fn active_id(&self) -> Option<&str> {
        self.active_id.as_deref()
    }

    pub fn is_idle(&self) -> bool {
        self.mode == EditMode::Idle
    }

    pub fn is_editing(&self, id: &str) -> bool {
        self.editing_id() == Some(id)
    }

    /// Target `id` for editing. The caller has checked that it exists.
    pub fn start_edit(&mut self, id: &str) {
        tracing::debug!(id, "edit started");
        self.mode = EditMode::Editing(id.to_string());
    }

    /// Return to create mode, discarding the edit target.
    pub fn cancel(&mut self) {
        if let EditMode::Editing(id) = &self.mode {
            tracing::debug!(id = %id, "edit finished");
        }
        self.mode = EditMode::Idle;
    }

    pub fn select(&mut self, id: &str) {
        self.active_id = Some(id.to_string());
    }

    /// Forget `id` before it is deleted: leave edit mode if it was the target
    /// and drop it from the preview if it was selected.
    pub fn forget(&mut self, id: &str) {
        if self.is_editing(id) {
            self.cancel();
        }
        if self.active_id.as_deref() == Some(id) {
            self.active_id = None;
        }
    }

    /// Back to the initial state: idle, nothing selected.
    pub fn reset(&mut self) {
        self.cancel();
        self.active_id = None;
    }
}
