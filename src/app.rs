//! Process-wide application state.
//!
//! [`App`] owns the account directory, the session, the todo store and the edit
//! session. A presentation layer drives it through command methods (`login`,
//! `register`, `submit`, `cancel`, `delete`, `select`, ...) and reads it back
//! through snapshots; it never hands out mutable references to its parts.
//!
//! Commands that touch todos or the edit session require a signed-in user and
//! return [`Error::Unauthenticated`] otherwise, without changing anything.

use crate::accounts::AccountDirectory;
use crate::edit_session::{EditMode, EditSession};
use crate::models::{AuthPolicy, Todo};
use crate::render::{MarkdownRenderer, Renderer};
use crate::session::Session;
use crate::storage::Persistence;
use crate::todos::{Clock, IdGenerator, SystemClock, TodoStore, UuidGenerator};
use crate::{Error, Result};
use serde::Serialize;

/// Result of submitting the todo form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "todo", rename_all = "snake_case")]
pub enum SubmitOutcome {
    /// A new todo was created (form was idle)
    Created(Todo),
    /// The edited todo was updated in place
    Updated(Todo),
    /// The edit target disappeared; nothing was written
    Discarded,
}

/// Rendered preview of the selected todo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Preview {
    pub id: String,
    pub title: String,
    pub html: String,
}

/// Read-only copy of everything a presentation layer needs to draw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSnapshot {
    pub user: Option<String>,
    pub todos: Vec<Todo>,
    pub active_id: Option<String>,
    pub editing_id: Option<String>,
}

/// The application state and its commands.
pub struct App {
    persistence: Persistence,
    accounts: AccountDirectory,
    session: Session,
    todos: TodoStore,
    edit: EditSession,
    clock: Box<dyn Clock>,
    ids: Box<dyn IdGenerator>,
    renderer: Box<dyn Renderer>,
}

impl App {
    /// Build the state from persisted data: load todos and restore the remembered login.
    pub fn open(persistence: Persistence, policy: AuthPolicy) -> Self {
        let accounts = AccountDirectory::new(persistence.clone());
        let mut session = Session::new(persistence.clone(), policy);
        session.restore();
        let todos = TodoStore::load(persistence.clone());

        tracing::debug!(
            location = %persistence.location(),
            todos = todos.len(),
            user = ?session.current(),
            "opened"
        );

        Self {
            persistence,
            accounts,
            session,
            todos,
            edit: EditSession::new(),
            clock: Box::new(SystemClock),
            ids: Box::new(UuidGenerator),
            renderer: Box::new(MarkdownRenderer),
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_id_generator(mut self, ids: impl IdGenerator + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    pub fn with_renderer(mut self, renderer: impl Renderer + 'static) -> Self {
        self.renderer = Box::new(renderer);
        self
    }

    // ---------------------------------------------------------------------
    // Accounts and session
    // ---------------------------------------------------------------------

    /// Register an account. Does not sign in.
    pub fn register(&mut self, username: &str, password: &str, confirm: &str) -> Result<()> {
        let username = required(username, "username")?;
        let password = required(password, "password")?;
        if password != confirm.trim() {
            return Err(Error::PasswordMismatch);
        }
        self.accounts.register(username, password)
    }

    /// Sign in according to the session's policy.
    ///
    /// Switching to a different user resets the edit session.
    pub fn login(&mut self, username: &str, password: Option<&str>) -> Result<()> {
        let username = required(username, "username")?;
        let password = password.map(str::trim);
        let previous = self.session.current().map(str::to_string);
        self.session.authenticate(username, password, &self.accounts)?;
        if previous.as_deref() != Some(username) {
            self.edit.reset();
        }
        Ok(())
    }

    /// Sign out and reset the edit session.
    pub fn logout(&mut self) -> Result<()> {
        self.session.sign_out()?;
        self.edit.reset();
        Ok(())
    }

    pub fn current(&self) -> Option<&str> {
        self.session.current()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    pub fn policy(&self) -> AuthPolicy {
        self.session.policy()
    }

    pub fn accounts(&self) -> &AccountDirectory {
        &self.accounts
    }

    // ---------------------------------------------------------------------
    // Todos and edit session
    // ---------------------------------------------------------------------

    /// All todos, newest first.
    pub fn list(&self) -> &[Todo] {
        self.todos.list()
    }

    pub fn get(&self, id: &str) -> Option<&Todo> {
        self.todos.get(id)
    }

    pub fn edit_session_state(&self) -> &EditSession {
        &self.edit
    }

    /// Enter edit mode for `id` and return the record to pre-fill the form.
    ///
    /// An unknown id leaves the state untouched and yields `None`.
    pub fn start_edit(&mut self, id: &str) -> Result<Option<Todo>> {
        self.require_auth()?;
        let Some(todo) = self.todos.get(id).cloned() else {
            return Ok(None);
        };
        self.edit.start_edit(id);
        Ok(Some(todo))
    }

    /// Submit the todo form: create when idle, update when editing.
    pub fn submit(&mut self, title: &str, content: &str) -> Result<SubmitOutcome> {
        let owner = self.require_auth()?.to_string();
        let title = required(title, "title")?;
        let content = required(content, "content")?;

        match self.edit.mode().clone() {
            EditMode::Idle => {
                let todo = self
                    .todos
                    .create(title, content, &owner, self.clock.as_ref(), self.ids.as_ref())?;
                self.edit.select(&todo.id);
                Ok(SubmitOutcome::Created(todo))
            }
            EditMode::Editing(id) => {
                match self.todos.update(&id, title, content, self.clock.as_ref()) {
                    Ok(todo) => {
                        self.edit.select(&id);
                        self.edit.cancel();
                        Ok(SubmitOutcome::Updated(todo))
                    }
                    Err(Error::NotFound(_)) => {
                        tracing::debug!(id = %id, "edit target vanished; discarding");
                        self.edit.cancel();
                        Ok(SubmitOutcome::Discarded)
                    }
                    Err(e) => Err(e),
                }
            }
        }
    }

    /// Leave edit mode without writing anything.
    pub fn cancel(&mut self) {
        self.edit.cancel();
    }

    /// Select `id` for preview.
    ///
    /// The selection is recorded even if no such todo exists; [`App::preview`]
    /// then reports nothing selected.
    pub fn select(&mut self, id: &str) -> Result<()> {
        self.require_auth()?;
        self.edit.select(id);
        Ok(())
    }

    /// Delete a todo, leaving edit mode first if it was the target.
    ///
    /// Returns whether a todo was removed; unknown ids are not an error.
    pub fn delete(&mut self, id: &str) -> Result<bool> {
        self.require_auth()?;
        let mut edit = self.edit.clone();
        edit.forget(id);
        let removed = self.todos.delete(id)?;
        self.edit = edit;
        Ok(removed)
    }

    /// Render the selected todo, if the selection still resolves.
    pub fn preview(&self) -> Option<Preview> {
        let active = self.todos.get(self.edit.active_id()?)?;
        Some(Preview {
            id: active.id.clone(),
            title: active.title.clone(),
            html: self.renderer.render(&active.content),
        })
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> AppSnapshot {
        AppSnapshot {
            user: self.current().map(str::to_string),
            todos: self.todos.list().to_vec(),
            active_id: self.edit.active_id().map(str::to_string),
            editing_id: self.edit.editing_id().map(str::to_string),
        }
    }

    /// Where the data lives.
    pub fn location(&self) -> String {
        self.persistence.location()
    }

    fn require_auth(&self) -> Result<&str> {
        self.session.current().ok_or(Error::Unauthenticated)
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("persistence", &self.persistence)
            .field("session", &self.session)
            .field("todos", &self.todos.len())
            .field("edit", &self.edit)
            .finish()
    }
}

/// Trim a form field and reject it when blank.
fn required<'a>(value: &'a str, field: &str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidInput(format!("{} must not be empty", field)));
    }
    Ok(trimmed)
}
