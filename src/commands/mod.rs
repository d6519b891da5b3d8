//! Command implementations for the EasyLife CLI.
//!
//! Each command drives [`App`] and returns a result type that can be printed
//! as JSON (the default) or as human-readable text:
//! - account commands: `register`, `login`, `logout`, `whoami`
//! - todo commands: `todo_create`, `todo_list`, `todo_show`, `todo_edit`, `todo_delete`
//! - `config_show` / `config_path`

use crate::app::{App, AppSnapshot, Preview, SubmitOutcome};
use crate::config::ResolvedConfig;
use crate::models::{AuthMode, Todo};
use crate::{Error, Result};
use chrono::{DateTime, Local, Utc};
use serde::Serialize;
use std::path::PathBuf;

/// Command results that can be serialized to JSON or formatted for humans.
pub trait Output {
    /// Serialize to JSON string.
    fn to_json(&self) -> String;

    /// Format for human-readable output.
    fn to_human(&self) -> String;
}

fn json_of<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| {
        serde_json::json!({ "error": format!("failed to encode output: {}", e) }).to_string()
    })
}

/// Creation/edit time as shown to people, in local time.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

// === Accounts ===

#[derive(Debug, Serialize)]
pub struct Registered {
    pub username: String,
}

impl Output for Registered {
    fn to_json(&self) -> String {
        json_of(self)
    }

    fn to_human(&self) -> String {
        format!("Registered {}. Log in with `easylife login {}`.", self.username, self.username)
    }
}

/// Register an account. `confirm` defaults to `password`.
pub fn register(
    app: &mut App,
    username: &str,
    password: &str,
    confirm: Option<&str>,
) -> Result<Registered> {
    app.register(username, password, confirm.unwrap_or(password))?;
    Ok(Registered {
        username: username.trim().to_string(),
    })
}

#[derive(Debug, Serialize)]
pub struct LoggedIn {
    pub user: String,
    pub auth_mode: AuthMode,
}

impl Output for LoggedIn {
    fn to_json(&self) -> String {
        json_of(self)
    }

    fn to_human(&self) -> String {
        format!("Logged in as {}", self.user)
    }
}

pub fn login(app: &mut App, username: &str, password: Option<&str>) -> Result<LoggedIn> {
    app.login(username, password)?;
    let user = app.current().ok_or(Error::Unauthenticated)?.to_string();
    Ok(LoggedIn {
        user,
        auth_mode: app.policy().mode,
    })
}

#[derive(Debug, Serialize)]
pub struct LoggedOut {
    /// Who was signed in before, if anyone
    pub previous: Option<String>,
}

impl Output for LoggedOut {
    fn to_json(&self) -> String {
        json_of(self)
    }

    fn to_human(&self) -> String {
        match &self.previous {
            Some(user) => format!("Logged out {}", user),
            None => "Not logged in".to_string(),
        }
    }
}

pub fn logout(app: &mut App) -> Result<LoggedOut> {
    let previous = app.current().map(str::to_string);
    app.logout()?;
    Ok(LoggedOut { previous })
}

#[derive(Debug, Serialize)]
pub struct WhoAmI {
    pub user: Option<String>,
    pub authenticated: bool,
    pub auth_mode: AuthMode,
    pub data_dir: String,
}

impl Output for WhoAmI {
    fn to_json(&self) -> String {
        json_of(self)
    }

    fn to_human(&self) -> String {
        let mut lines = Vec::new();
        match &self.user {
            Some(user) => lines.push(format!("Logged in as {}", user)),
            None => lines.push("Not logged in".to_string()),
        }
        lines.push(format!("Auth mode: {}", self.auth_mode));
        lines.push(format!("Data: {}", self.data_dir));
        lines.join("\n")
    }
}

pub fn whoami(app: &App) -> WhoAmI {
    WhoAmI {
        user: app.current().map(str::to_string),
        authenticated: app.is_authenticated(),
        auth_mode: app.policy().mode,
        data_dir: app.location(),
    }
}

// === Todos ===

#[derive(Debug)]
pub struct Submitted {
    pub outcome: SubmitOutcome,
}

impl Output for Submitted {
    fn to_json(&self) -> String {
        json_of(&self.outcome)
    }

    fn to_human(&self) -> String {
        match &self.outcome {
            SubmitOutcome::Created(todo) => format!("Created {} \"{}\"", todo.id, todo.title),
            SubmitOutcome::Updated(todo) => format!("Updated {} \"{}\"", todo.id, todo.title),
            SubmitOutcome::Discarded => {
                "The todo being edited no longer exists; nothing was saved".to_string()
            }
        }
    }
}

/// Create a todo owned by the current user.
pub fn todo_create(app: &mut App, title: &str, content: &str) -> Result<Submitted> {
    app.cancel();
    let outcome = app.submit(title, content)?;
    Ok(Submitted { outcome })
}

/// Edit a todo; fields left as `None` keep their current value.
pub fn todo_edit(
    app: &mut App,
    id: &str,
    title: Option<&str>,
    content: Option<&str>,
) -> Result<Submitted> {
    let form = app
        .start_edit(id)?
        .ok_or_else(|| Error::NotFound(id.to_string()))?;
    let title = title.unwrap_or(form.title.as_str());
    let content = content.unwrap_or(form.content.as_str());

    match app.submit(title, content) {
        Ok(outcome) => Ok(Submitted { outcome }),
        Err(e) => {
            app.cancel();
            Err(e)
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TodoList {
    pub count: usize,
    pub active_id: Option<String>,
    pub editing_id: Option<String>,
    pub todos: Vec<Todo>,
}

impl TodoList {
    fn from_snapshot(snapshot: AppSnapshot) -> Self {
        Self {
            count: snapshot.todos.len(),
            active_id: snapshot.active_id,
            editing_id: snapshot.editing_id,
            todos: snapshot.todos,
        }
    }
}

impl Output for TodoList {
    fn to_json(&self) -> String {
        json_of(self)
    }

    fn to_human(&self) -> String {
        if self.todos.is_empty() {
            return "No todos yet. Create your first one!".to_string();
        }

        let mut lines = vec![format!("{} todo(s):", self.count)];
        for todo in &self.todos {
            let marker = if self.active_id.as_deref() == Some(todo.id.as_str()) {
                '*'
            } else {
                ' '
            };
            let editing = if self.editing_id.as_deref() == Some(todo.id.as_str()) {
                " (editing)"
            } else {
                ""
            };
            lines.push(format!("{} [{}] {}{}", marker, todo.id, todo.title, editing));
            let mut meta = format!(
                "      created {} by {}",
                format_timestamp(todo.created_at),
                todo.owner
            );
            if let Some(updated) = todo.updated_at {
                meta.push_str(&format!(", edited {}", format_timestamp(updated)));
            }
            lines.push(meta);
        }
        lines.join("\n")
    }
}

pub fn todo_list(app: &App) -> TodoList {
    TodoList::from_snapshot(app.snapshot())
}

#[derive(Debug, Serialize)]
pub struct TodoShow {
    pub todo: Todo,
    pub preview: Preview,
}

impl Output for TodoShow {
    fn to_json(&self) -> String {
        json_of(self)
    }

    fn to_human(&self) -> String {
        let mut lines = vec![
            self.todo.title.clone(),
            format!(
                "{} | created {} by {}",
                self.todo.id,
                format_timestamp(self.todo.created_at),
                self.todo.owner
            ),
        ];
        if let Some(updated) = self.todo.updated_at {
            lines.push(format!("edited {}", format_timestamp(updated)));
        }
        lines.push(String::new());
        lines.push(self.preview.html.trim_end().to_string());
        lines.join("\n")
    }
}

/// Select a todo and render its preview.
pub fn todo_show(app: &mut App, id: &str) -> Result<TodoShow> {
    app.select(id)?;
    let preview = app
        .preview()
        .ok_or_else(|| Error::NotFound(id.to_string()))?;
    let todo = app
        .get(id)
        .cloned()
        .ok_or_else(|| Error::NotFound(id.to_string()))?;
    Ok(TodoShow { todo, preview })
}

#[derive(Debug, Serialize)]
pub struct TodoDeleted {
    pub id: String,
    pub deleted: bool,
}

impl Output for TodoDeleted {
    fn to_json(&self) -> String {
        json_of(self)
    }

    fn to_human(&self) -> String {
        if self.deleted {
            format!("Deleted {}", self.id)
        } else {
            format!("No todo {} (nothing deleted)", self.id)
        }
    }
}

pub fn todo_delete(app: &mut App, id: &str) -> Result<TodoDeleted> {
    let deleted = app.delete(id)?;
    Ok(TodoDeleted {
        id: id.to_string(),
        deleted,
    })
}

// === Edit session ===

#[derive(Debug, Serialize)]
pub struct EditState {
    pub user: Option<String>,
    pub mode: &'static str,
    pub editing_id: Option<String>,
    pub active_id: Option<String>,
    pub count: usize,
}

impl Output for EditState {
    fn to_json(&self) -> String {
        json_of(self)
    }

    fn to_human(&self) -> String {
        let mut lines = vec![format!(
            "User: {}",
            self.user.as_deref().unwrap_or("(not logged in)")
        )];
        match &self.editing_id {
            Some(id) => lines.push(format!("Form: editing {}", id)),
            None => lines.push("Form: new todo".to_string()),
        }
        lines.push(format!(
            "Selected: {}",
            self.active_id.as_deref().unwrap_or("none")
        ));
        lines.push(format!("Todos: {}", self.count));
        lines.join("\n")
    }
}

pub fn edit_state(app: &App) -> EditState {
    let snapshot = app.snapshot();
    EditState {
        user: snapshot.user,
        mode: if snapshot.editing_id.is_some() {
            "editing"
        } else {
            "idle"
        },
        editing_id: snapshot.editing_id,
        active_id: snapshot.active_id,
        count: snapshot.todos.len(),
    }
}

#[derive(Debug, Serialize)]
pub struct EditStarted {
    pub id: String,
    pub title: String,
    pub content: String,
}

impl Output for EditStarted {
    fn to_json(&self) -> String {
        json_of(self)
    }

    fn to_human(&self) -> String {
        format!(
            "Editing {} \"{}\"\n---\n{}\n---\nUse `submit <title>` to save or `cancel`.",
            self.id, self.title, self.content
        )
    }
}

/// Put the form into edit mode for `id`.
pub fn edit_start(app: &mut App, id: &str) -> Result<EditStarted> {
    let todo = app
        .start_edit(id)?
        .ok_or_else(|| Error::NotFound(id.to_string()))?;
    Ok(EditStarted {
        id: todo.id,
        title: todo.title,
        content: todo.content,
    })
}

#[derive(Debug, Serialize)]
pub struct PreviewView {
    pub preview: Option<Preview>,
}

impl Output for PreviewView {
    fn to_json(&self) -> String {
        json_of(self)
    }

    fn to_human(&self) -> String {
        match &self.preview {
            Some(preview) => format!("{}\n\n{}", preview.title, preview.html.trim_end()),
            None => "Nothing selected. Pick a todo to preview its Markdown.".to_string(),
        }
    }
}

pub fn preview(app: &App) -> PreviewView {
    PreviewView {
        preview: app.preview(),
    }
}

// === Config ===

#[derive(Debug, Serialize)]
pub struct ConfigShow {
    #[serde(flatten)]
    pub config: ResolvedConfig,
}

impl Output for ConfigShow {
    fn to_json(&self) -> String {
        json_of(self)
    }

    fn to_human(&self) -> String {
        let config = &self.config;
        let path = config
            .config_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none)".to_string());
        [
            format!("config file:   {}", path),
            format!(
                "data-dir:      {} [{}]",
                config.data_dir.value.display(),
                config.data_dir.source
            ),
            format!(
                "auth-mode:     {} [{}]",
                config.auth_mode.value, config.auth_mode.source
            ),
            format!(
                "output-format: {} [{}]",
                config.output_format.value, config.output_format.source
            ),
            format!(
                "backend:       {} [{}]",
                config.backend.value, config.backend.source
            ),
        ]
        .join("\n")
    }
}

pub fn config_show(config: &ResolvedConfig) -> ConfigShow {
    ConfigShow {
        config: config.clone(),
    }
}

#[derive(Debug, Serialize)]
pub struct ConfigPath {
    pub path: Option<PathBuf>,
    pub exists: bool,
}

impl Output for ConfigPath {
    fn to_json(&self) -> String {
        json_of(self)
    }

    fn to_human(&self) -> String {
        match &self.path {
            Some(path) if self.exists => path.display().to_string(),
            Some(path) => format!("{} (not created yet)", path.display()),
            None => "No config directory available on this platform".to_string(),
        }
    }
}

pub fn config_path(config: &ResolvedConfig) -> ConfigPath {
    ConfigPath {
        exists: config.config_path.as_ref().is_some_and(|p| p.exists()),
        path: config.config_path.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AuthPolicy;
    use crate::test_utils::{SeqIds, StepClock, memory_persistence};

    fn app() -> App {
        let mut app = App::open(memory_persistence(), AuthPolicy::trust_username())
            .with_clock(StepClock::new())
            .with_id_generator(SeqIds::new());
        login(&mut app, "alice", None).unwrap();
        app
    }

    #[test]
    fn test_create_then_list_json() {
        let mut app = app();
        let created = todo_create(&mut app, "Buy milk", "- milk").unwrap();

        let json: serde_json::Value = serde_json::from_str(&created.to_json()).unwrap();
        assert_eq!(json["outcome"], "created");
        assert_eq!(json["todo"]["title"], "Buy milk");

        let list: serde_json::Value = serde_json::from_str(&todo_list(&app).to_json()).unwrap();
        assert_eq!(list["count"], 1);
        assert_eq!(list["active_id"], "todo-1");
        assert_eq!(list["todos"][0]["owner"], "alice");
    }

    #[test]
    fn test_empty_list_human() {
        let app = app();
        assert_eq!(
            todo_list(&app).to_human(),
            "No todos yet. Create your first one!"
        );
    }

    #[test]
    fn test_list_human_marks_active() {
        let mut app = app();
        todo_create(&mut app, "First", "a").unwrap();
        todo_create(&mut app, "Second", "b").unwrap();

        let human = todo_list(&app).to_human();
        assert!(human.starts_with("2 todo(s):"));
        assert!(human.contains("* [todo-2] Second"));
        assert!(human.contains("  [todo-1] First"));
        assert!(human.contains("by alice"));
    }

    #[test]
    fn test_edit_keeps_unspecified_fields() {
        let mut app = app();
        todo_create(&mut app, "Title", "original body").unwrap();

        let edited = todo_edit(&mut app, "todo-1", Some("New title"), None).unwrap();

        match edited.outcome {
            SubmitOutcome::Updated(todo) => {
                assert_eq!(todo.title, "New title");
                assert_eq!(todo.content, "original body");
            }
            other => panic!("expected Updated, got {:?}", other),
        }
        assert!(app.edit_session_state().is_idle());
    }

    #[test]
    fn test_edit_unknown_is_not_found() {
        let mut app = app();
        assert!(matches!(
            todo_edit(&mut app, "nope", Some("x"), None),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_edit_with_blank_title_leaves_edit_mode() {
        let mut app = app();
        todo_create(&mut app, "Title", "body").unwrap();

        assert!(matches!(
            todo_edit(&mut app, "todo-1", Some("  "), None),
            Err(Error::InvalidInput(_))
        ));
        assert!(app.edit_session_state().is_idle());
        assert_eq!(app.get("todo-1").unwrap().title, "Title");
    }

    #[test]
    fn test_show_renders_preview() {
        let mut app = app();
        todo_create(&mut app, "Groceries", "- milk\n- eggs").unwrap();

        let shown = todo_show(&mut app, "todo-1").unwrap();
        assert!(shown.preview.html.contains("<li>eggs</li>"));
        assert!(shown.to_human().starts_with("Groceries\n"));
    }

    #[test]
    fn test_show_unknown_is_not_found() {
        let mut app = app();
        assert!(matches!(
            todo_show(&mut app, "missing"),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_delete_reports_whether_removed() {
        let mut app = app();
        todo_create(&mut app, "A", "a").unwrap();

        assert!(todo_delete(&mut app, "todo-1").unwrap().deleted);
        let again = todo_delete(&mut app, "todo-1").unwrap();
        assert!(!again.deleted);
        assert_eq!(again.to_human(), "No todo todo-1 (nothing deleted)");
    }

    #[test]
    fn test_logout_reports_previous_user() {
        let mut app = app();
        let out = logout(&mut app).unwrap();
        assert_eq!(out.previous.as_deref(), Some("alice"));
        assert_eq!(logout(&mut app).unwrap().to_human(), "Not logged in");
    }

    #[test]
    fn test_register_confirm_defaults_to_password() {
        let mut app = app();
        let registered = register(&mut app, " bob ", "pw", None).unwrap();
        assert_eq!(registered.username, "bob");
        assert!(matches!(
            register(&mut app, "carol", "pw", Some("other")),
            Err(Error::PasswordMismatch)
        ));
    }

    #[test]
    fn test_edit_state_and_preview_views() {
        let mut app = app();
        assert_eq!(
            preview(&app).to_human(),
            "Nothing selected. Pick a todo to preview its Markdown."
        );

        todo_create(&mut app, "A", "*a*").unwrap();
        edit_start(&mut app, "todo-1").unwrap();

        let state = edit_state(&app);
        assert_eq!(state.mode, "editing");
        assert_eq!(state.editing_id.as_deref(), Some("todo-1"));
        assert!(state.to_human().contains("Form: editing todo-1"));
        assert!(preview(&app).to_human().contains("<em>a</em>"));
    }

    #[test]
    fn test_whoami_signed_out() {
        let mut app = app();
        app.logout().unwrap();
        let who = whoami(&app);
        assert!(!who.authenticated);
        assert!(who.to_human().starts_with("Not logged in"));
    }
}
