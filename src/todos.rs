//! The ordered todo collection.
//!
//! All todos, whoever owns them, live in one list persisted under `todos`.
//! New todos go to the front; edits keep their position. Each mutation is
//! applied to a copy, saved, and only then swapped in, so memory never gets
//! ahead of storage.

use crate::models::Todo;
use crate::storage::{Persistence, TODOS_KEY};
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Source of timestamps.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Source of todo identifiers.
pub trait IdGenerator {
    fn new_id(&self) -> String;
}

/// Random UUID v4 identifiers.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn new_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Persisted, ordered todo collection.
#[derive(Debug, Clone)]
pub struct TodoStore {
    persistence: Persistence,
    todos: Vec<Todo>,
}

impl TodoStore {
    /// Load the collection from storage. A missing or corrupt blob yields an empty store.
    pub fn load(persistence: Persistence) -> Self {
        let todos = persistence.load_or_default(TODOS_KEY);
        Self { persistence, todos }
    }

    /// All todos, newest first.
    pub fn list(&self) -> &[Todo] {
        &self.todos
    }

    pub fn get(&self, id: &str) -> Option<&Todo> {
        self.todos.iter().find(|todo| todo.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.todos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.todos.is_empty()
    }

    /// Create a todo at the front of the list.
    pub fn create(
        &mut self,
        title: &str,
        content: &str,
        owner: &str,
        clock: &dyn Clock,
        ids: &dyn IdGenerator,
    ) -> Result<Todo> {
        let todo = Todo::new(
            ids.new_id(),
            title.to_string(),
            content.to_string(),
            owner.to_string(),
            clock.now(),
        );

        let mut next = Vec::with_capacity(self.todos.len() + 1);
        next.push(todo.clone());
        next.extend(self.todos.iter().cloned());
        self.commit(next)?;

        tracing::debug!(id = %todo.id, owner, "created todo");
        Ok(todo)
    }

    /// Replace the title and content of an existing todo in place.
    pub fn update(
        &mut self,
        id: &str,
        title: &str,
        content: &str,
        clock: &dyn Clock,
    ) -> Result<Todo> {
        let index = self
            .todos
            .iter()
            .position(|todo| todo.id == id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;

        let mut next = self.todos.clone();
        let todo = &mut next[index];
        todo.title = title.to_string();
        todo.content = content.to_string();
        todo.updated_at = Some(clock.now());
        let updated = todo.clone();
        self.commit(next)?;

        tracing::debug!(id, "updated todo");
        Ok(updated)
    }

    /// Remove a todo. Unknown ids are ignored. Returns whether anything was removed.
    pub fn delete(&mut self, id: &str) -> Result<bool> {
        let next: Vec<Todo> = self
            .todos
            .iter()
            .filter(|todo| todo.id != id)
            .cloned()
            .collect();
        let removed = next.len() != self.todos.len();
        self.commit(next)?;

        if removed {
            tracing::debug!(id, "deleted todo");
        }
        Ok(removed)
    }

    fn commit(&mut self, next: Vec<Todo>) -> Result<()> {
        self.persistence.save(TODOS_KEY, &next)?;
        self.todos = next;
        Ok(())
    }
}
