//! Domain types for the todo application.
//!
//! The aggregate state is three independent slices: the ordered todo list,
//! the optional signed-in user, and the fetch-in-flight flag. Each slice is
//! owned by exactly one reducer; nothing else writes it.

use serde::{Deserialize, Serialize};

/// Identifier of a todo item.
///
/// Ids are assigned from the current list length at creation time, so an id
/// can be reused after a delete followed by an add. Callers that need
/// stable identity should not delete and re-add.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TodoId(u64);

impl TodoId {
    /// Creates a `TodoId` from a raw index.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw id value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for TodoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a user.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(u64);

impl UserId {
    /// Creates a `UserId` from a raw value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw id value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single todo item.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    /// Identifier, unique only as long as no delete/add interleaving occurs
    pub id: TodoId,
    /// Non-empty description
    pub name: String,
    /// Whether the item has been checked off
    pub done: bool,
}

impl Todo {
    /// Creates a new, not-yet-done todo.
    #[must_use]
    pub const fn new(id: TodoId, name: String) -> Self {
        Self {
            id,
            name,
            done: false,
        }
    }
}

/// The signed-in user. Placeholder identity, no authorization semantics.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// User identifier
    pub id: UserId,
    /// Display name
    pub name: String,
}

/// Aggregate application state.
///
/// The logged-out representation is `user: None`; there is no "empty user"
/// value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppState {
    /// Ordered todo list
    pub todos: Vec<Todo>,
    /// Signed-in user, if any
    pub user: Option<User>,
    /// True while a todo fetch is in flight
    pub is_fetching: bool,
}

impl AppState {
    /// Creates the initial state: no todos, no user, not fetching.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            todos: Vec::new(),
            user: None,
            is_fetching: false,
        }
    }

    /// Returns the number of todos.
    #[must_use]
    pub fn todo_count(&self) -> usize {
        self.todos.len()
    }

    /// Returns the number of checked-off todos.
    #[must_use]
    pub fn done_count(&self) -> usize {
        self.todos.iter().filter(|t| t.done).count()
    }

    /// Returns a todo by id.
    #[must_use]
    pub fn todo(&self, id: TodoId) -> Option<&Todo> {
        self.todos.iter().find(|t| t.id == id)
    }

    /// Whether a user is signed in.
    #[must_use]
    pub const fn is_logged_in(&self) -> bool {
        self.user.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn todo_new_starts_not_done() {
        let todo = Todo::new(TodoId::new(0), "Buy Milk".to_string());
        assert_eq!(todo.id.as_u64(), 0);
        assert_eq!(todo.name, "Buy Milk");
        assert!(!todo.done);
    }

    #[test]
    fn app_state_initial_values() {
        let state = AppState::new();
        assert_eq!(state.todo_count(), 0);
        assert!(!state.is_logged_in());
        assert!(!state.is_fetching);
    }

    #[test]
    fn done_count_only_counts_done() {
        let mut state = AppState::new();
        state.todos.push(Todo::new(TodoId::new(0), "a".into()));
        state.todos.push(Todo {
            id: TodoId::new(1),
            name: "b".into(),
            done: true,
        });

        assert_eq!(state.todo_count(), 2);
        assert_eq!(state.done_count(), 1);
        assert!(state.todo(TodoId::new(1)).is_some());
        assert!(state.todo(TodoId::new(9)).is_none());
    }

    #[test]
    fn ids_display_as_raw_numbers() {
        assert_eq!(TodoId::new(3).to_string(), "3");
        assert_eq!(UserId::new(12).to_string(), "12");
    }
}
