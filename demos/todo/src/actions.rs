//! The application's action vocabulary.

use crate::types::{Todo, TodoId, UserId};
use serde::{Deserialize, Serialize};

/// Everything that can happen in the todo application.
///
/// This is a closed sum type: reducers match exhaustively, so adding a
/// variant is a compile error everywhere it is not handled, instead of a
/// silently ignored string tag.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppAction {
    /// Append a todo with the given name.
    ///
    /// A blank name (empty after trimming) is rejected as a no-op.
    AddTodo {
        /// Description of the new todo
        name: String,
    },

    /// Invert the done flag of every matching todo; no-op if absent.
    ToggleTodo {
        /// Todo to toggle
        id: TodoId,
    },

    /// Remove every matching todo; no-op if absent.
    DeleteTodo {
        /// Todo to delete
        id: TodoId,
    },

    /// Drop all todos.
    ClearTodos,

    /// Sign a user in, replacing any previous user.
    LogIn {
        /// User identifier
        id: UserId,
        /// Display name
        name: String,
    },

    /// Sign the current user out.
    LogOut,

    /// Start fetching todos from the configured source.
    ///
    /// Raises the fetching flag and kicks off the async fetch; the fetch
    /// feeds back [`AppAction::TodosReceived`] or [`AppAction::FetchFailed`].
    FetchTodos,

    /// A fetch completed: replace the whole todo list.
    TodosReceived {
        /// The fetched list, replacing local state wholesale
        todos: Vec<Todo>,
    },

    /// A fetch failed: lower the fetching flag.
    ///
    /// The todo list is left untouched; only the flag transitions, so the
    /// UI never shows a spinner for a request that already died.
    FetchFailed {
        /// Human-readable failure description
        error: String,
    },
}
