//! Todo demo application built on the Uniflow architecture.
//!
//! The application state is a todo list, an optional signed-in user, and a
//! fetch-in-flight flag. A closed [`AppAction`] vocabulary is the only way
//! to change it. Each state slice has its own reducer; [`app_reducer`]
//! composes them into the root reducer the store runs.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use todo_demo::{app_reducer, AppAction, AppState, FakeApi, TodoEnvironment};
//! use uniflow_runtime::store::Store;
//!
//! # async fn example() {
//! let env = TodoEnvironment::new(Arc::new(FakeApi::with_delay(Duration::from_millis(200))));
//! let store = Store::new(AppState::new(), app_reducer(), env);
//!
//! store.send(AppAction::AddTodo { name: "Buy Milk".to_string() }).await;
//!
//! // Fetch replaces the list once the source answers.
//! let mut handle = store.send(AppAction::FetchTodos).await;
//! handle.wait().await;
//!
//! let count = store.state(|s| s.todo_count()).await;
//! println!("{count} todos");
//! # }
//! ```

pub mod actions;
pub mod reducer;
pub mod source;
pub mod types;

// Re-export the surface most callers need
pub use actions::AppAction;
pub use reducer::{app_reducer, AppReducer, TodoEnvironment};
pub use source::{FakeApi, SourceError, TodoSource};
pub use types::{AppState, Todo, TodoId, User, UserId};
