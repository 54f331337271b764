//! Slice reducers and the root reducer for the todo application.
//!
//! Each field of [`AppState`] has exactly one reducer:
//!
//! - [`TodoListReducer`] owns `todos`
//! - [`UserReducer`] owns `user`
//! - [`FetchReducer`] owns `is_fetching` and describes the fetch effect
//!
//! [`app_reducer`] combines the three through scoping, so every dispatched
//! action reaches every slice with the previous value of that slice. A
//! slice leaves its state untouched for actions it does not handle.

use crate::actions::AppAction;
use crate::source::TodoSource;
use crate::types::{AppState, Todo, TodoId, User};
use std::sync::Arc;
use uniflow_core::composition::{combine_reducers, scope_reducer, CombinedReducer};
use uniflow_core::effect::Effect;
use uniflow_core::reducer::Reducer;
use uniflow_core::{smallvec, SmallVec};

/// Injected collaborators for the todo reducers.
#[derive(Clone)]
pub struct TodoEnvironment {
    /// Where `FetchTodos` gets its data from
    pub source: Arc<dyn TodoSource>,
}

impl TodoEnvironment {
    /// Creates a new environment around a todo source.
    #[must_use]
    pub fn new(source: Arc<dyn TodoSource>) -> Self {
        Self { source }
    }
}

/// Reducer for the ordered todo list.
#[derive(Clone, Copy, Debug, Default)]
pub struct TodoListReducer;

impl Reducer for TodoListReducer {
    type State = Vec<Todo>;
    type Action = AppAction;
    type Environment = TodoEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        _env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            AppAction::AddTodo { name } => {
                // The only validation in scope: a blank name is a no-op.
                if !name.trim().is_empty() {
                    let id = TodoId::new(state.len() as u64);
                    state.push(Todo::new(id, name));
                }
            }
            AppAction::DeleteTodo { id } => {
                state.retain(|todo| todo.id != id);
            }
            AppAction::ToggleTodo { id } => {
                // Ids can be duplicated after delete-then-add; toggle and
                // delete treat every match alike.
                for todo in state.iter_mut().filter(|todo| todo.id == id) {
                    todo.done = !todo.done;
                }
            }
            AppAction::TodosReceived { todos } => {
                *state = todos;
            }
            AppAction::ClearTodos => {
                state.clear();
            }
            AppAction::LogIn { .. }
            | AppAction::LogOut
            | AppAction::FetchTodos
            | AppAction::FetchFailed { .. } => {}
        }

        SmallVec::new()
    }
}

/// Reducer for the optional signed-in user.
///
/// Logout resets to `None`; there is no partial user mutation.
#[derive(Clone, Copy, Debug, Default)]
pub struct UserReducer;

impl Reducer for UserReducer {
    type State = Option<User>;
    type Action = AppAction;
    type Environment = TodoEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        _env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            AppAction::LogIn { id, name } => {
                *state = Some(User { id, name });
            }
            AppAction::LogOut => {
                *state = None;
            }
            AppAction::AddTodo { .. }
            | AppAction::DeleteTodo { .. }
            | AppAction::ToggleTodo { .. }
            | AppAction::ClearTodos
            | AppAction::FetchTodos
            | AppAction::TodosReceived { .. }
            | AppAction::FetchFailed { .. } => {}
        }

        SmallVec::new()
    }
}

/// Reducer for the fetch-in-flight flag.
///
/// `FetchTodos` raises the flag and returns the fetch as an explicit async
/// effect; the effect feeds back `TodosReceived` or `FetchFailed`, either
/// of which lowers the flag. A second `FetchTodos` while one is in flight
/// is not guarded: both fetches run and the later completion wins.
#[derive(Clone, Copy, Debug, Default)]
pub struct FetchReducer;

impl Reducer for FetchReducer {
    type State = bool;
    type Action = AppAction;
    type Environment = TodoEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            AppAction::FetchTodos => {
                *state = true;

                let source = Arc::clone(&env.source);
                return smallvec![Effect::future(async move {
                    match source.fetch().await {
                        Ok(todos) => Some(AppAction::TodosReceived { todos }),
                        Err(error) => Some(AppAction::FetchFailed {
                            error: error.to_string(),
                        }),
                    }
                })];
            }
            AppAction::TodosReceived { .. } | AppAction::FetchFailed { .. } => {
                *state = false;
            }
            AppAction::AddTodo { .. }
            | AppAction::DeleteTodo { .. }
            | AppAction::ToggleTodo { .. }
            | AppAction::ClearTodos
            | AppAction::LogIn { .. }
            | AppAction::LogOut => {}
        }

        SmallVec::new()
    }
}

/// The root reducer: all three slices combined over [`AppState`].
///
/// Cheap to clone; every clone shares the same composition.
#[derive(Clone)]
pub struct AppReducer {
    inner: Arc<CombinedReducer<AppState, AppAction, TodoEnvironment>>,
}

impl Default for AppReducer {
    fn default() -> Self {
        app_reducer()
    }
}

impl Reducer for AppReducer {
    type State = AppState;
    type Action = AppAction;
    type Environment = TodoEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        self.inner.reduce(state, action, env)
    }
}

/// Builds the root reducer by scoping each slice reducer onto its field.
#[must_use]
pub fn app_reducer() -> AppReducer {
    AppReducer {
        inner: Arc::new(combine_reducers(vec![
            Box::new(scope_reducer(
                TodoListReducer,
                |s: &AppState| &s.todos,
                |s, todos| s.todos = todos,
            )),
            Box::new(scope_reducer(
                UserReducer,
                |s: &AppState| &s.user,
                |s, user| s.user = user,
            )),
            Box::new(scope_reducer(
                FetchReducer,
                |s: &AppState| &s.is_fetching,
                |s, flag| s.is_fetching = flag,
            )),
        ])),
    }
}
