//! Integration tests driving the todo application through a live Store.
//!
//! These exercise the full dispatch path: middleware, the root reducer
//! across all three state slices, subscriber notification, and the fetch
//! effect feeding its result back as a second dispatch.

#![allow(clippy::unwrap_used)]

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use todo_demo::{
    app_reducer, AppAction, AppState, FakeApi, SourceError, Todo, TodoEnvironment, TodoId,
    TodoSource, UserId,
};
use uniflow_runtime::store::Store;
use uniflow_runtime::LogMiddleware;
use uniflow_testing::{init_tracing, RecordingMiddleware};

fn fast_env() -> TodoEnvironment {
    TodoEnvironment::new(Arc::new(FakeApi::with_delay(Duration::from_millis(10))))
}

/// Source resolving with a fixed list, for exact-payload assertions.
struct StubSource(Vec<Todo>);

impl TodoSource for StubSource {
    fn fetch(
        &self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Todo>, SourceError>> + Send + '_>> {
        let todos = self.0.clone();
        Box::pin(async move { Ok(todos) })
    }
}

/// Source that always fails, for the error path.
struct DownSource;

impl TodoSource for DownSource {
    fn fetch(
        &self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Todo>, SourceError>> + Send + '_>> {
        Box::pin(async { Err(SourceError::Unavailable("connection refused".to_string())) })
    }
}

#[tokio::test]
async fn full_session_flow() {
    init_tracing();
    let store = Store::new(AppState::new(), app_reducer(), fast_env());

    store
        .send(AppAction::AddTodo {
            name: "Buy Milk".to_string(),
        })
        .await;
    store
        .send(AppAction::AddTodo {
            name: "Write docs".to_string(),
        })
        .await;
    store
        .send(AppAction::ToggleTodo { id: TodoId::new(0) })
        .await;
    store
        .send(AppAction::LogIn {
            id: UserId::new(1),
            name: "Ada".to_string(),
        })
        .await;

    let state = store.state(std::clone::Clone::clone).await;
    assert_eq!(state.todo_count(), 2);
    assert_eq!(state.done_count(), 1);
    assert!(state.todo(TodoId::new(0)).is_some_and(|t| t.done));
    assert!(state.is_logged_in());
    assert!(!state.is_fetching);

    store
        .send(AppAction::DeleteTodo { id: TodoId::new(1) })
        .await;
    store.send(AppAction::LogOut).await;
    store.send(AppAction::ClearTodos).await;

    let state = store.state(std::clone::Clone::clone).await;
    assert_eq!(state.todo_count(), 0);
    assert!(!state.is_logged_in());
}

#[tokio::test]
async fn fetch_dispatches_request_then_result() {
    init_tracing();
    let fetched = vec![Todo::new(TodoId::new(1), "Buy Milk".to_string())];
    let recorder = RecordingMiddleware::new();
    let store = Store::with_middleware(
        AppState::new(),
        app_reducer(),
        TodoEnvironment::new(Arc::new(StubSource(fetched.clone()))),
        vec![Arc::new(recorder.clone()), Arc::new(LogMiddleware)],
    );

    let mut handle = store.send(AppAction::FetchTodos).await;
    handle.wait().await;

    let actions = recorder.actions();
    assert_eq!(actions.len(), 2);
    assert_eq!(actions[0], AppAction::FetchTodos);
    assert_eq!(actions[1], AppAction::TodosReceived { todos: fetched.clone() });

    let state = store.state(std::clone::Clone::clone).await;
    assert_eq!(state.todos, fetched);
    assert!(!state.is_fetching);
}

#[tokio::test]
async fn fetch_flag_covers_the_whole_request() {
    init_tracing();
    let store = Store::new(AppState::new(), app_reducer(), fast_env());

    let mut handle = store.send(AppAction::FetchTodos).await;
    assert!(store.state(|s| s.is_fetching).await);

    handle.wait().await;
    assert!(!store.state(|s| s.is_fetching).await);

    let todos = store.state(|s| s.todos.clone()).await;
    assert_eq!(todos, vec![Todo::new(TodoId::new(0), "Buy Milk".to_string())]);
}

#[tokio::test]
async fn failed_fetch_reports_and_resets_the_flag() {
    init_tracing();
    let recorder = RecordingMiddleware::new();
    let env = TodoEnvironment::new(Arc::new(DownSource));
    let store = Store::with_middleware(
        AppState::new(),
        app_reducer(),
        env,
        vec![Arc::new(recorder.clone())],
    );

    store
        .send(AppAction::AddTodo {
            name: "Keep me".to_string(),
        })
        .await;
    let mut handle = store.send(AppAction::FetchTodos).await;
    handle.wait().await;

    let state = store.state(std::clone::Clone::clone).await;
    assert!(!state.is_fetching);
    // A failed fetch leaves the existing list alone.
    assert_eq!(state.todo_count(), 1);

    let actions = recorder.actions();
    assert_eq!(
        actions.last(),
        Some(&AppAction::FetchFailed {
            error: "todo source unavailable: connection refused".to_string(),
        })
    );
}

#[tokio::test]
async fn log_middleware_forwards_each_action_exactly_once() {
    init_tracing();
    // Recorder downstream of the logger sees exactly what it forwarded.
    let recorder = RecordingMiddleware::new();
    let store = Store::with_middleware(
        AppState::new(),
        app_reducer(),
        fast_env(),
        vec![Arc::new(LogMiddleware), Arc::new(recorder.clone())],
    );

    let sent = AppAction::AddTodo {
        name: "Buy Milk".to_string(),
    };
    store.send(sent.clone()).await;

    assert_eq!(recorder.actions(), vec![sent]);
    assert_eq!(store.state(|s| s.todo_count()).await, 1);
}

#[tokio::test]
async fn subscribers_see_every_state_change() {
    init_tracing();
    let store = Store::new(AppState::new(), app_reducer(), fast_env());
    let mut rx = store.subscribe();

    assert_eq!(rx.borrow().todo_count(), 0);

    store
        .send(AppAction::AddTodo {
            name: "Buy Milk".to_string(),
        })
        .await;
    rx.changed().await.unwrap();
    assert_eq!(rx.borrow_and_update().todo_count(), 1);

    store
        .send(AppAction::ToggleTodo { id: TodoId::new(0) })
        .await;
    rx.changed().await.unwrap();
    assert_eq!(rx.borrow_and_update().done_count(), 1);
}

#[tokio::test]
async fn effect_actions_reach_action_subscribers() {
    init_tracing();
    let store = Store::new(AppState::new(), app_reducer(), fast_env());
    let mut actions = store.subscribe_actions();

    let mut handle = store.send(AppAction::FetchTodos).await;
    handle.wait().await;

    let fed_back = actions.recv().await.unwrap();
    assert!(matches!(fed_back, AppAction::TodosReceived { .. }));
}
