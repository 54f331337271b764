//! CLI demo for the todo application.
//!
//! Walks through the full action vocabulary: adding, toggling and deleting
//! todos, signing a user in and out, and fetching todos from the (fake)
//! remote source with the in-flight flag visible along the way.

use std::sync::Arc;
use std::time::Duration;
use todo_demo::{app_reducer, AppAction, AppState, FakeApi, TodoEnvironment, TodoId, UserId};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use uniflow_runtime::store::Store;
use uniflow_runtime::LogMiddleware;

fn print_todos(state: &AppState) {
    for todo in &state.todos {
        let status = if todo.done { "✓" } else { " " };
        println!("  [{}] #{} {}", status, todo.id, todo.name);
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("uniflow_runtime=debug,todo_demo=debug")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("=== Todo Demo ===\n");

    let env = TodoEnvironment::new(Arc::new(FakeApi::with_delay(Duration::from_millis(500))));
    let store = Store::with_middleware(
        AppState::new(),
        app_reducer(),
        env,
        vec![Arc::new(LogMiddleware)],
    );

    tracing::info!("adding todos");
    println!("Adding todos...");
    store
        .send(AppAction::AddTodo {
            name: "Buy Milk".to_string(),
        })
        .await;
    store
        .send(AppAction::AddTodo {
            name: "Write documentation".to_string(),
        })
        .await;
    store
        .send(AppAction::AddTodo {
            name: "Ship the release".to_string(),
        })
        .await;

    let state = store.state(std::clone::Clone::clone).await;
    println!("\nTodos: {}", state.todo_count());
    print_todos(&state);

    println!("\nCompleting 'Buy Milk' and dropping 'Ship the release'...");
    store
        .send(AppAction::ToggleTodo { id: TodoId::new(0) })
        .await;
    store
        .send(AppAction::DeleteTodo { id: TodoId::new(2) })
        .await;

    let state = store.state(std::clone::Clone::clone).await;
    println!("\nDone: {}/{}", state.done_count(), state.todo_count());
    print_todos(&state);

    println!("\nSigning in...");
    store
        .send(AppAction::LogIn {
            id: UserId::new(1),
            name: "Ada".to_string(),
        })
        .await;
    let user = store.state(|s| s.user.clone()).await;
    if let Some(user) = user {
        println!("Signed in as {}", user.name);
    }

    tracing::info!("starting remote fetch");
    println!("\nFetching todos from the remote source...");
    let mut handle = store.send(AppAction::FetchTodos).await;
    println!(
        "Fetch in flight: {}",
        store.state(|s| s.is_fetching).await
    );
    handle.wait().await;
    println!(
        "Fetch in flight: {}",
        store.state(|s| s.is_fetching).await
    );

    let state = store.state(std::clone::Clone::clone).await;
    tracing::info!(count = state.todo_count(), "fetch complete");
    println!("\nFetched todos: {}", state.todo_count());
    print_todos(&state);

    println!("\nSigning out and clearing up...");
    store.send(AppAction::LogOut).await;
    store.send(AppAction::ClearTodos).await;

    let state = store.state(std::clone::Clone::clone).await;
    println!(
        "Final state: {} todos, signed in: {}",
        state.todo_count(),
        state.is_logged_in()
    );

    println!("\n=== Demo Complete ===");
}
