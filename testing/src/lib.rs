//! # Uniflow Testing
//!
//! Testing utilities and helpers for the Uniflow architecture.
//!
//! This crate provides:
//! - [`ReducerTest`]: a Given-When-Then harness for reducers
//! - [`assertions`]: effect assertion helpers
//! - [`RecordingMiddleware`]: captures every action it forwards, for
//!   asserting dispatch order in store-level tests
//! - [`init_tracing`]: opt-in log output for integration tests
//!
//! ## Example
//!
//! ```ignore
//! use uniflow_testing::{assertions, ReducerTest};
//!
//! ReducerTest::new(TodoListReducer)
//!     .with_env(test_environment())
//!     .given_state(vec![])
//!     .when_action(AppAction::AddTodo { name: "Buy Milk".into() })
//!     .then_state(|todos| assert_eq!(todos.len(), 1))
//!     .then_effects(assertions::assert_no_effects)
//!     .run();
//! ```

use std::sync::{Arc, Mutex};
use uniflow_core::middleware::Middleware;


pub use reducer_test::{assertions, ReducerTest};

/// Middleware that records every action passing through it.
///
/// The action is cloned into an internal log and then forwarded unchanged.
/// Install it at the end of a pipeline to assert on the exact sequence of
/// dispatched actions, including the feedback actions of effects.
#[derive(Debug, Default)]
pub struct RecordingMiddleware<A> {
    seen: Arc<Mutex<Vec<A>>>,
}

impl<A> RecordingMiddleware<A> {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Snapshot the actions recorded so far, in dispatch order.
    ///
    /// # Panics
    ///
    /// Panics if a previous user of the log panicked while holding it.
    #[must_use]
    #[allow(clippy::unwrap_used)] // Mutex poison is unrecoverable in tests
    pub fn actions(&self) -> Vec<A>
    where
        A: Clone,
    {
        self.seen.lock().unwrap().clone()
    }

    /// Number of actions recorded so far.
    ///
    /// # Panics
    ///
    /// Panics if a previous user of the log panicked while holding it.
    #[must_use]
    #[allow(clippy::unwrap_used)]
    pub fn len(&self) -> usize {
        self.seen.lock().unwrap().len()
    }

    /// Whether nothing has been recorded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<A> Clone for RecordingMiddleware<A> {
    fn clone(&self) -> Self {
        Self {
            seen: Arc::clone(&self.seen),
        }
    }
}

impl<A: Clone + Send + Sync> Middleware<A> for RecordingMiddleware<A> {
    #[allow(clippy::unwrap_used)]
    fn handle(&self, action: A, next: &mut dyn FnMut(A)) {
        self.seen.lock().unwrap().push(action.clone());
        next(action);
    }
}

/// Initialize tracing output for a test binary.
///
/// Respects `RUST_LOG`, defaults to `debug` for workspace crates, and is
/// safe to call from several tests (later calls are no-ops).
pub fn init_tracing() {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "uniflow_runtime=debug,todo_demo=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_test_writer())
        .try_init();
}
