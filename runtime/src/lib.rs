//! # Uniflow Runtime
//!
//! The Store runtime for the Uniflow architecture.
//!
//! The [`store::Store`] is an explicit object constructed once at
//! application start and handed (by clone) to everything that dispatches or
//! observes - there is no ambient global. Each dispatch flows through:
//!
//! 1. the ordered middleware pipeline (observation, logging),
//! 2. the reducer, executed synchronously under the state write lock,
//! 3. state subscriber notification,
//! 4. asynchronous effect execution, whose resulting actions are fed back
//!    into the same pipeline.
//!
//! ## Example
//!
//! ```ignore
//! use uniflow_runtime::{store::Store, LogMiddleware};
//! use std::sync::Arc;
//!
//! let store = Store::with_middleware(
//!     initial_state,
//!     my_reducer,
//!     environment,
//!     vec![Arc::new(LogMiddleware)],
//! );
//!
//! let handle = store.send(Action::DoSomething).await;
//! handle.wait().await;
//! let value = store.state(|s| s.some_field).await;
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use uniflow_core::middleware::Middleware;

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur while interacting with a Store.
    #[derive(Error, Debug)]
    pub enum StoreError {
        /// Timeout waiting for effects to complete
        ///
        /// Returned by `EffectHandle::wait_with_timeout` when the deadline
        /// expires with effects still running.
        #[error("timed out with {0} effects still running")]
        Timeout(usize),
    }
}

pub use error::StoreError;

/// Diagnostic middleware that logs every dispatched action.
///
/// Emits a `tracing` event carrying the action's `Debug` rendering, then
/// forwards the action unchanged to the next interceptor. It never alters,
/// drops, or duplicates the action.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogMiddleware;

impl<A: std::fmt::Debug> Middleware<A> for LogMiddleware {
    fn handle(&self, action: A, next: &mut dyn FnMut(A)) {
        tracing::debug!(action = ?action, "about to dispatch");
        next(action);
    }
}

/// Configuration for a [`store::Store`].
///
/// ```
/// use uniflow_runtime::StoreConfig;
///
/// let config = StoreConfig::default().with_broadcast_capacity(64);
/// ```
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Capacity of the effect-action broadcast channel
    pub broadcast_capacity: usize,
}

impl StoreConfig {
    /// Set the action broadcast capacity.
    ///
    /// Increase it when slow observers (UIs, loggers) frequently lag.
    #[must_use]
    pub const fn with_broadcast_capacity(mut self, capacity: usize) -> Self {
        self.broadcast_capacity = capacity;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            broadcast_capacity: 16,
        }
    }
}

/// Handle for tracking effect completion.
///
/// Returned by [`store::Store::send`]. Waiting on the handle resolves once
/// every effect spawned by that dispatch has finished, including the
/// reduction of any action the effect fed back into the store.
///
/// # Example
///
/// ```ignore
/// let handle = store.send(AppAction::FetchTodos).await;
/// handle.wait().await;
/// // The fetch completed and its result action has been reduced.
/// ```
#[derive(Clone)]
pub struct EffectHandle {
    effects: Arc<AtomicUsize>,
    completion: watch::Receiver<()>,
}

impl EffectHandle {
    fn new() -> (Self, EffectTracking) {
        let counter = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = watch::channel(());

        let handle = Self {
            effects: Arc::clone(&counter),
            completion: rx,
        };

        let tracking = EffectTracking {
            counter,
            notifier: tx,
        };

        (handle, tracking)
    }

    /// A handle that is already complete.
    ///
    /// Returned when a dispatch produced no effects (or the action was
    /// swallowed by middleware).
    #[must_use]
    pub fn completed() -> Self {
        let (tx, rx) = watch::channel(());
        let _ = tx.send(());

        Self {
            effects: Arc::new(AtomicUsize::new(0)),
            completion: rx,
        }
    }

    /// Wait for all effects of the originating dispatch to complete.
    pub async fn wait(&mut self) {
        while self.effects.load(Ordering::SeqCst) > 0 {
            let _ = self.completion.changed().await;
        }
    }

    /// Wait for effect completion with a deadline.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Timeout`] if effects are still running when
    /// the deadline expires.
    pub async fn wait_with_timeout(&mut self, timeout: Duration) -> Result<(), StoreError> {
        tokio::time::timeout(timeout, self.wait())
            .await
            .map_err(|_| StoreError::Timeout(self.effects.load(Ordering::SeqCst)))
    }
}

impl std::fmt::Debug for EffectHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectHandle")
            .field("pending_effects", &self.effects.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

/// Internal: effect tracking context shared by the tasks of one dispatch.
struct EffectTracking {
    counter: Arc<AtomicUsize>,
    notifier: watch::Sender<()>,
}

impl EffectTracking {
    fn increment(&self) {
        self.counter.fetch_add(1, Ordering::SeqCst);
    }

    fn decrement(&self) {
        if self.counter.fetch_sub(1, Ordering::SeqCst) == 1 {
            let _ = self.notifier.send(());
        }
    }
}

impl Clone for EffectTracking {
    fn clone(&self) -> Self {
        Self {
            counter: Arc::clone(&self.counter),
            notifier: self.notifier.clone(),
        }
    }
}

/// Internal: RAII guard that decrements the effect counter on drop.
///
/// Keeps the counter consistent even if an effect task panics.
struct DecrementGuard(EffectTracking);

impl Drop for DecrementGuard {
    fn drop(&mut self) {
        self.0.decrement();
    }
}

/// Store module - the runtime coordinator for a reducer
pub mod store {
    use super::{Arc, DecrementGuard, EffectHandle, EffectTracking, Middleware, StoreConfig};
    use tokio::sync::{broadcast, watch, RwLock};
    use uniflow_core::effect::Effect;
    use uniflow_core::middleware::run_pipeline;
    use uniflow_core::reducer::Reducer;

    /// The Store - runtime coordinator for a reducer.
    ///
    /// The Store owns:
    ///
    /// 1. the aggregate state (behind an `RwLock`),
    /// 2. the reducer and its environment,
    /// 3. the ordered middleware pipeline,
    /// 4. the subscription channels (state watch + effect-action broadcast).
    ///
    /// Cloning a Store is cheap and every clone addresses the same state;
    /// construct one store at startup and pass clones to consumers instead
    /// of reaching for a global.
    ///
    /// # Type Parameters
    ///
    /// - `S`: state type
    /// - `A`: action type
    /// - `E`: environment type
    /// - `R`: reducer implementation
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        state: Arc<RwLock<S>>,
        reducer: R,
        environment: E,
        middleware: Arc<[Arc<dyn Middleware<A>>]>,
        state_watch: watch::Sender<S>,
        action_broadcast: broadcast::Sender<A>,
    }

    impl<S, A, E, R> Clone for Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Clone,
        E: Clone,
    {
        fn clone(&self) -> Self {
            Self {
                state: Arc::clone(&self.state),
                reducer: self.reducer.clone(),
                environment: self.environment.clone(),
                middleware: Arc::clone(&self.middleware),
                state_watch: self.state_watch.clone(),
                action_broadcast: self.action_broadcast.clone(),
            }
        }
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Clone + Send + Sync + 'static,
        A: Send + Clone + 'static,
        S: Send + Sync + Clone + 'static,
        E: Send + Sync + Clone + 'static,
    {
        /// Create a store with no middleware and default configuration.
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            Self::with_middleware(initial_state, reducer, environment, Vec::new())
        }

        /// Create a store with an ordered middleware pipeline.
        ///
        /// Middleware run front to back for every dispatched action,
        /// including actions fed back by effects, before the reducer.
        #[must_use]
        pub fn with_middleware(
            initial_state: S,
            reducer: R,
            environment: E,
            middleware: Vec<Arc<dyn Middleware<A>>>,
        ) -> Self {
            Self::with_config(
                initial_state,
                reducer,
                environment,
                middleware,
                StoreConfig::default(),
            )
        }

        /// Create a store with explicit configuration.
        #[must_use]
        pub fn with_config(
            initial_state: S,
            reducer: R,
            environment: E,
            middleware: Vec<Arc<dyn Middleware<A>>>,
            config: StoreConfig,
        ) -> Self {
            let (action_broadcast, _) = broadcast::channel(config.broadcast_capacity);
            let (state_watch, _) = watch::channel(initial_state.clone());

            Self {
                state: Arc::new(RwLock::new(initial_state)),
                reducer,
                environment,
                middleware: middleware.into(),
                state_watch,
                action_broadcast,
            }
        }

        /// Dispatch an action.
        ///
        /// The action passes through the middleware pipeline, then the
        /// reducer runs under the state write lock, subscribers are
        /// notified, and any returned effects start executing in spawned
        /// tasks. Concurrent `send` calls serialize at the reducer.
        ///
        /// Returns an [`EffectHandle`]; `send` itself completes when effect
        /// execution has *started*, not finished. Wait on the handle when
        /// the caller needs the effects (and their feedback actions) done.
        #[tracing::instrument(skip(self, action), name = "store_send")]
        pub async fn send(&self, action: A) -> EffectHandle {
            metrics::counter!("store.dispatch.total").increment(1);

            // Middleware run outside the state lock; a middleware that
            // never calls `next` swallows the action.
            let mut forwarded = None;
            run_pipeline(&self.middleware, action, &mut |a| forwarded = Some(a));

            let Some(action) = forwarded else {
                tracing::debug!("action swallowed by middleware");
                metrics::counter!("store.dispatch.swallowed").increment(1);
                return EffectHandle::completed();
            };

            let (handle, tracking) = EffectHandle::new();

            let effects = {
                let mut state = self.state.write().await;
                tracing::trace!("acquired write lock on state");

                let start = std::time::Instant::now();
                let effects = self.reducer.reduce(&mut *state, action, &self.environment);
                metrics::histogram!("store.reducer.duration_seconds")
                    .record(start.elapsed().as_secs_f64());

                // Notify subscribers after every completed reduction, even
                // when the transition was an identity.
                self.state_watch.send_replace(state.clone());

                effects
            };

            tracing::trace!("reducer returned {} effects", effects.len());
            for effect in effects {
                self.execute_effect(effect, tracking.clone());
            }

            handle
        }

        /// Read current state via a closure.
        ///
        /// The closure keeps the read lock only for its own duration:
        ///
        /// ```ignore
        /// let todo_count = store.state(|s| s.todos.len()).await;
        /// ```
        pub async fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            let state = self.state.read().await;
            f(&state)
        }

        /// Subscribe to aggregate state changes.
        ///
        /// The receiver starts at the current state and is notified after
        /// every completed dispatch. Use `borrow` for the current value and
        /// `changed().await` for notifications.
        #[must_use]
        pub fn subscribe(&self) -> watch::Receiver<S> {
            self.state_watch.subscribe()
        }

        /// Subscribe to actions produced by effects.
        ///
        /// Actions dispatched directly through [`Store::send`] are not
        /// broadcast; only the feedback actions of effects are. A lagging
        /// receiver skips old actions.
        #[must_use]
        pub fn subscribe_actions(&self) -> broadcast::Receiver<A> {
            self.action_broadcast.subscribe()
        }

        /// Execute one effect description with completion tracking.
        ///
        /// Feedback actions re-enter the store through [`Store::send`], so
        /// they pass the middleware pipeline like any other dispatch. The
        /// [`DecrementGuard`] keeps the handle's counter consistent even if
        /// an effect task panics.
        fn execute_effect(&self, effect: Effect<A>, tracking: EffectTracking) {
            match effect {
                Effect::None => {
                    metrics::counter!("store.effects.executed", "type" => "none").increment(1);
                }
                Effect::Future(fut) => {
                    metrics::counter!("store.effects.executed", "type" => "future").increment(1);
                    tracking.increment();

                    let store = self.clone();
                    tokio::spawn(async move {
                        let _guard = DecrementGuard(tracking);

                        if let Some(action) = fut.await {
                            tracing::trace!("effect produced an action, feeding back");
                            let _ = store.action_broadcast.send(action.clone());
                            let mut handle = store.send(action).await;
                            handle.wait().await;
                        } else {
                            tracing::trace!("effect completed with no action");
                        }
                    });
                }
                Effect::Delay { duration, action } => {
                    metrics::counter!("store.effects.executed", "type" => "delay").increment(1);
                    tracking.increment();

                    let store = self.clone();
                    tokio::spawn(async move {
                        let _guard = DecrementGuard(tracking);

                        tokio::time::sleep(duration).await;
                        let _ = store.action_broadcast.send((*action).clone());
                        let mut handle = store.send(*action).await;
                        handle.wait().await;
                    });
                }
            }
        }
    }
}
