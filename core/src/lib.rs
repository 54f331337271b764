//! # Uniflow Core
//!
//! Core traits and types for the Uniflow unidirectional state architecture.
//!
//! A Uniflow application is built from four pieces:
//!
//! - **State**: owned domain data for a feature
//! - **Action**: a closed enum of everything that can happen
//! - **Reducer**: pure function `(&mut State, Action, &Environment) → Effects`
//! - **Effect**: a *description* of asynchronous work that may feed further
//!   actions back into the store
//!
//! The runtime crate provides the `Store` that drives the loop; this crate
//! only defines the vocabulary. Because actions are a closed sum type, the
//! compiler enforces exhaustive handling instead of relying on a stringly
//! typed default branch.
//!
//! ## Example
//!
//! ```
//! use uniflow_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};
//!
//! #[derive(Clone, Debug, Default)]
//! struct Lamp { on: bool }
//!
//! #[derive(Clone, Debug)]
//! enum LampAction { Toggle }
//!
//! struct LampReducer;
//!
//! impl Reducer for LampReducer {
//!     type State = Lamp;
//!     type Action = LampAction;
//!     type Environment = ();
//!
//!     fn reduce(
//!         &self,
//!         state: &mut Lamp,
//!         action: LampAction,
//!         _env: &(),
//!     ) -> SmallVec<[Effect<LampAction>; 4]> {
//!         match action {
//!             LampAction::Toggle => state.on = !state.on,
//!         }
//!         smallvec![Effect::None]
//!     }
//! }
//! ```

// Re-export so downstream crates spell reducer signatures without a direct
// smallvec dependency.
pub use smallvec::{smallvec, SmallVec};

/// Reducer composition utilities (`combine_reducers`, `scope_reducer`)
pub mod composition;

/// Middleware trait and the ordered interceptor pipeline
pub mod middleware;

/// Reducer module - the core trait for state transitions
pub mod reducer {
    use super::effect::Effect;
    use super::SmallVec;

    /// The Reducer trait - a pure transition function over a slice of state.
    ///
    /// Reducers never perform I/O. Anything asynchronous is returned as an
    /// [`Effect`] description and executed by the runtime, which feeds any
    /// resulting actions back through `reduce`.
    ///
    /// # Type Parameters
    ///
    /// - `State`: the state slice this reducer owns
    /// - `Action`: the action vocabulary it receives
    /// - `Environment`: injected collaborators (clocks, data sources, ...)
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Compute the next state in place and describe any side effects.
        ///
        /// Actions the reducer does not recognize must leave `state`
        /// untouched and return no effects: extending the action vocabulary
        /// never breaks existing reducers.
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - descriptions of side effects
pub mod effect {
    use std::future::Future;
    use std::pin::Pin;
    use std::time::Duration;

    /// A side effect description returned by a reducer.
    ///
    /// Effects are values, not execution: the store runs them after the
    /// reducer returns and dispatches any action they produce. This is the
    /// explicit replacement for thunk-style action creators - an
    /// asynchronous fetch is an [`Effect::Future`] resolving to the
    /// completion action, so the two dispatch phases (start, then result)
    /// are ordered by construction.
    #[allow(missing_docs)]
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Dispatch an action after a fixed delay
        Delay {
            /// How long to wait
            duration: Duration,
            /// Action to dispatch after the delay
            action: Box<Action>,
        },

        /// Arbitrary async computation.
        ///
        /// If the future resolves to `Some(action)`, the action is
        /// dispatched back into the store.
        Future(Pin<Box<dyn Future<Output = Option<Action>> + Send>>),
    }

    impl<Action> Effect<Action> {
        /// Wrap an async computation as an effect.
        pub fn future<F>(fut: F) -> Self
        where
            F: Future<Output = Option<Action>> + Send + 'static,
        {
            Effect::Future(Box::pin(fut))
        }
    }

    // Manual Debug implementation since Future doesn't implement Debug
    impl<Action> std::fmt::Debug for Effect<Action>
    where
        Action: std::fmt::Debug,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Delay { duration, action } => f
                    .debug_struct("Effect::Delay")
                    .field("duration", duration)
                    .field("action", action)
                    .finish(),
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::effect::Effect;
    use super::reducer::Reducer;
    use super::{smallvec, SmallVec};
    use std::time::Duration;

    #[derive(Clone, Debug, Default, PartialEq, Eq)]
    struct Counter {
        value: i64,
    }

    #[derive(Clone, Debug)]
    enum CounterAction {
        Add(i64),
        Noop,
    }

    struct CounterReducer;

    impl Reducer for CounterReducer {
        type State = Counter;
        type Action = CounterAction;
        type Environment = ();

        fn reduce(
            &self,
            state: &mut Counter,
            action: CounterAction,
            _env: &(),
        ) -> SmallVec<[Effect<CounterAction>; 4]> {
            match action {
                CounterAction::Add(n) => state.value += n,
                CounterAction::Noop => {}
            }
            smallvec![Effect::None]
        }
    }

    #[test]
    fn reduce_updates_state_in_place() {
        let mut state = Counter::default();
        let effects = CounterReducer.reduce(&mut state, CounterAction::Add(3), &());
        assert_eq!(state.value, 3);
        assert_eq!(effects.len(), 1);
    }

    #[test]
    fn unhandled_action_is_identity() {
        let mut state = Counter { value: 7 };
        let before = state.clone();
        let _ = CounterReducer.reduce(&mut state, CounterAction::Noop, &());
        assert_eq!(state, before);
    }

    #[test]
    fn effect_debug_formats_without_running() {
        let delay: Effect<CounterAction> = Effect::Delay {
            duration: Duration::from_millis(5),
            action: Box::new(CounterAction::Noop),
        };
        assert!(format!("{delay:?}").starts_with("Effect::Delay"));

        let fut: Effect<CounterAction> = Effect::future(async { None });
        assert_eq!(format!("{fut:?}"), "Effect::Future(<future>)");
    }
}
