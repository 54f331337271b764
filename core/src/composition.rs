//! Reducer composition utilities
//!
//! An aggregate state is reduced by delegating each field to its own slice
//! reducer. Two building blocks make that explicit:
//!
//! - [`scope_reducer`]: lift a reducer over one field of the state into a
//!   reducer over the whole state
//! - [`combine_reducers`]: run several same-typed reducers for every action,
//!   concatenating their effects
//!
//! A root reducer is the combination of one scoped reducer per field. Every
//! sub-reducer receives the *same* action together with the previous value
//! of its own slice, and no sub-reducer can read another's output within a
//! single reduction.

use crate::effect::Effect;
use crate::reducer::Reducer;
use crate::SmallVec;

/// A boxed reducer with fully-specified associated types.
pub type BoxedReducer<S, A, E> =
    Box<dyn Reducer<State = S, Action = A, Environment = E> + Send + Sync>;

/// Combines reducers that operate on the same state and action types.
///
/// Each reducer runs in sequence for every action; effects are collected in
/// order. Because slice reducers only ever touch their own field, the run
/// order carries no semantic weight.
///
/// # Examples
///
/// ```
/// use uniflow_core::composition::{combine_reducers, scope_reducer};
/// use uniflow_core::{effect::Effect, reducer::Reducer, SmallVec};
///
/// #[derive(Clone, Default)]
/// struct App { count: i32, label: String }
///
/// #[derive(Clone)]
/// enum AppAction { Bump, Rename(String) }
///
/// struct CountReducer;
/// impl Reducer for CountReducer {
///     type State = i32;
///     type Action = AppAction;
///     type Environment = ();
///     fn reduce(&self, state: &mut i32, action: AppAction, _env: &())
///         -> SmallVec<[Effect<AppAction>; 4]>
///     {
///         if matches!(action, AppAction::Bump) { *state += 1; }
///         SmallVec::new()
///     }
/// }
///
/// struct LabelReducer;
/// impl Reducer for LabelReducer {
///     type State = String;
///     type Action = AppAction;
///     type Environment = ();
///     fn reduce(&self, state: &mut String, action: AppAction, _env: &())
///         -> SmallVec<[Effect<AppAction>; 4]>
///     {
///         if let AppAction::Rename(l) = action { *state = l; }
///         SmallVec::new()
///     }
/// }
///
/// let root = combine_reducers(vec![
///     Box::new(scope_reducer(CountReducer, |s: &App| &s.count, |s, v| s.count = v)),
///     Box::new(scope_reducer(LabelReducer, |s: &App| &s.label, |s, v| s.label = v)),
/// ]);
///
/// let mut state = App::default();
/// let _ = root.reduce(&mut state, AppAction::Bump, &());
/// assert_eq!(state.count, 1);
/// ```
#[must_use]
pub fn combine_reducers<S, A, E>(reducers: Vec<BoxedReducer<S, A, E>>) -> CombinedReducer<S, A, E>
where
    S: 'static,
    A: Clone + 'static,
    E: 'static,
{
    CombinedReducer { reducers }
}

/// A reducer that runs several reducers in sequence for every action.
///
/// Created by [`combine_reducers`].
pub struct CombinedReducer<S, A, E>
where
    S: 'static,
    A: Clone + 'static,
    E: 'static,
{
    reducers: Vec<BoxedReducer<S, A, E>>,
}

impl<S, A, E> Reducer for CombinedReducer<S, A, E>
where
    S: 'static,
    A: Clone + 'static,
    E: 'static,
{
    type State = S;
    type Action = A;
    type Environment = E;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        let mut all_effects = SmallVec::new();

        for reducer in &self.reducers {
            let effects = reducer.reduce(state, action.clone(), env);
            all_effects.extend(effects);
        }

        all_effects
    }
}

/// Scopes a reducer onto one field of a larger state.
///
/// The scoped reducer clones the field out, runs the inner reducer on it,
/// and writes the result back. The rest of the parent state is untouchable
/// from inside the slice reducer.
pub fn scope_reducer<S, SubS, A, E, R>(
    reducer: R,
    get_state: fn(&S) -> &SubS,
    set_state: fn(&mut S, SubS),
) -> ScopedReducer<S, SubS, A, E, R>
where
    S: 'static,
    SubS: Clone + 'static,
    A: 'static,
    E: 'static,
    R: Reducer<State = SubS, Action = A, Environment = E>,
{
    ScopedReducer {
        reducer,
        get_state,
        set_state,
        _phantom: std::marker::PhantomData,
    }
}

/// A reducer lifted onto a field of a larger state.
///
/// Created by [`scope_reducer`].
pub struct ScopedReducer<S, SubS, A, E, R>
where
    S: 'static,
    SubS: Clone + 'static,
    A: 'static,
    E: 'static,
    R: Reducer<State = SubS, Action = A, Environment = E>,
{
    reducer: R,
    get_state: fn(&S) -> &SubS,
    set_state: fn(&mut S, SubS),
    _phantom: std::marker::PhantomData<(A, E)>,
}

impl<S, SubS, A, E, R> Reducer for ScopedReducer<S, SubS, A, E, R>
where
    S: 'static,
    SubS: Clone + 'static,
    A: 'static,
    E: 'static,
    R: Reducer<State = SubS, Action = A, Environment = E>,
{
    type State = S;
    type Action = A;
    type Environment = E;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        let mut slice = (self.get_state)(state).clone();
        let effects = self.reducer.reduce(&mut slice, action, env);
        (self.set_state)(state, slice);
        effects
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, Default, PartialEq)]
    struct Aggregate {
        items: Vec<u32>,
        flag: bool,
    }

    #[derive(Clone, Debug)]
    enum TestAction {
        Push(u32),
        Raise,
        Lower,
    }

    struct ItemsReducer;

    impl Reducer for ItemsReducer {
        type State = Vec<u32>;
        type Action = TestAction;
        type Environment = ();

        fn reduce(
            &self,
            state: &mut Vec<u32>,
            action: TestAction,
            _env: &(),
        ) -> SmallVec<[Effect<TestAction>; 4]> {
            if let TestAction::Push(n) = action {
                state.push(n);
            }
            SmallVec::new()
        }
    }

    struct FlagReducer;

    impl Reducer for FlagReducer {
        type State = bool;
        type Action = TestAction;
        type Environment = ();

        fn reduce(
            &self,
            state: &mut bool,
            action: TestAction,
            _env: &(),
        ) -> SmallVec<[Effect<TestAction>; 4]> {
            match action {
                TestAction::Raise => *state = true,
                TestAction::Lower => *state = false,
                TestAction::Push(_) => {}
            }
            SmallVec::new()
        }
    }

    fn root() -> CombinedReducer<Aggregate, TestAction, ()> {
        combine_reducers(vec![
            Box::new(scope_reducer(
                ItemsReducer,
                |s: &Aggregate| &s.items,
                |s, v| s.items = v,
            )),
            Box::new(scope_reducer(
                FlagReducer,
                |s: &Aggregate| &s.flag,
                |s, v| s.flag = v,
            )),
        ])
    }

    #[test]
    fn each_slice_sees_every_action() {
        let root = root();
        let mut state = Aggregate::default();

        let _ = root.reduce(&mut state, TestAction::Push(1), &());
        let _ = root.reduce(&mut state, TestAction::Raise, &());

        assert_eq!(state.items, vec![1]);
        assert!(state.flag);
    }

    #[test]
    fn slices_never_cross_mutate() {
        let root = root();
        let mut state = Aggregate {
            items: vec![1, 2],
            flag: true,
        };

        let _ = root.reduce(&mut state, TestAction::Lower, &());

        assert_eq!(state.items, vec![1, 2]);
        assert!(!state.flag);
    }

    #[test]
    fn scoped_reducer_writes_back_only_its_field() {
        let scoped = scope_reducer(ItemsReducer, |s: &Aggregate| &s.items, |s, v| s.items = v);

        let mut state = Aggregate {
            items: vec![],
            flag: true,
        };
        let _ = scoped.reduce(&mut state, TestAction::Push(9), &());

        assert_eq!(state.items, vec![9]);
        assert!(state.flag);
    }
}
