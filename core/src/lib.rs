//! # Bankdesk Core
//!
//! Core traits and types for the bankdesk workspace.
//!
//! Business logic is written as reducers: pure functions that take the
//! current state, an action and an environment of injected dependencies,
//! mutate the state in place and return a list of effects. Effects are
//! descriptions, not execution; the shell that owns the state decides how to
//! carry them out (print a message, stop the loop).
//!
//! ## Core Concepts
//!
//! - **State**: Domain state owned by the shell
//! - **Action**: All possible inputs to a reducer (commands and events)
//! - **Reducer**: Pure function `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: Work the shell performs after a reduction
//! - **Environment**: Injected dependencies (the [`environment::Clock`])
//!
//! ## Example
//!
//! ```
//! use bankdesk_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};
//!
//! #[derive(Debug, Default)]
//! struct TallyState {
//!     total: i64,
//! }
//!
//! #[derive(Clone, Debug, PartialEq)]
//! enum TallyAction {
//!     Add(i64),
//!     Added { total: i64 },
//! }
//!
//! struct TallyReducer;
//!
//! impl Reducer for TallyReducer {
//!     type State = TallyState;
//!     type Action = TallyAction;
//!     type Environment = ();
//!
//!     fn reduce(
//!         &self,
//!         state: &mut TallyState,
//!         action: TallyAction,
//!         _env: &(),
//!     ) -> SmallVec<[Effect<TallyAction>; 4]> {
//!         match action {
//!             TallyAction::Add(n) => {
//!                 state.total += n;
//!                 smallvec![Effect::Emit(TallyAction::Added { total: state.total })]
//!             }
//!             TallyAction::Added { .. } => SmallVec::new(),
//!         }
//!     }
//! }
//!
//! let mut state = TallyState::default();
//! let effects = TallyReducer.reduce(&mut state, TallyAction::Add(3), &());
//! assert_eq!(state.total, 3);
//! assert_eq!(effects.len(), 1);
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use smallvec::{smallvec, SmallVec};

/// Reducer module - The core trait for business logic
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`
///
/// They contain all business logic and are deterministic and testable.
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// The Reducer trait - core abstraction for business logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The domain state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// This is a pure function that:
        /// 1. Validates the action
        /// 2. Updates state in place
        /// 3. Returns effect descriptions to be carried out by the caller
        ///
        /// Validation failures are not errors at this level: a reducer
        /// reports them as an emitted action so the caller can render them.
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - Side effect descriptions
///
/// Effects are returned from reducers and carried out by whoever owns the
/// state. They are plain values and can be compared in tests.
pub mod effect {
    /// Effect type - describes work to perform after a reduction
    ///
    /// # Type Parameters
    ///
    /// - `Action`: The action type an effect can carry back to the caller
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// An action the reducer applied (or a rejection it recorded),
        /// handed to the caller for rendering
        Emit(Action),

        /// Stop the loop driving the reducer
        Halt,
    }

    impl<Action> Effect<Action> {
        /// Returns the emitted action, if this is an [`Effect::Emit`]
        #[must_use]
        pub const fn emitted(&self) -> Option<&Action> {
            match self {
                Self::Emit(action) => Some(action),
                Self::None | Self::Halt => None,
            }
        }

        /// Checks whether this effect asks the caller to stop
        #[must_use]
        pub const fn is_halt(&self) -> bool {
            matches!(self, Self::Halt)
        }
    }
}

/// Environment module - Dependency injection traits
///
/// All external dependencies are abstracted behind traits and injected
/// via the Environment parameter.
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time operations for testability
    ///
    /// # Examples
    ///
    /// ```
    /// use bankdesk_core::environment::{Clock, SystemClock};
    ///
    /// let clock = SystemClock;
    /// let before = clock.now();
    /// assert!(clock.now() >= before);
    /// ```
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Production clock backed by the system time
    #[derive(Clone, Copy, Debug, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::effect::Effect;

    #[test]
    fn emitted_returns_action_only_for_emit() {
        assert_eq!(Effect::Emit(7).emitted(), Some(&7));
        assert_eq!(Effect::<i32>::None.emitted(), None);
        assert_eq!(Effect::<i32>::Halt.emitted(), None);
    }

    #[test]
    fn halt_is_detected() {
        assert!(Effect::<()>::Halt.is_halt());
        assert!(!Effect::<()>::None.is_halt());
        assert!(!Effect::Emit(()).is_halt());
    }
}
