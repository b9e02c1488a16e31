//! # Rooms Core
//!
//! Core traits and types shared by the Rooms booking backend.
//!
//! Business workflows (order settlement, owner bootstrap) are written as
//! reducers: pure functions that update workflow state and return effect
//! descriptions. The runtime crate executes those effects and feeds the
//! resulting actions back in.
//!
//! ## Core Concepts
//!
//! - **State**: Progress of one workflow instance
//! - **Action**: Commands that start a workflow and events reporting step outcomes
//! - **Reducer**: Pure function `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: Side effect descriptions (not execution)
//! - **Environment**: Injected collaborators (stores, gateways, clock, id generator)
//!
//! ## Example
//!
//! ```
//! use rooms_core::effect::Effect;
//! use rooms_core::reducer::Reducer;
//! use rooms_core::{smallvec, SmallVec};
//!
//! #[derive(Clone, Debug, Default)]
//! struct CounterState {
//!     count: i32,
//! }
//!
//! #[derive(Clone, Debug)]
//! enum CounterAction {
//!     Increment,
//! }
//!
//! struct CounterReducer;
//!
//! impl Reducer for CounterReducer {
//!     type State = CounterState;
//!     type Action = CounterAction;
//!     type Environment = ();
//!
//!     fn reduce(
//!         &self,
//!         state: &mut CounterState,
//!         action: CounterAction,
//!         _env: &(),
//!     ) -> SmallVec<[Effect<CounterAction>; 4]> {
//!         match action {
//!             CounterAction::Increment => state.count += 1,
//!         }
//!         smallvec![Effect::None]
//!     }
//! }
//!
//! let mut state = CounterState::default();
//! let _ = CounterReducer.reduce(&mut state, CounterAction::Increment, &());
//! assert_eq!(state.count, 1);
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use smallvec::{smallvec, SmallVec};

/// Workflow decision logic.
///
/// A reducer never performs I/O. Given the same state, action and
/// environment it always makes the same decision.
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// A state machine step: `(State, Action, Environment) → (State, Effects)`.
    pub trait Reducer {
        /// Progress of one workflow instance
        type State;

        /// Commands and step outcomes
        type Action;

        /// Collaborators available to effects
        type Environment;

        /// Apply `action` to `state` and describe the follow-up work.
        ///
        /// Actions that make no sense in the current state should be
        /// ignored, not panicked on.
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Descriptions of work for the runtime to perform.
pub mod effect {
    use std::future::Future;
    use std::pin::Pin;
    use std::time::Duration;

    /// A unit of deferred work returned by a reducer.
    ///
    /// Whatever action an effect produces is fed back into the same reducer.
    pub enum Effect<Action> {
        /// Nothing to do
        None,

        /// Run all, wait for all
        Parallel(Vec<Effect<Action>>),

        /// Run one after another
        Sequential(Vec<Effect<Action>>),

        /// Dispatch `action` after `duration`
        Delay {
            /// Wait time
            duration: Duration,
            /// Action to dispatch
            action: Box<Action>,
        },

        /// One external call; a `Some` result is dispatched
        Future(Pin<Box<dyn Future<Output = Option<Action>> + Send>>),
    }

    // Futures are opaque
    impl<Action> std::fmt::Debug for Effect<Action>
    where
        Action: std::fmt::Debug,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Parallel(effects) => {
                    f.debug_tuple("Effect::Parallel").field(effects).finish()
                },
                Effect::Sequential(effects) => {
                    f.debug_tuple("Effect::Sequential").field(effects).finish()
                },
                Effect::Delay { duration, action } => f
                    .debug_struct("Effect::Delay")
                    .field("duration", duration)
                    .field("action", action)
                    .finish(),
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Run `effects` concurrently
        #[must_use]
        pub const fn merge(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Parallel(effects)
        }

        /// Run `effects` in order
        #[must_use]
        pub const fn chain(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Sequential(effects)
        }

        /// Wrap an async computation that always yields a follow-up action
        #[must_use]
        pub fn future<F>(fut: F) -> Effect<Action>
        where
            F: Future<Output = Action> + Send + 'static,
        {
            Effect::Future(Box::pin(async move { Some(fut.await) }))
        }

        /// Returns `true` for `Effect::None`
        #[must_use]
        pub const fn is_none(&self) -> bool {
            matches!(self, Effect::None)
        }
    }
}

/// Non-deterministic inputs (time, identifiers), injected for testability.
pub mod environment {
    use chrono::{DateTime, Utc};
    use uuid::Uuid;

    /// Source of the current time.
    pub trait Clock: Send + Sync {
        /// Current UTC time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Wall clock backed by [`Utc::now`].
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }

    /// Source of globally unique identifiers.
    ///
    /// Order ids and one-time passwords are drawn from here so that tests
    /// can substitute a deterministic sequence.
    pub trait IdGenerator: Send + Sync {
        /// Produce a fresh identifier
        fn generate(&self) -> Uuid;
    }

    /// Random (v4) UUID generator.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct UuidGenerator;

    impl IdGenerator for UuidGenerator {
        fn generate(&self) -> Uuid {
            Uuid::new_v4()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::effect::Effect;
    use super::environment::{IdGenerator, UuidGenerator};

    #[test]
    fn uuid_generator_never_repeats() {
        let ids = UuidGenerator;
        assert_ne!(ids.generate(), ids.generate());
    }

    #[test]
    fn chain_keeps_effect_order() {
        let effect: Effect<u8> = Effect::chain(vec![Effect::None, Effect::None]);
        match effect {
            Effect::Sequential(effects) => assert_eq!(effects.len(), 2),
            other => unreachable!("unexpected effect {other:?}"),
        }
    }

    #[tokio::test]
    async fn future_helper_yields_action() {
        let effect = Effect::future(async { 7_u8 });
        let Effect::Future(fut) = effect else {
            unreachable!("Effect::future must build a Future effect");
        };
        assert_eq!(fut.await, Some(7));
    }
}
