//! Given-When-Then harness for saga reducers.
//!
//! A reducer step is tested in isolation: seed a state, feed one action,
//! then check the resulting phase and the effects it asked for. No effect
//! is executed, so collaborators are never called.

#![allow(clippy::module_name_repetitions)] // ReducerTest is the natural name

use rooms_core::{effect::Effect, reducer::Reducer};

/// A deferred check, applied in registration order.
enum Check<S, A> {
    State(Box<dyn FnOnce(&S)>),
    Effects(Box<dyn FnOnce(&[Effect<A>])>),
}

/// One reducer step under test.
///
/// # Example
///
/// ```ignore
/// use rooms_testing::{assertions, ReducerTest};
///
/// ReducerTest::new(BootstrapSaga::new(IdentityConfig::default()))
///     .with_env(test_environment())
///     .given_state(BootstrapState::default())
///     .when_action(BootstrapAction::IssueOneTimePassword { email, session_token })
///     .then_state(|state| assert_eq!(state.phase, BootstrapPhase::LookingUp))
///     .then_effects(assertions::assert_has_future_effect)
///     .run();
/// ```
pub struct ReducerTest<R>
where
    R: Reducer,
{
    reducer: R,
    env: Option<R::Environment>,
    given: Option<R::State>,
    when: Option<R::Action>,
    checks: Vec<Check<R::State, R::Action>>,
}

impl<R> ReducerTest<R>
where
    R: Reducer,
{
    /// Start a test for `reducer`.
    #[must_use]
    pub const fn new(reducer: R) -> Self {
        Self {
            reducer,
            env: None,
            given: None,
            when: None,
            checks: Vec::new(),
        }
    }

    /// Environment handed to the reducer.
    #[must_use]
    pub fn with_env(mut self, env: R::Environment) -> Self {
        self.env = Some(env);
        self
    }

    /// State before the step.
    #[must_use]
    pub fn given_state(mut self, state: R::State) -> Self {
        self.given = Some(state);
        self
    }

    /// Action to reduce.
    #[must_use]
    pub fn when_action(mut self, action: R::Action) -> Self {
        self.when = Some(action);
        self
    }

    /// Check the state after the step.
    #[must_use]
    pub fn then_state<F>(mut self, check: F) -> Self
    where
        F: FnOnce(&R::State) + 'static,
    {
        self.checks.push(Check::State(Box::new(check)));
        self
    }

    /// Check the effects returned by the step.
    #[must_use]
    pub fn then_effects<F>(mut self, check: F) -> Self
    where
        F: FnOnce(&[Effect<R::Action>]) + 'static,
    {
        self.checks.push(Check::Effects(Box::new(check)));
        self
    }

    /// Reduce the action, run every check and return the resulting state.
    ///
    /// # Panics
    ///
    /// Panics if the environment, state or action is missing, or if a check
    /// fails.
    #[allow(clippy::panic)] // Test harness
    pub fn run(self) -> R::State {
        let Some(env) = self.env else {
            panic!("ReducerTest: call with_env() before run()");
        };
        let Some(mut state) = self.given else {
            panic!("ReducerTest: call given_state() before run()");
        };
        let Some(action) = self.when else {
            panic!("ReducerTest: call when_action() before run()");
        };

        let effects = self.reducer.reduce(&mut state, action, &env);

        for check in self.checks {
            match check {
                Check::State(check) => check(&state),
                Check::Effects(check) => check(&effects),
            }
        }
        state
    }
}

/// Effect checks for use with [`ReducerTest::then_effects`].
pub mod assertions {
    use rooms_core::effect::Effect;
    use std::fmt::Debug;

    fn futures<A>(effects: &[Effect<A>]) -> usize {
        effects
            .iter()
            .filter(|effect| matches!(effect, Effect::Future(_)))
            .count()
    }

    /// The step did nothing beyond updating state.
    ///
    /// # Panics
    ///
    /// Panics unless `effects` is empty or a single `Effect::None`.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_no_effects<A: Debug>(effects: &[Effect<A>]) {
        assert!(
            effects.iter().all(Effect::is_none),
            "expected no effects, got {effects:?}"
        );
    }

    /// The step returned exactly `expected` effects.
    ///
    /// # Panics
    ///
    /// Panics on a different count.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_effects_count<A: Debug>(effects: &[Effect<A>], expected: usize) {
        assert_eq!(effects.len(), expected, "unexpected effects: {effects:?}");
    }

    /// The step calls at least one collaborator.
    ///
    /// # Panics
    ///
    /// Panics if no `Effect::Future` was returned.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_has_future_effect<A: Debug>(effects: &[Effect<A>]) {
        assert!(futures(effects) > 0, "expected a Future effect, got {effects:?}");
    }

    /// The step calls no collaborator.
    ///
    /// # Panics
    ///
    /// Panics if an `Effect::Future` was returned.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_no_future_effect<A: Debug>(effects: &[Effect<A>]) {
        assert_eq!(futures(effects), 0, "expected no Future effect, got {effects:?}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rooms_core::{smallvec, SmallVec};

    #[derive(Clone, Debug, PartialEq)]
    enum Hold {
        Open,
        Held { nights: u32 },
        Released,
    }

    #[derive(Clone, Debug)]
    enum HoldAction {
        Place { nights: u32 },
        Release,
        Confirm,
    }

    struct HoldReducer;

    impl Reducer for HoldReducer {
        type State = Hold;
        type Action = HoldAction;
        type Environment = ();

        fn reduce(
            &self,
            state: &mut Hold,
            action: HoldAction,
            _env: &(),
        ) -> SmallVec<[Effect<HoldAction>; 4]> {
            match (state.clone(), action) {
                (Hold::Open, HoldAction::Place { nights }) => {
                    *state = Hold::Held { nights };
                    smallvec![Effect::None]
                },
                (Hold::Held { .. }, HoldAction::Release) => {
                    *state = Hold::Released;
                    smallvec![Effect::None]
                },
                (Hold::Held { .. }, HoldAction::Confirm) => {
                    smallvec![Effect::future(async { HoldAction::Release })]
                },
                _ => SmallVec::new(),
            }
        }
    }

    #[test]
    fn state_checks_see_the_reduced_state() {
        let state = ReducerTest::new(HoldReducer)
            .with_env(())
            .given_state(Hold::Open)
            .when_action(HoldAction::Place { nights: 3 })
            .then_state(|state| assert_eq!(*state, Hold::Held { nights: 3 }))
            .then_effects(assertions::assert_no_effects)
            .run();

        assert_eq!(state, Hold::Held { nights: 3 });
    }

    #[test]
    fn ignored_action_returns_nothing() {
        ReducerTest::new(HoldReducer)
            .with_env(())
            .given_state(Hold::Released)
            .when_action(HoldAction::Release)
            .then_state(|state| assert_eq!(*state, Hold::Released))
            .then_effects(|effects| {
                assertions::assert_effects_count(effects, 0);
                assertions::assert_no_effects(effects);
            })
            .run();
    }

    #[test]
    fn future_effects_are_detected() {
        ReducerTest::new(HoldReducer)
            .with_env(())
            .given_state(Hold::Held { nights: 2 })
            .when_action(HoldAction::Confirm)
            .then_effects(|effects| {
                assertions::assert_effects_count(effects, 1);
                assertions::assert_has_future_effect(effects);
            })
            .run();
    }

    #[test]
    #[should_panic(expected = "expected no Future effect")]
    fn no_future_check_fails_on_a_future() {
        ReducerTest::new(HoldReducer)
            .with_env(())
            .given_state(Hold::Held { nights: 2 })
            .when_action(HoldAction::Confirm)
            .then_effects(assertions::assert_no_future_effect)
            .run();
    }
}
