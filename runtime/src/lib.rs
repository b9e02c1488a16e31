//! # Rooms Runtime
//!
//! Runtime that drives a reducer to completion for a single request.
//!
//! Unlike a long-lived store, a [`Workflow`] holds no mutable state of its
//! own. Every call to [`Workflow::run`] starts from a fresh state value,
//! feeds the initial action through the reducer, executes the returned
//! effects one after another and loops on the actions they produce until
//! the queue is empty. A single `Workflow` can therefore be shared by any
//! number of concurrent requests.
//!
//! ## Execution model
//!
//! ```text
//! action ─► reduce ─► effects ─► execute (awaited, in order) ─► produced actions ─┐
//!   ▲                                                                             │
//!   └─────────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! No effect is started before the previous one has finished, so a
//! workflow's external calls happen strictly in sequence.
//!
//! ## Example
//!
//! ```ignore
//! use rooms_runtime::Workflow;
//!
//! let workflow = Workflow::new(SettlementSaga::new(config), environment);
//! let state = workflow.run(SettlementState::default(), action).await?;
//! ```

use futures::future::{join_all, BoxFuture};
use rooms_core::{effect::Effect, reducer::Reducer};
use std::collections::VecDeque;
use std::fmt::Debug;

/// Error types for the workflow runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur while running a workflow
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum WorkflowError {
        /// The reducer kept producing actions past the configured bound.
        ///
        /// Indicates a reducer that never reaches a terminal state.
        #[error("Workflow exceeded {max_steps} steps without settling")]
        StepLimitExceeded {
            /// Configured step bound
            max_steps: usize,
        },
    }
}

pub use error::WorkflowError;

/// Workflow runtime configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkflowConfig {
    /// Maximum number of actions reduced in a single run
    pub max_steps: usize,
}

impl WorkflowConfig {
    /// Create a configuration with a custom step bound
    #[must_use]
    pub const fn new(max_steps: usize) -> Self {
        Self { max_steps }
    }
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self { max_steps: 64 }
    }
}

/// Per-request reducer driver.
///
/// Owns a reducer and the environment its effects close over.
///
/// # Type Parameters
///
/// - `R`: The reducer implementing the workflow's decisions
pub struct Workflow<R: Reducer> {
    reducer: R,
    environment: R::Environment,
    config: WorkflowConfig,
}

impl<R> Workflow<R>
where
    R: Reducer,
    R::Action: Debug + Send + 'static,
{
    /// Create a workflow with the default configuration
    #[must_use]
    pub fn new(reducer: R, environment: R::Environment) -> Self {
        Self::with_config(reducer, environment, WorkflowConfig::default())
    }

    /// Create a workflow with a custom configuration
    #[must_use]
    pub const fn with_config(
        reducer: R,
        environment: R::Environment,
        config: WorkflowConfig,
    ) -> Self {
        Self {
            reducer,
            environment,
            config,
        }
    }

    /// The injected environment
    #[must_use]
    pub const fn environment(&self) -> &R::Environment {
        &self.environment
    }

    /// The reducer driven by this workflow
    #[must_use]
    pub const fn reducer(&self) -> &R {
        &self.reducer
    }

    /// Run the workflow from `state` until no more actions are produced.
    ///
    /// Returns the final state. Whether that state represents success or
    /// failure is for the caller to interpret.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::StepLimitExceeded`] when more than
    /// `max_steps` actions are reduced in a single run.
    pub async fn run(
        &self,
        mut state: R::State,
        action: R::Action,
    ) -> Result<R::State, WorkflowError> {
        let mut queue = VecDeque::from([action]);
        let mut steps = 0_usize;

        while let Some(action) = queue.pop_front() {
            steps += 1;
            if steps > self.config.max_steps {
                tracing::error!(
                    max_steps = self.config.max_steps,
                    "Workflow step limit exceeded"
                );
                return Err(WorkflowError::StepLimitExceeded {
                    max_steps: self.config.max_steps,
                });
            }

            tracing::trace!(step = steps, action = ?action, "Reducing workflow action");
            metrics::counter!("workflow.actions.reduced").increment(1);

            let effects = self.reducer.reduce(&mut state, action, &self.environment);
            for effect in effects {
                queue.extend(execute(effect).await);
            }
        }

        Ok(state)
    }
}

/// Execute one effect and collect the actions it produces.
///
/// Boxed so that `Sequential` and `Parallel` can recurse.
fn execute<A>(effect: Effect<A>) -> BoxFuture<'static, Vec<A>>
where
    A: Send + 'static,
{
    Box::pin(async move {
        match effect {
            Effect::None => {
                metrics::counter!("workflow.effects.executed", "type" => "none").increment(1);
                Vec::new()
            },
            Effect::Future(fut) => {
                metrics::counter!("workflow.effects.executed", "type" => "future").increment(1);
                fut.await.into_iter().collect()
            },
            Effect::Delay { duration, action } => {
                metrics::counter!("workflow.effects.executed", "type" => "delay").increment(1);
                tracing::trace!(?duration, "Executing Effect::Delay");
                tokio::time::sleep(duration).await;
                vec![*action]
            },
            Effect::Sequential(effects) => {
                metrics::counter!("workflow.effects.executed", "type" => "sequential").increment(1);
                let mut produced = Vec::new();
                for effect in effects {
                    produced.extend(execute(effect).await);
                }
                produced
            },
            Effect::Parallel(effects) => {
                metrics::counter!("workflow.effects.executed", "type" => "parallel").increment(1);
                join_all(effects.into_iter().map(execute))
                    .await
                    .into_iter()
                    .flatten()
                    .collect()
            },
        }
    })
}
