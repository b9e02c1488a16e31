//! Workflow reducers.
//!
//! Each reducer is a saga: a state machine that describes one external call
//! per step and records what has been done so far.

pub mod bootstrap;
pub mod settlement;

pub use bootstrap::{BootstrapAction, BootstrapPhase, BootstrapSaga, BootstrapState};
pub use settlement::{
    Compensation, NotificationOutcome, SettlementAction, SettlementPhase, SettlementSaga,
    SettlementState, SettlementStep,
};
