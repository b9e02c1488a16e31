//! Caller-facing services.
//!
//! Services drive a saga through the workflow runtime and translate its
//! final state into a result:
//! 1. Build the initial action
//! 2. Run the workflow until no more actions are produced
//! 3. Map the terminal phase to `Ok` or a typed error
//!
//! Services hold no per-request state. Clone them freely and share them
//! across concurrent requests.

pub mod identity;
pub mod settlement;

pub use identity::IdentityBootstrapService;
pub use settlement::{OrderSettlementService, Settlement};
