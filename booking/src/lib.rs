//! # Rooms Booking
//!
//! Order settlement and owner bootstrap for the Rooms hotel booking backend.
//!
//! ## Features
//!
//! - **Order settlement**: validate a payment guarantee against an offer,
//!   record the booking, retire the offer, claim the guarantee and notify
//!   the hotel
//! - **Owner bootstrap**: issue a one-time password, creating the owner's
//!   profile and placeholder hotel on first login
//! - **Testable**: every collaborator is a trait with an in-memory mock
//!
//! ## Architecture
//!
//! Both workflows are sagas run by the workflow runtime:
//!
//! ```text
//! Action → Reducer → (State, Effects) → Effect Execution → More Actions
//! ```
//!
//! Each effect performs exactly one external call. The saga state records
//! which steps have completed, so a failure after the first write reports
//! the compensations a reconciler must apply.
//!
//! ## Example: Create an Order
//!
//! ```rust,ignore
//! use rooms_booking::*;
//!
//! let service = OrderSettlementService::new(environment, SettlementConfig::new("org-rooms"));
//!
//! let result = service
//!     .create_order(Requester::new("org-ota"), payload)
//!     .await?;
//!
//! assert_eq!(result.order.response, "Committed");
//! ```

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]

// Public modules
pub mod config;
pub mod constants;
pub mod environment;
pub mod error;
pub mod providers;
pub mod reducers;
pub mod services;
pub mod stores;
pub mod types;
pub mod validation;

#[cfg(any(test, feature = "test-utils"))]
pub mod mocks;

// Re-export main types for convenience
pub use config::{AppConfig, IdentityConfig, LookupFailurePolicy, SettlementConfig};
pub use environment::{IdentityEnvironment, SettlementEnvironment};
pub use error::{Result, RoomsError};
pub use services::{IdentityBootstrapService, OrderSettlementService, Settlement};
pub use types::{CreateOrderPayload, OrderId, OrderResult, Requester};
