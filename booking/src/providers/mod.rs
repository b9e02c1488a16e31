//! Booking collaborators.
//!
//! This module defines traits for every external system the settlement and
//! bootstrap workflows touch. Services receive them as `Arc<dyn …>`, so
//! production wiring, tests and the demo binary can substitute freely.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────┐      ┌──────────────────────┐
//! │ OrderSettlementService  │─────►│ GuaranteeGateway     │  payment system (HTTP)
//! │                         │─────►│ OfferStore           │
//! │                         │─────►│ BookingStore         │  PostgreSQL
//! │                         │─────►│ NotificationGateway  │  console / SMTP
//! └─────────────────────────┘      └──────────────────────┘
//! ┌─────────────────────────┐      ┌──────────────────────┐
//! │ IdentityBootstrapService│─────►│ ProfileStore         │  PostgreSQL
//! │                         │─────►│ HotelStore           │
//! └─────────────────────────┘      └──────────────────────┘
//! ```
//!
//! Methods return [`BoxFuture`](futures::future::BoxFuture) so the traits
//! stay dyn-compatible.
//!
//! Retry policy, if any, belongs to the implementations. The workflows
//! propagate every failure immediately.

pub mod booking;
pub mod console_notification;
pub mod guarantee;
pub mod hotel;
pub mod http_guarantee;
pub mod notification;
pub mod offer;
pub mod profile;
pub mod smtp_notification;

// Re-export provider traits
pub use booking::BookingStore;
pub use console_notification::ConsoleNotificationGateway;
pub use guarantee::GuaranteeGateway;
pub use hotel::HotelStore;
pub use http_guarantee::HttpGuaranteeGateway;
pub use notification::NotificationGateway;
pub use offer::OfferStore;
pub use profile::ProfileStore;
pub use smtp_notification::SmtpNotificationGateway;
