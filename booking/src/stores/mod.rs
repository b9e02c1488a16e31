//! Storage implementations.
//!
//! - **Profiles, hotels, offers, bookings** (PostgreSQL, feature `postgres`)

#[cfg(feature = "postgres")]
pub mod postgres;

// Re-exports
#[cfg(feature = "postgres")]
pub use postgres::{
    PostgresBookingStore, PostgresHotelStore, PostgresOfferStore, PostgresProfileStore,
};
