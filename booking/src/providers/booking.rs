//! Booking store trait.

use crate::error::Result;
use crate::types::Booking;
use futures::future::BoxFuture;

/// Storage of settled bookings.
pub trait BookingStore: Send + Sync {
    /// Persist a new booking.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - A booking with the same order ID exists → `RoomsError::Conflict`
    /// - Store query fails
    fn create<'a>(&'a self, booking: &'a Booking) -> BoxFuture<'a, Result<()>>;
}
