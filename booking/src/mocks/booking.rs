//! Mock booking store for testing.

use super::{inject, injected, lock, snapshot};
use crate::error::{Result, RoomsError};
use crate::providers::BookingStore;
use crate::types::Booking;
use futures::future::BoxFuture;
use std::sync::{Arc, Mutex};

/// Mock booking store.
#[derive(Debug, Clone, Default)]
pub struct MockBookingStore {
    bookings: Arc<Mutex<Vec<Booking>>>,
    create_failure: Arc<Mutex<Option<RoomsError>>>,
}

impl MockBookingStore {
    /// Create an empty mock booking store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bookings persisted so far, in order.
    #[must_use]
    pub fn bookings(&self) -> Vec<Booking> {
        snapshot(&self.bookings)
    }

    /// Make every later create fail with `err`.
    pub fn fail_create(&self, err: RoomsError) {
        inject(&self.create_failure, err);
    }
}

impl BookingStore for MockBookingStore {
    fn create<'a>(&'a self, booking: &'a Booking) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            injected(&self.create_failure)?;
            let mut bookings = lock(&self.bookings)?;
            if bookings.iter().any(|b| b.order_id == booking.order_id) {
                return Err(RoomsError::conflict("booking", booking.order_id.to_string()));
            }
            bookings.push(booking.clone());
            Ok(())
        })
    }
}
