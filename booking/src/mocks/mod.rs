//! Mock collaborator implementations for testing.
//!
//! This module provides simple, in-memory implementations of all provider
//! traits for use in unit and integration tests and in the demo binary.
//! Every mock is `Clone`; clones share storage, so a test can keep a handle
//! for inspection after moving one into an environment.
//!
//! Each mock supports failure injection per operation. An injected failure
//! is sticky: every later call of that operation returns it.

use crate::error::{Result, RoomsError};
use std::sync::{Mutex, MutexGuard};

pub mod booking;
pub mod guarantee;
pub mod hotel;
pub mod notification;
pub mod offer;
pub mod profile;

pub use booking::MockBookingStore;
pub use guarantee::MockGuaranteeGateway;
pub use hotel::MockHotelStore;
pub use notification::{MockNotificationGateway, SentNotification};
pub use offer::MockOfferStore;
pub use profile::MockProfileStore;

/// Lock a mock's shared storage.
fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>> {
    mutex
        .lock()
        .map_err(|_| RoomsError::upstream("mock storage", "lock poisoned"))
}

/// Return the injected failure, if any.
fn injected(failure: &Mutex<Option<RoomsError>>) -> Result<()> {
    match lock(failure)?.as_ref() {
        Some(err) => Err(err.clone()),
        None => Ok(()),
    }
}

/// Set an injected failure.
fn inject(failure: &Mutex<Option<RoomsError>>, err: RoomsError) {
    if let Ok(mut slot) = failure.lock() {
        *slot = Some(err);
    }
}

/// Snapshot shared storage for inspection; empty on a poisoned lock.
fn snapshot<T: Clone + Default>(mutex: &Mutex<T>) -> T {
    mutex.lock().map(|guard| guard.clone()).unwrap_or_default()
}
