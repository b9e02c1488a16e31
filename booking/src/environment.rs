//! Workflow environments.
//!
//! This module defines the environment types for dependency injection
//! in the settlement and bootstrap sagas.

use crate::providers::{
    BookingStore, GuaranteeGateway, HotelStore, NotificationGateway, OfferStore, ProfileStore,
};
use rooms_core::environment::{Clock, IdGenerator, SystemClock, UuidGenerator};
use std::sync::Arc;

/// Settlement environment.
///
/// Contains all external dependencies needed by the settlement saga.
#[derive(Clone)]
pub struct SettlementEnvironment {
    /// Payment system (guarantee fetch and claim).
    pub guarantees: Arc<dyn GuaranteeGateway>,

    /// Offer store.
    pub offers: Arc<dyn OfferStore>,

    /// Booking store.
    pub bookings: Arc<dyn BookingStore>,

    /// Hotel notifications.
    pub notifications: Arc<dyn NotificationGateway>,

    /// Clock for expiration checks.
    pub clock: Arc<dyn Clock>,

    /// Order id source.
    pub ids: Arc<dyn IdGenerator>,
}

impl SettlementEnvironment {
    /// Create a settlement environment with the system clock and random ids.
    #[must_use]
    pub fn new(
        guarantees: Arc<dyn GuaranteeGateway>,
        offers: Arc<dyn OfferStore>,
        bookings: Arc<dyn BookingStore>,
        notifications: Arc<dyn NotificationGateway>,
    ) -> Self {
        Self {
            guarantees,
            offers,
            bookings,
            notifications,
            clock: Arc::new(SystemClock),
            ids: Arc::new(UuidGenerator),
        }
    }

    /// Replace the clock.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replace the id generator.
    #[must_use]
    pub fn with_ids(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }
}

/// Identity environment.
///
/// Contains all external dependencies needed by the bootstrap saga.
#[derive(Clone)]
pub struct IdentityEnvironment {
    /// Profile store.
    pub profiles: Arc<dyn ProfileStore>,

    /// Hotel store.
    pub hotels: Arc<dyn HotelStore>,

    /// One-time password source.
    pub ids: Arc<dyn IdGenerator>,
}

impl IdentityEnvironment {
    /// Create an identity environment with random one-time passwords.
    #[must_use]
    pub fn new(profiles: Arc<dyn ProfileStore>, hotels: Arc<dyn HotelStore>) -> Self {
        Self {
            profiles,
            hotels,
            ids: Arc::new(UuidGenerator),
        }
    }

    /// Replace the id generator.
    #[must_use]
    pub fn with_ids(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }
}
