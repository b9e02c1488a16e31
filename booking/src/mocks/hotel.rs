//! Mock hotel store for testing.

use super::{inject, injected, lock};
use crate::error::{Result, RoomsError};
use crate::providers::HotelStore;
use crate::types::{Hotel, HotelId, NewHotel, ProfileId};
use futures::future::BoxFuture;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// Mock hotel store.
#[derive(Debug, Clone, Default)]
pub struct MockHotelStore {
    hotels: Arc<Mutex<HashMap<HotelId, Hotel>>>,
    create_failure: Arc<Mutex<Option<RoomsError>>>,
}

impl MockHotelStore {
    /// Create an empty mock hotel store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All stored hotels.
    #[must_use]
    pub fn hotels(&self) -> Vec<Hotel> {
        self.hotels
            .lock()
            .map(|hotels| hotels.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Make every later create fail with `err`.
    pub fn fail_create(&self, err: RoomsError) {
        inject(&self.create_failure, err);
    }
}

impl HotelStore for MockHotelStore {
    fn create<'a>(&'a self, hotel: &'a NewHotel) -> BoxFuture<'a, Result<HotelId>> {
        Box::pin(async move {
            injected(&self.create_failure)?;
            let id = HotelId::new(Uuid::new_v4());
            lock(&self.hotels)?.insert(id, hotel.clone().into_hotel(id));
            Ok(id)
        })
    }

    fn read_by_owner(&self, owner_id: ProfileId) -> BoxFuture<'_, Result<Vec<Hotel>>> {
        Box::pin(async move {
            Ok(lock(&self.hotels)?
                .values()
                .filter(|h| h.owner_id == owner_id)
                .cloned()
                .collect())
        })
    }
}
