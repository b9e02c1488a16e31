//! Hotel store trait.

use crate::error::Result;
use crate::types::{Hotel, HotelId, NewHotel, ProfileId};
use futures::future::BoxFuture;

/// Storage of hotels.
pub trait HotelStore: Send + Sync {
    /// Create hotel and return its ID.
    ///
    /// # Errors
    ///
    /// Returns error if store query fails.
    fn create<'a>(&'a self, hotel: &'a NewHotel) -> BoxFuture<'a, Result<HotelId>>;

    /// List hotels owned by a profile.
    ///
    /// # Returns
    ///
    /// An empty list when the owner has no hotel.
    ///
    /// # Errors
    ///
    /// Returns error if store query fails.
    fn read_by_owner(&self, owner_id: ProfileId) -> BoxFuture<'_, Result<Vec<Hotel>>>;
}
