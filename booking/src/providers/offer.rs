//! Offer store trait.

use crate::error::Result;
use crate::types::Offer;
use futures::future::BoxFuture;

/// Storage of issued offers.
pub trait OfferStore: Send + Sync {
    /// Get offer by offer ID.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Offer not found → `RoomsError::NotFound`
    /// - Store query fails
    fn read_by_offer_id<'a>(&'a self, offer_id: &'a str) -> BoxFuture<'a, Result<Offer>>;

    /// Delete offer by offer ID.
    ///
    /// Deleting an offer that no longer exists is an error, not a no-op.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Offer not found → `RoomsError::NotFound`
    /// - Store query fails
    fn delete_by_offer_id<'a>(&'a self, offer_id: &'a str) -> BoxFuture<'a, Result<()>>;
}
