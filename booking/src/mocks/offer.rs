//! Mock offer store for testing.

use super::{inject, injected, lock, snapshot};
use crate::error::{Result, RoomsError};
use crate::providers::OfferStore;
use crate::types::Offer;
use futures::future::BoxFuture;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Mock offer store.
///
/// Uses in-memory storage and records deletions.
#[derive(Debug, Clone, Default)]
pub struct MockOfferStore {
    offers: Arc<Mutex<HashMap<String, Offer>>>,
    deleted: Arc<Mutex<Vec<String>>>,
    read_failure: Arc<Mutex<Option<RoomsError>>>,
    delete_failure: Arc<Mutex<Option<RoomsError>>>,
}

impl MockOfferStore {
    /// Create an empty mock offer store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an offer.
    #[must_use]
    pub fn with_offer(self, offer: Offer) -> Self {
        self.insert(offer);
        self
    }

    /// Seed an offer.
    pub fn insert(&self, offer: Offer) {
        if let Ok(mut offers) = self.offers.lock() {
            offers.insert(offer.offer_id.clone(), offer);
        }
    }

    /// Whether the offer is still stored.
    #[must_use]
    pub fn contains(&self, offer_id: &str) -> bool {
        self.offers
            .lock()
            .is_ok_and(|offers| offers.contains_key(offer_id))
    }

    /// Offer ids deleted so far, in order.
    #[must_use]
    pub fn deleted(&self) -> Vec<String> {
        snapshot(&self.deleted)
    }

    /// Make every later read fail with `err`.
    pub fn fail_read(&self, err: RoomsError) {
        inject(&self.read_failure, err);
    }

    /// Make every later delete fail with `err`.
    pub fn fail_delete(&self, err: RoomsError) {
        inject(&self.delete_failure, err);
    }
}

impl OfferStore for MockOfferStore {
    fn read_by_offer_id<'a>(&'a self, offer_id: &'a str) -> BoxFuture<'a, Result<Offer>> {
        Box::pin(async move {
            injected(&self.read_failure)?;
            lock(&self.offers)?
                .get(offer_id)
                .cloned()
                .ok_or_else(|| RoomsError::not_found("offer", offer_id))
        })
    }

    fn delete_by_offer_id<'a>(&'a self, offer_id: &'a str) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            injected(&self.delete_failure)?;
            lock(&self.offers)?
                .remove(offer_id)
                .ok_or_else(|| RoomsError::not_found("offer", offer_id))?;
            lock(&self.deleted)?.push(offer_id.to_string());
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{OfferPrice, PricePlanReference};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn offer() -> Offer {
        Offer {
            offer_id: "offer-1".to_string(),
            debtor_org_id: "org-ota".to_string(),
            hotel_email: None,
            arrival: NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
            departure: NaiveDate::from_ymd_opt(2025, 2, 3).unwrap(),
            price: OfferPrice {
                currency: "EUR".to_string(),
                public: Decimal::from(150),
            },
            price_plan: PricePlanReference {
                price_plan_id: "BAR".to_string(),
                accommodation: "hotel-1".to_string(),
                room_type: "double".to_string(),
            },
        }
    }

    #[tokio::test]
    async fn second_delete_is_not_found() {
        let store = MockOfferStore::new().with_offer(offer());

        store.delete_by_offer_id("offer-1").await.unwrap();
        let err = store.delete_by_offer_id("offer-1").await.unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(store.deleted(), vec!["offer-1".to_string()]);
        assert!(!store.contains("offer-1"));
    }
}
