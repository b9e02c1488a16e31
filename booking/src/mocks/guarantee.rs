//! Mock guarantee gateway for testing.

use super::{inject, injected, lock, snapshot};
use crate::error::{Result, RoomsError};
use crate::providers::GuaranteeGateway;
use crate::types::PaymentGuarantee;
use futures::future::BoxFuture;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Mock guarantee gateway.
///
/// Serves seeded guarantees and records claims.
#[derive(Debug, Clone, Default)]
pub struct MockGuaranteeGateway {
    guarantees: Arc<Mutex<HashMap<String, PaymentGuarantee>>>,
    claimed: Arc<Mutex<Vec<String>>>,
    fetch_failure: Arc<Mutex<Option<RoomsError>>>,
    claim_failure: Arc<Mutex<Option<RoomsError>>>,
}

impl MockGuaranteeGateway {
    /// Create an empty mock gateway.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a guarantee.
    #[must_use]
    pub fn with_guarantee(self, guarantee: PaymentGuarantee) -> Self {
        self.insert(guarantee);
        self
    }

    /// Seed a guarantee.
    pub fn insert(&self, guarantee: PaymentGuarantee) {
        if let Ok(mut guarantees) = self.guarantees.lock() {
            guarantees.insert(guarantee.guarantee_id.clone(), guarantee);
        }
    }

    /// Guarantee ids claimed so far, in order.
    #[must_use]
    pub fn claimed(&self) -> Vec<String> {
        snapshot(&self.claimed)
    }

    /// Make every later `fetch` fail with `err`.
    pub fn fail_fetch(&self, err: RoomsError) {
        inject(&self.fetch_failure, err);
    }

    /// Make every later `claim` fail with `err`.
    pub fn fail_claim(&self, err: RoomsError) {
        inject(&self.claim_failure, err);
    }
}

impl GuaranteeGateway for MockGuaranteeGateway {
    fn fetch<'a>(&'a self, guarantee_id: &'a str) -> BoxFuture<'a, Result<PaymentGuarantee>> {
        Box::pin(async move {
            injected(&self.fetch_failure)?;
            lock(&self.guarantees)?
                .get(guarantee_id)
                .cloned()
                .ok_or_else(|| RoomsError::not_found("guarantee", guarantee_id))
        })
    }

    fn claim<'a>(&'a self, guarantee_id: &'a str) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            injected(&self.claim_failure)?;
            if !lock(&self.guarantees)?.contains_key(guarantee_id) {
                return Err(RoomsError::not_found("guarantee", guarantee_id));
            }
            lock(&self.claimed)?.push(guarantee_id.to_string());
            Ok(())
        })
    }
}
