//! Guarantee gateway trait.

use crate::error::Result;
use crate::types::PaymentGuarantee;
use futures::future::BoxFuture;

/// Payment system holding guarantees.
pub trait GuaranteeGateway: Send + Sync {
    /// Fetch guarantee details.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Guarantee does not exist → `RoomsError::NotFound`
    /// - Payment system fails → `RoomsError::Upstream`
    fn fetch<'a>(&'a self, guarantee_id: &'a str) -> BoxFuture<'a, Result<PaymentGuarantee>>;

    /// Claim a guarantee, capturing its funds for this merchant.
    ///
    /// Irreversible. Double-claim behavior is up to the payment system.
    ///
    /// # Errors
    ///
    /// Returns `RoomsError::Upstream` if the claim is rejected.
    fn claim<'a>(&'a self, guarantee_id: &'a str) -> BoxFuture<'a, Result<()>>;
}
