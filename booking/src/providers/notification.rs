//! Notification gateway trait.

use crate::error::Result;
use crate::types::OrderId;
use futures::future::BoxFuture;

/// Outbound notifications to hotels.
pub trait NotificationGateway: Send + Sync {
    /// Tell a hotel about a new booking.
    ///
    /// # Arguments
    ///
    /// - `from_org_id`: Organization that placed the order
    /// - `order_id`: The committed order
    /// - `to_email`: Hotel contact address
    ///
    /// # Errors
    ///
    /// Returns error if delivery fails. Callers treat this as non-fatal.
    fn send_new_booking<'a>(
        &'a self,
        from_org_id: &'a str,
        order_id: OrderId,
        to_email: &'a str,
    ) -> BoxFuture<'a, Result<()>>;
}
