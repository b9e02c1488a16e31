//! Console notification gateway for development and testing.

use crate::error::Result;
use crate::providers::NotificationGateway;
use crate::types::OrderId;
use futures::future::BoxFuture;
use tracing::info;

/// Console notification gateway.
///
/// Logs notifications instead of sending them.
#[derive(Clone, Debug, Default)]
pub struct ConsoleNotificationGateway;

impl ConsoleNotificationGateway {
    /// Create a new console notification gateway.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl NotificationGateway for ConsoleNotificationGateway {
    fn send_new_booking<'a>(
        &'a self,
        from_org_id: &'a str,
        order_id: OrderId,
        to_email: &'a str,
    ) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            info!(
                to = %to_email,
                from_org_id = %from_org_id,
                order_id = %order_id,
                reservation_number = %order_id.reservation_number(),
                "📧 New booking notification (Development Mode)"
            );
            Ok(())
        })
    }
}
