//! Mock notification gateway for testing.

use super::{inject, injected, lock, snapshot};
use crate::error::{Result, RoomsError};
use crate::providers::NotificationGateway;
use crate::types::OrderId;
use futures::future::BoxFuture;
use std::sync::{Arc, Mutex};

/// A recorded notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentNotification {
    /// Organization that placed the order
    pub from_org_id: String,
    /// Committed order
    pub order_id: OrderId,
    /// Hotel contact address
    pub to_email: String,
}

/// Mock notification gateway.
///
/// Records notifications instead of delivering them.
#[derive(Debug, Clone, Default)]
pub struct MockNotificationGateway {
    sent: Arc<Mutex<Vec<SentNotification>>>,
    failure: Arc<Mutex<Option<RoomsError>>>,
}

impl MockNotificationGateway {
    /// Create a new mock gateway that succeeds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Notifications delivered so far, in order.
    #[must_use]
    pub fn sent(&self) -> Vec<SentNotification> {
        snapshot(&self.sent)
    }

    /// Make every later send fail with `err`.
    pub fn fail_send(&self, err: RoomsError) {
        inject(&self.failure, err);
    }
}

impl NotificationGateway for MockNotificationGateway {
    fn send_new_booking<'a>(
        &'a self,
        from_org_id: &'a str,
        order_id: OrderId,
        to_email: &'a str,
    ) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            injected(&self.failure)?;
            lock(&self.sent)?.push(SentNotification {
                from_org_id: from_org_id.to_string(),
                order_id,
                to_email: to_email.to_string(),
            });
            Ok(())
        })
    }
}
