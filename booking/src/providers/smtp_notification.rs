//! SMTP notification gateway using Lettre.

use crate::config::SmtpConfig;
use crate::error::{Result, RoomsError};
use crate::providers::NotificationGateway;
use crate::types::OrderId;
use futures::future::BoxFuture;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

/// SMTP notification gateway.
///
/// Sends plain-text "new booking" mails through an async SMTP relay.
///
/// # Examples
///
/// ```ignore
/// use rooms_booking::providers::SmtpNotificationGateway;
///
/// let gateway = SmtpNotificationGateway::new(
///     "smtp.example.com",
///     587,
///     "user".to_string(),
///     "app_password".to_string(),
///     "bookings@rooms.example".to_string(),
///     "Rooms".to_string(),
/// )?;
/// ```
#[derive(Clone)]
pub struct SmtpNotificationGateway {
    /// Pooled SMTP transport.
    transport: AsyncSmtpTransport<Tokio1Executor>,

    /// Sender email address.
    from_email: String,

    /// Sender display name.
    from_name: String,
}

impl SmtpNotificationGateway {
    /// Create a new SMTP notification gateway.
    ///
    /// # Errors
    ///
    /// Returns `RoomsError::Upstream` if the relay cannot be configured.
    pub fn new(
        smtp_server: &str,
        smtp_port: u16,
        smtp_username: String,
        smtp_password: String,
        from_email: String,
        from_name: String,
    ) -> Result<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(smtp_server)
            .map_err(|e| RoomsError::upstream("SMTP relay", e))?
            .port(smtp_port)
            .credentials(Credentials::new(smtp_username, smtp_password))
            .build();

        Ok(Self {
            transport,
            from_email,
            from_name,
        })
    }

    /// Create a gateway from application configuration.
    ///
    /// Returns `Ok(None)` when no SMTP server is configured.
    ///
    /// # Errors
    ///
    /// Returns `RoomsError::Upstream` if the relay cannot be configured.
    pub fn from_config(config: &SmtpConfig) -> Result<Option<Self>> {
        config
            .server
            .as_deref()
            .map(|server| {
                Self::new(
                    server,
                    config.port,
                    config.username.clone(),
                    config.password.clone(),
                    config.from_email.clone(),
                    config.from_name.clone(),
                )
            })
            .transpose()
    }

    /// Build the "From" header.
    fn from_header(&self) -> String {
        format!("{} <{}>", self.from_name, self.from_email)
    }

    fn build_message(&self, from_org_id: &str, order_id: OrderId, to_email: &str) -> Result<Message> {
        let reservation_number = order_id.reservation_number();
        let body = format!(
            "A new booking was placed by {from_org_id}.\n\n\
             Order: {order_id}\n\
             Reservation number: {reservation_number}\n"
        );

        Message::builder()
            .from(
                self.from_header()
                    .parse()
                    .map_err(|e| RoomsError::upstream("notification from address", e))?,
            )
            .to(to_email
                .parse()
                .map_err(|e| RoomsError::upstream("notification to address", e))?)
            .subject(format!("New booking {reservation_number}"))
            .header(ContentType::TEXT_PLAIN)
            .body(body)
            .map_err(|e| RoomsError::upstream("build notification", e))
    }
}

impl NotificationGateway for SmtpNotificationGateway {
    fn send_new_booking<'a>(
        &'a self,
        from_org_id: &'a str,
        order_id: OrderId,
        to_email: &'a str,
    ) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            let message = self.build_message(from_org_id, order_id, to_email)?;
            self.transport
                .send(message)
                .await
                .map_err(|e| RoomsError::upstream("send notification", e))?;

            tracing::info!(to = %to_email, order_id = %order_id, "Booking notification sent");
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn gateway() -> SmtpNotificationGateway {
        SmtpNotificationGateway::new(
            "smtp.example.com",
            587,
            "user".to_string(),
            "secret".to_string(),
            "bookings@rooms.example".to_string(),
            "Rooms".to_string(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn rejects_malformed_recipient_without_connecting() {
        let result = gateway()
            .send_new_booking("org-ota", OrderId::new(Uuid::from_u128(1)), "not an address")
            .await;
        assert!(matches!(result, Err(RoomsError::Upstream { .. })));
    }

    #[test]
    fn disabled_without_server() {
        let config = crate::config::AppConfig::from_lookup(|_| None);
        assert!(SmtpNotificationGateway::from_config(&config.smtp).unwrap().is_none());
    }
}
