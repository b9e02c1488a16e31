//! Rooms booking demo.
//!
//! Bootstraps a hotel owner and settles one order against in-memory stores.
//!
//! Run with: `cargo run --bin rooms-demo`
//!
//! Environment:
//! - `GUARANTEE_API_URL`: use the HTTP payment system instead of a seeded mock
//! - `SMTP_SERVER` (and friends): send the hotel notification by email
//! - `RUST_LOG`: log filter, default `rooms_booking=info,rooms_runtime=info`

use chrono::{Duration, NaiveDate, Utc};
use rooms_booking::mocks::{
    MockBookingStore, MockGuaranteeGateway, MockHotelStore, MockOfferStore, MockProfileStore,
};
use rooms_booking::providers::{
    ConsoleNotificationGateway, GuaranteeGateway, HttpGuaranteeGateway, NotificationGateway,
    SmtpNotificationGateway,
};
use rooms_booking::types::{
    GuaranteeAmount, Offer, OfferPrice, PaymentGuarantee, PricePlanReference,
};
use rooms_booking::{
    AppConfig, CreateOrderPayload, IdentityBootstrapService, IdentityEnvironment,
    OrderSettlementService, Requester, SettlementEnvironment,
};
use rust_decimal::Decimal;
use serde_json::json;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const DEBTOR_ORG_ID: &str = "org-demo-ota";
const OFFER_ID: &str = "offer-demo-1";
const GUARANTEE_ID: &str = "guarantee-demo-1";

fn demo_offer() -> anyhow::Result<Offer> {
    let arrival = NaiveDate::from_ymd_opt(2026, 3, 1)
        .ok_or_else(|| anyhow::anyhow!("invalid arrival date"))?;
    let departure = NaiveDate::from_ymd_opt(2026, 3, 4)
        .ok_or_else(|| anyhow::anyhow!("invalid departure date"))?;

    Ok(Offer {
        offer_id: OFFER_ID.to_string(),
        debtor_org_id: DEBTOR_ORG_ID.to_string(),
        hotel_email: Some("frontdesk@hotel.example".to_string()),
        arrival,
        departure,
        price: OfferPrice {
            currency: "EUR".to_string(),
            public: Decimal::new(45000, 2),
        },
        price_plan: PricePlanReference {
            price_plan_id: "BAR".to_string(),
            accommodation: "hotel-demo".to_string(),
            room_type: "double".to_string(),
        },
    })
}

fn demo_guarantee(creditor_org_id: &str) -> PaymentGuarantee {
    PaymentGuarantee {
        guarantee_id: GUARANTEE_ID.to_string(),
        creditor_org_id: creditor_org_id.to_string(),
        debtor_org_id: DEBTOR_ORG_ID.to_string(),
        currency: "EUR".to_string(),
        amount: GuaranteeAmount::Value(Decimal::new(45000, 2)),
        expiration: Some((Utc::now() + Duration::days(7)).to_rfc3339()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file (if present)
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rooms_booking=info,rooms_runtime=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env();
    info!(org_id = %config.org_id, "Starting Rooms booking demo");

    // 1. Owner bootstrap
    let identity = IdentityBootstrapService::new(
        IdentityEnvironment::new(
            Arc::new(MockProfileStore::new()),
            Arc::new(MockHotelStore::new()),
        ),
        config.identity(),
    );

    let one_time_password = identity
        .issue_one_time_password("owner@hotel.example", "session-demo")
        .await?;
    info!(%one_time_password, "Issued one-time password for first login");

    let again = identity
        .issue_one_time_password("owner@hotel.example", "session-demo-2")
        .await?;
    info!(one_time_password = %again, "Rotated credentials for returning owner");

    // 2. Order settlement
    let guarantees: Arc<dyn GuaranteeGateway> = if std::env::var("GUARANTEE_API_URL").is_ok() {
        info!(base_url = %config.guarantee_api.base_url, "Using HTTP guarantee gateway");
        Arc::new(HttpGuaranteeGateway::from_config(&config.guarantee_api)?)
    } else {
        Arc::new(MockGuaranteeGateway::new().with_guarantee(demo_guarantee(&config.org_id)))
    };

    let notifications: Arc<dyn NotificationGateway> =
        match SmtpNotificationGateway::from_config(&config.smtp)? {
            Some(smtp) => Arc::new(smtp),
            None => Arc::new(ConsoleNotificationGateway::new()),
        };

    let bookings = MockBookingStore::new();
    let settlement = OrderSettlementService::new(
        SettlementEnvironment::new(
            guarantees,
            Arc::new(MockOfferStore::new().with_offer(demo_offer()?)),
            Arc::new(bookings.clone()),
            notifications,
        ),
        config.settlement(),
    );

    let payload = CreateOrderPayload {
        guarantee_id: GUARANTEE_ID.to_string(),
        offer_id: OFFER_ID.to_string(),
        passengers: Some(json!({ "PAX1": { "firstnames": ["Ada"], "lastnames": ["Lovelace"] } })),
        traveller_name: Some("Ada Lovelace".to_string()),
        traveller_email: Some("ada@example.com".to_string()),
        traveller_phone: None,
    };

    let result = settlement
        .settle(Requester::new(DEBTOR_ORG_ID), payload)
        .await?;

    info!(
        order_id = %result.order.order_id,
        bookings = bookings.bookings().len(),
        notification = ?result.notification,
        "Order committed"
    );
    println!("{}", serde_json::to_string_pretty(&result.order)?);

    Ok(())
}
