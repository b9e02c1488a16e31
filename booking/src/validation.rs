//! Settlement gates.
//!
//! Pure checks run before any mutation. Gate order matters: the first
//! failing gate decides the rejection reported to the caller.

use crate::error::RoomsError;
use crate::types::{GuaranteeAmount, Offer, PaymentGuarantee};
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use thiserror::Error;

/// Why a guarantee cannot pay for an offer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GuaranteeRejection {
    /// The guarantee pays a different merchant.
    #[error("Guarantee not meant for Rooms organization.")]
    WrongCreditor {
        /// Configured merchant organization
        merchant: String,
        /// Creditor named by the guarantee
        creditor: String,
    },

    /// The guarantee was created by someone other than the offer requestor.
    #[error("Guarantee not created by offer requestor.")]
    WrongDebtor {
        /// Debtor named by the offer
        offer_debtor: String,
        /// Debtor named by the guarantee
        guarantee_debtor: String,
    },

    /// Guarantee and offer currencies differ.
    #[error("Invalid Guarantee currency.")]
    CurrencyMismatch {
        /// Offer currency
        offer_currency: String,
        /// Guarantee currency
        guarantee_currency: String,
    },

    /// The guaranteed amount is missing, unparseable or below the price.
    #[error("Invalid Guarantee amount.")]
    InsufficientAmount {
        /// Offer public price
        price: Decimal,
        /// Guaranteed amount
        amount: GuaranteeAmount,
    },

    /// The guarantee may lapse before the safety margin.
    #[error("Guarantee expiration is too short.")]
    ExpirationTooShort {
        /// Expiration as sent by the payment system
        expiration: Option<String>,
    },
}

impl GuaranteeRejection {
    /// Offending values, for diagnostics.
    #[must_use]
    pub fn detail(&self) -> String {
        match self {
            Self::WrongCreditor { merchant, creditor } => {
                format!("merchant org id = {merchant}; guarantee creditor org id = {creditor}")
            },
            Self::WrongDebtor {
                offer_debtor,
                guarantee_debtor,
            } => format!(
                "offer debtor org id = {offer_debtor}; guarantee debtor org id = {guarantee_debtor}"
            ),
            Self::CurrencyMismatch {
                offer_currency,
                guarantee_currency,
            } => format!(
                "offer currency = {offer_currency}; guarantee currency = {guarantee_currency}"
            ),
            Self::InsufficientAmount { price, amount } => {
                format!("offer public price = {price}; guarantee amount = {amount}")
            },
            Self::ExpirationTooShort { expiration } => format!(
                "guarantee expiration = {}",
                expiration.as_deref().unwrap_or("<missing>")
            ),
        }
    }
}

impl From<GuaranteeRejection> for RoomsError {
    fn from(rejection: GuaranteeRejection) -> Self {
        Self::validation(rejection.to_string(), rejection.detail())
    }
}

/// Gate 1: the guarantee must name this merchant as creditor.
///
/// # Errors
///
/// Returns [`GuaranteeRejection::WrongCreditor`] on mismatch.
pub fn check_creditor(
    guarantee: &PaymentGuarantee,
    merchant_org_id: &str,
) -> Result<(), GuaranteeRejection> {
    if guarantee.creditor_org_id == merchant_org_id {
        Ok(())
    } else {
        Err(GuaranteeRejection::WrongCreditor {
            merchant: merchant_org_id.to_string(),
            creditor: guarantee.creditor_org_id.clone(),
        })
    }
}

/// Gates 2 to 5: debtor, currency, amount and expiration.
///
/// # Errors
///
/// Returns the rejection of the first failing gate.
pub fn check_offer_against_guarantee(
    guarantee: &PaymentGuarantee,
    offer: &Offer,
    now: DateTime<Utc>,
    min_validity: Duration,
) -> Result<(), GuaranteeRejection> {
    if guarantee.debtor_org_id != offer.debtor_org_id {
        return Err(GuaranteeRejection::WrongDebtor {
            offer_debtor: offer.debtor_org_id.clone(),
            guarantee_debtor: guarantee.debtor_org_id.clone(),
        });
    }

    if guarantee.currency != offer.price.currency {
        return Err(GuaranteeRejection::CurrencyMismatch {
            offer_currency: offer.price.currency.clone(),
            guarantee_currency: guarantee.currency.clone(),
        });
    }

    check_amount(&guarantee.amount, offer.price.public)?;
    check_expiration(guarantee.expiration.as_deref(), now, min_validity)
}

/// Gate 4: the guaranteed amount must cover the price.
///
/// # Errors
///
/// Returns [`GuaranteeRejection::InsufficientAmount`] for unparseable or
/// smaller amounts.
pub fn check_amount(amount: &GuaranteeAmount, price: Decimal) -> Result<(), GuaranteeRejection> {
    match amount.value() {
        Some(value) if value >= price => Ok(()),
        _ => Err(GuaranteeRejection::InsufficientAmount {
            price,
            amount: amount.clone(),
        }),
    }
}

/// Gate 5: the guarantee must outlive `now` by strictly more than `min_validity`.
///
/// # Errors
///
/// Returns [`GuaranteeRejection::ExpirationTooShort`] for missing,
/// unparseable or too-close expirations.
pub fn check_expiration(
    expiration: Option<&str>,
    now: DateTime<Utc>,
    min_validity: Duration,
) -> Result<(), GuaranteeRejection> {
    match expiration.and_then(parse_expiration) {
        Some(expires_at) if expires_at - now > min_validity => Ok(()),
        _ => Err(GuaranteeRejection::ExpirationTooShort {
            expiration: expiration.map(str::to_string),
        }),
    }
}

/// Naive layouts taken as UTC, tried in order after RFC 3339.
const NAIVE_EXPIRATION_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse a guarantee expiration timestamp.
///
/// Accepts RFC 3339 (`T` or space separated), epoch milliseconds, or a naive
/// `YYYY-MM-DD[( |T)HH:MM[:SS[.fff]]]` taken as UTC.
#[must_use]
pub fn parse_expiration(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
        return raw.parse().ok().and_then(DateTime::from_timestamp_millis);
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f%:z") {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Some(naive) = NAIVE_EXPIRATION_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
    {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Gate 6: number of guests from the passenger map.
///
/// A non-empty JSON object counts its entries; anything else is zero.
#[must_use]
pub fn count_guests(passengers: Option<&serde_json::Value>) -> u32 {
    match passengers {
        Some(serde_json::Value::Object(map)) => u32::try_from(map.len()).unwrap_or(u32::MAX),
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{OfferPrice, PricePlanReference};
    use serde_json::json;
    use std::str::FromStr;

    fn now() -> DateTime<Utc> {
        parse_expiration("2025-01-01T00:00:00Z").unwrap()
    }

    fn offer() -> Offer {
        Offer {
            offer_id: "offer-1".to_string(),
            debtor_org_id: "org-ota".to_string(),
            hotel_email: Some("desk@hotel.example".to_string()),
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

    fn guarantee() -> PaymentGuarantee {
        PaymentGuarantee {
            guarantee_id: "g-1".to_string(),
            creditor_org_id: "org-rooms".to_string(),
            debtor_org_id: "org-ota".to_string(),
            currency: "EUR".to_string(),
            amount: GuaranteeAmount::parse("150.00"),
            expiration: Some("2025-01-10T00:00:00Z".to_string()),
        }
    }

    fn check(guarantee: &PaymentGuarantee) -> Result<(), GuaranteeRejection> {
        check_offer_against_guarantee(guarantee, &offer(), now(), Duration::hours(72))
    }

    #[test]
    fn valid_guarantee_passes_every_gate() {
        assert_eq!(check_creditor(&guarantee(), "org-rooms"), Ok(()));
        assert_eq!(check(&guarantee()), Ok(()));
    }

    #[test]
    fn creditor_must_be_the_merchant() {
        let err = check_creditor(&guarantee(), "org-other").unwrap_err();
        assert_eq!(err.to_string(), "Guarantee not meant for Rooms organization.");
        assert!(err.detail().contains("org-other"));
    }

    #[test]
    fn debtor_must_match_offer() {
        let mut g = guarantee();
        g.debtor_org_id = "org-else".to_string();
        assert!(matches!(check(&g), Err(GuaranteeRejection::WrongDebtor { .. })));
    }

    #[test]
    fn currency_must_match_exactly() {
        let mut g = guarantee();
        g.currency = "eur".to_string();
        let err = check(&g).unwrap_err();
        assert_eq!(err.to_string(), "Invalid Guarantee currency.");
        assert_eq!(err.detail(), "offer currency = EUR; guarantee currency = eur");
    }

    #[test]
    fn string_amount_equal_to_price_passes() {
        assert_eq!(check_amount(&GuaranteeAmount::parse("150.00"), Decimal::from(150)), Ok(()));
    }

    #[test]
    fn unparseable_amount_fails() {
        assert!(check_amount(&GuaranteeAmount::parse("abc"), Decimal::from(150)).is_err());
    }

    #[test]
    fn numeric_amount_below_price_fails() {
        let amount = GuaranteeAmount::from_json(&json!(149.99));
        assert!(matches!(
            check_amount(&amount, Decimal::from(150)),
            Err(GuaranteeRejection::InsufficientAmount { .. })
        ));
    }

    #[test]
    fn expiration_exactly_72_hours_away_fails() {
        let expires = (now() + Duration::hours(72)).to_rfc3339();
        assert!(check_expiration(Some(&expires), now(), Duration::hours(72)).is_err());
    }

    #[test]
    fn expiration_72_hours_and_a_minute_away_passes() {
        let expires = (now() + Duration::hours(72) + Duration::minutes(1)).to_rfc3339();
        assert_eq!(check_expiration(Some(&expires), now(), Duration::hours(72)), Ok(()));
    }

    #[test]
    fn missing_or_garbage_expiration_fails() {
        assert!(check_expiration(None, now(), Duration::hours(72)).is_err());
        assert!(check_expiration(Some("soon"), now(), Duration::hours(72)).is_err());
    }

    #[test]
    fn expiration_formats() {
        let expected = DateTime::<Utc>::from_str("2025-01-10T12:00:00Z").unwrap();
        assert_eq!(parse_expiration("2025-01-10T12:00:00Z"), Some(expected));
        assert_eq!(parse_expiration("2025-01-10T14:00:00+02:00"), Some(expected));
        assert_eq!(parse_expiration("2025-01-10T12:00:00.000"), Some(expected));
        assert_eq!(
            parse_expiration("2025-01-10"),
            Some(DateTime::<Utc>::from_str("2025-01-10T00:00:00Z").unwrap())
        );
    }

    #[test]
    fn space_separated_and_minute_precision_expirations() {
        let expected = DateTime::<Utc>::from_str("2025-01-10T12:00:00Z").unwrap();
        for raw in [
            "2025-01-10 12:00:00",
            "2025-01-10 12:00:00.000",
            "2025-01-10 14:00:00+02:00",
            "2025-01-10T12:00",
            "2025-01-10 12:00",
        ] {
            assert_eq!(parse_expiration(raw), Some(expected), "input {raw}");
        }

        let far = "2025-01-10 12:00";
        assert_eq!(check_expiration(Some(far), now(), Duration::hours(72)), Ok(()));
    }

    #[test]
    fn epoch_millis_expiration() {
        assert_eq!(
            parse_expiration("1767225600000"),
            Some(DateTime::<Utc>::from_str("2026-01-01T00:00:00Z").unwrap())
        );
        assert_eq!(parse_expiration("99999999999999999999999"), None);

        let decoded: PaymentGuarantee = serde_json::from_value(json!({
            "creditorOrgId": "org-rooms",
            "debtorOrgId": "org-ota",
            "currency": "EUR",
            "amount": "150.00",
            "expiration": 1_767_225_600_000_i64
        }))
        .unwrap();
        assert_eq!(check(&decoded), Ok(()));

        let soon = (now() + Duration::hours(1)).timestamp_millis();
        let decoded: PaymentGuarantee = serde_json::from_value(json!({
            "creditorOrgId": "org-rooms",
            "debtorOrgId": "org-ota",
            "currency": "EUR",
            "amount": "150.00",
            "expiration": soon
        }))
        .unwrap();
        assert!(matches!(check(&decoded), Err(GuaranteeRejection::ExpirationTooShort { .. })));
    }

    #[test]
    fn non_text_expiration_is_a_rejection_not_a_decode_failure() {
        let decoded: PaymentGuarantee = serde_json::from_value(json!({
            "creditorOrgId": "org-rooms",
            "debtorOrgId": "org-ota",
            "currency": "EUR",
            "amount": "150.00",
            "expiration": {"at": "2025-01-10"}
        }))
        .unwrap();
        let err: RoomsError = check(&decoded).unwrap_err().into();
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn separated_amount_is_refused() {
        let mut g = guarantee();
        g.amount = GuaranteeAmount::from_json(&json!("1_50"));
        assert!(matches!(check(&g), Err(GuaranteeRejection::InsufficientAmount { .. })));
    }

    #[test]
    fn first_failing_gate_wins() {
        let mut g = guarantee();
        g.currency = "USD".to_string();
        g.amount = GuaranteeAmount::parse("1");
        g.expiration = None;
        assert!(matches!(check(&g), Err(GuaranteeRejection::CurrencyMismatch { .. })));
    }

    #[test]
    fn guest_count() {
        assert_eq!(count_guests(Some(&json!({"PAX1": {}, "PAX2": {}}))), 2);
        assert_eq!(count_guests(Some(&json!({}))), 0);
        assert_eq!(count_guests(Some(&json!(["PAX1"]))), 0);
        assert_eq!(count_guests(None), 0);
    }

    #[test]
    fn rejection_becomes_validation_error() {
        let err: RoomsError = check_creditor(&guarantee(), "org-other").unwrap_err().into();
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.public_message(), "Guarantee not meant for Rooms organization.");
    }
}
