//! Property tests for the settlement checks.

use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;
use rooms_booking::types::{GuaranteeAmount, PaymentGuarantee};
use rooms_booking::validation::{check_amount, check_creditor, check_expiration, count_guests};
use rust_decimal::Decimal;
use serde_json::{Map, Value};

fn guarantee(creditor: &str) -> PaymentGuarantee {
    PaymentGuarantee {
        guarantee_id: "g-1".to_string(),
        creditor_org_id: creditor.to_string(),
        debtor_org_id: "org-ota".to_string(),
        currency: "EUR".to_string(),
        amount: GuaranteeAmount::parse("100"),
        expiration: None,
    }
}

/// Amounts in cents, up to one million units.
fn cents() -> impl Strategy<Value = i64> {
    0i64..100_000_000
}

proptest! {
    #[test]
    fn creditor_accepted_iff_equal(merchant in "org-[a-z]{1,8}", creditor in "org-[a-z]{1,8}") {
        let accepted = check_creditor(&guarantee(&creditor), &merchant).is_ok();
        prop_assert_eq!(accepted, merchant == creditor);
    }

    #[test]
    fn amount_accepted_iff_covers_price(amount in cents(), price in cents()) {
        let guaranteed = GuaranteeAmount::Value(Decimal::new(amount, 2));
        let accepted = check_amount(&guaranteed, Decimal::new(price, 2)).is_ok();
        prop_assert_eq!(accepted, amount >= price);
    }

    #[test]
    fn amount_string_form_matches_decimal_form(amount in cents(), price in cents()) {
        let as_string = GuaranteeAmount::parse(&Decimal::new(amount, 2).to_string());
        let as_decimal = GuaranteeAmount::Value(Decimal::new(amount, 2));
        let price = Decimal::new(price, 2);
        prop_assert_eq!(
            check_amount(&as_string, price).is_ok(),
            check_amount(&as_decimal, price).is_ok()
        );
    }

    #[test]
    fn non_numeric_amount_never_accepted(raw in "[a-zA-Z ]{1,12}") {
        let amount = GuaranteeAmount::parse(&raw);
        prop_assert!(check_amount(&amount, Decimal::ZERO).is_err());
    }

    #[test]
    fn separated_digits_never_accepted(head in 1u32..1000, tail in 0u32..1000) {
        let amount = GuaranteeAmount::parse(&format!("{head}_{tail:03}"));
        prop_assert!(amount.value().is_none());
        prop_assert!(check_amount(&amount, Decimal::ZERO).is_err());
    }

    #[test]
    fn epoch_millis_expiration_matches_timestamp_form(offset_minutes in 0i64..(24 * 60 * 10)) {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let expires = now + Duration::minutes(offset_minutes);
        let millis = expires.timestamp_millis().to_string();
        prop_assert_eq!(
            check_expiration(Some(&millis), now, Duration::hours(72)).is_ok(),
            check_expiration(Some(&expires.to_rfc3339()), now, Duration::hours(72)).is_ok()
        );
    }

    #[test]
    fn expiration_accepted_iff_strictly_beyond_minimum(offset_minutes in 0i64..(24 * 60 * 10)) {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let expires = (now + Duration::minutes(offset_minutes)).to_rfc3339();
        let accepted = check_expiration(Some(&expires), now, Duration::hours(72)).is_ok();
        prop_assert_eq!(accepted, offset_minutes > 72 * 60);
    }

    #[test]
    fn guest_count_is_number_of_passengers(count in 0usize..20) {
        let passengers: Map<String, Value> = (0..count)
            .map(|i| (format!("PAX{i}"), Value::Object(Map::new())))
            .collect();
        let value = Value::Object(passengers);
        prop_assert_eq!(count_guests(Some(&value)) as usize, count);
    }
}
