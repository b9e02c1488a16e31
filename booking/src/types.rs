//! Domain types for order settlement and owner bootstrap.
//!
//! Wire names are camelCase to match the API payloads.

use crate::constants::{ORDER_RESPONSE_COMMITTED, ORDER_STATUS_OK};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// ═══════════════════════════════════════════════════════════════════════
// Identifiers
// ═══════════════════════════════════════════════════════════════════════

/// Profile identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileId(pub Uuid);

impl ProfileId {
    /// Create a new profile ID.
    #[must_use]
    pub const fn new(id: Uuid) -> Self {
        Self(id)
    }

    /// Get the inner UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Hotel identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HotelId(pub Uuid);

impl HotelId {
    /// Create a new hotel ID.
    #[must_use]
    pub const fn new(id: Uuid) -> Self {
        Self(id)
    }

    /// Get the inner UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for HotelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Order identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub Uuid);

impl OrderId {
    /// Create a new order ID.
    #[must_use]
    pub const fn new(id: Uuid) -> Self {
        Self(id)
    }

    /// Get the inner UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Human-facing reservation number for this order.
    #[must_use]
    pub fn reservation_number(&self) -> String {
        reservation_number(&self.0.to_string())
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// First dash-delimited segment of an order id, upper-cased.
///
/// # Examples
///
/// ```
/// use rooms_booking::types::reservation_number;
///
/// assert_eq!(reservation_number("ab12-cd34-ef56"), "AB12");
/// ```
#[must_use]
pub fn reservation_number(order_id: &str) -> String {
    order_id
        .split('-')
        .next()
        .unwrap_or_default()
        .to_uppercase()
}

// ═══════════════════════════════════════════════════════════════════════
// Profiles and hotels
// ═══════════════════════════════════════════════════════════════════════

/// Role of a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProfileRole {
    /// Owns exactly one hotel
    Owner,
    /// Works at a hotel
    Staff,
}

impl ProfileRole {
    /// Wire and storage form.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Owner => "OWNER",
            Self::Staff => "STAFF",
        }
    }
}

impl FromStr for ProfileRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OWNER" => Ok(Self::Owner),
            "STAFF" => Ok(Self::Staff),
            other => Err(format!("unknown profile role: {other}")),
        }
    }
}

/// Identity of a hotel owner or staff user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// Profile ID
    pub id: ProfileId,
    /// Unique business key
    pub email: String,
    /// Display name
    pub name: String,
    /// Phone number
    pub phone: String,
    /// Current login secret
    pub one_time_password: Option<String>,
    /// Current session secret
    pub session_token: Option<String>,
    /// Role
    pub role: ProfileRole,
    /// Owning hotel, unset until the hotel exists
    pub hotel_id: Option<HotelId>,
}

/// Profile to be created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProfile {
    /// Unique business key
    pub email: String,
    /// Display name
    pub name: String,
    /// Phone number
    pub phone: String,
    /// Login secret
    pub one_time_password: Option<String>,
    /// Session secret
    pub session_token: Option<String>,
    /// Role
    pub role: ProfileRole,
    /// Owning hotel
    pub hotel_id: Option<HotelId>,
}

impl NewProfile {
    /// A fresh owner profile with empty name, phone and hotel.
    #[must_use]
    pub fn owner(
        email: impl Into<String>,
        one_time_password: impl Into<String>,
        session_token: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            name: String::new(),
            phone: String::new(),
            one_time_password: Some(one_time_password.into()),
            session_token: Some(session_token.into()),
            role: ProfileRole::Owner,
            hotel_id: None,
        }
    }

    /// Materialize with an assigned id.
    #[must_use]
    pub fn into_profile(self, id: ProfileId) -> Profile {
        Profile {
            id,
            email: self.email,
            name: self.name,
            phone: self.phone,
            one_time_password: self.one_time_password,
            session_token: self.session_token,
            role: self.role,
            hotel_id: self.hotel_id,
        }
    }
}

/// Field overwrite for a profile; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePatch {
    /// New display name
    pub name: Option<String>,
    /// New phone number
    pub phone: Option<String>,
    /// New login secret
    pub one_time_password: Option<String>,
    /// New session secret
    pub session_token: Option<String>,
    /// New owning hotel
    pub hotel_id: Option<HotelId>,
}

impl ProfilePatch {
    /// Link the profile to its hotel.
    #[must_use]
    pub fn link_hotel(hotel_id: HotelId) -> Self {
        Self {
            hotel_id: Some(hotel_id),
            ..Self::default()
        }
    }

    /// Replace the login and session secrets.
    #[must_use]
    pub fn rotate_credentials(
        one_time_password: impl Into<String>,
        session_token: impl Into<String>,
    ) -> Self {
        Self {
            one_time_password: Some(one_time_password.into()),
            session_token: Some(session_token.into()),
            ..Self::default()
        }
    }

    /// Apply the set fields to `profile`.
    pub fn apply(&self, profile: &mut Profile) {
        if let Some(name) = &self.name {
            profile.name.clone_from(name);
        }
        if let Some(phone) = &self.phone {
            profile.phone.clone_from(phone);
        }
        if let Some(otp) = &self.one_time_password {
            profile.one_time_password = Some(otp.clone());
        }
        if let Some(token) = &self.session_token {
            profile.session_token = Some(token.clone());
        }
        if let Some(hotel_id) = self.hotel_id {
            profile.hotel_id = Some(hotel_id);
        }
    }
}

/// Geographic coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Latitude
    pub lat: f64,
    /// Longitude
    pub lng: f64,
}

/// A property owned by one profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hotel {
    /// Hotel ID
    pub id: HotelId,
    /// Owning profile
    pub owner_id: ProfileId,
    /// Name
    pub name: String,
    /// Street address
    pub address: String,
    /// Coordinates
    pub location: Location,
}

/// Hotel to be created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewHotel {
    /// Owning profile
    pub owner_id: ProfileId,
    /// Name
    pub name: String,
    /// Street address
    pub address: String,
    /// Coordinates
    pub location: Location,
}

impl NewHotel {
    /// Empty hotel for a freshly created owner.
    #[must_use]
    pub fn placeholder(owner_id: ProfileId) -> Self {
        Self {
            owner_id,
            name: String::new(),
            address: String::new(),
            location: Location::default(),
        }
    }

    /// Materialize with an assigned id.
    #[must_use]
    pub fn into_hotel(self, id: HotelId) -> Hotel {
        Hotel {
            id,
            owner_id: self.owner_id,
            name: self.name,
            address: self.address,
            location: self.location,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Offers and guarantees
// ═══════════════════════════════════════════════════════════════════════

/// Price of an offer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferPrice {
    /// ISO currency code
    pub currency: String,
    /// Public amount
    pub public: Decimal,
}

/// Price plan the offer was priced with, and what it books.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricePlanReference {
    /// Price plan code (e.g. `BAR`)
    pub price_plan_id: String,
    /// Hotel the plan books
    pub accommodation: String,
    /// Room type the plan books
    pub room_type: String,
}

/// A priced, time-bounded proposal to book a room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    /// Offer ID
    pub offer_id: String,
    /// Organization expected to pay
    pub debtor_org_id: String,
    /// Hotel contact address for booking notifications
    pub hotel_email: Option<String>,
    /// Check-in date
    pub arrival: NaiveDate,
    /// Check-out date
    pub departure: NaiveDate,
    /// Price
    pub price: OfferPrice,
    /// Price plan reference
    pub price_plan: PricePlanReference,
}

impl Offer {
    /// Notification address, if the offer carries a non-empty one.
    #[must_use]
    pub fn notification_email(&self) -> Option<&str> {
        self.hotel_email.as_deref().filter(|email| !email.is_empty())
    }
}

/// Guaranteed amount, parsed once at the boundary.
///
/// The payment system may send a JSON number or a decimal string. Anything
/// that is not a decimal is kept verbatim as [`GuaranteeAmount::Unparseable`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuaranteeAmount {
    /// A decimal amount
    Value(Decimal),
    /// The raw value that failed to parse
    Unparseable(String),
}

impl GuaranteeAmount {
    /// Parse a decimal string.
    ///
    /// # Examples
    ///
    /// ```
    /// use rooms_booking::types::GuaranteeAmount;
    ///
    /// assert!(matches!(GuaranteeAmount::parse("150.00"), GuaranteeAmount::Value(_)));
    /// assert!(matches!(GuaranteeAmount::parse("abc"), GuaranteeAmount::Unparseable(_)));
    /// assert!(matches!(GuaranteeAmount::parse("1_50"), GuaranteeAmount::Unparseable(_)));
    /// ```
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        // Digit separators and other extensions of the decimal parser are refused.
        let plain = trimmed
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'-' | b'+' | b'e' | b'E'));
        if !plain {
            return Self::Unparseable(raw.to_string());
        }
        Decimal::from_str(trimmed)
            .or_else(|_| Decimal::from_scientific(trimmed))
            .map_or_else(|_| Self::Unparseable(raw.to_string()), Self::Value)
    }

    /// Interpret an arbitrary JSON value.
    #[must_use]
    pub fn from_json(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::String(s) => Self::parse(s),
            serde_json::Value::Number(n) => Self::parse(&n.to_string()),
            other => Self::Unparseable(other.to_string()),
        }
    }

    /// The decimal value, if parsed.
    #[must_use]
    pub const fn value(&self) -> Option<Decimal> {
        match self {
            Self::Value(d) => Some(*d),
            Self::Unparseable(_) => None,
        }
    }
}

impl fmt::Display for GuaranteeAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(d) => d.fmt(f),
            Self::Unparseable(raw) => raw.fmt(f),
        }
    }
}

impl From<Decimal> for GuaranteeAmount {
    fn from(value: Decimal) -> Self {
        Self::Value(value)
    }
}

impl Serialize for GuaranteeAmount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for GuaranteeAmount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(Self::from_json(&value))
    }
}

/// Payment guarantee as reported by the payment system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentGuarantee {
    /// Guarantee ID
    #[serde(default)]
    pub guarantee_id: String,
    /// Organization the funds are earmarked for
    pub creditor_org_id: String,
    /// Organization that created the guarantee
    pub debtor_org_id: String,
    /// ISO currency code
    pub currency: String,
    /// Guaranteed amount
    pub amount: GuaranteeAmount,
    /// Expiration as sent by the payment system: a timestamp string, or
    /// epoch milliseconds kept as their decimal text
    #[serde(default, deserialize_with = "expiration_text")]
    pub expiration: Option<String>,
}

/// Accept any JSON expiration; only `null` counts as missing.
fn expiration_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s),
        other => Some(other.to_string()),
    })
}

// ═══════════════════════════════════════════════════════════════════════
// Orders and bookings
// ═══════════════════════════════════════════════════════════════════════

/// Calling organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Requester {
    /// Organization identifier
    pub org_id: String,
}

impl Requester {
    /// Create a requester for the given organization.
    #[must_use]
    pub fn new(org_id: impl Into<String>) -> Self {
        Self {
            org_id: org_id.into(),
        }
    }
}

/// Order creation request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderPayload {
    /// Guarantee paying for the order
    pub guarantee_id: String,
    /// Offer to book
    pub offer_id: String,
    /// Passenger map, echoed back in the result
    #[serde(default)]
    pub passengers: Option<serde_json::Value>,
    /// Lead traveller name
    #[serde(default)]
    pub traveller_name: Option<String>,
    /// Lead traveller email
    #[serde(default)]
    pub traveller_email: Option<String>,
    /// Lead traveller phone
    #[serde(default)]
    pub traveller_phone: Option<String>,
}

/// Durable record of a settled order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    /// Order ID
    pub order_id: OrderId,
    /// Booked hotel
    pub hotel_id: String,
    /// Booked room type
    pub room_type_id: String,
    /// Check-in date
    pub check_in_date: NaiveDate,
    /// Check-out date
    pub check_out_date: NaiveDate,
    /// Lead guest name
    pub guest_name: String,
    /// Lead guest email
    pub guest_email: String,
    /// Lead guest phone
    pub phone_number: String,
    /// Number of guests
    pub number_of_guests: u32,
    /// Price paid
    pub price: Decimal,
    /// ISO currency code
    pub currency: String,
}

/// Fixed booking restrictions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Restrictions {
    /// Whether the order can be exchanged
    pub exchangeable: bool,
    /// Whether the order can be refunded
    pub refundable: bool,
}

/// Order summary returned to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    /// Passenger map as sent by the caller
    pub passengers: Option<serde_json::Value>,
    /// Price
    pub price: OfferPrice,
    /// Restrictions
    pub restrictions: Restrictions,
    /// Always `OK`
    pub status: String,
    /// Always `Committed`
    pub response: String,
    /// Human-facing reservation number
    pub reservation_number: String,
}

/// Result of a committed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResult {
    /// Order ID
    pub order_id: OrderId,
    /// Order summary
    pub order: OrderSummary,
}

impl OrderResult {
    /// Build the committed result for an order.
    #[must_use]
    pub fn committed(order_id: OrderId, offer: &Offer, passengers: Option<serde_json::Value>) -> Self {
        Self {
            order_id,
            order: OrderSummary {
                passengers,
                price: offer.price.clone(),
                restrictions: Restrictions::default(),
                status: ORDER_STATUS_OK.to_string(),
                response: ORDER_RESPONSE_COMMITTED.to_string(),
                reservation_number: order_id.reservation_number(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reservation_number_is_first_segment_uppercased() {
        assert_eq!(reservation_number("ab12-cd34-ef56"), "AB12");
        assert_eq!(reservation_number("nodash"), "NODASH");
        assert_eq!(reservation_number(""), "");

        let order_id = OrderId::new(Uuid::from_u128(0xdead_beef_0000_0000_0000_0000_0000_0001));
        assert_eq!(order_id.reservation_number(), "DEADBEEF");
    }

    #[test]
    fn guarantee_amount_accepts_numbers_and_strings() {
        let parsed: PaymentGuarantee = serde_json::from_value(json!({
            "guaranteeId": "g-1",
            "creditorOrgId": "org-rooms",
            "debtorOrgId": "org-ota",
            "currency": "EUR",
            "amount": "150.00",
            "expiration": "2025-01-10T00:00:00Z"
        }))
        .unwrap();
        assert_eq!(parsed.amount.value(), Some(Decimal::new(15000, 2)));

        assert_eq!(
            GuaranteeAmount::from_json(&json!(149.99)).value(),
            Some(Decimal::new(14999, 2))
        );
        assert_eq!(GuaranteeAmount::from_json(&json!(150)).value(), Some(Decimal::from(150)));
    }

    #[test]
    fn guarantee_amount_keeps_unparseable_input() {
        assert_eq!(
            GuaranteeAmount::from_json(&json!("abc")),
            GuaranteeAmount::Unparseable("abc".to_string())
        );
        assert!(GuaranteeAmount::from_json(&json!(null)).value().is_none());
        assert!(GuaranteeAmount::from_json(&json!({"value": 1})).value().is_none());
    }

    #[test]
    fn guarantee_amount_refuses_digit_separators() {
        for raw in ["1_50", "1_000.00", "150abc", "0x96", "1,50"] {
            assert_eq!(
                GuaranteeAmount::parse(raw),
                GuaranteeAmount::Unparseable(raw.to_string()),
                "input {raw}"
            );
        }
        assert_eq!(GuaranteeAmount::parse(" 1.5e2 ").value(), Some(Decimal::from(150)));
        assert_eq!(GuaranteeAmount::parse("-1").value(), Some(Decimal::from(-1)));
    }

    #[test]
    fn guarantee_expiration_accepts_epoch_millis() {
        let guarantee = |expiration: serde_json::Value| -> PaymentGuarantee {
            serde_json::from_value(json!({
                "creditorOrgId": "org-rooms",
                "debtorOrgId": "org-ota",
                "currency": "EUR",
                "amount": 150,
                "expiration": expiration
            }))
            .unwrap()
        };

        let epoch = guarantee(json!(1_767_225_600_000_i64));
        assert_eq!(epoch.expiration.as_deref(), Some("1767225600000"));
        assert_eq!(guarantee(json!("2026-01-01")).expiration.as_deref(), Some("2026-01-01"));
        assert_eq!(guarantee(json!(true)).expiration.as_deref(), Some("true"));
        assert!(guarantee(json!(null)).expiration.is_none());

        let missing: PaymentGuarantee = serde_json::from_value(json!({
            "creditorOrgId": "org-rooms",
            "debtorOrgId": "org-ota",
            "currency": "EUR",
            "amount": 150
        }))
        .unwrap();
        assert!(missing.expiration.is_none());
    }

    #[test]
    fn patch_only_touches_set_fields() {
        let mut profile = NewProfile::owner("a@b.com", "otp-1", "session-1")
            .into_profile(ProfileId::new(Uuid::from_u128(1)));
        profile.name = "Ada".to_string();

        ProfilePatch::rotate_credentials("otp-2", "session-2").apply(&mut profile);

        assert_eq!(profile.one_time_password.as_deref(), Some("otp-2"));
        assert_eq!(profile.session_token.as_deref(), Some("session-2"));
        assert_eq!(profile.name, "Ada");
        assert!(profile.hotel_id.is_none());
    }

    #[test]
    fn profile_role_wire_form() {
        assert_eq!(serde_json::to_value(ProfileRole::Owner).unwrap(), json!("OWNER"));
        assert_eq!("STAFF".parse::<ProfileRole>(), Ok(ProfileRole::Staff));
    }

    #[test]
    fn order_result_uses_camel_case() {
        let offer = Offer {
            offer_id: "offer-1".to_string(),
            debtor_org_id: "org-ota".to_string(),
            hotel_email: Some(String::new()),
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
        };
        assert!(offer.notification_email().is_none());

        let result = OrderResult::committed(OrderId::new(Uuid::from_u128(7)), &offer, None);
        let value = serde_json::to_value(&result).unwrap();

        assert_eq!(value["order"]["reservationNumber"], json!("00000000"));
        assert_eq!(value["order"]["status"], json!("OK"));
        assert_eq!(value["order"]["response"], json!("Committed"));
        assert_eq!(value["order"]["restrictions"]["refundable"], json!(false));
    }
}
