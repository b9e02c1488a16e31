//! Fixed values shared across the booking workflows.

/// HTTP status reported for validation failures.
pub const HTTP_BAD_REQUEST: u16 = 400;

/// HTTP status reported when a referenced record does not exist.
pub const HTTP_NOT_FOUND: u16 = 404;

/// HTTP status reported when a uniqueness constraint rejects a write.
pub const HTTP_CONFLICT: u16 = 409;

/// HTTP status reported for store and gateway failures.
pub const HTTP_INTERNAL_SERVER_ERROR: u16 = 500;

/// Minimum remaining validity of a guarantee, in hours (exclusive bound).
pub const MIN_GUARANTEE_VALIDITY_HOURS: i64 = 72;

/// Request timeout for the payment system, in seconds.
pub const GUARANTEE_API_TIMEOUT_SECS: u64 = 10;

/// `status` field of a committed order.
pub const ORDER_STATUS_OK: &str = "OK";

/// `response` field of a committed order.
pub const ORDER_RESPONSE_COMMITTED: &str = "Committed";

/// Price plan whose references drive the booked hotel and room type.
pub const DEFAULT_PRICE_PLAN: &str = "BAR";
