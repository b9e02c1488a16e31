//! PostgreSQL booking store.

use super::write_error;
use crate::error::Result;
use crate::providers::BookingStore;
use crate::types::Booking;
use futures::future::BoxFuture;
use sqlx::PgPool;

/// PostgreSQL booking store.
#[derive(Clone)]
pub struct PostgresBookingStore {
    /// PostgreSQL connection pool.
    pool: PgPool,
}

impl PostgresBookingStore {
    /// Create a new PostgreSQL booking store.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl BookingStore for PostgresBookingStore {
    fn create<'a>(&'a self, booking: &'a Booking) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            sqlx::query(
                r"
                INSERT INTO bookings
                    (order_id, hotel_id, room_type_id, check_in_date, check_out_date,
                     guest_name, guest_email, phone_number, number_of_guests, price, currency)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
                ",
            )
            .bind(booking.order_id.0)
            .bind(&booking.hotel_id)
            .bind(&booking.room_type_id)
            .bind(booking.check_in_date)
            .bind(booking.check_out_date)
            .bind(&booking.guest_name)
            .bind(&booking.guest_email)
            .bind(&booking.phone_number)
            .bind(i32::try_from(booking.number_of_guests).unwrap_or(i32::MAX))
            .bind(booking.price)
            .bind(&booking.currency)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                write_error("create booking", "booking", &booking.order_id.to_string(), e)
            })?;

            Ok(())
        })
    }
}
