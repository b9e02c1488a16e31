//! PostgreSQL storage implementations.
//!
//! This module provides persistent storage using PostgreSQL for:
//! - Owner and staff profiles (unique email)
//! - Hotels
//! - Offers
//! - Bookings
//!
//! Queries are built at runtime (`sqlx::query`), so building the crate does
//! not need a live database.

use crate::error::{Result, RoomsError};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

pub mod booking;
pub mod hotel;
pub mod offer;
pub mod profile;

// Re-exports
pub use booking::PostgresBookingStore;
pub use hotel::PostgresHotelStore;
pub use offer::PostgresOfferStore;
pub use profile::PostgresProfileStore;

/// Open a connection pool.
///
/// # Errors
///
/// Returns `RoomsError::Upstream` if the database is unreachable.
pub async fn connect(url: &str, max_connections: u32) -> Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(url)
        .await
        .map_err(|e| RoomsError::upstream("connect to database", e))
}

/// Run database migrations.
///
/// # Errors
///
/// Returns `RoomsError::Upstream` if migrations fail.
pub async fn migrate(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| RoomsError::upstream("migration", e))
}

/// Map a query error, recognizing unique-constraint violations.
fn write_error(context: &str, entity: &'static str, key: &str, err: sqlx::Error) -> RoomsError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return RoomsError::conflict(entity, key);
        }
    }
    RoomsError::upstream(context, err)
}
