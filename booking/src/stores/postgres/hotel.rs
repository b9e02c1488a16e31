//! PostgreSQL hotel store.

use crate::error::{Result, RoomsError};
use crate::providers::HotelStore;
use crate::types::{Hotel, HotelId, Location, NewHotel, ProfileId};
use futures::future::BoxFuture;
use sqlx::{PgPool, Row};
use uuid::Uuid;

/// PostgreSQL hotel store.
#[derive(Clone)]
pub struct PostgresHotelStore {
    /// PostgreSQL connection pool.
    pool: PgPool,
}

impl PostgresHotelStore {
    /// Create a new PostgreSQL hotel store.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl HotelStore for PostgresHotelStore {
    fn create<'a>(&'a self, hotel: &'a NewHotel) -> BoxFuture<'a, Result<HotelId>> {
        Box::pin(async move {
            let id = HotelId::new(Uuid::new_v4());

            sqlx::query(
                r"
                INSERT INTO hotels (id, owner_id, name, address, lat, lng)
                VALUES ($1, $2, $3, $4, $5, $6)
                ",
            )
            .bind(id.0)
            .bind(hotel.owner_id.0)
            .bind(&hotel.name)
            .bind(&hotel.address)
            .bind(hotel.location.lat)
            .bind(hotel.location.lng)
            .execute(&self.pool)
            .await
            .map_err(|e| RoomsError::upstream("create hotel", e))?;

            Ok(id)
        })
    }

    fn read_by_owner(&self, owner_id: ProfileId) -> BoxFuture<'_, Result<Vec<Hotel>>> {
        Box::pin(async move {
            let rows = sqlx::query(
                r"
                SELECT id, owner_id, name, address, lat, lng
                FROM hotels
                WHERE owner_id = $1
                ORDER BY created_at
                ",
            )
            .bind(owner_id.0)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RoomsError::upstream("read hotels", e))?;

            rows.iter()
                .map(|row| -> Result<Hotel> {
                    let decode = |e: sqlx::Error| RoomsError::upstream("decode hotel", e);
                    Ok(Hotel {
                        id: HotelId::new(row.try_get("id").map_err(decode)?),
                        owner_id: ProfileId::new(row.try_get("owner_id").map_err(decode)?),
                        name: row.try_get("name").map_err(decode)?,
                        address: row.try_get("address").map_err(decode)?,
                        location: Location {
                            lat: row.try_get("lat").map_err(decode)?,
                            lng: row.try_get("lng").map_err(decode)?,
                        },
                    })
                })
                .collect()
        })
    }
}
