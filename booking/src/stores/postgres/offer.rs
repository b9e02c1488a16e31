//! PostgreSQL offer store.

use crate::constants::DEFAULT_PRICE_PLAN;
use crate::error::{Result, RoomsError};
use crate::providers::OfferStore;
use crate::types::{Offer, OfferPrice, PricePlanReference};
use futures::future::BoxFuture;
use sqlx::{PgPool, Row};

/// PostgreSQL offer store.
///
/// The booked hotel and room type come from the offer's `BAR` price plan.
#[derive(Clone)]
pub struct PostgresOfferStore {
    /// PostgreSQL connection pool.
    pool: PgPool,
}

impl PostgresOfferStore {
    /// Create a new PostgreSQL offer store.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl OfferStore for PostgresOfferStore {
    fn read_by_offer_id<'a>(&'a self, offer_id: &'a str) -> BoxFuture<'a, Result<Offer>> {
        Box::pin(async move {
            let row = sqlx::query(
                r"
                SELECT offer_id, debtor_org_id, hotel_email, arrival, departure,
                       currency, public_price,
                       price_plans -> $2 ->> 'accommodation' AS accommodation,
                       price_plans -> $2 ->> 'roomType' AS room_type
                FROM offers
                WHERE offer_id = $1
                ",
            )
            .bind(offer_id)
            .bind(DEFAULT_PRICE_PLAN)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RoomsError::upstream("read offer", e))?
            .ok_or_else(|| RoomsError::not_found("offer", offer_id))?;

            let decode = |e: sqlx::Error| RoomsError::upstream("decode offer", e);
            let accommodation: Option<String> = row.try_get("accommodation").map_err(decode)?;
            let room_type: Option<String> = row.try_get("room_type").map_err(decode)?;

            Ok(Offer {
                offer_id: row.try_get("offer_id").map_err(decode)?,
                debtor_org_id: row.try_get("debtor_org_id").map_err(decode)?,
                hotel_email: row.try_get("hotel_email").map_err(decode)?,
                arrival: row.try_get("arrival").map_err(decode)?,
                departure: row.try_get("departure").map_err(decode)?,
                price: OfferPrice {
                    currency: row.try_get("currency").map_err(decode)?,
                    public: row.try_get("public_price").map_err(decode)?,
                },
                price_plan: PricePlanReference {
                    price_plan_id: DEFAULT_PRICE_PLAN.to_string(),
                    accommodation: accommodation.unwrap_or_default(),
                    room_type: room_type.unwrap_or_default(),
                },
            })
        })
    }

    fn delete_by_offer_id<'a>(&'a self, offer_id: &'a str) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            let result = sqlx::query("DELETE FROM offers WHERE offer_id = $1")
                .bind(offer_id)
                .execute(&self.pool)
                .await
                .map_err(|e| RoomsError::upstream("delete offer", e))?;

            if result.rows_affected() == 0 {
                return Err(RoomsError::not_found("offer", offer_id));
            }
            Ok(())
        })
    }
}
