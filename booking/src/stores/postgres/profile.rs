//! PostgreSQL profile store.

use super::write_error;
use crate::error::{Result, RoomsError};
use crate::providers::ProfileStore;
use crate::types::{HotelId, NewProfile, Profile, ProfileId, ProfilePatch, ProfileRole};
use futures::future::BoxFuture;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

const SELECT_PROFILE: &str = r"
    SELECT id, email, name, phone, one_time_password, session_token, role, hotel_id
    FROM profiles
";

/// PostgreSQL profile store.
///
/// Email uniqueness is enforced by the `profiles_email_key` index.
#[derive(Clone)]
pub struct PostgresProfileStore {
    /// PostgreSQL connection pool.
    pool: PgPool,
}

impl PostgresProfileStore {
    /// Create a new PostgreSQL profile store.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn profile_from_row(row: &PgRow) -> Result<Profile> {
    let decode = |e: sqlx::Error| RoomsError::upstream("decode profile", e);
    let role: String = row.try_get("role").map_err(decode)?;

    Ok(Profile {
        id: ProfileId::new(row.try_get("id").map_err(decode)?),
        email: row.try_get("email").map_err(decode)?,
        name: row.try_get("name").map_err(decode)?,
        phone: row.try_get("phone").map_err(decode)?,
        one_time_password: row.try_get("one_time_password").map_err(decode)?,
        session_token: row.try_get("session_token").map_err(decode)?,
        role: role
            .parse::<ProfileRole>()
            .map_err(|e| RoomsError::upstream("decode profile", e))?,
        hotel_id: row
            .try_get::<Option<Uuid>, _>("hotel_id")
            .map_err(decode)?
            .map(HotelId::new),
    })
}

impl ProfileStore for PostgresProfileStore {
    fn read_by_email<'a>(&'a self, email: &'a str) -> BoxFuture<'a, Result<Profile>> {
        Box::pin(async move {
            let row = sqlx::query(&format!("{SELECT_PROFILE} WHERE email = $1"))
                .bind(email)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| RoomsError::upstream("read profile", e))?
                .ok_or_else(|| RoomsError::not_found("profile", email))?;

            profile_from_row(&row)
        })
    }

    fn read_by_id(&self, id: ProfileId) -> BoxFuture<'_, Result<Profile>> {
        Box::pin(async move {
            let row = sqlx::query(&format!("{SELECT_PROFILE} WHERE id = $1"))
                .bind(id.0)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| RoomsError::upstream("read profile", e))?
                .ok_or_else(|| RoomsError::not_found("profile", id.to_string()))?;

            profile_from_row(&row)
        })
    }

    fn create<'a>(&'a self, profile: &'a NewProfile) -> BoxFuture<'a, Result<ProfileId>> {
        Box::pin(async move {
            let id = ProfileId::new(Uuid::new_v4());

            sqlx::query(
                r"
                INSERT INTO profiles
                    (id, email, name, phone, one_time_password, session_token, role, hotel_id)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                ",
            )
            .bind(id.0)
            .bind(&profile.email)
            .bind(&profile.name)
            .bind(&profile.phone)
            .bind(&profile.one_time_password)
            .bind(&profile.session_token)
            .bind(profile.role.as_str())
            .bind(profile.hotel_id.map(|h| h.0))
            .execute(&self.pool)
            .await
            .map_err(|e| write_error("create profile", "profile", &profile.email, e))?;

            Ok(id)
        })
    }

    fn update<'a>(&'a self, id: ProfileId, patch: &'a ProfilePatch) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            let result = sqlx::query(
                r"
                UPDATE profiles SET
                    name = COALESCE($2, name),
                    phone = COALESCE($3, phone),
                    one_time_password = COALESCE($4, one_time_password),
                    session_token = COALESCE($5, session_token),
                    hotel_id = COALESCE($6, hotel_id)
                WHERE id = $1
                ",
            )
            .bind(id.0)
            .bind(&patch.name)
            .bind(&patch.phone)
            .bind(&patch.one_time_password)
            .bind(&patch.session_token)
            .bind(patch.hotel_id.map(|h| h.0))
            .execute(&self.pool)
            .await
            .map_err(|e| RoomsError::upstream("update profile", e))?;

            if result.rows_affected() == 0 {
                return Err(RoomsError::not_found("profile", id.to_string()));
            }
            Ok(())
        })
    }
}
