//! Profile store trait.

use crate::error::Result;
use crate::types::{NewProfile, Profile, ProfileId, ProfilePatch};
use futures::future::BoxFuture;

/// Storage of owner and staff profiles.
///
/// Implementations must enforce email uniqueness. Concurrent bootstrap of
/// the same new email relies on it.
pub trait ProfileStore: Send + Sync {
    /// Get profile by email.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Profile not found → `RoomsError::NotFound`
    /// - Store query fails
    fn read_by_email<'a>(&'a self, email: &'a str) -> BoxFuture<'a, Result<Profile>>;

    /// Get profile by ID.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Profile not found → `RoomsError::NotFound`
    /// - Store query fails
    fn read_by_id(&self, id: ProfileId) -> BoxFuture<'_, Result<Profile>>;

    /// Create profile and return its ID.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Email already exists → `RoomsError::Conflict`
    /// - Store query fails
    fn create<'a>(&'a self, profile: &'a NewProfile) -> BoxFuture<'a, Result<ProfileId>>;

    /// Overwrite the fields set in `patch`.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Profile not found → `RoomsError::NotFound`
    /// - Store query fails
    fn update<'a>(&'a self, id: ProfileId, patch: &'a ProfilePatch) -> BoxFuture<'a, Result<()>>;
}
