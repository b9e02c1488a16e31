//! Mock profile store for testing.

use super::{inject, injected, lock};
use crate::error::{Result, RoomsError};
use crate::providers::ProfileStore;
use crate::types::{NewProfile, Profile, ProfileId, ProfilePatch};
use futures::future::BoxFuture;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// Mock profile store.
///
/// Uses in-memory storage and enforces email uniqueness like the real
/// store's unique index.
#[derive(Debug, Clone, Default)]
pub struct MockProfileStore {
    profiles: Arc<Mutex<HashMap<ProfileId, Profile>>>,
    read_failure: Arc<Mutex<Option<RoomsError>>>,
    create_failure: Arc<Mutex<Option<RoomsError>>>,
    update_failure: Arc<Mutex<Option<RoomsError>>>,
}

impl MockProfileStore {
    /// Create an empty mock profile store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a profile.
    #[must_use]
    pub fn with_profile(self, profile: Profile) -> Self {
        if let Ok(mut profiles) = self.profiles.lock() {
            profiles.insert(profile.id, profile);
        }
        self
    }

    /// All stored profiles.
    #[must_use]
    pub fn profiles(&self) -> Vec<Profile> {
        self.profiles
            .lock()
            .map(|profiles| profiles.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Stored profile with the given email.
    #[must_use]
    pub fn find_by_email(&self, email: &str) -> Option<Profile> {
        self.profiles
            .lock()
            .ok()?
            .values()
            .find(|p| p.email == email)
            .cloned()
    }

    /// Make every later email or id lookup fail with `err`.
    pub fn fail_read(&self, err: RoomsError) {
        inject(&self.read_failure, err);
    }

    /// Make every later create fail with `err`.
    pub fn fail_create(&self, err: RoomsError) {
        inject(&self.create_failure, err);
    }

    /// Make every later update fail with `err`.
    pub fn fail_update(&self, err: RoomsError) {
        inject(&self.update_failure, err);
    }
}

impl ProfileStore for MockProfileStore {
    fn read_by_email<'a>(&'a self, email: &'a str) -> BoxFuture<'a, Result<Profile>> {
        Box::pin(async move {
            injected(&self.read_failure)?;
            lock(&self.profiles)?
                .values()
                .find(|p| p.email == email)
                .cloned()
                .ok_or_else(|| RoomsError::not_found("profile", email))
        })
    }

    fn read_by_id(&self, id: ProfileId) -> BoxFuture<'_, Result<Profile>> {
        Box::pin(async move {
            injected(&self.read_failure)?;
            lock(&self.profiles)?
                .get(&id)
                .cloned()
                .ok_or_else(|| RoomsError::not_found("profile", id.to_string()))
        })
    }

    fn create<'a>(&'a self, profile: &'a NewProfile) -> BoxFuture<'a, Result<ProfileId>> {
        Box::pin(async move {
            injected(&self.create_failure)?;
            let mut profiles = lock(&self.profiles)?;

            // Check for duplicate email
            if profiles.values().any(|p| p.email == profile.email) {
                return Err(RoomsError::conflict("profile", profile.email.clone()));
            }

            let id = ProfileId::new(Uuid::new_v4());
            profiles.insert(id, profile.clone().into_profile(id));
            Ok(id)
        })
    }

    fn update<'a>(&'a self, id: ProfileId, patch: &'a ProfilePatch) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            injected(&self.update_failure)?;
            let mut profiles = lock(&self.profiles)?;
            let profile = profiles
                .get_mut(&id)
                .ok_or_else(|| RoomsError::not_found("profile", id.to_string()))?;
            patch.apply(profile);
            Ok(())
        })
    }
}
