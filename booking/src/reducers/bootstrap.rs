//! Owner bootstrap saga.
//!
//! Issues a one-time password for an email address. The first login for an
//! email creates the owner profile and a placeholder hotel, then links the
//! two. Later logins only rotate the credentials.
//!
//! # Flow
//!
//! ```text
//! LookingUp ─ProfileFound──► RotatingCredentials ─CredentialsRotated─► Issued
//!     │
//!     └─ProfileMissing──► CreatingProfile ─► CreatingHotel ─► LinkingHotel ─► Issued
//! ```
//!
//! Any `StepFailed` ends in `Failed`. A failure after the profile exists
//! but before it is linked leaves an owner without a hotel; that case is
//! logged for reconciliation.

use crate::config::{IdentityConfig, LookupFailurePolicy};
use crate::environment::IdentityEnvironment;
use crate::error::RoomsError;
use crate::types::{HotelId, NewHotel, NewProfile, Profile, ProfileId, ProfilePatch};
use rooms_core::effect::Effect;
use rooms_core::reducer::Reducer;
use rooms_core::{smallvec, SmallVec};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Where a bootstrap currently stands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BootstrapPhase {
    /// Nothing requested yet
    #[default]
    Idle,
    /// Reading the profile by email
    LookingUp,
    /// Creating the owner profile
    CreatingProfile,
    /// Creating the placeholder hotel
    CreatingHotel,
    /// Writing the hotel id onto the profile
    LinkingHotel,
    /// Overwriting credentials of an existing profile
    RotatingCredentials,
    /// One-time password issued
    Issued,
    /// A collaborator failed
    Failed,
}

/// Bootstrap saga state.
#[derive(Debug, Clone, Default)]
pub struct BootstrapState {
    /// Current phase
    pub phase: BootstrapPhase,
    /// Email being logged in
    pub email: String,
    /// Session token supplied by the caller
    pub session_token: String,
    /// Generated one-time password
    pub one_time_password: Option<String>,
    /// Profile found or created
    pub profile_id: Option<ProfileId>,
    /// Hotel created for a new owner
    pub hotel_id: Option<HotelId>,
    /// Failure, once terminal
    pub failure: Option<RoomsError>,
}

/// Bootstrap actions (commands and events).
#[derive(Debug, Clone)]
pub enum BootstrapAction {
    /// Command: issue a one-time password
    IssueOneTimePassword {
        /// Email address
        email: String,
        /// Fresh session token
        session_token: String,
    },
    /// Event: a profile exists for the email
    ProfileFound {
        /// Existing profile
        profile: Profile,
    },
    /// Event: no profile exists for the email
    ProfileMissing,
    /// Event: the lookup failed for another reason
    LookupFailed {
        /// Underlying error
        error: RoomsError,
    },
    /// Event: owner profile created
    ProfileCreated {
        /// New profile ID
        profile_id: ProfileId,
    },
    /// Event: placeholder hotel created
    HotelCreated {
        /// New hotel ID
        hotel_id: HotelId,
    },
    /// Event: profile linked to its hotel
    ProfileLinked,
    /// Event: existing profile's credentials replaced
    CredentialsRotated,
    /// Event: a collaborator call failed
    StepFailed {
        /// Underlying error
        error: RoomsError,
    },
}

/// Owner bootstrap reducer.
#[derive(Debug, Clone, Default)]
pub struct BootstrapSaga {
    config: IdentityConfig,
}

type Effects = SmallVec<[Effect<BootstrapAction>; 4]>;

impl BootstrapSaga {
    /// Create a bootstrap saga.
    #[must_use]
    pub const fn new(config: IdentityConfig) -> Self {
        Self { config }
    }

    fn fail(state: &mut BootstrapState, error: RoomsError) -> Effects {
        if matches!(
            state.phase,
            BootstrapPhase::CreatingHotel | BootstrapPhase::LinkingHotel
        ) {
            tracing::warn!(
                profile_id = ?state.profile_id,
                hotel_id = ?state.hotel_id,
                error = %error,
                "Owner profile left without a linked hotel; reconciliation required"
            );
        } else {
            tracing::info!(phase = ?state.phase, error = %error, "Bootstrap failed");
        }
        state.phase = BootstrapPhase::Failed;
        state.failure = Some(error);
        smallvec![Effect::None]
    }

    fn create_profile(state: &mut BootstrapState, env: &IdentityEnvironment) -> Effects {
        let Some(otp) = state.one_time_password.clone() else {
            return Self::fail(state, RoomsError::upstream("bootstrap", "missing one-time password"));
        };
        let profiles = Arc::clone(&env.profiles);
        let profile = NewProfile::owner(state.email.clone(), otp, state.session_token.clone());

        state.phase = BootstrapPhase::CreatingProfile;

        smallvec![Effect::future(async move {
            match profiles.create(&profile).await {
                Ok(profile_id) => BootstrapAction::ProfileCreated { profile_id },
                Err(error) => BootstrapAction::StepFailed { error },
            }
        })]
    }
}

impl Reducer for BootstrapSaga {
    type State = BootstrapState;
    type Action = BootstrapAction;
    type Environment = IdentityEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> Effects {
        match (state.phase, action) {
            (
                BootstrapPhase::Idle,
                BootstrapAction::IssueOneTimePassword {
                    email,
                    session_token,
                },
            ) => {
                let profiles = Arc::clone(&env.profiles);
                let lookup = email.clone();

                state.phase = BootstrapPhase::LookingUp;
                state.one_time_password = Some(env.ids.generate().to_string());
                state.email = email;
                state.session_token = session_token;

                smallvec![Effect::future(async move {
                    match profiles.read_by_email(&lookup).await {
                        Ok(profile) => BootstrapAction::ProfileFound { profile },
                        Err(error) if error.is_not_found() => BootstrapAction::ProfileMissing,
                        Err(error) => BootstrapAction::LookupFailed { error },
                    }
                })]
            },

            (BootstrapPhase::LookingUp, BootstrapAction::ProfileMissing) => {
                Self::create_profile(state, env)
            },

            (BootstrapPhase::LookingUp, BootstrapAction::LookupFailed { error }) => {
                match self.config.lookup_failure_policy {
                    LookupFailurePolicy::TreatAsMissing => {
                        tracing::warn!(
                            email = %state.email,
                            error = %error,
                            "Profile lookup failed; treating as missing"
                        );
                        Self::create_profile(state, env)
                    },
                    LookupFailurePolicy::NotFoundOnly => Self::fail(state, error),
                }
            },

            (BootstrapPhase::LookingUp, BootstrapAction::ProfileFound { profile }) => {
                let Some(otp) = state.one_time_password.clone() else {
                    return Self::fail(state, RoomsError::upstream("bootstrap", "missing one-time password"));
                };
                let profiles = Arc::clone(&env.profiles);
                let patch = ProfilePatch::rotate_credentials(otp, state.session_token.clone());
                let profile_id = profile.id;

                state.phase = BootstrapPhase::RotatingCredentials;
                state.profile_id = Some(profile_id);
                state.hotel_id = profile.hotel_id;

                smallvec![Effect::future(async move {
                    match profiles.update(profile_id, &patch).await {
                        Ok(()) => BootstrapAction::CredentialsRotated,
                        Err(error) => BootstrapAction::StepFailed { error },
                    }
                })]
            },

            (BootstrapPhase::RotatingCredentials, BootstrapAction::CredentialsRotated) => {
                tracing::info!(profile_id = ?state.profile_id, "Credentials rotated");
                metrics::counter!("identity.credentials_rotated").increment(1);
                state.phase = BootstrapPhase::Issued;
                smallvec![Effect::None]
            },

            (BootstrapPhase::CreatingProfile, BootstrapAction::ProfileCreated { profile_id }) => {
                tracing::info!(profile_id = %profile_id, "Owner profile created");
                metrics::counter!("identity.profiles_created").increment(1);
                let hotels = Arc::clone(&env.hotels);
                let hotel = NewHotel::placeholder(profile_id);

                state.phase = BootstrapPhase::CreatingHotel;
                state.profile_id = Some(profile_id);

                smallvec![Effect::future(async move {
                    match hotels.create(&hotel).await {
                        Ok(hotel_id) => BootstrapAction::HotelCreated { hotel_id },
                        Err(error) => BootstrapAction::StepFailed { error },
                    }
                })]
            },

            (BootstrapPhase::CreatingHotel, BootstrapAction::HotelCreated { hotel_id }) => {
                let Some(profile_id) = state.profile_id else {
                    return Self::fail(state, RoomsError::upstream("bootstrap", "missing profile id"));
                };
                let profiles = Arc::clone(&env.profiles);
                let patch = ProfilePatch::link_hotel(hotel_id);

                state.phase = BootstrapPhase::LinkingHotel;
                state.hotel_id = Some(hotel_id);

                smallvec![Effect::future(async move {
                    match profiles.update(profile_id, &patch).await {
                        Ok(()) => BootstrapAction::ProfileLinked,
                        Err(error) => BootstrapAction::StepFailed { error },
                    }
                })]
            },

            (BootstrapPhase::LinkingHotel, BootstrapAction::ProfileLinked) => {
                tracing::info!(
                    profile_id = ?state.profile_id,
                    hotel_id = ?state.hotel_id,
                    "Owner linked to placeholder hotel"
                );
                state.phase = BootstrapPhase::Issued;
                smallvec![Effect::None]
            },

            (
                BootstrapPhase::LookingUp
                | BootstrapPhase::CreatingProfile
                | BootstrapPhase::CreatingHotel
                | BootstrapPhase::LinkingHotel
                | BootstrapPhase::RotatingCredentials,
                BootstrapAction::StepFailed { error },
            ) => Self::fail(state, error),

            (phase, action) => {
                tracing::warn!(?phase, ?action, "Ignoring bootstrap action in this phase");
                smallvec![Effect::None]
            },
        }
    }
}
