//! Order settlement saga.
//!
//! Converts a validated offer and payment guarantee into a persisted
//! booking and a claimed payment.
//!
//! # Flow
//!
//! ```text
//! Idle
//!  │ CreateOrder
//!  ▼
//! FetchingGuarantee ──(gate 1 fails)──────────────► Rejected
//!  │ GuaranteeFetched
//!  ▼
//! FetchingOffer ─────(gates 2-5 fail)─────────────► Rejected
//!  │ OfferFetched
//!  ▼
//! PersistingBooking ─┐
//!  │ BookingPersisted │
//!  ▼                  │
//! RetiringOffer ─────┤ StepFailed ──────────────► Failed
//!  │ OfferRetired     │              (compensations reported)
//!  ▼                  │
//! ClaimingGuarantee ─┘
//!  │ GuaranteeClaimed
//!  ▼
//! Notifying ── NotificationSent / NotificationFailed ──► Committed
//! ```
//!
//! Validation runs before any mutation, so `Rejected` never has side
//! effects. Once the booking is persisted nothing is rolled back: each
//! completed step declares its compensation, and on a later failure the
//! pending compensations are logged for reconciliation.

use crate::config::SettlementConfig;
use crate::environment::SettlementEnvironment;
use crate::error::RoomsError;
use crate::types::{
    Booking, CreateOrderPayload, Offer, OrderId, OrderResult, PaymentGuarantee, Requester,
};
use crate::validation::{check_creditor, check_offer_against_guarantee, count_guests, GuaranteeRejection};
use rooms_core::effect::Effect;
use rooms_core::reducer::Reducer;
use rooms_core::{smallvec, SmallVec};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Where a settlement currently stands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SettlementPhase {
    /// Nothing requested yet
    #[default]
    Idle,
    /// Waiting for the payment system
    FetchingGuarantee,
    /// Waiting for the offer store
    FetchingOffer,
    /// Writing the booking
    PersistingBooking,
    /// Deleting the consumed offer
    RetiringOffer,
    /// Claiming the guarantee
    ClaimingGuarantee,
    /// Telling the hotel
    Notifying,
    /// Order committed
    Committed,
    /// A gate rejected the request; nothing was mutated
    Rejected,
    /// A collaborator failed
    Failed,
}

impl SettlementPhase {
    /// Returns `true` once no further action will be processed.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Committed | Self::Rejected | Self::Failed)
    }
}

/// A completed mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SettlementStep {
    /// Booking written
    BookingPersisted,
    /// Offer deleted
    OfferRetired,
    /// Guarantee claimed
    GuaranteeClaimed,
}

impl SettlementStep {
    /// Action that would undo this step.
    #[must_use]
    pub const fn compensation(self) -> Compensation {
        match self {
            Self::BookingPersisted => Compensation::DeleteBooking,
            Self::OfferRetired => Compensation::RestoreOffer,
            Self::GuaranteeClaimed => Compensation::ReleaseGuarantee,
        }
    }
}

/// Undo action for a completed step.
///
/// Reported for reconciliation; never executed automatically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Compensation {
    /// Remove the persisted booking
    DeleteBooking,
    /// Re-create the deleted offer
    RestoreOffer,
    /// Return the claimed funds
    ReleaseGuarantee,
}

/// What happened to the hotel notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum NotificationOutcome {
    /// Delivered
    Sent,
    /// The offer has no hotel contact address
    Skipped,
    /// Delivery failed; the order stands
    Failed {
        /// Delivery error
        reason: String,
    },
}

/// Settlement saga state.
#[derive(Debug, Clone, Default)]
pub struct SettlementState {
    /// Current phase
    pub phase: SettlementPhase,
    /// Calling organization
    pub requester: Option<Requester>,
    /// Request body
    pub payload: Option<CreateOrderPayload>,
    /// Fetched guarantee
    pub guarantee: Option<PaymentGuarantee>,
    /// Fetched offer
    pub offer: Option<Offer>,
    /// Booking being settled
    pub booking: Option<Booking>,
    /// Mutations completed so far, in order
    pub completed: Vec<SettlementStep>,
    /// Compensations owed after a failure, most recent step first
    pub pending_compensations: Vec<Compensation>,
    /// Notification outcome, once committed
    pub notification: Option<NotificationOutcome>,
    /// Caller-facing result, once committed
    pub result: Option<OrderResult>,
    /// Rejection or failure, once terminal
    pub failure: Option<RoomsError>,
}

impl SettlementState {
    /// Order id, once assigned.
    #[must_use]
    pub fn order_id(&self) -> Option<OrderId> {
        self.booking.as_ref().map(|b| b.order_id)
    }
}

/// Settlement actions (commands and events).
#[derive(Debug, Clone)]
pub enum SettlementAction {
    /// Command: settle an order
    CreateOrder {
        /// Calling organization
        requester: Requester,
        /// Request body
        payload: CreateOrderPayload,
    },
    /// Event: guarantee fetched
    GuaranteeFetched {
        /// Guarantee details
        guarantee: PaymentGuarantee,
    },
    /// Event: offer fetched
    OfferFetched {
        /// Offer details
        offer: Offer,
    },
    /// Event: booking persisted
    BookingPersisted,
    /// Event: offer deleted
    OfferRetired,
    /// Event: guarantee claimed
    GuaranteeClaimed,
    /// Event: hotel notified
    NotificationSent,
    /// Event: hotel notification failed
    NotificationFailed {
        /// Delivery error
        reason: String,
    },
    /// Event: a collaborator call failed
    StepFailed {
        /// Underlying error
        error: RoomsError,
    },
}

/// Order settlement reducer.
#[derive(Debug, Clone)]
pub struct SettlementSaga {
    config: SettlementConfig,
}

impl SettlementSaga {
    /// Create a settlement saga.
    #[must_use]
    pub const fn new(config: SettlementConfig) -> Self {
        Self { config }
    }

    /// Settlement configuration.
    #[must_use]
    pub const fn config(&self) -> &SettlementConfig {
        &self.config
    }

    fn reject(state: &mut SettlementState, rejection: GuaranteeRejection) -> Effects {
        tracing::debug!(
            reason = %rejection,
            detail = %rejection.detail(),
            "Settlement rejected"
        );
        metrics::counter!("settlement.rejected").increment(1);

        state.phase = SettlementPhase::Rejected;
        state.failure = Some(rejection.into());
        smallvec![Effect::None]
    }

    fn fail(state: &mut SettlementState, error: RoomsError) -> Effects {
        let failed_in = state.phase;
        state.phase = SettlementPhase::Failed;
        state.pending_compensations = state
            .completed
            .iter()
            .rev()
            .map(|step| step.compensation())
            .collect();
        metrics::counter!("settlement.failed").increment(1);

        if state.pending_compensations.is_empty() {
            tracing::info!(phase = ?failed_in, error = %error, "Settlement failed before any mutation");
        } else {
            tracing::warn!(
                order_id = ?state.order_id(),
                phase = ?failed_in,
                error = %error,
                completed = ?state.completed,
                compensations = ?state.pending_compensations,
                "Settlement partially applied; reconciliation required"
            );
            metrics::counter!("settlement.reconciliation_required").increment(1);
        }

        state.failure = Some(error);
        smallvec![Effect::None]
    }

    fn commit(state: &mut SettlementState, outcome: NotificationOutcome) -> Effects {
        let (Some(booking), Some(offer)) = (&state.booking, &state.offer) else {
            return Self::fail(state, RoomsError::upstream("settlement", "commit without booking"));
        };
        let passengers = state.payload.as_ref().and_then(|p| p.passengers.clone());
        let result = OrderResult::committed(booking.order_id, offer, passengers);

        tracing::info!(
            order_id = %result.order_id,
            reservation_number = %result.order.reservation_number,
            notification = ?outcome,
            "Order committed"
        );
        metrics::counter!("settlement.committed").increment(1);

        state.phase = SettlementPhase::Committed;
        state.notification = Some(outcome);
        state.result = Some(result);
        smallvec![Effect::None]
    }
}

type Effects = SmallVec<[Effect<SettlementAction>; 4]>;

/// Turn a collaborator result into the follow-up action.
fn follow_up<T>(
    result: crate::error::Result<T>,
    on_success: impl FnOnce(T) -> SettlementAction,
) -> SettlementAction {
    match result {
        Ok(value) => on_success(value),
        Err(error) => SettlementAction::StepFailed { error },
    }
}

/// Assemble the booking record for a validated order.
fn booking_for(order_id: OrderId, offer: &Offer, payload: &CreateOrderPayload) -> Booking {
    Booking {
        order_id,
        hotel_id: offer.price_plan.accommodation.clone(),
        room_type_id: offer.price_plan.room_type.clone(),
        check_in_date: offer.arrival,
        check_out_date: offer.departure,
        guest_name: payload.traveller_name.clone().unwrap_or_default(),
        guest_email: payload.traveller_email.clone().unwrap_or_default(),
        phone_number: payload.traveller_phone.clone().unwrap_or_default(),
        number_of_guests: count_guests(payload.passengers.as_ref()),
        price: offer.price.public,
        currency: offer.price.currency.clone(),
    }
}

impl Reducer for SettlementSaga {
    type State = SettlementState;
    type Action = SettlementAction;
    type Environment = SettlementEnvironment;

    #[allow(clippy::too_many_lines)] // Saga complexity requires detailed state transitions
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> Effects {
        match (state.phase, action) {
            // Start: fetch the guarantee
            (SettlementPhase::Idle, SettlementAction::CreateOrder { requester, payload }) => {
                tracing::info!(
                    guarantee_id = %payload.guarantee_id,
                    offer_id = %payload.offer_id,
                    requester = %requester.org_id,
                    "Settling order"
                );
                let gateway = Arc::clone(&env.guarantees);
                let guarantee_id = payload.guarantee_id.clone();

                state.phase = SettlementPhase::FetchingGuarantee;
                state.requester = Some(requester);
                state.payload = Some(payload);

                smallvec![Effect::future(async move {
                    follow_up(gateway.fetch(&guarantee_id).await, |guarantee| {
                        SettlementAction::GuaranteeFetched { guarantee }
                    })
                })]
            },

            // Gate 1, then fetch the offer
            (SettlementPhase::FetchingGuarantee, SettlementAction::GuaranteeFetched { guarantee }) => {
                if let Err(rejection) = check_creditor(&guarantee, &self.config.merchant_org_id) {
                    state.guarantee = Some(guarantee);
                    return Self::reject(state, rejection);
                }
                let Some(payload) = &state.payload else {
                    return Self::fail(state, RoomsError::upstream("settlement", "missing payload"));
                };
                let offers = Arc::clone(&env.offers);
                let offer_id = payload.offer_id.clone();

                state.phase = SettlementPhase::FetchingOffer;
                state.guarantee = Some(guarantee);

                smallvec![Effect::future(async move {
                    follow_up(offers.read_by_offer_id(&offer_id).await, |offer| {
                        SettlementAction::OfferFetched { offer }
                    })
                })]
            },

            // Gates 2-5, then persist the booking
            (SettlementPhase::FetchingOffer, SettlementAction::OfferFetched { offer }) => {
                let (Some(guarantee), Some(payload)) = (&state.guarantee, &state.payload) else {
                    return Self::fail(state, RoomsError::upstream("settlement", "missing guarantee"));
                };
                if let Err(rejection) = check_offer_against_guarantee(
                    guarantee,
                    &offer,
                    env.clock.now(),
                    self.config.min_guarantee_validity,
                ) {
                    state.offer = Some(offer);
                    return Self::reject(state, rejection);
                }

                let order_id = OrderId::new(env.ids.generate());
                let booking = booking_for(order_id, &offer, payload);
                let bookings = Arc::clone(&env.bookings);
                let record = booking.clone();

                tracing::info!(order_id = %order_id, "Settlement gates passed");
                state.phase = SettlementPhase::PersistingBooking;
                state.offer = Some(offer);
                state.booking = Some(booking);

                smallvec![Effect::future(async move {
                    follow_up(bookings.create(&record).await, |()| {
                        SettlementAction::BookingPersisted
                    })
                })]
            },

            // Booking persisted: retire the offer
            (SettlementPhase::PersistingBooking, SettlementAction::BookingPersisted) => {
                let Some(payload) = &state.payload else {
                    return Self::fail(state, RoomsError::upstream("settlement", "missing payload"));
                };
                let offers = Arc::clone(&env.offers);
                let offer_id = payload.offer_id.clone();

                tracing::info!(order_id = ?state.order_id(), "Booking persisted");
                state.completed.push(SettlementStep::BookingPersisted);
                state.phase = SettlementPhase::RetiringOffer;

                smallvec![Effect::future(async move {
                    follow_up(offers.delete_by_offer_id(&offer_id).await, |()| {
                        SettlementAction::OfferRetired
                    })
                })]
            },

            // Offer retired: claim the guarantee
            (SettlementPhase::RetiringOffer, SettlementAction::OfferRetired) => {
                let Some(payload) = &state.payload else {
                    return Self::fail(state, RoomsError::upstream("settlement", "missing payload"));
                };
                let gateway = Arc::clone(&env.guarantees);
                let guarantee_id = payload.guarantee_id.clone();

                tracing::info!(order_id = ?state.order_id(), "Offer retired");
                state.completed.push(SettlementStep::OfferRetired);
                state.phase = SettlementPhase::ClaimingGuarantee;

                smallvec![Effect::future(async move {
                    follow_up(gateway.claim(&guarantee_id).await, |()| {
                        SettlementAction::GuaranteeClaimed
                    })
                })]
            },

            // Guarantee claimed: notify the hotel, if it has an address
            (SettlementPhase::ClaimingGuarantee, SettlementAction::GuaranteeClaimed) => {
                tracing::info!(order_id = ?state.order_id(), "Guarantee claimed");
                state.completed.push(SettlementStep::GuaranteeClaimed);

                let to_email = state
                    .offer
                    .as_ref()
                    .and_then(Offer::notification_email)
                    .map(str::to_string);
                let from_org_id = state.requester.as_ref().map(|r| r.org_id.clone());
                let (Some(to_email), Some(order_id), Some(from_org_id)) =
                    (to_email, state.order_id(), from_org_id)
                else {
                    return Self::commit(state, NotificationOutcome::Skipped);
                };
                let notifications = Arc::clone(&env.notifications);

                state.phase = SettlementPhase::Notifying;

                smallvec![Effect::future(async move {
                    match notifications
                        .send_new_booking(&from_org_id, order_id, &to_email)
                        .await
                    {
                        Ok(()) => SettlementAction::NotificationSent,
                        Err(error) => SettlementAction::NotificationFailed {
                            reason: error.to_string(),
                        },
                    }
                })]
            },

            (SettlementPhase::Notifying, SettlementAction::NotificationSent) => {
                Self::commit(state, NotificationOutcome::Sent)
            },

            // Best effort: the order stands
            (SettlementPhase::Notifying, SettlementAction::NotificationFailed { reason }) => {
                tracing::warn!(
                    order_id = ?state.order_id(),
                    reason = %reason,
                    "Booking notification failed"
                );
                metrics::counter!("settlement.notification_failed").increment(1);
                Self::commit(state, NotificationOutcome::Failed { reason })
            },

            (
                SettlementPhase::FetchingGuarantee
                | SettlementPhase::FetchingOffer
                | SettlementPhase::PersistingBooking
                | SettlementPhase::RetiringOffer
                | SettlementPhase::ClaimingGuarantee,
                SettlementAction::StepFailed { error },
            ) => Self::fail(state, error),

            (phase, action) => {
                tracing::warn!(?phase, ?action, "Ignoring settlement action in this phase");
                smallvec![Effect::None]
            },
        }
    }
}
