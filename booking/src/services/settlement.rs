//! Order settlement service.

use crate::config::SettlementConfig;
use crate::environment::SettlementEnvironment;
use crate::error::{Result, RoomsError};
use crate::reducers::{
    NotificationOutcome, SettlementAction, SettlementPhase, SettlementSaga, SettlementState,
};
use crate::types::{CreateOrderPayload, OrderResult, Requester};
use rooms_runtime::Workflow;
use std::sync::Arc;

/// A committed order together with the fate of its hotel notification.
#[derive(Debug, Clone, PartialEq)]
pub struct Settlement {
    /// Caller-facing result
    pub order: OrderResult,
    /// Hotel notification outcome
    pub notification: NotificationOutcome,
}

/// Order settlement service.
#[derive(Clone)]
pub struct OrderSettlementService {
    workflow: Arc<Workflow<SettlementSaga>>,
}

impl OrderSettlementService {
    /// Create a settlement service.
    #[must_use]
    pub fn new(environment: SettlementEnvironment, config: SettlementConfig) -> Self {
        Self {
            workflow: Arc::new(Workflow::new(SettlementSaga::new(config), environment)),
        }
    }

    /// Settle an order and report the notification outcome.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - A settlement gate rejects the guarantee → `RoomsError::Validation`
    /// - Guarantee or offer does not exist → `RoomsError::NotFound`
    /// - A store or gateway fails → `RoomsError::Upstream`
    ///
    /// Notification failures are reported in [`Settlement::notification`],
    /// never as an error.
    pub async fn settle(&self, requester: Requester, payload: CreateOrderPayload) -> Result<Settlement> {
        let state = self
            .workflow
            .run(
                SettlementState::default(),
                SettlementAction::CreateOrder { requester, payload },
            )
            .await?;

        match state {
            SettlementState {
                phase: SettlementPhase::Committed,
                result: Some(order),
                notification: Some(notification),
                ..
            } => Ok(Settlement {
                order,
                notification,
            }),
            SettlementState {
                phase: SettlementPhase::Rejected | SettlementPhase::Failed,
                failure: Some(error),
                ..
            } => Err(error),
            SettlementState { phase, .. } => Err(RoomsError::upstream(
                "order settlement",
                format!("workflow stalled in {phase:?}"),
            )),
        }
    }

    /// Create an order.
    ///
    /// # Errors
    ///
    /// See [`settle`](Self::settle).
    pub async fn create_order(
        &self,
        requester: Requester,
        payload: CreateOrderPayload,
    ) -> Result<OrderResult> {
        self.settle(requester, payload)
            .await
            .map(|settlement| settlement.order)
    }
}
