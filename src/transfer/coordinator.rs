//! Transfer Coordinator
//!
//! Drives one transfer wizard session: owns the current [`TransferStep`],
//! the cached wallets and fee tables, and performs the single backend call
//! between `Submitting` and `Done`.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::config::TransferPolicy;
use crate::fee::FeeTables;
use crate::wallet::WalletBook;

use super::composer::{ChannelForm, ComposeContext};
use super::error::TransferError;
use super::gateway::TransferGateway;
use super::state::{TransferEvent, TransferReceipt, TransferStep};
use super::types::TransferType;

/// Attached to the step when a submission is cancelled mid-flight
pub const ABANDONED_SUBMISSION: &str = "submission cancelled before the backend answered";

pub struct TransferCoordinator {
    gateway: Arc<dyn TransferGateway>,
    wallets: WalletBook,
    fees: FeeTables,
    policy: TransferPolicy,
    step: TransferStep,
}

impl TransferCoordinator {
    pub fn new(
        gateway: Arc<dyn TransferGateway>,
        wallets: WalletBook,
        fees: FeeTables,
        policy: TransferPolicy,
    ) -> Self {
        Self {
            gateway,
            wallets,
            fees,
            policy,
            step: TransferStep::default(),
        }
    }

    pub fn step(&self) -> &TransferStep {
        &self.step
    }

    pub fn wallets(&self) -> &WalletBook {
        &self.wallets
    }

    pub fn fees(&self) -> &FeeTables {
        &self.fees
    }

    /// Replace the cached balances, e.g. after a wallet refresh
    pub fn set_wallets(&mut self, wallets: WalletBook) {
        if wallets.is_empty() {
            warn!("Wallet refresh returned no wallets, every transfer will be blocked");
        }
        debug!(wallets = wallets.len(), "Wallet balances replaced");
        self.wallets = wallets;
    }

    /// Replace the fee tables. A request already under confirmation keeps
    /// the quote it was composed with.
    pub fn set_fee_tables(&mut self, fees: FeeTables) {
        self.fees = fees;
    }

    pub fn select_channel(&mut self, channel: TransferType) -> Result<(), TransferError> {
        self.apply(TransferEvent::SelectChannel(channel))
    }

    /// Compose the open form and move to PIN entry.
    ///
    /// Validation failures leave the wizard on the form.
    pub fn compose<F: ChannelForm>(&mut self, form: &F) -> Result<(), TransferError> {
        match &self.step {
            TransferStep::FillForm { channel } if *channel == form.transfer_type() => {}
            other => {
                return Err(TransferError::InvalidStateTransition(format!(
                    "{} form submitted while in {}",
                    form.transfer_type(),
                    other
                )));
            }
        }

        let ctx = ComposeContext::new(&self.wallets, &self.fees, &self.policy);
        let request = form.compose(&ctx).inspect_err(|e| {
            debug!(
                channel = %form.transfer_type(),
                code = e.code(),
                error = %e,
                "Form rejected"
            );
        })?;
        self.apply(TransferEvent::FormComposed(request))
    }

    pub fn enter_pin_digit(&mut self, index: usize, digit: char) -> Result<(), TransferError> {
        self.apply(TransferEvent::PinDigit { index, digit })
    }

    pub fn pin_backspace(&mut self, index: usize) -> Result<(), TransferError> {
        self.apply(TransferEvent::PinBackspace { index })
    }

    /// Abandon the draft and return to channel selection
    pub fn back(&mut self) -> Result<(), TransferError> {
        self.apply(TransferEvent::Back)
    }

    /// Start a new transfer after completion
    pub fn reset(&mut self) -> Result<(), TransferError> {
        self.apply(TransferEvent::Reset)
    }

    /// Submit the confirmed request exactly once.
    ///
    /// On success the wizard is `Done`. On failure it returns to PIN entry
    /// with the error attached and the same error is returned; nothing is
    /// retried. If the returned future is dropped before the backend answers
    /// (timeout, `select!`), the wizard is put back on PIN entry with a
    /// network error.
    pub async fn confirm(&mut self) -> Result<TransferReceipt, TransferError> {
        self.apply(TransferEvent::Submit)?;

        let TransferStep::Submitting { request, pin } = &self.step else {
            return Err(TransferError::InvalidStateTransition(format!(
                "expected SUBMITTING, found {}",
                self.step
            )));
        };

        let (request, pin) = (request.clone(), pin.clone());

        info!(
            draft_id = %request.draft_id(),
            transfer_type = %request.transfer_type(),
            amount = %request.amount(),
            currency = request.currency(),
            gateway = self.gateway.name(),
            "Submitting transfer"
        );

        let draft_id = request.draft_id();
        let outcome = {
            let mut in_flight = InFlight::new(&mut self.step);
            let outcome = self.gateway.submit_transfer(&request, &pin).await;
            in_flight.settle();
            outcome
        };

        match outcome {
            Ok(message) => {
                let receipt = TransferReceipt {
                    message,
                    completed_at: Utc::now(),
                };
                info!(draft_id = %draft_id, "Transfer completed");
                self.apply(TransferEvent::SubmitSucceeded(receipt.clone()))?;
                Ok(receipt)
            }
            Err(e) => {
                let error = TransferError::from(e);
                warn!(
                    draft_id = %draft_id,
                    code = error.code(),
                    error = %error,
                    "Transfer submission failed"
                );
                self.apply(TransferEvent::SubmitFailed(error.clone()))?;
                Err(error)
            }
        }
    }

    /// Run one event through the state machine. On rejection the current
    /// step is left untouched.
    fn apply(&mut self, event: TransferEvent) -> Result<(), TransferError> {
        let from = self.step.as_str();
        let event_name = event.as_str();
        let next = self.step.clone().apply(event).inspect_err(|e| {
            debug!(from, event = event_name, error = %e, "Transition rejected");
        })?;
        debug!(from, to = next.as_str(), event = event_name, "Transition");
        self.step = next;
        Ok(())
    }
}

/// Held across the gateway call. Dropped unsettled, it moves the step out of
/// `Submitting` so the wizard is never stuck there.
struct InFlight<'a> {
    step: &'a mut TransferStep,
    settled: bool,
}

impl<'a> InFlight<'a> {
    fn new(step: &'a mut TransferStep) -> Self {
        Self {
            step,
            settled: false,
        }
    }

    fn settle(&mut self) {
        self.settled = true;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.settled || !matches!(self.step, TransferStep::Submitting { .. }) {
            return;
        }
        let error = TransferError::Network(ABANDONED_SUBMISSION.to_string());
        warn!(
            draft_id = ?self.step.request().map(|r| r.draft_id()),
            "Submission dropped before the backend answered"
        );
        if let Ok(next) = self.step.clone().apply(TransferEvent::SubmitFailed(error)) {
            *self.step = next;
        }
    }
}
