//! Transfer Workflow States
//!
//! Pure transition function over the transfer wizard. No I/O happens here;
//! the coordinator performs the backend call between `Submitting` and the
//! `SubmitSucceeded` / `SubmitFailed` events.

use std::fmt;

use chrono::{DateTime, Utc};

use super::error::TransferError;
use super::pin::{Pin, PinPad};
use super::types::{TransferRequest, TransferType};

/// Backend acknowledgement of a completed transfer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferReceipt {
    pub message: Option<String>,
    pub completed_at: DateTime<Utc>,
}

/// Workflow states
#[derive(Debug, Clone, Default, PartialEq)]
pub enum TransferStep {
    /// Choosing a channel
    #[default]
    SelectChannel,

    /// Filling the channel's form
    FillForm { channel: TransferType },

    /// Awaiting PIN. `last_error` holds the previous submission's failure.
    Confirm {
        request: TransferRequest,
        pin: PinPad,
        last_error: Option<TransferError>,
    },

    /// Request in flight. The confirm control is disabled.
    Submitting { request: TransferRequest, pin: Pin },

    /// Terminal: backend accepted the transfer
    Done {
        request: TransferRequest,
        receipt: TransferReceipt,
    },
}

/// Inputs to the state machine
#[derive(Debug, Clone, PartialEq)]
pub enum TransferEvent {
    SelectChannel(TransferType),
    FormComposed(TransferRequest),
    PinDigit { index: usize, digit: char },
    PinBackspace { index: usize },
    Submit,
    SubmitSucceeded(TransferReceipt),
    SubmitFailed(TransferError),
    Back,
    Reset,
}

impl TransferEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransferEvent::SelectChannel(_) => "SELECT_CHANNEL",
            TransferEvent::FormComposed(_) => "FORM_COMPOSED",
            TransferEvent::PinDigit { .. } => "PIN_DIGIT",
            TransferEvent::PinBackspace { .. } => "PIN_BACKSPACE",
            TransferEvent::Submit => "SUBMIT",
            TransferEvent::SubmitSucceeded(_) => "SUBMIT_SUCCEEDED",
            TransferEvent::SubmitFailed(_) => "SUBMIT_FAILED",
            TransferEvent::Back => "BACK",
            TransferEvent::Reset => "RESET",
        }
    }
}

impl TransferStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransferStep::SelectChannel => "SELECT_CHANNEL",
            TransferStep::FillForm { .. } => "FILL_FORM",
            TransferStep::Confirm { .. } => "CONFIRM",
            TransferStep::Submitting { .. } => "SUBMITTING",
            TransferStep::Done { .. } => "DONE",
        }
    }

    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, TransferStep::Done { .. })
    }

    /// Confirm is enabled only in `Confirm` with all five digits entered
    pub fn can_confirm(&self) -> bool {
        matches!(self, TransferStep::Confirm { pin, .. } if pin.is_complete())
    }

    /// Request under confirmation, in flight, or completed
    pub fn request(&self) -> Option<&TransferRequest> {
        match self {
            TransferStep::Confirm { request, .. }
            | TransferStep::Submitting { request, .. }
            | TransferStep::Done { request, .. } => Some(request),
            _ => None,
        }
    }

    pub fn last_error(&self) -> Option<&TransferError> {
        match self {
            TransferStep::Confirm { last_error, .. } => last_error.as_ref(),
            _ => None,
        }
    }

    /// Apply one event.
    ///
    /// Back from any pre-submission step discards the draft and returns to
    /// channel selection. A failed submission returns to PIN entry with the
    /// error attached; nothing is retried automatically.
    pub fn apply(self, event: TransferEvent) -> Result<TransferStep, TransferError> {
        use TransferEvent as E;
        use TransferStep as S;

        match (self, event) {
            (S::SelectChannel, E::SelectChannel(channel)) => Ok(S::FillForm { channel }),

            (S::FillForm { channel }, E::FormComposed(request)) => {
                if request.transfer_type() != channel {
                    return Err(TransferError::InvalidStateTransition(format!(
                        "{} request composed on the {} form",
                        request.transfer_type(),
                        channel
                    )));
                }
                Ok(S::Confirm {
                    request,
                    pin: PinPad::new(),
                    last_error: None,
                })
            }

            (
                S::Confirm {
                    request,
                    mut pin,
                    last_error,
                },
                E::PinDigit { index, digit },
            ) => {
                pin.input(index, digit);
                Ok(S::Confirm {
                    request,
                    pin,
                    last_error,
                })
            }

            (
                S::Confirm {
                    request,
                    mut pin,
                    last_error,
                },
                E::PinBackspace { index },
            ) => {
                pin.backspace(index);
                Ok(S::Confirm {
                    request,
                    pin,
                    last_error,
                })
            }

            (S::Confirm { request, pin, .. }, E::Submit) => match pin.pin() {
                Some(complete) => Ok(S::Submitting {
                    request,
                    pin: complete,
                }),
                None => Err(TransferError::PinIncomplete),
            },

            (S::Submitting { .. }, E::Submit) => Err(TransferError::SubmissionInFlight),

            (S::Submitting { request, .. }, E::SubmitSucceeded(receipt)) => {
                Ok(S::Done { request, receipt })
            }

            (S::Submitting { request, pin }, E::SubmitFailed(error)) => {
                let mut pad = PinPad::new();
                for (index, digit) in pin.as_str().chars().enumerate() {
                    pad.input(index, digit);
                }
                Ok(S::Confirm {
                    request,
                    pin: pad,
                    last_error: Some(error),
                })
            }

            (S::FillForm { .. } | S::Confirm { .. }, E::Back) => Ok(S::SelectChannel),

            (S::Done { .. }, E::Reset) => Ok(S::SelectChannel),

            (state, event) => Err(TransferError::InvalidStateTransition(format!(
                "{} cannot handle {}",
                state,
                event.as_str()
            ))),
        }
    }
}

impl fmt::Display for TransferStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
