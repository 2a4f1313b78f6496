//! Transfer Workflow
//!
//! Channel selection, form composition with fee pricing and balance gating,
//! and PIN-gated confirmation for outgoing transfers.
//!
//! # State Machine
//!
//! ```text
//! SELECT_CHANNEL → FILL_FORM → CONFIRM → SUBMITTING → DONE
//!        ↑             │          ↑  │        │         │
//!        └──── Back ───┴── Back ──┘  │        │         │
//!        │                    failed └────────┘         │
//!        └──────────────────── Reset ───────────────────┘
//! ```
//!
//! # Guarantees
//!
//! 1. **Gate before network**: a request that fails validation, fee lookup
//!    or the balance check never reaches the gateway
//! 2. **One call per confirm**: `SUBMITTING` rejects further submits; the
//!    gateway is never retried automatically
//! 3. **Frozen quote**: the fee breakdown is fixed when the form is composed

pub mod composer;
pub mod coordinator;
pub mod error;
pub mod gateway;
pub mod pin;
pub mod state;
pub mod types;


pub use composer::{
    ChannelForm, ComposeContext, CryptoForm, InternationalBankForm, MomoForm, NigeriaBankForm,
    TesapayForm,
};
pub use coordinator::TransferCoordinator;
pub use error::{ErrorKind, Presentation, TransferError};
pub use gateway::TransferGateway;
pub use pin::{PIN_LENGTH, Pin, PinPad};
pub use state::{TransferEvent, TransferReceipt, TransferStep};
pub use types::{DraftId, RecipientInfo, TransferRequest, TransferType};
