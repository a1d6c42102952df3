//! Error taxonomy for the panel, with machine-readable wire codes.

use thiserror::Error;

use crate::control::ControlKind;
use crate::ids::{ClientId, ControlId};

// ── Error code constants ────────────────────────────────────────────

/// A control with this label already exists.
pub const DUPLICATE_LABEL: &str = "DUPLICATE_LABEL";
/// Control id past the end of the dense registry.
pub const CONTROL_OUT_OF_RANGE: &str = "CONTROL_OUT_OF_RANGE";
/// No control carries the given label.
pub const LABEL_NOT_FOUND: &str = "LABEL_NOT_FOUND";
/// Inbound text could not be parsed (bad id, bad payload).
pub const MALFORMED_MESSAGE: &str = "MALFORMED_MESSAGE";
/// Inbound event prefix not in the vocabulary.
pub const UNKNOWN_EVENT: &str = "UNKNOWN_EVENT";
/// Value shape does not fit the addressed control's kind.
pub const KIND_MISMATCH: &str = "KIND_MISMATCH";
/// One client could not be reached during delivery.
pub const DELIVERY_FAILURE: &str = "DELIVERY_FAILURE";
/// The dispatch router has stopped accepting notifications.
pub const ROUTER_CLOSED: &str = "ROUTER_CLOSED";

/// Error type shared across the panel crates.
#[derive(Debug, Error)]
pub enum PanelError {
    /// Creation rejected: the label is already taken.
    #[error("control label '{label}' already exists")]
    DuplicateLabel {
        /// The colliding label.
        label: String,
    },

    /// Lookup rejected: id is outside `[0, count)`.
    #[error("control id {id} is out of range (registry holds {count})")]
    OutOfRange {
        /// The requested id.
        id: ControlId,
        /// Current registry size.
        count: usize,
    },

    /// Lookup rejected: no control with that label.
    #[error("no control with label '{label}'")]
    NotFound {
        /// The label that was searched for.
        label: String,
    },

    /// Inbound message dropped: unparseable text or out-of-range id.
    #[error("malformed message: {reason}")]
    MalformedMessage {
        /// What was wrong with the message.
        reason: String,
    },

    /// Inbound message dropped: event prefix not in the vocabulary.
    #[error("unknown event in message '{raw}'")]
    UnknownEvent {
        /// The raw message text.
        raw: String,
    },

    /// Update rejected: value shape does not fit the control's kind.
    #[error("control {id} is a {kind}, cannot apply a {applied} value")]
    KindMismatch {
        /// The addressed control.
        id: ControlId,
        /// The control's actual kind.
        kind: ControlKind,
        /// Shape of the rejected value.
        applied: &'static str,
    },

    /// One client was unreachable during delivery; others are unaffected.
    #[error("delivery to client {client_id} failed (queue closed or full)")]
    DeliveryFailure {
        /// The client that could not be reached.
        client_id: ClientId,
    },

    /// The dispatch router task is gone; no further updates can be applied.
    #[error("dispatch router is no longer running")]
    RouterClosed,
}

impl PanelError {
    /// Machine-readable error code for this variant.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::DuplicateLabel { .. } => DUPLICATE_LABEL,
            Self::OutOfRange { .. } => CONTROL_OUT_OF_RANGE,
            Self::NotFound { .. } => LABEL_NOT_FOUND,
            Self::MalformedMessage { .. } => MALFORMED_MESSAGE,
            Self::UnknownEvent { .. } => UNKNOWN_EVENT,
            Self::KindMismatch { .. } => KIND_MISMATCH,
            Self::DeliveryFailure { .. } => DELIVERY_FAILURE,
            Self::RouterClosed => ROUTER_CLOSED,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
