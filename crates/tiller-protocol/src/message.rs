//! Outbound wire messages.

use serde::{Deserialize, Serialize};

use tiller_core::{Control, ControlKind, ControlValue};
use tiller_core::ids::ControlId;

/// Discriminant of an outbound message.
///
/// A `Define` is tagged with the control's own kind so the client picks the
/// right widget; an update is tagged with which kind it applies to so the
/// client applies the correct rendering logic without a second lookup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MessageType {
    /// Whole-panel title, sent once per sync.
    Title,
    /// Define a text label.
    Label,
    /// Define a push button.
    Button,
    /// Define a switch.
    Switch,
    /// Define a slider.
    Slider,
    /// Define a four-zone pad.
    Pad,
    /// Define a five-zone centered pad.
    PadCenter,
    /// New text for a label.
    UpdateLabel,
    /// New state for a switch.
    UpdateSwitch,
    /// New position for a slider.
    UpdateSlider,
}

impl MessageType {
    /// The `Define` tag for a control kind.
    #[must_use]
    pub fn define_for(kind: ControlKind) -> Self {
        match kind {
            ControlKind::Label => Self::Label,
            ControlKind::Button => Self::Button,
            ControlKind::Switch => Self::Switch,
            ControlKind::Slider => Self::Slider,
            ControlKind::Pad => Self::Pad,
            ControlKind::PadCenter => Self::PadCenter,
        }
    }

    /// The `UpdateValue` tag for a control kind, if the kind is
    /// state-bearing. Buttons and pads have no update message.
    #[must_use]
    pub fn update_for(kind: ControlKind) -> Option<Self> {
        match kind {
            ControlKind::Label => Some(Self::UpdateLabel),
            ControlKind::Switch => Some(Self::UpdateSwitch),
            ControlKind::Slider => Some(Self::UpdateSlider),
            ControlKind::Button | ControlKind::Pad | ControlKind::PadCenter => None,
        }
    }
}

/// One outbound message, serialized as a flat JSON object.
///
/// Only the fields relevant to the message kind are present: `Title` carries
/// a label alone, a `Define` carries everything, and an update carries just
/// the value and id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireMessage {
    /// Message discriminant.
    #[serde(rename = "type")]
    pub message_type: MessageType,
    /// Panel title or control label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Current control value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<ControlValue>,
    /// Opaque style attribute, passed through unchanged.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Target control id. Present on everything except `Title`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<ControlId>,
}

impl WireMessage {
    /// The `Title` message describing the whole panel.
    #[must_use]
    pub fn title(label: impl Into<String>) -> Self {
        Self {
            message_type: MessageType::Title,
            label: Some(label.into()),
            value: None,
            color: None,
            id: None,
        }
    }

    /// Full `Define` description of one control, used on initial sync.
    #[must_use]
    pub fn define(control: &Control) -> Self {
        Self {
            message_type: MessageType::define_for(control.kind),
            label: Some(control.label.clone()),
            value: Some(control.value.clone()),
            color: Some(control.style.clone()),
            id: Some(control.id),
        }
    }

    /// Delta `UpdateValue` for a control, or `None` for momentary kinds
    /// that have nothing to update.
    #[must_use]
    pub fn update(control: &Control) -> Option<Self> {
        MessageType::update_for(control.kind).map(|message_type| Self {
            message_type,
            label: None,
            value: Some(control.value.clone()),
            color: None,
            id: Some(control.id),
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
