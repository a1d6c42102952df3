//! Control records and their typed value payloads.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ids::ControlId;

/// The closed set of control variants a panel can carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ControlKind {
    /// Passive text display.
    Label,
    /// Momentary push button.
    Button,
    /// Integer-valued slider.
    Slider,
    /// Two-state toggle.
    Switch,
    /// Directional pad with four zones (forward, left, right, back).
    Pad,
    /// Directional pad with a fifth center zone.
    PadCenter,
}

impl ControlKind {
    /// Whether `value` has the runtime representation this kind expects.
    ///
    /// Labels, buttons, and pads carry text; sliders carry an integer;
    /// switches carry a boolean.
    #[must_use]
    pub fn accepts(self, value: &ControlValue) -> bool {
        match self {
            Self::Label | Self::Button | Self::Pad | Self::PadCenter => {
                matches!(value, ControlValue::Text(_))
            }
            Self::Slider => matches!(value, ControlValue::Int(_)),
            Self::Switch => matches!(value, ControlValue::Bool(_)),
        }
    }

    /// Whether this kind supports post-creation value updates.
    ///
    /// Buttons and pads are momentary: they emit events but hold no state
    /// worth synchronizing.
    #[must_use]
    pub fn is_state_bearing(self) -> bool {
        matches!(self, Self::Label | Self::Slider | Self::Switch)
    }
}

impl fmt::Display for ControlKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Label => "label",
            Self::Button => "button",
            Self::Slider => "slider",
            Self::Switch => "switch",
            Self::Pad => "pad",
            Self::PadCenter => "padCenter",
        };
        f.write_str(name)
    }
}

/// Typed value payload of a control.
///
/// Serializes untagged, so a `Text` value becomes a JSON string, an `Int` a
/// JSON number, and a `Bool` a JSON boolean.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ControlValue {
    /// Free text (labels, buttons, pads).
    Text(String),
    /// Integer (sliders).
    Int(i64),
    /// Boolean (switches).
    Bool(bool),
}

impl ControlValue {
    /// The text payload, if this is a `Text` value.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The integer payload, if this is an `Int` value.
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// The boolean payload, if this is a `Bool` value.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Short name of the payload shape, used in error messages.
    #[must_use]
    pub fn shape(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Int(_) => "int",
            Self::Bool(_) => "bool",
        }
    }
}

impl fmt::Display for ControlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Int(v) => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
        }
    }
}

impl From<&str> for ControlValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<String> for ControlValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for ControlValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<bool> for ControlValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

/// One registered panel element.
///
/// Plain data: handlers live in the registry, keyed by the same dense id, so
/// a `Control` can be cloned as a snapshot and handed to callbacks or the
/// wire codec without dragging a callback along.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Control {
    /// Dense registry index, assigned at creation.
    pub id: ControlId,
    /// Control variant. Never changes after creation.
    pub kind: ControlKind,
    /// Human-readable name, unique across the panel.
    pub label: String,
    /// Current value. Always matches what `kind` expects.
    pub value: ControlValue,
    /// Opaque display attribute (a color identifier), carried through
    /// unchanged to clients.
    pub style: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
