//! Semantic event tags and the control handler type.

use std::fmt;
use std::sync::Arc;

use crate::control::Control;

/// Semantic tag of one client interaction, as delivered to handlers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ControlEvent {
    /// Button pressed.
    ButtonDown,
    /// Button released.
    ButtonUp,
    /// Pad forward zone pressed.
    PadForwardDown,
    /// Pad forward zone released.
    PadForwardUp,
    /// Pad left zone pressed.
    PadLeftDown,
    /// Pad left zone released.
    PadLeftUp,
    /// Pad right zone pressed.
    PadRightDown,
    /// Pad right zone released.
    PadRightUp,
    /// Pad back zone pressed.
    PadBackDown,
    /// Pad back zone released.
    PadBackUp,
    /// Pad center zone pressed (centered pads only).
    PadCenterDown,
    /// Pad center zone released (centered pads only).
    PadCenterUp,
    /// Switch turned on.
    SwitchOn,
    /// Switch turned off.
    SwitchOff,
    /// Slider moved to a new value.
    SliderValue,
}

impl ControlEvent {
    /// Whether this event carries a state change the panel must apply and
    /// rebroadcast (switch and slider events).
    #[must_use]
    pub fn is_state_bearing(self) -> bool {
        matches!(self, Self::SwitchOn | Self::SwitchOff | Self::SliderValue)
    }
}

impl fmt::Display for ControlEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ButtonDown => "button.down",
            Self::ButtonUp => "button.up",
            Self::PadForwardDown => "pad.forward.down",
            Self::PadForwardUp => "pad.forward.up",
            Self::PadLeftDown => "pad.left.down",
            Self::PadLeftUp => "pad.left.up",
            Self::PadRightDown => "pad.right.down",
            Self::PadRightUp => "pad.right.up",
            Self::PadBackDown => "pad.back.down",
            Self::PadBackUp => "pad.back.up",
            Self::PadCenterDown => "pad.center.down",
            Self::PadCenterUp => "pad.center.up",
            Self::SwitchOn => "switch.on",
            Self::SwitchOff => "switch.off",
            Self::SliderValue => "slider.value",
        };
        f.write_str(name)
    }
}

/// Callback invoked when a qualifying event arrives for a control.
///
/// Receives an immutable snapshot of the control (state changes are applied
/// before invocation) and the semantic event tag. Handlers run inline on the
/// dispatch task and must not block: nothing else makes progress while one
/// is running.
pub type ControlHandler = Arc<dyn Fn(&Control, ControlEvent) + Send + Sync>;

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
