//! Inbound event parsing.
//!
//! Client messages are plain delimited text: `<event-name>:<payload>:<id>`.
//! The vocabulary is a declarative table mapping each event-name literal to
//! its semantic tag and payload shape, so new event kinds are one table row
//! rather than another branch.

use tiller_core::errors::PanelError;
use tiller_core::events::ControlEvent;
use tiller_core::ids::ControlId;

/// Payload carried between the event name and the trailing id.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PayloadShape {
    /// No payload: `<event-name>:<id>`.
    None,
    /// One integer: `<event-name>:<int>:<id>`.
    Int,
}

struct EventEntry {
    name: &'static str,
    event: ControlEvent,
    payload: PayloadShape,
}

/// The fixed inbound vocabulary.
const EVENT_VOCABULARY: &[EventEntry] = &[
    EventEntry { name: "bdown", event: ControlEvent::ButtonDown, payload: PayloadShape::None },
    EventEntry { name: "bup", event: ControlEvent::ButtonUp, payload: PayloadShape::None },
    EventEntry { name: "pfdown", event: ControlEvent::PadForwardDown, payload: PayloadShape::None },
    EventEntry { name: "pfup", event: ControlEvent::PadForwardUp, payload: PayloadShape::None },
    EventEntry { name: "pldown", event: ControlEvent::PadLeftDown, payload: PayloadShape::None },
    EventEntry { name: "plup", event: ControlEvent::PadLeftUp, payload: PayloadShape::None },
    EventEntry { name: "prdown", event: ControlEvent::PadRightDown, payload: PayloadShape::None },
    EventEntry { name: "prup", event: ControlEvent::PadRightUp, payload: PayloadShape::None },
    EventEntry { name: "pbdown", event: ControlEvent::PadBackDown, payload: PayloadShape::None },
    EventEntry { name: "pbup", event: ControlEvent::PadBackUp, payload: PayloadShape::None },
    EventEntry { name: "pcdown", event: ControlEvent::PadCenterDown, payload: PayloadShape::None },
    EventEntry { name: "pcup", event: ControlEvent::PadCenterUp, payload: PayloadShape::None },
    EventEntry { name: "sactive", event: ControlEvent::SwitchOn, payload: PayloadShape::None },
    EventEntry { name: "sinactive", event: ControlEvent::SwitchOff, payload: PayloadShape::None },
    EventEntry { name: "slvalue", event: ControlEvent::SliderValue, payload: PayloadShape::Int },
];

/// One decoded inbound message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClientMessage {
    /// Semantic event tag.
    pub event: ControlEvent,
    /// Integer payload, present when the event carries one (slider value).
    pub value: Option<i64>,
    /// Addressed control, already range-checked against the registry size.
    pub id: ControlId,
}

/// Parse one inbound text message against the fixed vocabulary.
///
/// The event name is longest-prefix matched; the id is taken from after the
/// **last** delimiter, because payloads themselves may contain delimiters.
/// A trailing id that is not an integer, or not within `[0, control_count)`,
/// is `MalformedMessage`; an unrecognized prefix is `UnknownEvent`.
pub fn parse_event(raw: &str, control_count: usize) -> Result<ClientMessage, PanelError> {
    let Some(last_colon) = raw.rfind(':') else {
        return Err(PanelError::MalformedMessage {
            reason: format!("missing delimiter in '{raw}'"),
        });
    };

    let entry = EVENT_VOCABULARY
        .iter()
        .filter(|s| raw.len() > s.name.len() && raw.as_bytes()[s.name.len()] == b':')
        .filter(|s| raw.starts_with(s.name))
        .max_by_key(|s| s.name.len())
        .ok_or_else(|| PanelError::UnknownEvent { raw: raw.to_owned() })?;

    let id_text = &raw[last_colon + 1..];
    let index: usize = id_text.parse().map_err(|_| PanelError::MalformedMessage {
        reason: format!("trailing id '{id_text}' is not an integer"),
    })?;
    if index >= control_count {
        return Err(PanelError::MalformedMessage {
            reason: format!("control id {index} out of range (registry holds {control_count})"),
        });
    }

    let value = match entry.payload {
        PayloadShape::None => None,
        PayloadShape::Int => {
            let start = entry.name.len() + 1;
            if last_colon < start {
                return Err(PanelError::MalformedMessage {
                    reason: format!("missing payload in '{raw}'"),
                });
            }
            let payload = &raw[start..last_colon];
            let parsed: i64 = payload.parse().map_err(|_| PanelError::MalformedMessage {
                reason: format!("payload '{payload}' is not an integer"),
            })?;
            Some(parsed)
        }
    };

    Ok(ClientMessage {
        event: entry.event,
        value,
        id: ControlId::from_index(index),
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
