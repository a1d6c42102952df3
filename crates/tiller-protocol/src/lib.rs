//! # tiller-protocol
//!
//! The wire codec between a panel server and its remote clients.
//!
//! Outbound traffic is JSON: [`WireMessage`] covers the `Title` message, the
//! full `Define` description of one control, and the delta `UpdateValue`
//! carrying only an id and a new value. Encoding is deterministic and
//! minimal: fields irrelevant to a message kind are omitted entirely.
//!
//! Inbound traffic is colon-delimited text of the shape
//! `<event-name>:<optional-payload>:<id>`, parsed by [`parse_event`] against
//! a declarative vocabulary table. The trailing field is always the control
//! id; payloads may themselves contain delimiters.

#![deny(unsafe_code)]

pub mod message;
pub mod parse;

pub use message::{MessageType, WireMessage};
pub use parse::{ClientMessage, parse_event};
