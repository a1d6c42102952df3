//! # tiller-core
//!
//! Foundation types for the Tiller control panel:
//!
//! - **Controls**: [`Control`] records with a closed [`ControlKind`] set and a
//!   typed [`ControlValue`] payload
//! - **Branded IDs**: [`ControlId`] (dense registry index) and [`ClientId`]
//!   (connected viewer) as newtypes for type safety
//! - **Registry**: [`ControlPanel`], the append-only in-memory store that owns
//!   all control state and the registered handlers
//! - **Events**: [`ControlEvent`] semantic tags delivered to handlers
//! - **Errors**: [`PanelError`] hierarchy via `thiserror` with wire-format codes

#![deny(unsafe_code)]

pub mod control;
pub mod errors;
pub mod events;
pub mod ids;
pub mod registry;

pub use control::{Control, ControlKind, ControlValue};
pub use errors::PanelError;
pub use events::{ControlEvent, ControlHandler};
pub use ids::{ClientId, ControlId};
pub use registry::ControlPanel;
