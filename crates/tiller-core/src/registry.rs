//! The control store: an append-only, densely-indexed registry.
//!
//! Ids are positions in a plain `Vec`, assigned sequentially at creation.
//! There is no removal or reordering operation, so an id stays valid for the
//! life of the process and downstream indexing never needs tombstones or
//! generation counters.

use crate::control::{Control, ControlKind, ControlValue};
use crate::errors::PanelError;
use crate::events::ControlHandler;
use crate::ids::ControlId;

/// In-memory registry owning all control state for one panel.
///
/// Handlers are stored in a parallel slot per control, keyed by the same
/// dense id, keeping [`Control`] itself plain cloneable data.
pub struct ControlPanel {
    title: String,
    controls: Vec<Control>,
    handlers: Vec<Option<ControlHandler>>,
}

impl ControlPanel {
    /// Create an empty panel with the given whole-panel title.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            controls: Vec::new(),
            handlers: Vec::new(),
        }
    }

    /// The whole-panel title, sent to clients in the `Title` message.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Number of registered controls.
    #[must_use]
    pub fn count(&self) -> usize {
        self.controls.len()
    }

    /// Whether the panel has no controls yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.controls.is_empty()
    }

    /// Append a new control and return its id.
    ///
    /// Fails with `DuplicateLabel` if the label is taken, or `KindMismatch`
    /// if `value` does not have the shape `kind` expects. The registry is
    /// unchanged on error.
    pub fn create(
        &mut self,
        kind: ControlKind,
        label: impl Into<String>,
        style: impl Into<String>,
        value: ControlValue,
        handler: Option<ControlHandler>,
    ) -> Result<ControlId, PanelError> {
        let label = label.into();
        if self.find_by_label(&label).is_ok() {
            return Err(PanelError::DuplicateLabel { label });
        }
        let id = ControlId::from_index(self.controls.len());
        if !kind.accepts(&value) {
            return Err(PanelError::KindMismatch {
                id,
                kind,
                applied: value.shape(),
            });
        }
        self.controls.push(Control {
            id,
            kind,
            label,
            value,
            style: style.into(),
        });
        self.handlers.push(handler);
        Ok(id)
    }

    /// Look up a control by id.
    pub fn get(&self, id: ControlId) -> Result<&Control, PanelError> {
        self.controls.get(id.index()).ok_or(PanelError::OutOfRange {
            id,
            count: self.controls.len(),
        })
    }

    /// Find a control's id by its label. Linear scan: control counts are
    /// small and bounded by device memory, so no secondary index is kept.
    pub fn find_by_label(&self, label: &str) -> Result<ControlId, PanelError> {
        self.controls
            .iter()
            .position(|c| c.label == label)
            .map(ControlId::from_index)
            .ok_or_else(|| PanelError::NotFound {
                label: label.to_owned(),
            })
    }

    /// Iterate all controls in ascending id order.
    pub fn controls(&self) -> impl Iterator<Item = &Control> {
        self.controls.iter()
    }

    /// The handler registered for a control, if any.
    #[must_use]
    pub fn handler(&self, id: ControlId) -> Option<ControlHandler> {
        self.handlers.get(id.index()).and_then(Clone::clone)
    }

    /// Apply a new value to a state-bearing control.
    ///
    /// The value shape must match the control's kind (`Label` takes text,
    /// `Switch` a boolean, `Slider` an integer); buttons and pads hold no
    /// synchronized state and reject every update. Returns the updated
    /// control on success.
    pub fn set_value(
        &mut self,
        id: ControlId,
        value: ControlValue,
    ) -> Result<&Control, PanelError> {
        let count = self.controls.len();
        let control = self
            .controls
            .get_mut(id.index())
            .ok_or(PanelError::OutOfRange { id, count })?;
        if !control.kind.is_state_bearing() || !control.kind.accepts(&value) {
            return Err(PanelError::KindMismatch {
                id,
                kind: control.kind,
                applied: value.shape(),
            });
        }
        control.value = value;
        Ok(control)
    }

    // ── Kind-specific creators ──────────────────────────────────────

    /// Register a passive text label. `text` defaults to the label itself.
    pub fn label(
        &mut self,
        label: &str,
        style: &str,
        text: Option<&str>,
    ) -> Result<ControlId, PanelError> {
        let value = ControlValue::from(text.unwrap_or(label));
        self.create(ControlKind::Label, label, style, value, None)
    }

    /// Register a push button. The caption defaults to the label.
    pub fn button(
        &mut self,
        label: &str,
        style: &str,
        caption: Option<&str>,
        handler: ControlHandler,
    ) -> Result<ControlId, PanelError> {
        let value = ControlValue::from(caption.unwrap_or(label));
        self.create(ControlKind::Button, label, style, value, Some(handler))
    }

    /// Register an integer slider with an initial position.
    pub fn slider(
        &mut self,
        label: &str,
        style: &str,
        initial: i64,
        handler: ControlHandler,
    ) -> Result<ControlId, PanelError> {
        self.create(
            ControlKind::Slider,
            label,
            style,
            ControlValue::Int(initial),
            Some(handler),
        )
    }

    /// Register a two-state switch with a start state.
    pub fn switch(
        &mut self,
        label: &str,
        style: &str,
        start_state: bool,
        handler: ControlHandler,
    ) -> Result<ControlId, PanelError> {
        self.create(
            ControlKind::Switch,
            label,
            style,
            ControlValue::Bool(start_state),
            Some(handler),
        )
    }

    /// Register a directional pad; `centered` adds the fifth center zone.
    pub fn pad(
        &mut self,
        label: &str,
        style: &str,
        centered: bool,
        handler: ControlHandler,
    ) -> Result<ControlId, PanelError> {
        let kind = if centered {
            ControlKind::PadCenter
        } else {
            ControlKind::Pad
        };
        self.create(kind, label, style, ControlValue::Text(String::new()), Some(handler))
    }
}

impl std::fmt::Debug for ControlPanel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControlPanel")
            .field("title", &self.title)
            .field("controls", &self.controls)
            .finish_non_exhaustive()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::ControlEvent;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn noop() -> ControlHandler {
        Arc::new(|_, _| {})
    }

    #[test]
    fn create_assigns_dense_ids() {
        let mut panel = ControlPanel::new("Greenhouse");
        let a = panel.label("Temp", "slate", None).unwrap();
        let b = panel.switch("Pump", "emerald", false, noop()).unwrap();
        let c = panel.slider("Fan", "amber", 30, noop()).unwrap();
        assert_eq!(a.index(), 0);
        assert_eq!(b.index(), 1);
        assert_eq!(c.index(), 2);
        assert_eq!(panel.count(), 3);
    }

    #[test]
    fn duplicate_label_rejected_and_count_unchanged() {
        let mut panel = ControlPanel::new("p");
        let _ = panel.button("Go", "slate", None, noop()).unwrap();
        let err = panel.switch("Go", "emerald", true, noop()).unwrap_err();
        assert!(matches!(err, PanelError::DuplicateLabel { .. }));
        assert_eq!(panel.count(), 1);
    }

    #[test]
    fn dense_indexing_bounds() {
        let mut panel = ControlPanel::new("p");
        for i in 0..4 {
            let _ = panel.label(&format!("L{i}"), "slate", None).unwrap();
        }
        for i in 0..4 {
            assert!(panel.get(ControlId::from_index(i)).is_ok());
        }
        let err = panel.get(ControlId::from_index(4)).unwrap_err();
        assert!(matches!(err, PanelError::OutOfRange { count: 4, .. }));
    }

    #[test]
    fn get_on_empty_panel() {
        let panel = ControlPanel::new("p");
        assert!(panel.get(ControlId::from_index(0)).is_err());
        assert!(panel.is_empty());
    }

    #[test]
    fn find_by_label() {
        let mut panel = ControlPanel::new("p");
        let _ = panel.label("A", "slate", None).unwrap();
        let id = panel.switch("B", "emerald", false, noop()).unwrap();
        assert_eq!(panel.find_by_label("B").unwrap(), id);
        let err = panel.find_by_label("C").unwrap_err();
        assert!(matches!(err, PanelError::NotFound { .. }));
    }

    #[test]
    fn label_and_button_default_to_their_label_text() {
        let mut panel = ControlPanel::new("p");
        let a = panel.label("Status", "slate", None).unwrap();
        let b = panel.button("Fire", "red", None, noop()).unwrap();
        assert_eq!(panel.get(a).unwrap().value.as_text(), Some("Status"));
        assert_eq!(panel.get(b).unwrap().value.as_text(), Some("Fire"));
    }

    #[test]
    fn label_takes_explicit_text() {
        let mut panel = ControlPanel::new("p");
        let id = panel.label("Temp", "slate", Some("21 C")).unwrap();
        assert_eq!(panel.get(id).unwrap().value.as_text(), Some("21 C"));
    }

    #[test]
    fn pad_variants() {
        let mut panel = ControlPanel::new("p");
        let plain = panel.pad("Move", "slate", false, noop()).unwrap();
        let centered = panel.pad("Aim", "slate", true, noop()).unwrap();
        assert_eq!(panel.get(plain).unwrap().kind, ControlKind::Pad);
        assert_eq!(panel.get(centered).unwrap().kind, ControlKind::PadCenter);
    }

    #[test]
    fn create_rejects_mismatched_initial_value() {
        let mut panel = ControlPanel::new("p");
        let err = panel
            .create(
                ControlKind::Switch,
                "S",
                "slate",
                ControlValue::Int(1),
                None,
            )
            .unwrap_err();
        assert!(matches!(err, PanelError::KindMismatch { .. }));
        assert_eq!(panel.count(), 0);
    }

    #[test]
    fn set_value_applies_to_state_bearing_kinds() {
        let mut panel = ControlPanel::new("p");
        let sw = panel.switch("S", "slate", false, noop()).unwrap();
        let sl = panel.slider("V", "slate", 0, noop()).unwrap();
        let lb = panel.label("L", "slate", None).unwrap();

        let _ = panel.set_value(sw, ControlValue::Bool(true)).unwrap();
        let _ = panel.set_value(sl, ControlValue::Int(55)).unwrap();
        let _ = panel.set_value(lb, ControlValue::from("ready")).unwrap();

        assert_eq!(panel.get(sw).unwrap().value.as_bool(), Some(true));
        assert_eq!(panel.get(sl).unwrap().value.as_int(), Some(55));
        assert_eq!(panel.get(lb).unwrap().value.as_text(), Some("ready"));
    }

    #[test]
    fn set_value_rejects_wrong_shape() {
        let mut panel = ControlPanel::new("p");
        let sw = panel.switch("S", "slate", false, noop()).unwrap();
        let err = panel.set_value(sw, ControlValue::Int(1)).unwrap_err();
        assert!(matches!(err, PanelError::KindMismatch { .. }));
        assert_eq!(panel.get(sw).unwrap().value.as_bool(), Some(false));
    }

    #[test]
    fn set_value_rejects_momentary_kinds() {
        let mut panel = ControlPanel::new("p");
        let btn = panel.button("B", "slate", None, noop()).unwrap();
        let err = panel.set_value(btn, ControlValue::from("x")).unwrap_err();
        assert!(matches!(err, PanelError::KindMismatch { .. }));
    }

    #[test]
    fn set_value_out_of_range() {
        let mut panel = ControlPanel::new("p");
        let err = panel
            .set_value(ControlId::from_index(3), ControlValue::Bool(true))
            .unwrap_err();
        assert!(matches!(err, PanelError::OutOfRange { .. }));
    }

    #[test]
    fn handler_slot_follows_control() {
        let hits = Arc::new(AtomicUsize::new(0));
        let sink = hits.clone();
        let mut panel = ControlPanel::new("p");
        let lb = panel.label("L", "slate", None).unwrap();
        let btn = panel
            .button(
                "B",
                "slate",
                None,
                Arc::new(move |_, _| {
                    let _ = sink.fetch_add(1, Ordering::SeqCst);
                }),
            )
            .unwrap();

        assert!(panel.handler(lb).is_none());
        let handler = panel.handler(btn).expect("button has a handler");
        let snapshot = panel.get(btn).unwrap().clone();
        handler(&snapshot, ControlEvent::ButtonDown);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn controls_iterate_in_id_order() {
        let mut panel = ControlPanel::new("p");
        let _ = panel.label("A", "slate", None).unwrap();
        let _ = panel.label("B", "slate", None).unwrap();
        let _ = panel.label("C", "slate", None).unwrap();
        let labels: Vec<&str> = panel.controls().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, ["A", "B", "C"]);
    }

    #[test]
    fn title_is_kept() {
        let panel = ControlPanel::new("Boiler Room");
        assert_eq!(panel.title(), "Boiler Room");
    }
}
