// SPDX-License-Identifier: MIT OR Apache-2.0
//! Line widgets and the render container they live in.

use crate::geometry::LineTransform;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a line widget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LineId(pub Uuid);

impl LineId {
    /// Create a new random line ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for LineId {
    fn default() -> Self {
        Self::new()
    }
}

/// Lifecycle of a line widget.
///
/// `Unattached -> Attached` on connect, `Attached -> Removed` on disconnect
/// or clear. There are no other transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineState {
    /// Created, not yet in a container
    #[default]
    Unattached,
    /// Owned by a container and drawable
    Attached,
    /// Taken out of its container
    Removed,
}

/// Visual arrow for one connection
#[derive(Debug, Clone, PartialEq)]
pub struct LineWidget {
    id: LineId,
    state: LineState,
    transform: Option<LineTransform>,
}

impl LineWidget {
    /// Create an unattached widget
    pub fn new(id: LineId) -> Self {
        Self {
            id,
            state: LineState::Unattached,
            transform: None,
        }
    }

    /// Widget ID
    pub fn id(&self) -> LineId {
        self.id
    }

    /// Lifecycle state
    pub fn state(&self) -> LineState {
        self.state
    }

    /// Last applied geometry
    pub fn transform(&self) -> Option<&LineTransform> {
        self.transform.as_ref()
    }

    /// Apply new geometry. Only valid while attached.
    pub fn apply(&mut self, transform: LineTransform) -> Result<(), RenderError> {
        if self.state != LineState::Attached {
            return Err(RenderError::NotAttached(self.id));
        }
        self.transform = Some(transform);
        Ok(())
    }

    /// Move to `Attached`. Containers call this when taking ownership.
    pub fn mark_attached(&mut self) -> Result<(), RenderError> {
        if self.state != LineState::Unattached {
            return Err(RenderError::AlreadyAttached(self.id));
        }
        self.state = LineState::Attached;
        Ok(())
    }

    /// Move to `Removed`. Containers call this when giving up ownership.
    pub fn mark_removed(&mut self) {
        self.state = LineState::Removed;
    }
}

/// Host container that owns line widgets while their connections exist.
///
/// Children are drawn in insertion order; the host keeps this container
/// behind the node container so arrows never cover nodes.
pub trait RenderContainer {
    /// Take ownership of a widget
    fn attach(&mut self, line: LineWidget) -> Result<(), RenderError>;

    /// Give back ownership of a widget
    fn detach(&mut self, id: LineId) -> Option<LineWidget>;

    /// Look up an attached widget
    fn line(&self, id: LineId) -> Option<&LineWidget>;

    /// Look up an attached widget mutably
    fn line_mut(&mut self, id: LineId) -> Option<&mut LineWidget>;

    /// Dispose of a detached widget
    fn release(&mut self, _line: LineWidget) {}

    /// Ask for a repaint on the next frame
    fn request_redraw(&mut self) {}
}

/// Default insertion-ordered line container
#[derive(Debug, Default)]
pub struct LineLayer {
    lines: IndexMap<LineId, LineWidget>,
    redraw_requested: bool,
}

impl LineLayer {
    /// Create an empty layer
    pub fn new() -> Self {
        Self::default()
    }

    /// Widgets in draw order
    pub fn lines(&self) -> impl Iterator<Item = &LineWidget> {
        self.lines.values()
    }

    /// Number of attached widgets
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether no widget is attached
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Whether a widget is attached
    pub fn contains(&self, id: LineId) -> bool {
        self.lines.contains_key(&id)
    }

    /// Consume a pending redraw request
    pub fn take_redraw_request(&mut self) -> bool {
        std::mem::take(&mut self.redraw_requested)
    }
}

impl RenderContainer for LineLayer {
    fn attach(&mut self, mut line: LineWidget) -> Result<(), RenderError> {
        if self.lines.contains_key(&line.id) {
            return Err(RenderError::AlreadyAttached(line.id));
        }
        line.mark_attached()?;
        self.lines.insert(line.id, line);
        self.redraw_requested = true;
        Ok(())
    }

    fn detach(&mut self, id: LineId) -> Option<LineWidget> {
        let mut line = self.lines.shift_remove(&id)?;
        line.mark_removed();
        self.redraw_requested = true;
        Some(line)
    }

    fn line(&self, id: LineId) -> Option<&LineWidget> {
        self.lines.get(&id)
    }

    fn line_mut(&mut self, id: LineId) -> Option<&mut LineWidget> {
        self.lines.get_mut(&id)
    }

    fn request_redraw(&mut self) {
        self.redraw_requested = true;
    }
}

/// Error from a render container
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    /// Widget was already attached once
    #[error("Line already attached: {0:?}")]
    AlreadyAttached(LineId),

    /// Geometry applied to a widget outside a container
    #[error("Line not attached: {0:?}")]
    NotAttached(LineId),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{line_between, GeometryParams};
    use egui::Pos2;

    fn transform() -> LineTransform {
        line_between(
            Pos2::new(0.0, 0.0),
            Pos2::new(10.0, 0.0),
            0.0,
            &[],
            &GeometryParams::default(),
        )
    }

    #[test]
    fn test_line_lifecycle() {
        let mut layer = LineLayer::new();
        let id = LineId::new();
        let mut line = LineWidget::new(id);
        assert_eq!(line.apply(transform()), Err(RenderError::NotAttached(id)));

        layer.attach(line).unwrap();
        assert!(layer.take_redraw_request());
        assert!(!layer.take_redraw_request());
        assert_eq!(layer.line(id).unwrap().state(), LineState::Attached);
        layer.line_mut(id).unwrap().apply(transform()).unwrap();

        line = layer.detach(id).unwrap();
        assert_eq!(line.state(), LineState::Removed);
        assert!(line.transform().is_some());
        assert_eq!(line.apply(transform()), Err(RenderError::NotAttached(id)));
        assert!(layer.detach(id).is_none());
    }

    #[test]
    fn test_removed_line_cannot_reattach() {
        let mut layer = LineLayer::new();
        let id = LineId::new();
        layer.attach(LineWidget::new(id)).unwrap();
        let line = layer.detach(id).unwrap();
        assert_eq!(layer.attach(line), Err(RenderError::AlreadyAttached(id)));
        assert!(layer.is_empty());
    }

    #[test]
    fn test_draw_order_is_insertion_order() {
        let mut layer = LineLayer::new();
        let ids: Vec<_> = (0..3).map(|_| LineId::new()).collect();
        for id in &ids {
            layer.attach(LineWidget::new(*id)).unwrap();
        }
        layer.detach(ids[1]);
        let order: Vec<_> = layer.lines().map(LineWidget::id).collect();
        assert_eq!(order, vec![ids[0], ids[2]]);
    }
}
