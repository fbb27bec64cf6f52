// SPDX-License-Identifier: MIT OR Apache-2.0
//! egui rendering of the flowchart.
//!
//! Lines are painted before nodes so arrows never cover node bodies.

use crate::config::FlowchartConfig;
use crate::geometry::LineTransform;
use crate::node::NodeName;
use crate::render::{LineId, LineWidget};
use egui::{Align2, Color32, FontId, Pos2, Rect, Shape, Stroke, Vec2};
use std::collections::HashSet;

/// Node visual parameters
const NODE_ROUNDING: f32 = 6.0;
const NODE_FONT_SIZE: f32 = 14.0;

/// Connection visual parameters
const CONNECTION_THICKNESS: f32 = 2.0;

/// Pan and zoom of the canvas
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasView {
    /// Current pan offset (canvas space)
    pub pan: Vec2,
    /// Current zoom level
    pub zoom: f32,
}

impl Default for CanvasView {
    fn default() -> Self {
        Self {
            pan: Vec2::ZERO,
            zoom: 1.0,
        }
    }
}

impl CanvasView {
    /// Convert a canvas position to screen space, relative to the viewport
    pub fn to_screen(&self, pos: Pos2, viewport: Rect) -> Pos2 {
        let center = viewport.center();
        Pos2::new(
            (pos.x + self.pan.x) * self.zoom + center.x,
            (pos.y + self.pan.y) * self.zoom + center.y,
        )
    }

    /// Convert a screen position back to canvas space
    pub fn to_canvas(&self, pos: Pos2, viewport: Rect) -> Pos2 {
        let center = viewport.center();
        Pos2::new(
            (pos.x - center.x) / self.zoom - self.pan.x,
            (pos.y - center.y) / self.zoom - self.pan.y,
        )
    }
}

/// Colors and sizes used to paint the flowchart
#[derive(Debug, Clone)]
pub struct FlowchartPainter {
    /// Regular arrow color
    pub line_color: Color32,
    /// Arrow color for highlighted transitions
    pub highlight_color: Color32,
    /// Arrow head size (canvas units)
    pub arrow_size: f32,
    /// Node body color
    pub node_fill: Color32,
    /// Node outline color
    pub node_outline: Color32,
    /// Outline color of the active state
    pub active_outline: Color32,
    /// Node label color
    pub text_color: Color32,
}

impl FlowchartPainter {
    /// Painter using the arrow size from settings
    pub fn new(config: &FlowchartConfig) -> Self {
        Self {
            line_color: Color32::from_gray(180),
            highlight_color: Color32::from_rgb(255, 200, 60),
            arrow_size: config.arrow_size,
            node_fill: Color32::from_gray(45),
            node_outline: Color32::from_gray(90),
            active_outline: Color32::from_rgb(120, 220, 120),
            text_color: Color32::from_gray(230),
        }
    }

    /// Triangle at the line tip, pointing along the line
    pub fn arrow_head(&self, transform: &LineTransform) -> [Pos2; 3] {
        let tip = transform.end();
        let dir = transform.direction();
        let side = Vec2::new(-dir.y, dir.x) * (self.arrow_size * 0.5);
        let base = tip - dir * self.arrow_size;
        [tip, base + side, base - side]
    }

    /// Arrow color
    pub fn arrow_color(&self, highlighted: bool) -> Color32 {
        if highlighted {
            self.highlight_color
        } else {
            self.line_color
        }
    }

    /// Shapes for one arrow, in canvas space
    pub fn line_shapes(&self, transform: &LineTransform, highlighted: bool) -> Vec<Shape> {
        let color = self.arrow_color(highlighted);
        vec![
            Shape::line_segment(
                [transform.start(), transform.end()],
                Stroke::new(CONNECTION_THICKNESS, color),
            ),
            Shape::convex_polygon(self.arrow_head(transform).to_vec(), color, Stroke::NONE),
        ]
    }

    /// Paint lines, then nodes, into an egui painter.
    ///
    /// `highlighted` lines use the highlight color; the `active` node gets
    /// the active outline.
    pub fn paint<'a>(
        &self,
        painter: &egui::Painter,
        view: &CanvasView,
        lines: impl Iterator<Item = &'a LineWidget>,
        nodes: impl Iterator<Item = (&'a NodeName, Rect)>,
        highlighted: &HashSet<LineId>,
        active: Option<&str>,
    ) {
        let viewport = painter.clip_rect();
        let transform_shape = |shape: &mut Shape| {
            shape.transform(egui::emath::TSTransform::new(
                viewport.center().to_vec2() + view.pan * view.zoom,
                view.zoom,
            ));
        };

        for line in lines {
            let Some(transform) = line.transform() else {
                continue;
            };
            let mut shapes = self.line_shapes(transform, highlighted.contains(&line.id()));
            shapes.iter_mut().for_each(transform_shape);
            painter.extend(shapes);
        }

        for (name, rect) in nodes {
            let screen_rect = Rect::from_min_max(
                view.to_screen(rect.min, viewport),
                view.to_screen(rect.max, viewport),
            );
            let outline = if active == Some(name.as_str()) {
                self.active_outline
            } else {
                self.node_outline
            };
            painter.rect_filled(screen_rect, NODE_ROUNDING * view.zoom, self.node_fill);
            painter.rect_stroke(screen_rect, NODE_ROUNDING * view.zoom, Stroke::new(1.5, outline));
            painter.text(
                screen_rect.center(),
                Align2::CENTER_CENTER,
                name.as_str(),
                FontId::proportional(NODE_FONT_SIZE * view.zoom),
                self.text_color,
            );
        }
    }
}

impl Default for FlowchartPainter {
    fn default() -> Self {
        Self::new(&FlowchartConfig::default())
    }
}
