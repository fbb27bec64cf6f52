// SPDX-License-Identifier: MIT OR Apache-2.0
//! Line geometry for connection arrows.
//!
//! A connection is drawn as a straight segment between two node centres:
//! 1. both anchors are shifted sideways by the edge offset, so a pair of
//!    reciprocal edges ends up on opposite sides of the centre line
//! 2. the segment is clipped against each obstructing rectangle in turn
//! 3. a fully clipped or zero-length segment becomes a short stub at the midpoint
//! 4. the result is extended by a small margin at both ends
//! 5. the widget transform (position, length, rotation) is derived from it

use egui::{Pos2, Rect, Vec2};

/// Lengths at or below this are treated as zero
const EPSILON: f32 = 1e-4;

/// Default extension applied at both ends of a drawn line
pub const DEFAULT_LINE_MARGIN: f32 = 2.0;

/// Default length of the fallback stub
pub const DEFAULT_MIN_STUB_LENGTH: f32 = 4.0;

/// Tunables for line geometry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometryParams {
    /// Extension at both ends of the final segment
    pub margin: f32,
    /// Length of the stub drawn when clipping leaves nothing
    pub min_stub_length: f32,
}

impl Default for GeometryParams {
    fn default() -> Self {
        Self {
            margin: DEFAULT_LINE_MARGIN,
            min_stub_length: DEFAULT_MIN_STUB_LENGTH,
        }
    }
}

/// A straight line segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    /// Start point
    pub start: Pos2,
    /// End point
    pub end: Pos2,
}

impl Segment {
    /// Create a segment
    pub fn new(start: Pos2, end: Pos2) -> Self {
        Self { start, end }
    }

    /// Vector from start to end
    pub fn vector(&self) -> Vec2 {
        self.end - self.start
    }

    /// Euclidean length
    pub fn length(&self) -> f32 {
        self.vector().length()
    }

    /// Unit direction, or `None` for a zero-length segment
    pub fn direction(&self) -> Option<Vec2> {
        let vector = self.vector();
        let length = vector.length();
        (length > EPSILON && length.is_finite()).then(|| vector / length)
    }

    /// Point at parameter `t` (0 = start, 1 = end)
    pub fn point_at(&self, t: f32) -> Pos2 {
        self.start + self.vector() * t
    }

    /// Midpoint
    pub fn midpoint(&self) -> Pos2 {
        self.point_at(0.5)
    }

    /// Translate both ends
    pub fn translated(&self, delta: Vec2) -> Self {
        Self::new(self.start + delta, self.end + delta)
    }

    /// Lengthen by `margin` at both ends along the segment's own direction
    pub fn extended(&self, margin: f32) -> Self {
        match self.direction() {
            Some(dir) => Self::new(self.start - dir * margin, self.end + dir * margin),
            None => *self,
        }
    }
}

/// Perpendicular of a vector, rotated a quarter turn
fn perpendicular(v: Vec2) -> Vec2 {
    Vec2::new(-v.y, v.x)
}

/// Remove the part of `segment` lying inside `rect`.
///
/// Returns the remaining pieces ordered from the segment start: the segment
/// itself when it misses the rectangle, nothing when it lies fully inside,
/// otherwise one or two outside pieces.
pub fn clip_outside(segment: Segment, rect: Rect) -> Vec<Segment> {
    let length = segment.length();
    if length <= EPSILON {
        return if rect.contains(segment.start) {
            Vec::new()
        } else {
            vec![segment]
        };
    }

    // Liang-Barsky: find the parameter interval [t_enter, t_exit] inside the rectangle
    let d = segment.vector();
    let p = [-d.x, d.x, -d.y, d.y];
    let q = [
        segment.start.x - rect.min.x,
        rect.max.x - segment.start.x,
        segment.start.y - rect.min.y,
        rect.max.y - segment.start.y,
    ];

    let mut t_enter = 0.0_f32;
    let mut t_exit = 1.0_f32;
    for (p, q) in p.into_iter().zip(q) {
        if p == 0.0 {
            if q < 0.0 {
                return vec![segment];
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            t_enter = t_enter.max(r);
        } else {
            t_exit = t_exit.min(r);
        }
    }

    // Missing the rectangle, or only grazing a corner
    if t_enter > t_exit || (t_exit - t_enter) * length <= EPSILON {
        return vec![segment];
    }

    let mut pieces = Vec::with_capacity(2);
    let head = Segment::new(segment.start, segment.point_at(t_enter));
    if head.length() > EPSILON {
        pieces.push(head);
    }
    let tail = Segment::new(segment.point_at(t_exit), segment.end);
    if tail.length() > EPSILON {
        pieces.push(tail);
    }
    pieces
}

/// Final placement of a line widget
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineTransform {
    /// Canvas position of the line start
    pub position: Pos2,
    /// Length of the line
    pub length: f32,
    /// Rotation in radians, measured from the +x axis
    pub rotation: f32,
    /// Rotation pivot; always the line start, so the widget turns like a directed arrow
    pub pivot: Pos2,
    /// Whether this is the fallback stub for a fully clipped segment
    pub stub: bool,
}

impl LineTransform {
    fn from_segment(segment: Segment, stub: bool) -> Self {
        let rotation = segment.direction().map_or(0.0, Vec2::angle);
        Self {
            position: segment.start,
            length: segment.length(),
            rotation,
            pivot: segment.start,
            stub,
        }
    }

    /// Start point
    pub fn start(&self) -> Pos2 {
        self.position
    }

    /// End point, the arrow tip
    pub fn end(&self) -> Pos2 {
        self.position + Vec2::angled(self.rotation) * self.length
    }

    /// Unit direction
    pub fn direction(&self) -> Vec2 {
        Vec2::angled(self.rotation)
    }

    /// The drawn segment
    pub fn segment(&self) -> Segment {
        Segment::new(self.start(), self.end())
    }
}

/// Compute the drawn line between two anchors.
///
/// `offset` is the perpendicular displacement of this edge. Reciprocal
/// edges point in opposite directions, so equal offsets land them on
/// opposite sides of the centre line. `obstacles` are usually the two
/// endpoint node rectangles.
pub fn line_between(
    from: Pos2,
    to: Pos2,
    offset: f32,
    obstacles: &[Rect],
    params: &GeometryParams,
) -> LineTransform {
    let original = Segment::new(from, to);
    let shifted = match original.direction() {
        Some(dir) if offset != 0.0 => original.translated(perpendicular(dir) * offset),
        _ => original,
    };

    let mut current = Some(shifted);
    for rect in obstacles {
        let Some(segment) = current else {
            break;
        };
        current = clip_outside(segment, *rect).into_iter().next();
    }

    match current.filter(|segment| segment.direction().is_some()) {
        Some(segment) => LineTransform::from_segment(segment.extended(params.margin), false),
        None => {
            tracing::trace!(?from, ?to, "connection line fully clipped, drawing stub");
            LineTransform::from_segment(stub(shifted, params).extended(params.margin), true)
        }
    }
}

/// Short segment centred on the midpoint, along the original direction
fn stub(segment: Segment, params: &GeometryParams) -> Segment {
    let dir = segment.direction().unwrap_or(Vec2::X);
    let half = dir * (params.min_stub_length.max(EPSILON * 10.0) * 0.5);
    let mid = segment.midpoint();
    Segment::new(mid - half, mid + half)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x: f32, y: f32, w: f32, h: f32) -> Rect {
        Rect::from_min_size(Pos2::new(x, y), Vec2::new(w, h))
    }

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn test_clip_miss_returns_segment() {
        let segment = Segment::new(Pos2::new(0.0, 0.0), Pos2::new(10.0, 0.0));
        let pieces = clip_outside(segment, rect(0.0, 5.0, 10.0, 10.0));
        assert_eq!(pieces, vec![segment]);
    }

    #[test]
    fn test_clip_start_inside() {
        let segment = Segment::new(Pos2::new(50.0, 20.0), Pos2::new(350.0, 20.0));
        let pieces = clip_outside(segment, rect(0.0, 0.0, 100.0, 40.0));
        assert_eq!(pieces.len(), 1);
        assert!(approx(pieces[0].start.x, 100.0));
        assert!(approx(pieces[0].end.x, 350.0));
    }

    #[test]
    fn test_clip_through_splits() {
        let segment = Segment::new(Pos2::new(-10.0, 5.0), Pos2::new(30.0, 5.0));
        let pieces = clip_outside(segment, rect(0.0, 0.0, 10.0, 10.0));
        assert_eq!(pieces.len(), 2);
        assert!(approx(pieces[0].end.x, 0.0));
        assert!(approx(pieces[1].start.x, 10.0));
    }

    #[test]
    fn test_clip_fully_inside_is_empty() {
        let segment = Segment::new(Pos2::new(2.0, 2.0), Pos2::new(8.0, 8.0));
        assert!(clip_outside(segment, rect(0.0, 0.0, 10.0, 10.0)).is_empty());
    }

    #[test]
    fn test_no_obstacles_extends_by_margin() {
        let params = GeometryParams::default();
        let line = line_between(Pos2::new(0.0, 0.0), Pos2::new(100.0, 0.0), 0.0, &[], &params);
        assert!(!line.stub);
        assert!(approx(line.start().x, -DEFAULT_LINE_MARGIN));
        assert!(approx(line.end().x, 100.0 + DEFAULT_LINE_MARGIN));
        assert!(approx(line.length, 100.0 + 2.0 * DEFAULT_LINE_MARGIN));
        assert!(approx(line.rotation, 0.0));
        assert_eq!(line.pivot, line.position);
    }

    #[test]
    fn test_clipped_between_nodes() {
        let params = GeometryParams::default();
        let a = rect(0.0, 0.0, 100.0, 40.0);
        let b = rect(300.0, 0.0, 100.0, 40.0);
        let line = line_between(a.center(), b.center(), 0.0, &[a, b], &params);
        assert!(!line.stub);
        assert!(approx(line.start().x, 98.0));
        assert!(approx(line.end().x, 302.0));
        assert!(approx(line.start().y, 20.0));
    }

    #[test]
    fn test_offset_shifts_reciprocal_lines_apart() {
        let params = GeometryParams::default();
        let a = rect(0.0, 0.0, 100.0, 40.0);
        let b = rect(300.0, 0.0, 100.0, 40.0);
        let forward = line_between(a.center(), b.center(), 10.0, &[a, b], &params);
        let backward = line_between(b.center(), a.center(), 10.0, &[b, a], &params);

        assert!(approx((forward.start().y - backward.start().y).abs(), 20.0));
        assert!(approx((forward.start().y - 20.0).abs(), 10.0));
        assert!(approx((backward.start().y - 20.0).abs(), 10.0));
        assert!(approx(forward.start().y, forward.end().y));
        assert!(approx(backward.rotation.abs(), std::f32::consts::PI));
    }

    #[test]
    fn test_offset_displaces_by_full_amount() {
        let params = GeometryParams {
            margin: 0.0,
            ..GeometryParams::default()
        };
        let line = line_between(Pos2::new(0.0, 0.0), Pos2::new(100.0, 0.0), 10.0, &[], &params);
        assert!(approx(line.start().y.abs(), 10.0));
        assert!(approx(line.end().y, line.start().y));
        assert!(approx(line.length, 100.0));
    }

    #[test]
    fn test_fully_contained_yields_stub() {
        let params = GeometryParams::default();
        let node = rect(0.0, 0.0, 100.0, 100.0);
        let line = line_between(Pos2::new(40.0, 50.0), Pos2::new(60.0, 50.0), 0.0, &[node], &params);
        assert!(line.stub);
        assert!(line.length >= params.min_stub_length);
        assert!(approx(line.segment().midpoint().x, 50.0));
        assert!(approx(line.rotation, 0.0));
    }

    #[test]
    fn test_coincident_anchors_yield_stub() {
        let params = GeometryParams::default();
        let node = rect(0.0, 0.0, 20.0, 20.0);
        let center = node.center();

        for obstacles in [&[][..], &[node][..], &[node, node][..]] {
            let line = line_between(center, center, 10.0, obstacles, &params);
            assert!(line.stub);
            assert!(line.length.is_finite());
            assert!(line.length >= params.min_stub_length);
            assert!(line.rotation.is_finite());
            assert!(approx(line.segment().midpoint().x, center.x));
        }
    }

    #[test]
    fn test_overlapping_nodes_fall_back_to_stub() {
        let params = GeometryParams::default();
        let a = rect(0.0, 0.0, 100.0, 100.0);
        let b = rect(10.0, 10.0, 100.0, 100.0);
        let line = line_between(a.center(), b.center(), 0.0, &[a, b], &params);
        assert!(line.stub);
        assert!(line.direction().x > 0.0 && line.direction().y > 0.0);
    }
}
