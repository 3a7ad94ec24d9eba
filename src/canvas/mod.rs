//! Client-side point stream reconciliation
//!
//! A subscriber keeps one [`PointStream`] per active blueprint: the ordered
//! sequence of accepted points plus a cursor marking how much of it has
//! already been rendered. Incoming batches are deduplicated against the
//! current last point only (the boundary), never by scanning the whole
//! sequence, so legitimate revisits of an earlier coordinate still draw.
//!
//! Rendering goes through the [`Surface`] trait so the stream logic can be
//! exercised without a real drawing backend.

use crate::types::Point;

/// Drawing surface the reconciler renders onto
pub trait Surface {
    /// Begin a fresh path at a point. A lone first point produces no
    /// visible stroke; the stroke appears from the second point on.
    fn begin_path(&mut self, at: Point);

    /// Draw a segment from the previous point to this one
    fn line_to(&mut self, to: Point);

    /// Wipe the surface
    fn clear(&mut self);
}

/// Ordered accepted-point sequence with an incremental render cursor
#[derive(Debug, Default)]
pub struct PointStream {
    points: Vec<Point>,
    rendered: usize,
}

impl PointStream {
    pub fn new() -> Self {
        Self::default()
    }

    /// Points accepted so far
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// How many points have been rendered
    pub fn rendered(&self) -> usize {
        self.rendered
    }

    /// Append a batch of incoming points.
    ///
    /// Each incoming point is compared to the last point actually kept and
    /// skipped when structurally equal, so the stored sequence never holds
    /// two equal consecutive points even when the batch itself does. Still
    /// boundary-only: no full-sequence scan, revisits of earlier
    /// coordinates are kept. Returns the number of points actually
    /// appended (0 means the batch was a pure duplicate).
    pub fn append_incoming(&mut self, incoming: Vec<Point>) -> usize {
        let before = self.points.len();
        for point in incoming {
            if self.points.last() == Some(&point) {
                continue;
            }
            self.points.push(point);
        }
        self.points.len() - before
    }

    /// Render every point past the cursor onto the surface, then advance
    /// the cursor. Calling this twice with no new points in between draws
    /// nothing the second time.
    pub fn render(&mut self, surface: &mut impl Surface) {
        for i in self.rendered..self.points.len() {
            let p = self.points[i];
            if i == 0 {
                surface.begin_path(p);
            } else {
                surface.line_to(p);
            }
        }
        self.rendered = self.points.len();
    }

    /// Switch away from the current blueprint: sequence, cursor and surface
    /// are reset together so a stale render never bleeds into the next one.
    pub fn reset(&mut self, surface: &mut impl Surface) {
        self.points.clear();
        self.rendered = 0;
        surface.clear();
    }
}

/// Recording surface for tests and headless use
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RecordingSurface {
    pub ops: Vec<DrawOp>,
}

/// One recorded drawing operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawOp {
    BeginPath(Point),
    LineTo(Point),
    Clear,
}

impl Surface for RecordingSurface {
    fn begin_path(&mut self, at: Point) {
        self.ops.push(DrawOp::BeginPath(at));
    }

    fn line_to(&mut self, to: Point) {
        self.ops.push(DrawOp::LineTo(to));
    }

    fn clear(&mut self) {
        self.ops.push(DrawOp::Clear);
    }
}
