//! Mapping from layout space to terminal cells.

use super::Point;

/// Layout units covered by one terminal column at zoom 1.
const UNITS_PER_COLUMN: f64 = 20.0;
/// Layout units covered by one terminal row at zoom 1 (cells are ~2:1).
const UNITS_PER_ROW: f64 = 40.0;

const MIN_ZOOM: f64 = 0.05;
const MAX_ZOOM: f64 = 16.0;

/// Camera over the layout: a center point and a zoom factor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Layout point drawn at the middle of the canvas.
    pub center: Point,
    /// Magnification; larger shows less of the layout.
    pub zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            center: Point::default(),
            zoom: 1.0,
        }
    }
}

impl Viewport {
    /// Moves the center to `point`.
    pub const fn center_at(&mut self, point: Point) {
        self.center = point;
    }

    /// Sets the zoom, clamped to a sane range.
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    /// Centers on a bounding box and zooms so it fits a `width` x `height` canvas.
    #[allow(clippy::cast_precision_loss)]
    pub fn fit(&mut self, (lo, hi): (Point, Point), width: usize, height: usize) {
        self.center = Point::new((lo.x + hi.x) / 2.0, (lo.y + hi.y) / 2.0);
        let span_x = (hi.x - lo.x).max(1.0);
        let span_y = (hi.y - lo.y).max(1.0);
        // One cell of margin on each side.
        let cols = width.saturating_sub(2).max(1) as f64;
        let rows = height.saturating_sub(2).max(1) as f64;
        let zoom = (cols * UNITS_PER_COLUMN / span_x).min(rows * UNITS_PER_ROW / span_y);
        self.set_zoom(zoom);
    }

    /// Projects a layout point to fractional canvas coordinates `(col, row)`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn to_canvas(&self, point: Point, width: usize, height: usize) -> (f64, f64) {
        let col = (point.x - self.center.x) * self.zoom / UNITS_PER_COLUMN + width as f64 / 2.0;
        let row = (point.y - self.center.y) * self.zoom / UNITS_PER_ROW + height as f64 / 2.0;
        (col, row)
    }

    /// Projects a layout point to a cell, or `None` if it falls off the canvas.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn project(&self, point: Point, width: usize, height: usize) -> Option<(usize, usize)> {
        let (col, row) = self.to_canvas(point, width, height);
        let (col, row) = (col.floor(), row.floor());
        if col < 0.0 || row < 0.0 || col >= width as f64 || row >= height as f64 {
            return None;
        }
        Some((col as usize, row as usize))
    }
}
