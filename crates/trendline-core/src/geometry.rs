// File: crates/trendline-core/src/geometry.rs
// Summary: Pixel-space rectangles for the plotting area and label collision tests.

use skia_safe as skia;

/// Axis-aligned rectangle in pixels, top-left origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LabelRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl LabelRect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Rectangle of `width`×`height` centered on `(cx, cy)`.
    pub fn centered(cx: f32, cy: f32, width: f32, height: f32) -> Self {
        Self { x: cx - width / 2.0, y: cy - height / 2.0, width, height }
    }

    pub fn right(&self) -> f32 { self.x + self.width }
    pub fn bottom(&self) -> f32 { self.y + self.height }

    /// Strict overlap; rectangles that only share an edge do not collide.
    pub fn overlaps(&self, other: &LabelRect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    pub fn to_skia(&self) -> skia::Rect {
        skia::Rect::from_xywh(self.x, self.y, self.width, self.height)
    }
}

/// Plotting area inside the chart insets.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChartArea {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl ChartArea {
    pub const fn from_ltrb(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self { left, top, right, bottom }
    }

    pub fn to_skia(&self) -> skia::Rect {
        skia::Rect::from_ltrb(self.left, self.top, self.right, self.bottom)
    }
}
