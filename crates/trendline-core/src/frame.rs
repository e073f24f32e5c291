// File: crates/trendline-core/src/frame.rs
// Summary: Everything the host hands to one trendline pass.

use skia_safe as skia;

use crate::dataset::CategoryLabel;
use crate::geometry::ChartArea;
use crate::scale::AxisScale;

/// Drawing surface, plotting area, and pixel mappings for a single redraw.
pub struct Frame<'a> {
    pub canvas: &'a skia::Canvas,
    pub area: ChartArea,
    pub x_scale: &'a dyn AxisScale,
    pub y_scale: &'a dyn AxisScale,
    /// Category labels by data index; time labels supply x for bare values.
    pub labels: &'a [CategoryLabel],
}

impl<'a> Frame<'a> {
    #[inline]
    pub fn to_pixel(&self, x: f64, y: f64) -> (f32, f32) {
        (self.x_scale.value_to_pixel(x), self.y_scale.value_to_pixel(y))
    }
}
