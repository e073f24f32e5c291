// File: crates/trendline-core/src/scale.rs
// Summary: Value -> pixel mapping supplied by the host, plus a linear/log10 implementation.

use crate::axis::{Axis, ScaleKind};

/// Pixel mapping for one axis, owned by the host.
pub trait AxisScale {
    fn value_to_pixel(&self, v: f64) -> f32;
    /// Visible data range `(min, max)`, used when a trendline is projected.
    fn visible_range(&self) -> (f64, f64);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
    /// Values grow left to right.
    Horizontal,
    /// Values grow bottom to top.
    Vertical,
}

/// Maps `[vmin, vmax]` onto the pixel span `[start_px, end_px]`.
#[derive(Clone, Copy, Debug)]
pub struct ValueScale {
    pub start_px: f32,
    pub end_px: f32,
    pub vmin: f64,
    pub vmax: f64,
    pub orientation: Orientation,
    pub log: bool,
    // cached log endpoints when log is true
    log_min: f64,
    log_max: f64,
}

impl ValueScale {
    pub fn new_linear(orientation: Orientation, start_px: f32, end_px: f32, vmin: f64, mut vmax: f64) -> Self {
        if (vmax - vmin).abs() < 1e-12 { vmax = vmin + 1.0; }
        Self { start_px, end_px, vmin, vmax, orientation, log: false, log_min: 0.0, log_max: 0.0 }
    }

    pub fn new_log10(orientation: Orientation, start_px: f32, end_px: f32, mut vmin: f64, mut vmax: f64) -> Self {
        // Ensure strictly positive range for log scale
        let eps = 1e-12;
        vmin = if vmin <= eps { eps } else { vmin };
        vmax = if vmax <= vmin { vmin * 10.0 } else { vmax };
        Self { start_px, end_px, vmin, vmax, orientation, log: true, log_min: vmin.log10(), log_max: vmax.log10() }
    }

    /// Horizontal scale for `axis` across `[left, right]`.
    pub fn horizontal(axis: &Axis, left: f32, right: f32) -> Self {
        Self::for_axis(axis, Orientation::Horizontal, left, right)
    }

    /// Vertical scale for `axis`; `bottom` maps to the axis minimum.
    pub fn vertical(axis: &Axis, top: f32, bottom: f32) -> Self {
        Self::for_axis(axis, Orientation::Vertical, bottom, top)
    }

    fn for_axis(axis: &Axis, orientation: Orientation, start_px: f32, end_px: f32) -> Self {
        match axis.kind {
            ScaleKind::Linear => Self::new_linear(orientation, start_px, end_px, axis.min, axis.max),
            ScaleKind::Log10 => Self::new_log10(orientation, start_px, end_px, axis.min, axis.max),
        }
    }

    /// Position of `v` in `[0, 1]` along the axis (unbounded outside the range).
    fn fraction(&self, v: f64) -> f64 {
        if self.log {
            // log10 of non-positive values is NaN/-inf; that is reported, not clamped
            let span = (self.log_max - self.log_min).max(1e-12);
            (v.log10() - self.log_min) / span
        } else {
            let span = (self.vmax - self.vmin).max(1e-12);
            (v - self.vmin) / span
        }
    }
}

impl AxisScale for ValueScale {
    #[inline]
    fn value_to_pixel(&self, v: f64) -> f32 {
        let t = self.fraction(v);
        (self.start_px as f64 + t * (self.end_px - self.start_px) as f64) as f32
    }

    fn visible_range(&self) -> (f64, f64) {
        (self.vmin, self.vmax)
    }
}
