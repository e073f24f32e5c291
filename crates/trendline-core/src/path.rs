// File: crates/trendline-core/src/path.rs
// Summary: Strokes (and optionally fills) a fitted curve onto the canvas.
// Notes:
// - Straight kinds draw one segment; curved kinds are sampled into a polyline.
// - Every draw runs inside a `CanvasGuard`, so clip/paint state never leaks to the host.

use std::ops::Deref;

use skia_safe as skia;

use crate::color::CssColor;
use crate::config::{TrendlineKind, TrendlineSpec};
use crate::error::TrendlineError;
use crate::fit::Fitter;
use crate::frame::Frame;
use crate::sample::sample_curve;

/// Saves canvas state on creation and restores it on drop, on every exit path.
pub struct CanvasGuard<'a> {
    canvas: &'a skia::Canvas,
    count: usize,
}

impl<'a> CanvasGuard<'a> {
    pub fn new(canvas: &'a skia::Canvas) -> Self {
        let count = canvas.save();
        Self { canvas, count }
    }
}

impl Deref for CanvasGuard<'_> {
    type Target = skia::Canvas;

    fn deref(&self) -> &skia::Canvas {
        self.canvas
    }
}

impl Drop for CanvasGuard<'_> {
    fn drop(&mut self) {
        self.canvas.restore_to_count(self.count);
    }
}

/// Drawn domain of one curve and its endpoints in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CurveGeometry {
    pub min_x: f64,
    pub max_x: f64,
    pub start: (f32, f32),
    pub end: (f32, f32),
}

/// Domain to draw over: the visible x range when projecting, else the observed one.
/// Logarithmic curves never start at or below zero.
pub fn curve_domain(fitter: &Fitter, spec: &TrendlineSpec, frame: &Frame<'_>) -> Option<(f64, f64)> {
    let (observed_min, observed_max) = fitter.observed_domain()?;
    let (mut min_x, max_x) = if spec.projection {
        frame.x_scale.visible_range()
    } else {
        (observed_min, observed_max)
    };
    if fitter.kind() == TrendlineKind::LogarithmicRegression && min_x <= 0.0 {
        min_x = observed_min;
    }
    Some((min_x, max_x))
}

/// Endpoints of the curve in pixels; fails if either maps to a non-finite pixel.
pub fn curve_geometry(fitter: &Fitter, spec: &TrendlineSpec, frame: &Frame<'_>) -> Result<CurveGeometry, TrendlineError> {
    let kind = fitter.kind();
    let (min_x, max_x) = curve_domain(fitter, spec, frame)
        .ok_or(TrendlineError::InsufficientData { kind, points: fitter.len() })?;
    let start = frame.to_pixel(min_x, fitter.f(min_x));
    let end = frame.to_pixel(max_x, fitter.f(max_x));
    let finite = |(x, y): (f32, f32)| x.is_finite() && y.is_finite();
    if !finite(start) || !finite(end) {
        return Err(TrendlineError::NonFinitePixel { kind });
    }
    Ok(CurveGeometry { min_x, max_x, start, end })
}

/// Open path along the curve. Sampled points that map to non-finite pixels are skipped.
pub fn curve_path(fitter: &Fitter, geom: &CurveGeometry, frame: &Frame<'_>) -> skia::Path {
    let mut path = skia::Path::new();
    let kind = fitter.kind();
    if kind.is_straight() {
        path.move_to(geom.start);
        path.line_to(geom.end);
        return path;
    }

    let mut started = false;
    for (x, y) in sample_curve(|x| fitter.f(x), geom.min_x, geom.max_x, kind.sample_segments()) {
        let (px, py) = frame.to_pixel(x, y);
        if !px.is_finite() || !py.is_finite() {
            continue;
        }
        if started {
            path.line_to((px, py));
        } else {
            path.move_to((px, py));
            started = true;
        }
    }
    path
}

fn stroke_paint(spec: &TrendlineSpec, (c0, c1): (CssColor, CssColor), geom: &CurveGeometry) -> skia::Paint {
    let mut paint = skia::Paint::default();
    paint.set_anti_alias(true);
    paint.set_style(skia::paint::Style::Stroke);
    paint.set_stroke_width(spec.width);

    let colors = [c0.color(), c1.color()];
    let gradient = if c0 != c1 && geom.start != geom.end {
        skia::gradient_shader::linear(
            (geom.start, geom.end),
            &colors[..],
            None,
            skia::TileMode::Clamp,
            None,
            None,
        )
    } else {
        None
    };
    match gradient {
        Some(shader) => {
            paint.set_shader(shader);
        }
        None => {
            paint.set_color(c0.color());
        }
    }

    if let Some(intervals) = spec.line_style.dash_intervals(spec.width) {
        if let Some(effect) = skia::PathEffect::dash(&intervals, 0.0) {
            paint.set_path_effect(effect);
        }
    }
    paint
}

/// Strokes one trendline, filling down to the plot bottom first when requested.
/// Drawing is clipped to the plotting area.
pub fn draw_curve(
    frame: &Frame<'_>,
    fitter: &Fitter,
    spec: &TrendlineSpec,
    geom: &CurveGeometry,
    dataset_color: Option<CssColor>,
) {
    let canvas = CanvasGuard::new(frame.canvas);
    canvas.clip_rect(frame.area.to_skia(), skia::ClipOp::Intersect, true);

    let colors = spec.stroke_colors(dataset_color);
    let path = curve_path(fitter, geom, frame);

    if let Some(fill) = spec.fill_color.resolve(colors.0) {
        let mut area = path.clone();
        area.line_to((geom.end.0, frame.area.bottom));
        area.line_to((geom.start.0, frame.area.bottom));
        area.close();

        let mut paint = skia::Paint::default();
        paint.set_anti_alias(true);
        paint.set_style(skia::paint::Style::Fill);
        paint.set_color(fill.color());
        canvas.draw_path(&area, &paint);
    }

    canvas.draw_path(&path, &stroke_paint(spec, colors, geom));
}
