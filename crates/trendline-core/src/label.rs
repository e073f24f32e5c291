// File: crates/trendline-core/src/label.rs
// Summary: Label placement along a fitted curve, collision rejection, and the deferred draw pass.
// Notes:
// - Placement only records plain draw instructions; nothing is drawn until `flush`,
//   so labels end up above every curve of the pass.
// - A label that overlaps an accepted one is dropped. The curve is unaffected.

use std::collections::HashMap;

use skia_safe as skia;

use crate::color::CssColor;
use crate::config::{LabelFont, LabelSpec, Padding};
use crate::fit::Fitter;
use crate::frame::Frame;
use crate::geometry::LabelRect;
use crate::path::{CanvasGuard, CurveGeometry};
use crate::text::TextRenderer;

/// Side length of the spatial index cells, in pixels.
const CELL_SIZE: f32 = 50.0;

/// Which trendline a label (or a skipped curve) came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TrendlineOrigin {
    Aggregate { group: usize },
    Dataset { dataset: usize, trendline: usize },
}

/// Uniform grid over accepted rectangles; answers the same as a linear scan.
#[derive(Debug, Default)]
pub struct LabelIndex {
    rects: Vec<LabelRect>,
    cells: HashMap<(i32, i32), Vec<usize>>,
}

impl LabelIndex {
    fn cells_for(rect: &LabelRect) -> impl Iterator<Item = (i32, i32)> {
        let x0 = (rect.x / CELL_SIZE).floor() as i32;
        let y0 = (rect.y / CELL_SIZE).floor() as i32;
        let x1 = (rect.right() / CELL_SIZE).floor() as i32;
        let y1 = (rect.bottom() / CELL_SIZE).floor() as i32;
        (x0..=x1).flat_map(move |cx| (y0..=y1).map(move |cy| (cx, cy)))
    }

    pub fn collides(&self, rect: &LabelRect) -> bool {
        Self::cells_for(rect).any(|cell| {
            self.cells
                .get(&cell)
                .is_some_and(|ids| ids.iter().any(|&i| self.rects[i].overlaps(rect)))
        })
    }

    pub fn insert(&mut self, rect: LabelRect) {
        let id = self.rects.len();
        self.rects.push(rect);
        for cell in Self::cells_for(&rect) {
            self.cells.entry(cell).or_default().push(id);
        }
    }

    pub fn len(&self) -> usize {
        self.rects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }
}

/// Label styling with drawing adjustments already applied.
#[derive(Clone, Debug, PartialEq)]
pub struct LabelStyle {
    pub font: LabelFont,
    pub color: CssColor,
    pub background: CssColor,
    pub border_color: CssColor,
    pub border_width: f32,
    pub border_radius: f32,
    pub padding: Padding,
}

impl From<&LabelSpec> for LabelStyle {
    fn from(l: &LabelSpec) -> Self {
        Self {
            font: l.font.clone(),
            color: l.color,
            background: l.background_color,
            border_color: l.border_color,
            border_width: l.drawn_border_width(),
            border_radius: l.drawn_border_radius(),
            padding: l.padding,
        }
    }
}

/// One accepted label, waiting for the deferred draw pass.
#[derive(Clone, Debug, PartialEq)]
pub struct LabelDraw {
    pub origin: TrendlineOrigin,
    pub text: String,
    pub rect: LabelRect,
    pub style: LabelStyle,
}

/// Pixel anchor for a label: `position_ratio` along the drawn domain, kept inside the
/// observed domain, on the curve, nudged down by the (staggered) offset.
pub fn label_anchor(
    frame: &Frame<'_>,
    fitter: &Fitter,
    geom: &CurveGeometry,
    label: &LabelSpec,
    origin: TrendlineOrigin,
) -> Option<(f32, f32)> {
    let (lo, hi) = fitter.observed_domain()?;
    let t = label.position_ratio.clamp(0.0, 1.0) as f64;
    let x = (geom.min_x + t * (geom.max_x - geom.min_x)).max(lo).min(hi);
    let (px, py) = frame.to_pixel(x, fitter.f(x));

    let mut dy = label.offset;
    if let TrendlineOrigin::Dataset { dataset, trendline } = origin {
        if label.offset != 0.0 {
            dy += label.offset * 0.5 * (dataset + trendline) as f32;
        }
    }
    let anchor = (px, py + dy);
    (anchor.0.is_finite() && anchor.1.is_finite()).then_some(anchor)
}

/// Per-pass placement state: accepted rectangles plus the deferred draw queue.
#[derive(Debug, Default)]
pub struct LabelPlacer {
    index: LabelIndex,
    queue: Vec<LabelDraw>,
    dropped: usize,
}

impl LabelPlacer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Places the label for one drawn curve. Returns the accepted rectangle, or
    /// `None` when it overlaps an earlier label (or has no finite anchor).
    pub fn place(
        &mut self,
        frame: &Frame<'_>,
        fitter: &Fitter,
        geom: &CurveGeometry,
        label: &LabelSpec,
        origin: TrendlineOrigin,
        text: &dyn TextRenderer,
    ) -> Option<LabelRect> {
        let Some((ax, ay)) = label_anchor(frame, fitter, geom, label, origin) else {
            self.dropped += 1;
            return None;
        };

        let content = label.text.resolve(&fitter.statistics(geom.min_x, geom.max_x));
        let width = text.measure_width(&content, &label.font) + label.padding.horizontal();
        let height = label.font.size + label.padding.vertical();
        let rect = LabelRect::centered(ax, ay, width, height);

        if self.index.collides(&rect) {
            log::trace!("dropping label {content:?} for {origin:?}: overlaps an earlier label");
            self.dropped += 1;
            return None;
        }

        self.index.insert(rect);
        self.queue.push(LabelDraw { origin, text: content, rect, style: LabelStyle::from(label) });
        Some(rect)
    }

    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Draws every queued label in placement order and hands the records back.
    pub fn flush(self, canvas: &skia::Canvas, text: &dyn TextRenderer) -> Vec<LabelDraw> {
        for draw in &self.queue {
            draw_label(canvas, draw, text);
        }
        self.queue
    }
}

/// Rounded background, optional border, then the text at the padded top-left corner.
pub fn draw_label(canvas: &skia::Canvas, draw: &LabelDraw, text: &dyn TextRenderer) {
    let canvas = CanvasGuard::new(canvas);
    let style = &draw.style;
    let rect = draw.rect.to_skia();
    let radius = style.border_radius;

    if !style.background.is_transparent() {
        let mut fill = skia::Paint::default();
        fill.set_anti_alias(true);
        fill.set_style(skia::paint::Style::Fill);
        fill.set_color(style.background.color());
        canvas.draw_round_rect(rect, radius, radius, &fill);

        if style.border_width > 0.0 && !style.border_color.is_transparent() {
            let mut stroke = skia::Paint::default();
            stroke.set_anti_alias(true);
            stroke.set_style(skia::paint::Style::Stroke);
            stroke.set_stroke_width(style.border_width);
            stroke.set_color(style.border_color.color());
            canvas.draw_round_rect(rect, radius, radius, &stroke);
        }
    }

    let top_left = (draw.rect.x + style.padding.left, draw.rect.y + style.padding.top);
    text.draw(&canvas, &draw.text, top_left, &style.font, style.color.color());
}
