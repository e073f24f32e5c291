// File: crates/trendline-core/src/chart.rs
// Summary: Minimal host chart and headless rendering pipeline using Skia CPU raster surfaces.
// Notes:
// - Draws grid, axes, and dataset polylines, then runs the trendline pass on top.
// - Axis ranges are used as given.

use anyhow::{Context, Result};
use skia_safe as skia;

use crate::axis::Axis;
use crate::color::CssColor;
use crate::config::TrendlinePluginOptions;
use crate::dataset::{CategoryLabel, Dataset};
use crate::frame::Frame;
use crate::geometry::ChartArea;
use crate::plugin::{PassReport, TrendlinePlugin};
use crate::sample::linspace;
use crate::scale::ValueScale;
use crate::text::TextShaper;
use crate::types::{Insets, HEIGHT, WIDTH};

const SERIES_FALLBACK: CssColor = CssColor::from_argb(255, 64, 160, 255);

pub struct RenderOptions {
    pub width: i32,
    pub height: i32,
    pub insets: Insets,
    pub background: skia::Color,
    /// Axis titles; off for pixel-exact tests since fonts vary across platforms.
    pub draw_labels: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: WIDTH,
            height: HEIGHT,
            insets: Insets::default(),
            background: skia::Color::WHITE,
            draw_labels: true,
        }
    }
}

impl RenderOptions {
    pub fn chart_area(&self) -> ChartArea {
        ChartArea::from_ltrb(
            self.insets.left as f32,
            self.insets.top as f32,
            (self.width - self.insets.right as i32) as f32,
            (self.height - self.insets.bottom as i32) as f32,
        )
    }
}

pub struct Chart {
    pub datasets: Vec<Dataset>,
    /// Category labels by data index, shared by every dataset.
    pub labels: Vec<CategoryLabel>,
    pub x_axis: Axis,
    pub y_axis: Axis,
    pub trendlines: TrendlinePluginOptions,
}

impl Default for Chart {
    fn default() -> Self {
        Self::new()
    }
}

impl Chart {
    pub fn new() -> Self {
        Self {
            datasets: Vec::new(),
            labels: Vec::new(),
            x_axis: Axis::default_x(),
            y_axis: Axis::default_y(),
            trendlines: TrendlinePluginOptions::default(),
        }
    }

    pub fn add_dataset(&mut self, dataset: Dataset) {
        self.datasets.push(dataset);
    }

    /// Draws the full chart onto `canvas`, which must be at least `opts.width` x `opts.height`.
    pub fn draw(&self, canvas: &skia::Canvas, opts: &RenderOptions, text: &TextShaper) -> PassReport {
        canvas.clear(opts.background);

        let area = opts.chart_area();
        let x_scale = ValueScale::horizontal(&self.x_axis, area.left, area.right);
        let y_scale = ValueScale::vertical(&self.y_axis, area.top, area.bottom);

        draw_grid(canvas, &area);
        draw_axes(canvas, &area, &self.x_axis, &self.y_axis, opts.draw_labels);

        let frame = Frame { canvas, area, x_scale: &x_scale, y_scale: &y_scale, labels: &self.labels };
        for dataset in self.datasets.iter().filter(|d| !d.hidden) {
            draw_dataset(&frame, dataset);
        }

        TrendlinePlugin::new(self.trendlines.clone()).run(&frame, &self.datasets, text)
    }

    fn render_surface(&self, opts: &RenderOptions) -> Result<(skia::Surface, PassReport)> {
        let mut surface = skia::surfaces::raster_n32_premul((opts.width, opts.height))
            .context("failed to create raster surface")?;
        let text = TextShaper::new();
        let report = self.draw(surface.canvas(), opts, &text);
        Ok((surface, report))
    }

    /// Render the chart to a PNG at `output_png_path` using a CPU raster surface.
    pub fn render_to_png(
        &self,
        opts: &RenderOptions,
        output_png_path: impl AsRef<std::path::Path>,
    ) -> Result<PassReport> {
        let (mut surface, report) = self.render_surface(opts)?;
        let data = encode_png(&mut surface)?;

        let path = output_png_path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, data.as_bytes()).with_context(|| format!("write {}", path.display()))?;
        Ok(report)
    }

    /// In-memory PNG bytes.
    pub fn render_to_png_bytes(&self, opts: &RenderOptions) -> Result<Vec<u8>> {
        let (mut surface, _) = self.render_surface(opts)?;
        Ok(encode_png(&mut surface)?.as_bytes().to_vec())
    }

    /// Unpremultiplied RGBA8 pixels: `(pixels, width, height, stride)`.
    pub fn render_to_rgba8(&self, opts: &RenderOptions) -> Result<(Vec<u8>, i32, i32, usize)> {
        let (mut surface, _) = self.render_surface(opts)?;
        let info = skia::ImageInfo::new(
            (opts.width, opts.height),
            skia::ColorType::RGBA8888,
            skia::AlphaType::Unpremul,
            None,
        );
        let stride = opts.width as usize * 4;
        let mut pixels = vec![0u8; stride * opts.height as usize];
        if !surface.read_pixels(&info, &mut pixels, stride, (0, 0)) {
            anyhow::bail!("read_pixels failed");
        }
        Ok((pixels, opts.width, opts.height, stride))
    }
}

fn encode_png(surface: &mut skia::Surface) -> Result<skia::Data> {
    surface
        .image_snapshot()
        .encode(None, skia::EncodedImageFormat::PNG, None)
        .context("encode PNG failed")
}

// ---- helpers ----------------------------------------------------------------

fn draw_grid(canvas: &skia::Canvas, area: &ChartArea) {
    let mut paint = skia::Paint::default();
    paint.set_color(skia::Color::from_argb(255, 232, 232, 236));
    paint.set_anti_alias(true);
    paint.set_stroke_width(1.0);

    for x in linspace(area.left as f64, area.right as f64, 10) {
        canvas.draw_line((x as f32, area.top), (x as f32, area.bottom), &paint);
    }
    for y in linspace(area.top as f64, area.bottom as f64, 6) {
        canvas.draw_line((area.left, y as f32), (area.right, y as f32), &paint);
    }
}

fn draw_axes(canvas: &skia::Canvas, area: &ChartArea, x: &Axis, y: &Axis, draw_labels: bool) {
    let mut axis_paint = skia::Paint::default();
    axis_paint.set_color(skia::Color::from_argb(255, 90, 90, 100));
    axis_paint.set_anti_alias(true);
    axis_paint.set_stroke_width(1.5);

    canvas.draw_line((area.left, area.bottom), (area.right, area.bottom), &axis_paint);
    canvas.draw_line((area.left, area.top), (area.left, area.bottom), &axis_paint);

    if !draw_labels {
        return;
    }
    let mut paint_text = skia::Paint::default();
    paint_text.set_color(skia::Color::from_argb(255, 60, 60, 70));
    let mut font = skia::Font::default();
    font.set_size(14.0);

    canvas.draw_str(&x.label, (area.right - 80.0, area.bottom + 24.0), &font, &paint_text);
    canvas.draw_str(&y.label, (area.left - 56.0, area.top + 14.0), &font, &paint_text);
}

fn draw_dataset(frame: &Frame<'_>, dataset: &Dataset) {
    let mut path = skia::Path::new();
    let mut started = false;
    for (x, y) in dataset.points(frame.labels, None) {
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
    if !started {
        return;
    }

    let mut stroke = skia::Paint::default();
    stroke.set_anti_alias(true);
    stroke.set_style(skia::paint::Style::Stroke);
    stroke.set_stroke_width(2.0);
    stroke.set_color(dataset.border_color.unwrap_or(SERIES_FALLBACK).color());
    frame.canvas.draw_path(&path, &stroke);
}
