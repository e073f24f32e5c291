// File: crates/trendline-core/tests/common/mod.rs
// Purpose: Shared fixtures: a font-independent text renderer and a raster frame harness.
#![allow(dead_code)]

use skia_safe as skia;
use trendline_core::config::LabelFont;
use trendline_core::{
    Axis, ChartArea, Dataset, Frame, PassReport, TextRenderer, TrendlinePlugin, ValueScale,
};

/// Every character advances by `advance` pixels; drawing fills the text box.
pub struct FixedText {
    pub advance: f32,
}

impl Default for FixedText {
    fn default() -> Self {
        Self { advance: 6.0 }
    }
}

impl TextRenderer for FixedText {
    fn measure_width(&self, text: &str, _font: &LabelFont) -> f32 {
        text.chars().count() as f32 * self.advance
    }

    fn draw(&self, canvas: &skia::Canvas, text: &str, top_left: (f32, f32), font: &LabelFont, color: skia::Color) {
        let mut paint = skia::Paint::default();
        paint.set_color(color);
        let rect = skia::Rect::from_xywh(top_left.0, top_left.1, self.measure_width(text, font), font.size);
        canvas.draw_rect(rect, &paint);
    }
}

/// A white raster surface with a plotting area inset by 20px on every side.
pub struct Harness {
    pub surface: skia::Surface,
    pub area: ChartArea,
    pub x_axis: Axis,
    pub y_axis: Axis,
}

impl Harness {
    pub fn new(width: i32, height: i32, x_axis: Axis, y_axis: Axis) -> Self {
        let mut surface = skia::surfaces::raster_n32_premul((width, height)).expect("raster surface");
        surface.canvas().clear(skia::Color::WHITE);
        let area = ChartArea::from_ltrb(20.0, 20.0, (width - 20) as f32, (height - 20) as f32);
        Self { surface, area, x_axis, y_axis }
    }

    pub fn run(&mut self, plugin: &TrendlinePlugin, datasets: &[Dataset]) -> PassReport {
        self.run_with(plugin, datasets, &FixedText::default())
    }

    pub fn run_with(&mut self, plugin: &TrendlinePlugin, datasets: &[Dataset], text: &dyn TextRenderer) -> PassReport {
        let x_scale = ValueScale::horizontal(&self.x_axis, self.area.left, self.area.right);
        let y_scale = ValueScale::vertical(&self.y_axis, self.area.top, self.area.bottom);
        let frame = Frame {
            canvas: self.surface.canvas(),
            area: self.area,
            x_scale: &x_scale,
            y_scale: &y_scale,
            labels: &[],
        };
        plugin.run(&frame, datasets, text)
    }

    /// Unpremultiplied RGBA at one pixel.
    pub fn pixel(&mut self, x: i32, y: i32) -> [u8; 4] {
        let info = skia::ImageInfo::new((1, 1), skia::ColorType::RGBA8888, skia::AlphaType::Unpremul, None);
        let mut px = [0u8; 4];
        assert!(self.surface.read_pixels(&info, &mut px, 4, (x, y)), "read pixel ({x}, {y})");
        px
    }

    pub fn is_white(&mut self, x: i32, y: i32) -> bool {
        self.pixel(x, y) == [255, 255, 255, 255]
    }
}
