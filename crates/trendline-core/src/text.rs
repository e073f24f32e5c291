// File: crates/trendline-core/src/text.rs
// Summary: Text measuring/drawing for trendline labels; Skia textlayout implementation.

use skia_safe as skia;
use skia::font_style::{Slant, Weight, Width};
use skia::textlayout::{FontCollection, Paragraph, ParagraphBuilder, ParagraphStyle, TextStyle};

use crate::config::LabelFont;

/// Measures and draws label text. Labels are laid out top-left aligned.
pub trait TextRenderer {
    fn measure_width(&self, text: &str, font: &LabelFont) -> f32;
    fn draw(&self, canvas: &skia::Canvas, text: &str, top_left: (f32, f32), font: &LabelFont, color: skia::Color);
}

pub struct TextShaper {
    fonts: FontCollection,
}

impl Default for TextShaper {
    fn default() -> Self {
        Self::new()
    }
}

impl TextShaper {
    pub fn new() -> Self {
        let mut fc = FontCollection::new();
        // Use system manager fallback
        fc.set_default_font_manager(skia::FontMgr::default(), None);
        Self { fonts: fc }
    }

    fn make_style(font: &LabelFont, color: skia::Color) -> TextStyle {
        let mut ts = TextStyle::new();
        ts.set_font_size(font.size.max(1.0));
        ts.set_color(color);
        ts.set_font_style(skia::FontStyle::new(
            Weight::from(font.weight.0 as i32),
            Width::NORMAL,
            Slant::Upright,
        ));
        let mut families: Vec<&str> = font
            .family
            .split(',')
            .map(|f| f.trim().trim_matches(|c: char| c == '"' || c == '\''))
            .filter(|f| !f.is_empty())
            .collect();
        families.extend(["Segoe UI", "Arial", "Helvetica", "Roboto", "DejaVu Sans", "sans-serif"]);
        ts.set_font_families(&families[..]);
        ts
    }

    pub fn layout(&self, text: &str, font: &LabelFont, color: skia::Color) -> Paragraph {
        let mut pstyle = ParagraphStyle::new();
        pstyle.set_text_align(skia::textlayout::TextAlign::Left);
        let mut builder = ParagraphBuilder::new(&pstyle, &self.fonts);
        builder.push_style(&Self::make_style(font, color));
        builder.add_text(text);
        let mut paragraph = builder.build();
        paragraph.layout(10_000.0);
        paragraph
    }
}

impl TextRenderer for TextShaper {
    fn measure_width(&self, text: &str, font: &LabelFont) -> f32 {
        // width of the longest line
        self.layout(text, font, skia::Color::TRANSPARENT).longest_line()
    }

    fn draw(&self, canvas: &skia::Canvas, text: &str, top_left: (f32, f32), font: &LabelFont, color: skia::Color) {
        self.layout(text, font, color).paint(canvas, top_left);
    }
}
