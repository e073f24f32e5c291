// File: crates/trendline-core/src/config.rs
// Summary: Trendline, label, and aggregate-group configuration as consumed from the host.
// Notes:
// - Field names follow the host's camelCase JSON (`polynomialOrder`, `colorMin`, ...).
// - Everything here is already-validated input; defaults fill whatever is absent.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Deserializer};

use crate::color::CssColor;
use crate::fit::FitStatistics;

/// Position along the drawn domain where labels anchor when unset.
pub const DEFAULT_POSITION_RATIO: f32 = 0.85;
pub const DEFAULT_POLYNOMIAL_ORDER: u32 = 2;
pub const DEFAULT_LINE_WIDTH: f32 = 2.0;
pub const DEFAULT_LABEL_BORDER_WIDTH: f32 = 0.5;
/// Stroke color when neither the trendline nor its dataset names one.
pub const DEFAULT_STROKE: CssColor = CssColor::from_argb(77, 0, 0, 0);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendlineKind {
    Average,
    LinearRegression,
    LogarithmicRegression,
    ExponentialRegression,
    PolynomialRegression,
    Min,
    Max,
    Median,
}

impl TrendlineKind {
    pub const ALL: [TrendlineKind; 8] = [
        Self::Average,
        Self::LinearRegression,
        Self::LogarithmicRegression,
        Self::ExponentialRegression,
        Self::PolynomialRegression,
        Self::Min,
        Self::Max,
        Self::Median,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Average => "average",
            Self::LinearRegression => "linear_regression",
            Self::LogarithmicRegression => "logarithmic_regression",
            Self::ExponentialRegression => "exponential_regression",
            Self::PolynomialRegression => "polynomial_regression",
            Self::Min => "min",
            Self::Max => "max",
            Self::Median => "median",
        }
    }

    /// Kinds whose curve is a single straight segment between the domain endpoints.
    pub fn is_straight(self) -> bool {
        matches!(
            self,
            Self::LinearRegression | Self::Average | Self::Max | Self::Min | Self::Median
        )
    }

    /// Number of equally spaced segments used to approximate a curved fit.
    pub fn sample_segments(self) -> usize {
        match self {
            Self::PolynomialRegression => 100,
            _ => 80,
        }
    }
}

impl fmt::Display for TrendlineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    #[default]
    Solid,
    Dotted,
    Dashed,
    DashDot,
}

impl LineStyle {
    /// Dash intervals (on, off, ...) scaled by the stroke width; `None` for solid.
    pub fn dash_intervals(self, width: f32) -> Option<Vec<f32>> {
        match self {
            Self::Solid => None,
            Self::Dotted => Some(vec![width, width * 2.0]),
            Self::Dashed => Some(vec![width * 4.0, width * 2.0]),
            Self::DashDot => Some(vec![width * 4.0, width * 2.0, 1.0, width * 2.0]),
        }
    }
}

/// Area fill under the curve.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "FillRepr")]
pub enum FillColor {
    #[default]
    None,
    /// Fill with the stroke's start color (`fillColor: true`).
    StrokeStart,
    Color(CssColor),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FillRepr {
    Flag(bool),
    Color(CssColor),
}

impl From<FillRepr> for FillColor {
    fn from(r: FillRepr) -> Self {
        match r {
            FillRepr::Flag(true) => Self::StrokeStart,
            FillRepr::Flag(false) => Self::None,
            FillRepr::Color(c) => Self::Color(c),
        }
    }
}

impl FillColor {
    pub fn resolve(self, stroke_start: CssColor) -> Option<CssColor> {
        match self {
            Self::None => None,
            Self::StrokeStart => Some(stroke_start),
            Self::Color(c) => Some(c),
        }
    }
}

/// One trendline attached to a dataset (or to an aggregate group).
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TrendlineSpec {
    pub show: bool,
    #[serde(rename = "type")]
    pub kind: Option<TrendlineKind>,
    pub polynomial_order: u32,
    /// Draw across the visible x range instead of the observed one.
    pub projection: bool,
    pub width: f32,
    pub line_style: LineStyle,
    pub color_min: Option<CssColor>,
    pub color_max: Option<CssColor>,
    pub fill_color: FillColor,
    pub label: Option<LabelSpec>,
}

impl Default for TrendlineSpec {
    fn default() -> Self {
        Self {
            show: false,
            kind: None,
            polynomial_order: DEFAULT_POLYNOMIAL_ORDER,
            projection: true,
            width: DEFAULT_LINE_WIDTH,
            line_style: LineStyle::Solid,
            color_min: None,
            color_max: None,
            fill_color: FillColor::None,
            label: None,
        }
    }
}

impl TrendlineSpec {
    /// A visible trendline of `kind` with default styling.
    pub fn new(kind: TrendlineKind) -> Self {
        Self { show: true, kind: Some(kind), ..Self::default() }
    }

    pub fn with_label(mut self, label: LabelSpec) -> Self {
        self.label = Some(label);
        self
    }

    pub fn with_color(mut self, color: CssColor) -> Self {
        self.color_min = Some(color);
        self
    }

    /// The kind to fit, or `None` when the trendline is disabled or untyped.
    pub fn enabled_kind(&self) -> Option<TrendlineKind> {
        if self.show { self.kind } else { None }
    }

    /// Label options when the label should be displayed.
    pub fn displayed_label(&self) -> Option<&LabelSpec> {
        self.label.as_ref().filter(|l| l.display)
    }

    /// Gradient endpoints, falling back to the dataset color.
    pub fn stroke_colors(&self, dataset_color: Option<CssColor>) -> (CssColor, CssColor) {
        let start = self.color_min.or(dataset_color).unwrap_or(DEFAULT_STROKE);
        (start, self.color_max.unwrap_or(start))
    }
}

/// Label text: a literal or a closure over the fit statistics.
#[derive(Clone)]
pub enum LabelText {
    Literal(String),
    Computed(Arc<dyn Fn(&FitStatistics) -> String + Send + Sync>),
}

impl LabelText {
    pub fn computed<F>(f: F) -> Self
    where
        F: Fn(&FitStatistics) -> String + Send + Sync + 'static,
    {
        Self::Computed(Arc::new(f))
    }

    /// Final text for one placement; surrounding whitespace is dropped.
    pub fn resolve(&self, stats: &FitStatistics) -> String {
        match self {
            Self::Literal(s) => s.trim().to_string(),
            Self::Computed(f) => f(stats).trim().to_string(),
        }
    }
}

impl Default for LabelText {
    fn default() -> Self {
        Self::Literal(String::new())
    }
}

impl fmt::Debug for LabelText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(s) => f.debug_tuple("Literal").field(s).finish(),
            Self::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

impl From<&str> for LabelText {
    fn from(s: &str) -> Self {
        Self::Literal(s.to_string())
    }
}

impl<'de> Deserialize<'de> for LabelText {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        String::deserialize(d).map(Self::Literal)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(try_from = "WeightRepr")]
pub struct FontWeight(pub u16);

impl FontWeight {
    pub const NORMAL: Self = Self(400);
    pub const SEMIBOLD: Self = Self(600);
    pub const BOLD: Self = Self(700);
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WeightRepr {
    Number(u16),
    Name(String),
}

impl TryFrom<WeightRepr> for FontWeight {
    type Error = String;

    fn try_from(r: WeightRepr) -> Result<Self, Self::Error> {
        match r {
            WeightRepr::Number(n) => Ok(Self(n)),
            WeightRepr::Name(s) => match s.trim() {
                "normal" => Ok(Self::NORMAL),
                "bold" => Ok(Self::BOLD),
                other => other
                    .parse()
                    .map(Self)
                    .map_err(|_| format!("unknown font weight {other:?}")),
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct LabelFont {
    pub family: String,
    pub size: f32,
    pub weight: FontWeight,
}

impl Default for LabelFont {
    fn default() -> Self {
        Self { family: "sans-serif".to_string(), size: 10.0, weight: FontWeight::SEMIBOLD }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(from = "PaddingRepr")]
pub struct Padding {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Padding {
    pub const fn uniform(v: f32) -> Self {
        Self { top: v, right: v, bottom: v, left: v }
    }
    pub fn horizontal(&self) -> f32 { self.left + self.right }
    pub fn vertical(&self) -> f32 { self.top + self.bottom }
}

impl Default for Padding {
    fn default() -> Self {
        Self { top: 2.0, right: 5.0, bottom: 2.0, left: 5.0 }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PaddingRepr {
    Uniform(f32),
    Sides {
        top: Option<f32>,
        right: Option<f32>,
        bottom: Option<f32>,
        left: Option<f32>,
    },
}

impl From<PaddingRepr> for Padding {
    fn from(r: PaddingRepr) -> Self {
        match r {
            PaddingRepr::Uniform(v) => Self::uniform(v),
            PaddingRepr::Sides { top, right, bottom, left } => {
                let d = Self::default();
                Self {
                    top: top.unwrap_or(d.top),
                    right: right.unwrap_or(d.right),
                    bottom: bottom.unwrap_or(d.bottom),
                    left: left.unwrap_or(d.left),
                }
            }
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LabelSpec {
    pub display: bool,
    pub text: LabelText,
    pub font: LabelFont,
    pub color: CssColor,
    pub background_color: CssColor,
    pub border_color: CssColor,
    /// Unset means the default width plus a hairline.
    pub border_width: Option<f32>,
    pub border_radius: f32,
    pub padding: Padding,
    /// 0 = start of the drawn domain, 1 = end.
    pub position_ratio: f32,
    /// Vertical pixel nudge.
    pub offset: f32,
}

impl Default for LabelSpec {
    fn default() -> Self {
        Self {
            display: false,
            text: LabelText::default(),
            font: LabelFont::default(),
            color: CssColor::from_argb(255, 0x57, 0x58, 0x59),
            background_color: CssColor::from_argb(255, 0xff, 0xff, 0xff),
            border_color: CssColor::from_argb(255, 0xe0, 0xe0, 0xe0),
            border_width: None,
            border_radius: 6.0,
            padding: Padding::default(),
            position_ratio: DEFAULT_POSITION_RATIO,
            offset: 0.0,
        }
    }
}

impl LabelSpec {
    /// A displayed label with the given text and default styling.
    pub fn new(text: impl Into<LabelText>) -> Self {
        Self { display: true, text: text.into(), ..Self::default() }
    }

    /// Border width as stroked. Only the default gets the extra hairline.
    pub fn drawn_border_width(&self) -> f32 {
        self.border_width.unwrap_or(DEFAULT_LABEL_BORDER_WIDTH + 0.2)
    }

    /// Corner radius as drawn: scaled down, never below 2px.
    pub fn drawn_border_radius(&self) -> f32 {
        (self.border_radius * 0.55).floor().max(2.0)
    }
}

/// One trendline fitted over every dataset that shares `y_axis_key`.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateGroup {
    #[serde(flatten)]
    pub trendline: TrendlineSpec,
    pub y_axis_key: String,
    /// Field read from point records; falls back to each dataset's own axis id.
    #[serde(rename = "yAxisID", default)]
    pub y_axis_id: Option<String>,
}

/// Plugin-level options, read once per pass.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TrendlinePluginOptions {
    pub aggregate_multiple: Vec<AggregateGroup>,
}
