// File: crates/trendline-core/src/dataset.rs
// Summary: Host dataset model (values or point records) and (x, y) extraction for fitters.
// Notes:
// - Datasets are read-only to the trendline pass.
// - Bare values take their x from the chart's category labels (time labels) or their index.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::de::IgnoredAny;
use serde::Deserialize;

use crate::color::CssColor;
use crate::config::TrendlineSpec;

/// Chart-level category label at one data index.
#[derive(Clone, Debug, PartialEq)]
pub enum CategoryLabel {
    Text(String),
    Time(DateTime<Utc>),
}

/// A point record with `x`, a default `y`, and any number of axis-keyed values.
/// Non-numeric fields are dropped while reading.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PointRecord {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub values: BTreeMap<String, f64>,
}

impl PointRecord {
    /// Value stored under the axis id; `"y"` reads the default field.
    pub fn value(&self, axis_id: &str) -> Option<f64> {
        if axis_id == "y" { self.y } else { self.values.get(axis_id).copied() }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(from = "RawDatum")]
pub enum Datum {
    Value(f64),
    Point(PointRecord),
    /// Anything without a usable number, e.g. a string entry or a record whose `x` is text.
    Unusable,
}

impl Datum {
    pub fn xy(x: f64, y: f64) -> Self {
        Self::Point(PointRecord { x: Some(x), y: Some(y), values: BTreeMap::new() })
    }
}

/// A JSON scalar that may or may not be a number.
#[derive(Deserialize)]
#[serde(untagged)]
enum Field {
    Number(f64),
    Other(#[allow(dead_code)] IgnoredAny),
}

impl Field {
    fn number(self) -> Option<f64> {
        match self {
            Field::Number(v) => Some(v),
            Field::Other(_) => None,
        }
    }
}

#[derive(Deserialize)]
struct RawRecord {
    #[serde(default)]
    x: Option<Field>,
    #[serde(default)]
    y: Option<Field>,
    #[serde(flatten)]
    values: BTreeMap<String, Field>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDatum {
    Value(f64),
    Record(RawRecord),
    Other(#[allow(dead_code)] IgnoredAny),
}

impl From<RawDatum> for Datum {
    fn from(raw: RawDatum) -> Self {
        match raw {
            RawDatum::Value(v) => Datum::Value(v),
            RawDatum::Record(r) => {
                // A present but non-numeric x makes the whole record unusable; an absent one
                // falls back to the index.
                let x = match r.x {
                    None => None,
                    Some(field) => match field.number() {
                        Some(x) => Some(x),
                        None => return Datum::Unusable,
                    },
                };
                let values = r.values.into_iter().filter_map(|(k, v)| Some((k, v.number()?))).collect();
                Datum::Point(PointRecord { x, y: r.y.and_then(Field::number), values })
            }
            RawDatum::Other(_) => Datum::Unusable,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Dataset {
    pub label: String,
    /// `None` entries are gaps.
    pub data: Vec<Option<Datum>>,
    pub border_color: Option<CssColor>,
    #[serde(rename = "yAxisID")]
    pub y_axis_id: Option<String>,
    /// Aggregate groups pool every dataset carrying their key.
    pub y_axis_key: Option<String>,
    pub hidden: bool,
    pub trendline: Vec<TrendlineSpec>,
}

impl Dataset {
    pub fn new(label: impl Into<String>) -> Self {
        Self { label: label.into(), ..Self::default() }
    }

    pub fn from_xy(label: impl Into<String>, points: impl IntoIterator<Item = (f64, f64)>) -> Self {
        let data = points.into_iter().map(|(x, y)| Some(Datum::xy(x, y))).collect();
        Self { data, ..Self::new(label) }
    }

    pub fn from_values(label: impl Into<String>, values: impl IntoIterator<Item = f64>) -> Self {
        let data = values.into_iter().map(|y| Some(Datum::Value(y))).collect();
        Self { data, ..Self::new(label) }
    }

    pub fn with_trendline(mut self, spec: TrendlineSpec) -> Self {
        self.trendline.push(spec);
        self
    }

    pub fn with_color(mut self, color: CssColor) -> Self {
        self.border_color = Some(color);
        self
    }

    pub fn with_axis_key(mut self, key: impl Into<String>) -> Self {
        self.y_axis_key = Some(key.into());
        self
    }

    /// `(x, y)` pairs for fitting. `y_axis_id` overrides the dataset's own axis id.
    /// Gaps, non-numeric entries and records without the requested field are skipped.
    pub fn points<'a>(
        &'a self,
        labels: &'a [CategoryLabel],
        y_axis_id: Option<&'a str>,
    ) -> impl Iterator<Item = (f64, f64)> + 'a {
        let key = y_axis_id.or(self.y_axis_id.as_deref()).unwrap_or("y");
        self.data.iter().enumerate().filter_map(move |(i, d)| match d.as_ref()? {
            Datum::Value(y) => {
                let x = match labels.get(i) {
                    Some(CategoryLabel::Time(t)) => t.timestamp_millis() as f64,
                    _ => i as f64,
                };
                Some((x, *y))
            }
            Datum::Point(p) => Some((p.x.unwrap_or(i as f64), p.value(key)?)),
            Datum::Unusable => None,
        })
    }
}
