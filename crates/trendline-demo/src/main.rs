// File: crates/trendline-demo/src/main.rs
// Summary: Demo loads `series,x,y` CSV rows plus a JSON trendline config and renders a PNG.
// Usage: trendline-demo <data.csv> <trendlines.json> [out.png]

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate};
use serde::Deserialize;
use trendline_core::{
    Axis, Chart, CssColor, Dataset, RenderOptions, TrendlineOrigin, TrendlinePluginOptions, TrendlineSpec,
};

/// Per-series styling and trendlines, keyed by the CSV `series` column.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct SeriesConfig {
    border_color: Option<CssColor>,
    y_axis_key: Option<String>,
    hidden: bool,
    trendline: Vec<TrendlineSpec>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DemoConfig {
    series: BTreeMap<String, SeriesConfig>,
    #[serde(flatten)]
    plugin: TrendlinePluginOptions,
}

/// Rows grouped by series, in first-seen order.
struct Table {
    series: Vec<(String, Vec<(f64, f64)>)>,
    time_x: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let (Some(data_path), Some(config_path)) = (args.next(), args.next()) else {
        anyhow::bail!("usage: trendline-demo <data.csv> <trendlines.json> [out.png]");
    };
    let out = args.next().map(PathBuf::from).unwrap_or_else(|| PathBuf::from("target/out/trendlines.png"));

    let table = load_csv(Path::new(&data_path))
        .with_context(|| format!("failed to load CSV '{data_path}'"))?;
    let config = load_config(Path::new(&config_path))
        .with_context(|| format!("failed to load config '{config_path}'"))?;
    println!("Loaded {} series from {}", table.series.len(), data_path);

    if table.series.is_empty() {
        anyhow::bail!("no rows loaded; expected a `series,x,y` header");
    }

    let chart = build_chart(table, config);
    let report = chart.render_to_png(&RenderOptions::default(), &out)?;

    for skipped in &report.skipped {
        let name = match skipped.origin {
            TrendlineOrigin::Aggregate { group } => format!("aggregate group {group}"),
            TrendlineOrigin::Dataset { dataset, trendline } => {
                format!("{} trendline {trendline}", chart.datasets[dataset].label)
            }
        };
        println!("  skipped {name}: {}", skipped.error);
    }
    println!(
        "Wrote {} ({} trendlines, {} labels, {} labels dropped)",
        out.display(),
        report.curves_drawn,
        report.labels.len(),
        report.dropped_labels
    );
    Ok(())
}

fn load_config(path: &Path) -> Result<DemoConfig> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(serde_json::from_str(&raw)?)
}

fn load_csv(path: &Path) -> Result<Table> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;

    let headers = rdr.headers()?.iter().map(|h| h.to_lowercase()).collect::<Vec<_>>();
    let idx = |name: &str| headers.iter().position(|h| h == name);
    let (Some(i_series), Some(i_x), Some(i_y)) = (idx("series"), idx("x"), idx("y")) else {
        anyhow::bail!("missing one of series/x/y columns in {headers:?}");
    };

    let mut table = Table { series: Vec::new(), time_x: false };
    for (row, rec) in rdr.records().enumerate() {
        let rec = rec?;
        let name = rec.get(i_series).unwrap_or_default();
        let Some((x, is_time)) = rec.get(i_x).and_then(parse_x) else {
            log::warn!("row {}: unreadable x {:?}", row + 1, rec.get(i_x));
            continue;
        };
        let Some(y) = rec.get(i_y).and_then(|s| s.parse::<f64>().ok()) else {
            log::warn!("row {}: unreadable y {:?}", row + 1, rec.get(i_y));
            continue;
        };
        table.time_x |= is_time;

        match table.series.iter_mut().find(|(n, _)| n == name) {
            Some((_, points)) => points.push((x, y)),
            None => table.series.push((name.to_string(), vec![(x, y)])),
        }
    }
    Ok(table)
}

/// Numbers as-is; RFC 3339 timestamps and `YYYY-MM-DD` dates as epoch milliseconds.
fn parse_x(s: &str) -> Option<(f64, bool)> {
    if let Ok(v) = s.parse::<f64>() {
        return Some((v, false));
    }
    if let Ok(t) = DateTime::parse_from_rfc3339(s) {
        return Some((t.timestamp_millis() as f64, true));
    }
    let day = NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()?;
    Some((day.and_hms_opt(0, 0, 0)?.and_utc().timestamp_millis() as f64, true))
}

fn build_chart(table: Table, mut config: DemoConfig) -> Chart {
    let mut chart = Chart::new();
    let (x_range, y_range) = padded_ranges(&table.series);
    chart.x_axis = Axis::new(if table.time_x { "Time" } else { "X" }, x_range.0, x_range.1);
    chart.y_axis = Axis::new("Y", y_range.0, y_range.1);

    for (name, points) in table.series {
        let style = config.series.remove(&name).unwrap_or_default();
        let mut ds = Dataset::from_xy(name, points);
        ds.border_color = style.border_color;
        ds.y_axis_key = style.y_axis_key;
        ds.hidden = style.hidden;
        ds.trendline = style.trendline;
        chart.add_dataset(ds);
    }
    for unused in config.series.keys() {
        log::warn!("config names series {unused:?} which has no rows");
    }
    chart.trendlines = config.plugin;
    chart
}

/// Data extents with 5% headroom on each side.
fn padded_ranges(series: &[(String, Vec<(f64, f64)>)]) -> ((f64, f64), (f64, f64)) {
    let (mut min_x, mut max_x) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut min_y, mut max_y) = (f64::INFINITY, f64::NEG_INFINITY);
    for &(x, y) in series.iter().flat_map(|(_, pts)| pts) {
        min_x = min_x.min(x);
        max_x = max_x.max(x);
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }
    let pad = |lo: f64, hi: f64| {
        let span = (hi - lo).abs().max(1e-9);
        (lo - span * 0.05, hi + span * 0.05)
    };
    (pad(min_x, max_x), pad(min_y, max_y))
}
