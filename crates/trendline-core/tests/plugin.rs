// File: crates/trendline-core/tests/plugin.rs
// Purpose: End-to-end trendline passes over raster surfaces: curves, skips, aggregates, canvas state.

mod common;

use common::Harness;
use skia_safe as skia;
use trendline_core::config::{AggregateGroup, FillColor, LabelSpec, LabelText};
use trendline_core::{
    Axis, CssColor, Dataset, TrendlineError, TrendlineKind, TrendlineOrigin, TrendlinePlugin,
    TrendlinePluginOptions, TrendlineSpec,
};

const RED: CssColor = CssColor::from_argb(255, 255, 0, 0);
const BLUE: CssColor = CssColor::from_argb(255, 0, 0, 255);

fn harness() -> Harness {
    Harness::new(400, 300, Axis::new("X", 0.0, 10.0), Axis::new("Y", 0.0, 100.0))
}

fn thick(kind: TrendlineKind) -> TrendlineSpec {
    TrendlineSpec { width: 6.0, ..TrendlineSpec::new(kind) }
}

fn is_red(px: [u8; 4]) -> bool {
    px[0] >= 200 && px[1] <= 60 && px[2] <= 60
}

fn is_blue(px: [u8; 4]) -> bool {
    px[2] >= 200 && px[0] <= 60 && px[1] <= 60
}

#[test]
fn linear_trendline_is_stroked_in_dataset_color() {
    let mut h = harness();
    let ds = Dataset::from_xy("up", (0..=10).map(|i| (i as f64, i as f64 * 10.0)))
        .with_color(RED)
        .with_trendline(thick(TrendlineKind::LinearRegression));
    let report = h.run(&TrendlinePlugin::default(), &[ds]);

    assert_eq!(report.curves_drawn, 1);
    assert!(report.skipped.is_empty());
    // (5, 50) maps to the center of the 360x260 area
    assert!(is_red(h.pixel(200, 150)));
    assert!(h.is_white(200, 60));
}

#[test]
fn disabled_and_untyped_specs_draw_nothing() {
    let mut h = harness();
    let off = TrendlineSpec { show: false, ..thick(TrendlineKind::Average) };
    let untyped = TrendlineSpec { kind: None, ..thick(TrendlineKind::Average) };
    let ds = Dataset::from_xy("a", [(0.0, 50.0), (10.0, 50.0)])
        .with_color(RED)
        .with_trendline(off)
        .with_trendline(untyped);
    let report = h.run(&TrendlinePlugin::default(), &[ds]);

    assert_eq!(report.curves_drawn, 0);
    assert!(report.skipped.is_empty());
    assert!(h.is_white(200, 150));
}

#[test]
fn a_dataset_may_carry_several_trendlines() {
    let mut h = harness();
    let ds = Dataset::from_xy("a", [(0.0, 20.0), (10.0, 80.0)])
        .with_trendline(thick(TrendlineKind::Average).with_color(BLUE))
        .with_trendline(thick(TrendlineKind::Max).with_color(RED));
    let report = h.run(&TrendlinePlugin::default(), &[ds]);

    assert_eq!(report.curves_drawn, 2);
    // average 50 -> y 150, max 80 -> y 72
    assert!(is_blue(h.pixel(100, 150)));
    assert!(is_red(h.pixel(100, 72)));
}

#[test]
fn unusable_trendlines_are_skipped_and_reported() {
    let mut h = harness();
    let datasets = [
        Dataset::from_xy("single", [(1.0, 1.0)]).with_trendline(thick(TrendlineKind::LinearRegression)),
        Dataset::from_xy("negative", [(1.0, -1.0), (2.0, -2.0)])
            .with_trendline(thick(TrendlineKind::ExponentialRegression)),
        Dataset::from_xy("fine", [(0.0, 50.0), (10.0, 50.0)])
            .with_color(RED)
            .with_trendline(thick(TrendlineKind::Average)),
    ];
    let report = h.run(&TrendlinePlugin::default(), &datasets);

    assert_eq!(report.curves_drawn, 1);
    assert_eq!(report.skipped.len(), 2);
    assert_eq!(report.skipped[0].origin, TrendlineOrigin::Dataset { dataset: 0, trendline: 0 });
    assert_eq!(
        report.skipped[0].error,
        TrendlineError::InsufficientData { kind: TrendlineKind::LinearRegression, points: 1 }
    );
    assert_eq!(report.skipped[1].origin, TrendlineOrigin::Dataset { dataset: 1, trendline: 0 });
    assert!(matches!(report.skipped[1].error, TrendlineError::DomainViolation { .. }));
    assert!(is_red(h.pixel(200, 150)));
}

#[test]
fn non_finite_endpoints_abort_the_curve() {
    let mut h = Harness::new(400, 300, Axis::new("X", 0.0, 10.0), Axis::log10("Y", 1.0, 100.0));
    let ds = Dataset::from_xy("below zero", [(0.0, -5.0), (10.0, -5.0)])
        .with_trendline(thick(TrendlineKind::Average));
    let report = h.run(&TrendlinePlugin::default(), &[ds]);

    assert_eq!(report.curves_drawn, 0);
    assert_eq!(report.skipped[0].error, TrendlineError::NonFinitePixel { kind: TrendlineKind::Average });
}

#[test]
fn hidden_and_empty_datasets_get_no_trendlines() {
    let mut h = harness();
    let mut hidden = Dataset::from_xy("hidden", [(0.0, 50.0), (10.0, 50.0)])
        .with_trendline(thick(TrendlineKind::Average));
    hidden.hidden = true;
    let empty = Dataset::new("empty").with_trendline(thick(TrendlineKind::Average));
    let report = h.run(&TrendlinePlugin::default(), &[hidden, empty]);

    assert_eq!(report.curves_drawn, 0);
    assert!(report.skipped.is_empty());
}

#[test]
fn projection_extends_to_the_visible_range() {
    let projected = Dataset::from_xy("p", [(4.0, 50.0), (6.0, 50.0)])
        .with_color(RED)
        .with_trendline(thick(TrendlineKind::Average));
    let mut h = harness();
    h.run(&TrendlinePlugin::default(), &[projected]);
    assert!(is_red(h.pixel(30, 150)));
    assert!(is_red(h.pixel(370, 150)));

    let observed = Dataset::from_xy("o", [(4.0, 50.0), (6.0, 50.0)])
        .with_color(RED)
        .with_trendline(TrendlineSpec { projection: false, ..thick(TrendlineKind::Average) });
    let mut h = harness();
    h.run(&TrendlinePlugin::default(), &[observed]);
    assert!(h.is_white(30, 150));
    assert!(is_red(h.pixel(200, 150)));
}

#[test]
fn logarithmic_projection_starts_at_smallest_positive_x() {
    let mut h = harness();
    let ds = Dataset::from_xy("log", [(-2.0, 0.0), (1.0, 10.0), (2.0, 30.0), (4.0, 50.0), (8.0, 70.0)])
        .with_color(RED)
        .with_trendline(thick(TrendlineKind::LogarithmicRegression));
    let report = h.run(&TrendlinePlugin::default(), &[ds]);

    assert_eq!(report.curves_drawn, 1);
    assert!(report.skipped.is_empty());
    // nothing is drawn left of x = 1 (pixel 56)
    for y in (20..280).step_by(10) {
        assert!(h.is_white(40, y), "pixel (40, {y}) was painted");
    }
}

#[test]
fn fill_covers_the_area_below_the_curve() {
    let mut h = harness();
    let spec = TrendlineSpec {
        fill_color: FillColor::Color(CssColor::from_argb(255, 0, 255, 0)),
        ..thick(TrendlineKind::Average).with_color(RED)
    };
    let ds = Dataset::from_xy("a", [(0.0, 50.0), (10.0, 50.0)]).with_trendline(spec);
    h.run(&TrendlinePlugin::default(), &[ds]);

    assert_eq!(h.pixel(200, 220), [0, 255, 0, 255]);
    assert!(h.is_white(200, 80));
    assert!(is_red(h.pixel(200, 150)));
    // clipped to the plotting area
    assert!(h.is_white(200, 290));
}

#[test]
fn gradient_runs_from_color_min_to_color_max() {
    let mut h = harness();
    let spec = TrendlineSpec { color_max: Some(BLUE), ..thick(TrendlineKind::Average).with_color(RED) };
    let ds = Dataset::from_xy("a", [(0.0, 50.0), (10.0, 50.0)]).with_trendline(spec);
    h.run(&TrendlinePlugin::default(), &[ds]);

    assert!(is_red(h.pixel(22, 150)));
    assert!(is_blue(h.pixel(377, 150)));
}

#[test]
fn aggregate_pools_datasets_sharing_a_key() {
    let mut h = harness();
    let mut far = Dataset::from_xy("far", [(10.0, 100.0)]).with_axis_key("k");
    far.hidden = true;
    let datasets = [
        Dataset::from_xy("near", [(0.0, 0.0)]).with_axis_key("k").with_color(BLUE),
        far,
        Dataset::from_xy("other", [(5.0, 0.0)]).with_axis_key("z"),
    ];
    let trendline = TrendlineSpec { projection: false, ..thick(TrendlineKind::LinearRegression) }
        .with_label(LabelSpec::new(LabelText::computed(|s| format!("{:.2}", s.slope))));
    let options = TrendlinePluginOptions {
        aggregate_multiple: vec![AggregateGroup { trendline, y_axis_key: "k".into(), y_axis_id: None }],
    };
    let report = h.run(&TrendlinePlugin::new(options), &datasets);

    assert_eq!(report.curves_drawn, 1);
    assert_eq!(report.labels.len(), 1);
    assert_eq!(report.labels[0].origin, TrendlineOrigin::Aggregate { group: 0 });
    assert_eq!(report.labels[0].text, "10.00");
    assert!(is_blue(h.pixel(200, 150)));
}

#[test]
fn aggregate_reads_the_group_axis_field() {
    let mut h = harness();
    let records: Dataset = serde_json::from_str(
        r#"{ "yAxisKey": "k", "data": [ {"x": 0, "y": 0, "load": 50}, {"x": 10, "y": 100, "load": 50} ] }"#,
    )
    .unwrap();
    let group = |y_axis_id: &str| AggregateGroup {
        trendline: TrendlineSpec { projection: false, ..TrendlineSpec::new(TrendlineKind::LinearRegression) }
            .with_label(LabelSpec::new(LabelText::computed(|s| format!("{:.1}", s.slope)))),
        y_axis_key: "k".into(),
        y_axis_id: Some(y_axis_id.into()),
    };
    let options = TrendlinePluginOptions { aggregate_multiple: vec![group("load"), group("y")] };
    let report = h.run(&TrendlinePlugin::new(options), &[records]);

    let texts: Vec<_> = report.labels.iter().map(|l| l.text.as_str()).collect();
    assert_eq!(texts, ["0.0", "10.0"]);
}

#[test]
fn aggregate_group_without_members_is_skipped_silently() {
    let mut h = harness();
    let group = |key: &str| AggregateGroup {
        trendline: thick(TrendlineKind::LinearRegression),
        y_axis_key: key.into(),
        y_axis_id: None,
    };
    let datasets = [
        Dataset::from_xy("k", [(0.0, 0.0), (10.0, 100.0)]).with_axis_key("k"),
        Dataset::new("empty").with_axis_key("empty"),
    ];
    let options = TrendlinePluginOptions { aggregate_multiple: vec![group("missing"), group("empty"), group("k")] };
    let report = h.run(&TrendlinePlugin::new(options), &datasets);

    assert_eq!(report.curves_drawn, 1);
    assert!(report.skipped.is_empty(), "{:?}", report.skipped);
}

#[test]
fn canvas_state_is_restored() {
    let mut h = harness();
    let before = h.surface.canvas().save_count();
    let ds = Dataset::from_xy("a", [(0.0, 50.0), (10.0, 50.0)])
        .with_trendline(thick(TrendlineKind::Average).with_label(LabelSpec::new("avg")));
    let broken = Dataset::from_xy("b", [(1.0, 1.0)]).with_trendline(thick(TrendlineKind::LinearRegression));
    h.run(&TrendlinePlugin::default(), &[ds, broken]);
    assert_eq!(h.surface.canvas().save_count(), before);

    // the plotting-area clip must not leak: paint outside it
    let mut paint = skia::Paint::default();
    paint.set_color(skia::Color::BLACK);
    h.surface.canvas().draw_rect(skia::Rect::from_xywh(2.0, 2.0, 6.0, 6.0), &paint);
    assert_eq!(h.pixel(4, 4), [0, 0, 0, 255]);
}
