// File: crates/trendline-core/tests/labels.rs
// Purpose: Label placement: collisions, anchoring, staggering, text, and draw order.

mod common;

use common::Harness;
use trendline_core::config::{LabelSpec, LabelText};
use trendline_core::{Axis, CssColor, Dataset, TrendlineKind, TrendlineOrigin, TrendlinePlugin, TrendlineSpec};

fn harness() -> Harness {
    Harness::new(400, 300, Axis::new("X", 0.0, 10.0), Axis::new("Y", 0.0, 100.0))
}

fn flat(label: &str, y: f64, text: &str) -> Dataset {
    let spec = TrendlineSpec { projection: false, ..TrendlineSpec::new(TrendlineKind::Average) }
        .with_label(LabelSpec::new(text));
    Dataset::from_xy(label, [(0.0, y), (10.0, y)]).with_trendline(spec)
}

#[test]
fn overlapping_labels_keep_only_the_first() {
    let mut h = harness();
    let datasets = [flat("a", 50.0, "first"), flat("b", 50.0, "second")];
    let report = h.run(&TrendlinePlugin::default(), &datasets);

    assert_eq!(report.curves_drawn, 2);
    assert_eq!(report.labels.len(), 1);
    assert_eq!(report.dropped_labels, 1);
    assert_eq!(report.labels[0].text, "first");
    assert_eq!(report.labels[0].origin, TrendlineOrigin::Dataset { dataset: 0, trendline: 0 });
}

#[test]
fn separated_labels_are_all_drawn() {
    let mut h = harness();
    let datasets = [flat("a", 10.0, "low"), flat("b", 90.0, "high")];
    let report = h.run(&TrendlinePlugin::default(), &datasets);

    assert_eq!(report.labels.len(), 2);
    assert_eq!(report.dropped_labels, 0);
    assert!(!report.labels[0].rect.overlaps(&report.labels[1].rect));
}

#[test]
fn placement_is_idempotent() {
    let datasets = [flat("a", 50.0, "one"), flat("b", 52.0, "two"), flat("c", 90.0, "three")];
    let first = harness().run(&TrendlinePlugin::default(), &datasets);
    let second = harness().run(&TrendlinePlugin::default(), &datasets);
    assert_eq!(first.labels, second.labels);
    assert_eq!(first.dropped_labels, second.dropped_labels);
}

#[test]
fn anchor_follows_position_ratio_and_measures_text() {
    let mut h = harness();
    let report = h.run(&TrendlinePlugin::default(), &[flat("a", 50.0, "abcd")]);
    let rect = report.labels[0].rect;

    // x = 0.85 of 0..10 -> 20 + 0.85 * 360; y = 50 -> 150
    assert!((rect.x + rect.width / 2.0 - 326.0).abs() < 1e-3);
    assert!((rect.y + rect.height / 2.0 - 150.0).abs() < 1e-3);
    // 4 chars * 6px + 5 + 5 padding; 10px font + 2 + 2 padding
    assert_eq!(rect.width, 34.0);
    assert_eq!(rect.height, 14.0);
}

#[test]
fn anchor_is_clamped_into_observed_domain() {
    let mut h = Harness::new(400, 300, Axis::new("X", 0.0, 20.0), Axis::new("Y", 0.0, 100.0));
    let spec = TrendlineSpec::new(TrendlineKind::Average).with_label(LabelSpec::new("avg"));
    let ds = Dataset::from_xy("a", [(0.0, 50.0), (10.0, 50.0)]).with_trendline(spec);
    let report = h.run(&TrendlinePlugin::default(), &[ds]);

    // projected domain is 0..20, so 0.85 lands at 17 and is pulled back to 10
    let rect = report.labels[0].rect;
    assert!((rect.x + rect.width / 2.0 - 200.0).abs() < 1e-3);
}

#[test]
fn offsets_stagger_by_dataset_and_trendline_index() {
    let mut h = harness();
    let labelled = |y: f64| {
        let label = LabelSpec { offset: 10.0, ..LabelSpec::new("x") };
        let spec = TrendlineSpec { projection: false, ..TrendlineSpec::new(TrendlineKind::Average) }.with_label(label);
        Dataset::from_xy("d", [(0.0, y), (10.0, y)]).with_trendline(spec)
    };
    let report = h.run(&TrendlinePlugin::default(), &[labelled(90.0), labelled(10.0)]);
    let center_y = |i: usize| report.labels[i].rect.y + report.labels[i].rect.height / 2.0;

    // y = 90 -> 46, y = 10 -> 254
    assert!((center_y(0) - (46.0 + 10.0)).abs() < 1e-3);
    assert!((center_y(1) - (254.0 + 15.0)).abs() < 1e-3);
}

#[test]
fn computed_text_sees_fit_statistics() {
    let mut h = harness();
    let label = LabelSpec::new(LabelText::computed(|s| format!("  slope {:.1} avg {:.0}  ", s.slope, s.average_y)));
    let spec = TrendlineSpec { projection: false, ..TrendlineSpec::new(TrendlineKind::LinearRegression) }
        .with_label(label);
    let ds = Dataset::from_xy("a", [(0.0, 10.0), (5.0, 20.0), (10.0, 30.0)]).with_trendline(spec);
    let report = h.run(&TrendlinePlugin::default(), &[ds]);
    assert_eq!(report.labels[0].text, "slope 2.0 avg 20");
}

#[test]
fn hidden_label_is_not_placed() {
    let mut h = harness();
    let label = LabelSpec { display: false, ..LabelSpec::new("hidden") };
    let ds = Dataset::from_xy("a", [(0.0, 50.0), (10.0, 50.0)])
        .with_trendline(TrendlineSpec::new(TrendlineKind::Average).with_label(label));
    let report = h.run(&TrendlinePlugin::default(), &[ds]);
    assert_eq!(report.curves_drawn, 1);
    assert!(report.labels.is_empty());
    assert_eq!(report.dropped_labels, 0);
}

#[test]
fn labels_are_drawn_above_every_curve() {
    let mut h = harness();
    let thick_red = TrendlineSpec { width: 8.0, ..TrendlineSpec::new(TrendlineKind::Average) }
        .with_color(CssColor::from_argb(255, 255, 0, 0));
    let datasets = [
        flat("labelled", 50.0, "on top"),
        Dataset::from_xy("crossing", [(0.0, 50.0), (10.0, 50.0)]).with_trendline(thick_red),
    ];
    let report = h.run(&TrendlinePlugin::default(), &datasets);
    assert_eq!(report.labels.len(), 1);

    let rect = report.labels[0].rect;
    let (cx, cy) = ((rect.x + rect.width / 2.0) as i32, (rect.y + rect.height / 2.0) as i32);
    assert_eq!(h.pixel(cx, cy), [0x57, 0x58, 0x59, 255]);
}

#[test]
fn explicit_zero_border_width_draws_no_border() {
    let red = CssColor::from_argb(255, 255, 0, 0);
    let bordered = |width: f32| {
        let label = LabelSpec { border_width: Some(width), border_color: red, ..LabelSpec::new("abcd") };
        let spec = TrendlineSpec { projection: false, ..TrendlineSpec::new(TrendlineKind::Average) }.with_label(label);
        Dataset::from_xy("a", [(0.0, 50.0), (10.0, 50.0)]).with_trendline(spec)
    };

    // label box spans x 309..343, y 143..157; (309, 147) is its left edge, clear of the curve and text
    let mut h = harness();
    h.run(&TrendlinePlugin::default(), &[bordered(0.0)]);
    assert!(h.is_white(309, 147), "got {:?}", h.pixel(309, 147));

    let mut h = harness();
    h.run(&TrendlinePlugin::default(), &[bordered(2.0)]);
    let px = h.pixel(309, 147);
    assert!(px[0] > 200 && px[1] < 100 && px[2] < 100, "got {px:?}");
}
