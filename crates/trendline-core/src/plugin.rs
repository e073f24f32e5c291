// File: crates/trendline-core/src/plugin.rs
// Summary: Trendline pass orchestration: aggregate groups, per-dataset trendlines, then labels.
// Notes:
// - A pass owns its fitters and label state; nothing survives to the next pass.
// - A failing trendline is logged and reported, never propagated to the host.

use crate::color::CssColor;
use crate::config::{AggregateGroup, TrendlinePluginOptions, TrendlineSpec};
use crate::dataset::Dataset;
use crate::error::TrendlineError;
use crate::fit::{create_fitter, Fitter};
use crate::frame::Frame;
use crate::label::{LabelDraw, LabelPlacer, TrendlineOrigin};
use crate::path::{curve_geometry, draw_curve};
use crate::text::TextRenderer;

/// A trendline left out of the pass, and why.
#[derive(Clone, Debug, PartialEq)]
pub struct SkippedTrendline {
    pub origin: TrendlineOrigin,
    pub error: TrendlineError,
}

/// What one pass drew. Hosts are free to ignore it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PassReport {
    pub curves_drawn: usize,
    pub skipped: Vec<SkippedTrendline>,
    /// Accepted labels in draw order.
    pub labels: Vec<LabelDraw>,
    pub dropped_labels: usize,
}

#[derive(Clone, Debug, Default)]
pub struct TrendlinePlugin {
    pub options: TrendlinePluginOptions,
}

impl TrendlinePlugin {
    pub fn new(options: TrendlinePluginOptions) -> Self {
        Self { options }
    }

    /// Runs one full pass over `datasets` onto `frame`. Call after the host has drawn its series.
    pub fn run(&self, frame: &Frame<'_>, datasets: &[Dataset], text: &dyn TextRenderer) -> PassReport {
        let mut pass = Pass { frame, text, placer: LabelPlacer::new(), report: PassReport::default() };

        for (index, group) in self.options.aggregate_multiple.iter().enumerate() {
            if let Some((fitter, color)) = aggregate_fitter(group, datasets, frame) {
                pass.trendline(fitter, &group.trendline, color, TrendlineOrigin::Aggregate { group: index });
            }
        }

        for (d, dataset) in datasets.iter().enumerate() {
            if dataset.hidden || dataset.data.is_empty() {
                continue;
            }
            for (t, spec) in dataset.trendline.iter().enumerate() {
                let Some(mut fitter) = create_fitter(spec) else { continue };
                fitter.extend(dataset.points(frame.labels, None));
                let origin = TrendlineOrigin::Dataset { dataset: d, trendline: t };
                pass.trendline(fitter, spec, dataset.border_color, origin);
            }
        }

        pass.finish()
    }
}

/// Pools every non-empty dataset carrying the group's key. The first member lends its color.
/// A group with no members is skipped without a report.
fn aggregate_fitter(
    group: &AggregateGroup,
    datasets: &[Dataset],
    frame: &Frame<'_>,
) -> Option<(Fitter, Option<CssColor>)> {
    let mut members = datasets
        .iter()
        .filter(|d| !d.data.is_empty() && d.y_axis_key.as_deref() == Some(group.y_axis_key.as_str()))
        .peekable();
    let color = members.peek()?.border_color;
    let mut fitter = create_fitter(&group.trendline)?;
    for dataset in members {
        fitter.extend(dataset.points(frame.labels, group.y_axis_id.as_deref()));
    }
    Some((fitter, color))
}

struct Pass<'p, 'f> {
    frame: &'p Frame<'f>,
    text: &'p dyn TextRenderer,
    placer: LabelPlacer,
    report: PassReport,
}

impl Pass<'_, '_> {
    fn trendline(&mut self, fitter: Fitter, spec: &TrendlineSpec, color: Option<CssColor>, origin: TrendlineOrigin) {
        let geom = match fitter.check().and_then(|()| curve_geometry(&fitter, spec, self.frame)) {
            Ok(geom) => geom,
            Err(error) => {
                log::warn!("skipping trendline {origin:?}: {error}");
                self.report.skipped.push(SkippedTrendline { origin, error });
                return;
            }
        };

        draw_curve(self.frame, &fitter, spec, &geom, color);
        self.report.curves_drawn += 1;

        if let Some(label) = spec.displayed_label() {
            self.placer.place(self.frame, &fitter, &geom, label, origin, self.text);
        }
    }

    fn finish(self) -> PassReport {
        let Pass { frame, text, placer, mut report } = self;
        report.dropped_labels = placer.dropped();
        report.labels = placer.flush(frame.canvas, text);
        log::debug!(
            "trendline pass: {} drawn, {} skipped, {} labels ({} dropped)",
            report.curves_drawn,
            report.skipped.len(),
            report.labels.len(),
            report.dropped_labels
        );
        report
    }
}
