// File: crates/trendline-core/src/sample.rs
// Summary: Equally spaced sampling of a domain for curved trendlines.

/// `steps` equally spaced values from `start` to `end` inclusive.
pub fn linspace(start: f64, end: f64, steps: usize) -> Vec<f64> {
    if steps < 2 { return vec![start, end]; }
    let step = (end - start) / (steps as f64 - 1.0);
    (0..steps).map(|i| start + step * i as f64).collect()
}

/// Points of `f` over `[start, end]` split into `segments` equal pieces.
pub fn sample_curve<F: Fn(f64) -> f64>(f: F, start: f64, end: f64, segments: usize) -> Vec<(f64, f64)> {
    linspace(start, end, segments.max(1) + 1)
        .into_iter()
        .map(|x| (x, f(x)))
        .collect()
}
