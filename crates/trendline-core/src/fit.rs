// File: crates/trendline-core/src/fit.rs
// Summary: Curve fitters (least squares, log, exp, polynomial) and statistical reducers.
// Notes:
// - Each `Fitter` is owned by exactly one render pass and discarded with it.
// - Non-finite points are ignored on `add`; `check` decides whether `f` is usable.

use std::cell::OnceCell;

use crate::config::{TrendlineKind, TrendlineSpec};
use crate::error::TrendlineError;

/// Pivots smaller than this are skipped during elimination.
const PIVOT_EPSILON: f64 = 1e-12;

/// Snapshot handed to computed label text.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FitStatistics {
    /// Rise over run of the fitted curve across the drawn domain.
    pub slope: f64,
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
    pub average_y: f64,
    /// Only tracked by the median fitter.
    pub median_y: Option<f64>,
}

/// Running ordinary-least-squares sums.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearFit {
    sum_x: f64,
    sum_y: f64,
    sum_x2: f64,
    sum_xy: f64,
    n: usize,
    min_x: f64,
    max_x: f64,
}

impl Default for LinearFit {
    fn default() -> Self {
        Self {
            sum_x: 0.0,
            sum_y: 0.0,
            sum_x2: 0.0,
            sum_xy: 0.0,
            n: 0,
            min_x: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
        }
    }
}

impl LinearFit {
    pub fn push(&mut self, x: f64, y: f64) {
        self.sum_x += x;
        self.sum_y += y;
        self.sum_x2 += x * x;
        self.sum_xy += x * y;
        self.n += 1;
        self.min_x = self.min_x.min(x);
        self.max_x = self.max_x.max(x);
    }

    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// At least two points with distinct x, so the slope denominator is non-zero.
    pub fn is_determined(&self) -> bool {
        self.n >= 2 && self.max_x > self.min_x
    }

    pub fn slope(&self) -> f64 {
        let n = self.n as f64;
        let denom = n * self.sum_x2 - self.sum_x * self.sum_x;
        (n * self.sum_xy - self.sum_x * self.sum_y) / denom
    }

    pub fn intercept(&self) -> f64 {
        (self.sum_y - self.slope() * self.sum_x) / self.n as f64
    }

    pub fn predict(&self, x: f64) -> f64 {
        self.slope() * x + self.intercept()
    }

    fn check(&self, kind: TrendlineKind) -> Result<(), TrendlineError> {
        if self.is_determined() {
            Ok(())
        } else {
            Err(TrendlineError::InsufficientData { kind, points: self.n })
        }
    }
}

/// `y = a + b·ln(x)`, fitted over points with `x > 0`.
#[derive(Clone, Debug, Default)]
pub struct LogarithmicFit {
    lin: LinearFit,
    min_positive_x: Option<f64>,
}

impl LogarithmicFit {
    fn push(&mut self, x: f64, y: f64) {
        if x > 0.0 {
            self.lin.push(x.ln(), y);
            self.min_positive_x = Some(self.min_positive_x.map_or(x, |m| m.min(x)));
        }
    }

    fn predict(&self, x: f64) -> f64 {
        if x <= 0.0 { f64::NAN } else { self.lin.predict(x.ln()) }
    }
}

/// `y = a·e^(b·x)`, fitted over points with `y > 0`.
#[derive(Clone, Debug, Default)]
pub struct ExponentialFit {
    lin: LinearFit,
}

impl ExponentialFit {
    fn push(&mut self, x: f64, y: f64) {
        if y > 0.0 {
            self.lin.push(x, y.ln());
        }
    }

    fn predict(&self, x: f64) -> f64 {
        self.lin.predict(x).exp()
    }
}

/// Least-squares polynomial; coefficients are solved lazily and dropped on `push`.
#[derive(Clone, Debug)]
pub struct PolynomialFit {
    order: usize,
    xs: Vec<f64>,
    ys: Vec<f64>,
    coefficients: OnceCell<Vec<f64>>,
}

impl PolynomialFit {
    pub fn new(order: usize) -> Self {
        Self { order: order.max(1), xs: Vec::new(), ys: Vec::new(), coefficients: OnceCell::new() }
    }

    fn push(&mut self, x: f64, y: f64) {
        self.xs.push(x);
        self.ys.push(y);
        self.coefficients.take();
    }

    /// Coefficients in ascending power order (`c0 + c1·x + ...`).
    pub fn coefficients(&self) -> &[f64] {
        self.coefficients
            .get_or_init(|| solve_normal_equations(&self.xs, &self.ys, self.order))
    }

    fn predict(&self, x: f64) -> f64 {
        // Horner
        self.coefficients().iter().rev().fold(0.0, |acc, c| acc * x + c)
    }
}

/// Builds `A[i][j] = Σ x^(i+j)`, `b[i] = Σ y·x^i` and solves `A·c = b`.
pub fn solve_normal_equations(xs: &[f64], ys: &[f64], order: usize) -> Vec<f64> {
    let size = order + 1;
    let mut a = vec![vec![0.0f64; size]; size];
    let mut b = vec![0.0f64; size];
    let mut powers = vec![1.0f64; 2 * order + 1];

    for (&x, &y) in xs.iter().zip(ys) {
        for p in 1..powers.len() {
            powers[p] = powers[p - 1] * x;
        }
        for i in 0..size {
            for j in 0..size {
                a[i][j] += powers[i + j];
            }
            b[i] += y * powers[i];
        }
    }
    gaussian_eliminate(a, b)
}

/// Gaussian elimination with partial pivoting. A column whose best pivot is
/// below `PIVOT_EPSILON` is left unreduced and its coefficient keeps the
/// back-substituted partial sum.
fn gaussian_eliminate(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Vec<f64> {
    let n = b.len();
    for k in 0..n {
        let mut pivot_row = k;
        for i in (k + 1)..n {
            if a[i][k].abs() > a[pivot_row][k].abs() {
                pivot_row = i;
            }
        }
        if pivot_row != k {
            a.swap(k, pivot_row);
            b.swap(k, pivot_row);
        }

        let pivot = a[k][k];
        if pivot.abs() < PIVOT_EPSILON {
            continue;
        }
        for j in k..n {
            a[k][j] /= pivot;
        }
        b[k] /= pivot;

        for i in (k + 1)..n {
            let factor = a[i][k];
            if factor == 0.0 {
                continue;
            }
            for j in k..n {
                a[i][j] -= factor * a[k][j];
            }
            b[i] -= factor * b[k];
        }
    }

    let mut coeffs = vec![0.0f64; n];
    for i in (0..n).rev() {
        let mut sum = b[i];
        for j in (i + 1)..n {
            sum -= a[i][j] * coeffs[j];
        }
        coeffs[i] = sum;
    }
    coeffs
}

#[derive(Clone, Debug, Default)]
pub struct MedianFit {
    ys: Vec<f64>,
    median: OnceCell<f64>,
}

impl MedianFit {
    fn push(&mut self, y: f64) {
        self.ys.push(y);
        self.median.take();
    }

    pub fn median(&self) -> f64 {
        *self.median.get_or_init(|| {
            let mut sorted = self.ys.clone();
            sorted.sort_by(f64::total_cmp);
            let n = sorted.len();
            match n {
                0 => f64::NAN,
                _ if n % 2 == 0 => (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0,
                _ => sorted[n / 2],
            }
        })
    }
}

#[derive(Clone, Debug)]
enum Model {
    Linear(LinearFit),
    Logarithmic(LogarithmicFit),
    Exponential(ExponentialFit),
    Polynomial(PolynomialFit),
    Average,
    Max,
    Min,
    Median(MedianFit),
}

/// Observed bounds over every finite point added, whatever the model keeps.
#[derive(Clone, Debug)]
struct Extent {
    count: usize,
    min_x: f64,
    max_x: f64,
    min_y: f64,
    max_y: f64,
    sum_y: f64,
}

impl Default for Extent {
    fn default() -> Self {
        Self {
            count: 0,
            min_x: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            min_y: f64::INFINITY,
            max_y: f64::NEG_INFINITY,
            sum_y: 0.0,
        }
    }
}

/// A fitted curve `f(x) -> y` learned incrementally from `(x, y)` points.
#[derive(Clone, Debug)]
pub struct Fitter {
    kind: TrendlineKind,
    model: Model,
    extent: Extent,
}

/// Builds the fitter for an enabled spec; disabled or untyped specs get none.
pub fn create_fitter(spec: &TrendlineSpec) -> Option<Fitter> {
    spec.enabled_kind()
        .map(|kind| Fitter::new(kind, spec.polynomial_order as usize))
}

impl Fitter {
    /// `polynomial_order` only matters for polynomial fits; 0 is raised to 1.
    pub fn new(kind: TrendlineKind, polynomial_order: usize) -> Self {
        let model = match kind {
            TrendlineKind::LinearRegression => Model::Linear(LinearFit::default()),
            TrendlineKind::LogarithmicRegression => Model::Logarithmic(LogarithmicFit::default()),
            TrendlineKind::ExponentialRegression => Model::Exponential(ExponentialFit::default()),
            TrendlineKind::PolynomialRegression => Model::Polynomial(PolynomialFit::new(polynomial_order)),
            TrendlineKind::Average => Model::Average,
            TrendlineKind::Max => Model::Max,
            TrendlineKind::Min => Model::Min,
            TrendlineKind::Median => Model::Median(MedianFit::default()),
        };
        Self { kind, model, extent: Extent::default() }
    }

    pub fn kind(&self) -> TrendlineKind {
        self.kind
    }

    /// Adds one observation; pairs with a non-finite coordinate are ignored.
    pub fn add(&mut self, x: f64, y: f64) {
        if !x.is_finite() || !y.is_finite() {
            return;
        }
        let e = &mut self.extent;
        e.count += 1;
        e.min_x = e.min_x.min(x);
        e.max_x = e.max_x.max(x);
        e.min_y = e.min_y.min(y);
        e.max_y = e.max_y.max(y);
        e.sum_y += y;

        match &mut self.model {
            Model::Linear(lin) => lin.push(x, y),
            Model::Logarithmic(m) => m.push(x, y),
            Model::Exponential(m) => m.push(x, y),
            Model::Polynomial(m) => m.push(x, y),
            Model::Median(m) => m.push(y),
            Model::Average | Model::Max | Model::Min => {}
        }
    }

    pub fn extend<I: IntoIterator<Item = (f64, f64)>>(&mut self, points: I) {
        for (x, y) in points {
            self.add(x, y);
        }
    }

    /// Fitted value at `x`. Only meaningful once `check` passes.
    pub fn f(&self, x: f64) -> f64 {
        match &self.model {
            Model::Linear(lin) => lin.predict(x),
            Model::Logarithmic(m) => m.predict(x),
            Model::Exponential(m) => m.predict(x),
            Model::Polynomial(m) => m.predict(x),
            Model::Average => self.average_y(),
            Model::Max => self.extent.max_y,
            Model::Min => self.extent.min_y,
            Model::Median(m) => m.median(),
        }
    }

    /// Whether `f` can be drawn: enough points, inside the model's domain, solvable.
    pub fn check(&self) -> Result<(), TrendlineError> {
        let kind = self.kind;
        match &self.model {
            Model::Linear(lin) => lin.check(kind),
            Model::Logarithmic(m) if m.lin.is_empty() => {
                Err(TrendlineError::DomainViolation { kind, requirement: "x > 0" })
            }
            Model::Logarithmic(m) => m.lin.check(kind),
            Model::Exponential(m) if m.lin.is_empty() => {
                Err(TrendlineError::DomainViolation { kind, requirement: "y > 0" })
            }
            Model::Exponential(m) => m.lin.check(kind),
            Model::Polynomial(m) => {
                if self.extent.count < 2 || self.extent.max_x <= self.extent.min_x {
                    Err(TrendlineError::InsufficientData { kind, points: self.extent.count })
                } else if m.coefficients().iter().any(|c| !c.is_finite()) {
                    Err(TrendlineError::SingularSystem { kind })
                } else {
                    Ok(())
                }
            }
            Model::Average | Model::Max | Model::Min | Model::Median(_) => {
                if self.extent.count < 2 {
                    Err(TrendlineError::InsufficientData { kind, points: self.extent.count })
                } else {
                    Ok(())
                }
            }
        }
    }

    /// Number of finite points added (including ones outside the model's domain).
    pub fn len(&self) -> usize {
        self.extent.count
    }

    pub fn is_empty(&self) -> bool {
        self.extent.count == 0
    }

    pub fn min_x(&self) -> f64 { self.extent.min_x }
    pub fn max_x(&self) -> f64 { self.extent.max_x }
    pub fn min_y(&self) -> f64 { self.extent.min_y }
    pub fn max_y(&self) -> f64 { self.extent.max_y }

    pub fn average_y(&self) -> f64 {
        self.extent.sum_y / self.extent.count as f64
    }

    pub fn median_y(&self) -> Option<f64> {
        match &self.model {
            Model::Median(m) => Some(m.median()),
            _ => None,
        }
    }

    /// Range of x the fit is defined over; logarithmic fits start at the smallest positive x.
    pub fn observed_domain(&self) -> Option<(f64, f64)> {
        if self.is_empty() {
            return None;
        }
        match &self.model {
            Model::Logarithmic(m) => m.min_positive_x.map(|lo| (lo, self.extent.max_x)),
            _ => Some((self.extent.min_x, self.extent.max_x)),
        }
    }

    /// Underlying least-squares accumulator for linear, logarithmic, and exponential fits.
    pub fn linear_sums(&self) -> Option<&LinearFit> {
        match &self.model {
            Model::Linear(lin) => Some(lin),
            Model::Logarithmic(m) => Some(&m.lin),
            Model::Exponential(m) => Some(&m.lin),
            _ => None,
        }
    }

    pub fn polynomial_coefficients(&self) -> Option<&[f64]> {
        match &self.model {
            Model::Polynomial(m) => Some(m.coefficients()),
            _ => None,
        }
    }

    /// Statistics for label text, with slope measured over `[min_x, max_x]`.
    pub fn statistics(&self, min_x: f64, max_x: f64) -> FitStatistics {
        FitStatistics {
            slope: (self.f(max_x) - self.f(min_x)) / (max_x - min_x),
            min_x,
            max_x,
            min_y: self.min_y(),
            max_y: self.max_y(),
            average_y: self.average_y(),
            median_y: self.median_y(),
        }
    }
}
