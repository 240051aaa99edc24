//! Shared fixtures for the end-to-end fitting tests.

use fitkit_core::ParameterSet;
use fitkit_models::{CurveModel, DataPoint, Polynomial};

/// Samples the polynomial with `coefficients` (lowest order first) at `xs`.
pub fn sample(coefficients: &[f64], xs: impl IntoIterator<Item = f64>) -> Vec<DataPoint> {
    let model = Polynomial::new(coefficients.len() - 1);
    xs.into_iter()
        .map(|x| DataPoint::new(x, model.predict(coefficients, x)))
        .collect()
}

/// Parameters `p0..pn` starting at `values`, all with the same step.
pub fn parameters(values: &[f64], step: f64) -> ParameterSet {
    let mut set = ParameterSet::new();
    for (i, &value) in values.iter().enumerate() {
        set.add(format!("p{i}"), value, step)
            .expect("fixture parameters are valid");
    }
    set
}

/// Noisy samples of roughly `y = 1 + 2x`.
pub fn noisy_line() -> Vec<DataPoint> {
    [
        (0.0, 1.1),
        (1.0, 2.9),
        (2.0, 5.2),
        (3.0, 6.8),
        (4.0, 9.1),
        (5.0, 10.9),
    ]
    .map(DataPoint::from)
    .to_vec()
}

/// Closed-form ordinary least squares for `y = a + b·x`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineFit {
    pub intercept: f64,
    pub slope: f64,

    /// `(XᵀX)⁻¹` as `[[aa, ab], [ab, bb]]`.
    pub inverse_normal: [[f64; 2]; 2],
}

impl LineFit {
    pub fn solve(points: &[DataPoint]) -> Self {
        #[allow(clippy::cast_precision_loss)]
        let n = points.len() as f64;
        let sx: f64 = points.iter().map(|p| p.x).sum();
        let sy: f64 = points.iter().map(|p| p.y).sum();
        let sxx: f64 = points.iter().map(|p| p.x * p.x).sum();
        let sxy: f64 = points.iter().map(|p| p.x * p.y).sum();

        let det = n * sxx - sx * sx;
        let slope = (n * sxy - sx * sy) / det;
        let intercept = (sy - slope * sx) / n;

        Self {
            intercept,
            slope,
            inverse_normal: [[sxx / det, -sx / det], [-sx / det, n / det]],
        }
    }
}

/// Trace of the least-squares Hessian `2·XᵀX` for a polynomial of `degree`.
///
/// Bounds the largest eigenvalue from above.
pub fn hessian_trace(points: &[DataPoint], degree: usize) -> f64 {
    let degree = i32::try_from(degree).expect("small degree");
    (0..=degree)
        .flat_map(|j| points.iter().map(move |p| 2.0 * p.x.powi(2 * j)))
        .sum()
}
