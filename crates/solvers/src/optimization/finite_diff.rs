//! Central-difference derivatives of an objective.
//!
//! Every perturbed evaluation reads the same immutable objective and a
//! private copy of the parameter vector, so the evaluations of one gradient
//! (or one Hessian) are independent and can run on the rayon thread pool.
//! Results land in fixed per-parameter slots, so parallel and sequential
//! runs produce identical numbers.

use nalgebra::{DMatrix, DVector};
use rayon::prelude::*;
use thiserror::Error;

use fitkit_core::ObjectiveFunction;

/// Default perturbation as a fraction of each parameter's step size.
pub const DEFAULT_RELATIVE_STEP: f64 = 1e-3;

/// Errors that can occur while differencing an objective.
#[derive(Debug, Error)]
pub enum DiffError<E> {
    /// The objective returned an error.
    #[error("objective evaluation failed")]
    Objective(#[source] E),

    /// The objective returned NaN or an infinity.
    #[error("non-finite objective value {value} while perturbing parameter {index}")]
    NonFinite { index: usize, value: f64 },
}

/// Gradient and diagonal curvature at a point.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientEstimate {
    /// First derivatives.
    pub gradient: DVector<f64>,

    /// Diagonal second derivatives from the same evaluations.
    pub curvature: DVector<f64>,

    /// Objective calls spent, always `2 × dimension`.
    pub calls: usize,
}

/// Full Hessian at a point.
#[derive(Debug, Clone, PartialEq)]
pub struct HessianEstimate {
    /// Symmetric matrix of second derivatives.
    pub hessian: DMatrix<f64>,

    /// Objective calls spent, `2n + 4 · n(n−1)/2`.
    pub calls: usize,
}

/// Finite-difference derivative estimator for a fixed set of step sizes.
///
/// The perturbation for parameter `i` at value `v` is
/// `max(relative_step · step[i], sqrt(ε) · (1 + |v|))`.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericGradient {
    steps: Vec<f64>,
    relative_step: f64,
    parallel: bool,
}

impl NumericGradient {
    /// Creates an estimator from per-parameter step sizes.
    #[must_use]
    pub fn new(steps: &[f64]) -> Self {
        Self {
            steps: steps.to_vec(),
            relative_step: DEFAULT_RELATIVE_STEP,
            parallel: false,
        }
    }

    /// Sets the perturbation as a fraction of the step size.
    #[must_use]
    pub fn with_relative_step(mut self, relative_step: f64) -> Self {
        self.relative_step = relative_step;
        self
    }

    /// Evaluates perturbed points on the rayon thread pool when `parallel`.
    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Number of parameters.
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.steps.len()
    }

    /// Perturbation used for parameter `index` at `value`.
    #[must_use]
    pub fn perturbation(&self, index: usize, value: f64) -> f64 {
        let floor = f64::EPSILON.sqrt() * (1.0 + value.abs());
        (self.relative_step * self.steps[index]).max(floor)
    }

    /// Estimates the gradient and diagonal curvature at `x`.
    ///
    /// `cost` must be the objective value at `x`; it is only used for the
    /// curvature.
    ///
    /// # Errors
    ///
    /// Returns an error if any evaluation fails or is not finite.
    pub fn gradient<F>(
        &self,
        objective: &F,
        x: &DVector<f64>,
        cost: f64,
    ) -> Result<GradientEstimate, DiffError<F::Error>>
    where
        F: ObjectiveFunction + Sync,
    {
        let n = self.dimension();
        let pair = |i: usize| -> Result<(f64, f64), DiffError<F::Error>> {
            let h = self.perturbation(i, x[i]);
            let plus = evaluate_shifted(objective, x, &[(i, h)], i)?;
            let minus = evaluate_shifted(objective, x, &[(i, -h)], i)?;
            Ok((plus, minus))
        };

        let pairs: Vec<(f64, f64)> = if self.parallel {
            (0..n)
                .into_par_iter()
                .map(&pair)
                .collect::<Result<_, _>>()?
        } else {
            (0..n).map(&pair).collect::<Result<_, _>>()?
        };

        let mut gradient = DVector::zeros(n);
        let mut curvature = DVector::zeros(n);
        for (i, (plus, minus)) in pairs.into_iter().enumerate() {
            let h = self.perturbation(i, x[i]);
            gradient[i] = (plus - minus) / (2.0 * h);
            curvature[i] = (plus + minus - 2.0 * cost) / (h * h);
        }

        Ok(GradientEstimate {
            gradient,
            curvature,
            calls: 2 * n,
        })
    }

    /// Estimates the full Hessian at `x`.
    ///
    /// `cost` must be the objective value at `x`.
    ///
    /// # Errors
    ///
    /// Returns an error if any evaluation fails or is not finite.
    pub fn hessian<F>(
        &self,
        objective: &F,
        x: &DVector<f64>,
        cost: f64,
    ) -> Result<HessianEstimate, DiffError<F::Error>>
    where
        F: ObjectiveFunction + Sync,
    {
        let n = self.dimension();
        let h: Vec<f64> = (0..n).map(|i| self.perturbation(i, x[i])).collect();

        // Diagonal entries use (i, i); off-diagonal entries use i < j.
        let entries: Vec<(usize, usize)> =
            (0..n).flat_map(|i| (i..n).map(move |j| (i, j))).collect();

        let entry = |&(i, j): &(usize, usize)| -> Result<f64, DiffError<F::Error>> {
            if i == j {
                let plus = evaluate_shifted(objective, x, &[(i, h[i])], i)?;
                let minus = evaluate_shifted(objective, x, &[(i, -h[i])], i)?;
                return Ok((plus + minus - 2.0 * cost) / (h[i] * h[i]));
            }
            let corner = |si: f64, sj: f64| {
                evaluate_shifted(objective, x, &[(i, si * h[i]), (j, sj * h[j])], i)
            };
            let pp = corner(1.0, 1.0)?;
            let pm = corner(1.0, -1.0)?;
            let mp = corner(-1.0, 1.0)?;
            let mm = corner(-1.0, -1.0)?;
            Ok((pp - pm - mp + mm) / (4.0 * h[i] * h[j]))
        };

        let values: Vec<f64> = if self.parallel {
            entries.par_iter().map(&entry).collect::<Result<_, _>>()?
        } else {
            entries.iter().map(&entry).collect::<Result<_, _>>()?
        };

        let mut hessian = DMatrix::zeros(n, n);
        for (&(i, j), value) in entries.iter().zip(values) {
            hessian[(i, j)] = value;
            hessian[(j, i)] = value;
        }

        Ok(HessianEstimate {
            hessian,
            calls: 2 * n + 2 * n * n.saturating_sub(1),
        })
    }
}

/// Evaluates the objective at `x` shifted by `shifts`.
///
/// `index` identifies the parameter being differenced, for error reporting.
fn evaluate_shifted<F: ObjectiveFunction>(
    objective: &F,
    x: &DVector<f64>,
    shifts: &[(usize, f64)],
    index: usize,
) -> Result<f64, DiffError<F::Error>> {
    let mut point = x.clone();
    for &(i, h) in shifts {
        point[i] += h;
    }
    let value = objective
        .evaluate(point.as_slice())
        .map_err(DiffError::Objective)?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(DiffError::NonFinite { index, value })
    }
}
