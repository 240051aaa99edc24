use nalgebra::{DMatrix, DVector};

/// Mutable state of one minimization run.
///
/// Owned by the solver for the duration of the run and passed by value
/// through each iteration.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct State {
    pub(super) x: DVector<f64>,
    pub(super) cost: f64,
    pub(super) gradient: DVector<f64>,
    pub(super) inverse_hessian: DMatrix<f64>,
    pub(super) edm: f64,
    pub(super) iters: usize,
    pub(super) calls: usize,
}

impl State {
    /// Recomputes EDM from the current gradient and inverse Hessian.
    pub(super) fn refresh_edm(&mut self, error_definition: f64) {
        self.edm = edm(&self.gradient, &self.inverse_hessian, error_definition);
    }
}

/// Estimated distance to minimum, `½ · gᵀ H⁻¹ g / up`, clamped at zero.
///
/// An overflowed quadratic form reads as infinitely far from the minimum.
pub(super) fn edm(gradient: &DVector<f64>, inverse_hessian: &DMatrix<f64>, up: f64) -> f64 {
    let quadratic = gradient.dot(&(inverse_hessian * gradient));
    let edm = 0.5 * quadratic / up;
    if edm.is_nan() { f64::INFINITY } else { edm.max(0.0) }
}
