use thiserror::Error;

use crate::optimization::finite_diff::DEFAULT_RELATIVE_STEP;

/// Configuration for the quasi-Newton minimizer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    tolerance: f64,
    max_iters: usize,
    max_calls: Option<usize>,
    armijo: f64,
    min_step: f64,
    relative_step: f64,
    refine_hessian: bool,
    parallel: bool,
}

/// Errors that can occur when validating a quasi-Newton config.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("tolerance must be finite and positive")]
    Tolerance,

    #[error("armijo constant must lie in (0, 1)")]
    Armijo,

    #[error("minimum step multiplier must lie in (0, 1]")]
    MinStep,

    #[error("relative finite-difference step must be finite and positive")]
    RelativeStep,
}

impl Default for Config {
    fn default() -> Self {
        // Known-good values, unwrap is safe
        Self::new(1e-3, 1000, None).unwrap()
    }
}

impl Config {
    /// Creates a new config with the given EDM tolerance and limits.
    ///
    /// With `max_calls = None` the call budget is `200 + 100·n + 5·n²` for
    /// `n` parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if `tolerance` is not finite and positive.
    pub fn new(
        tolerance: f64,
        max_iters: usize,
        max_calls: Option<usize>,
    ) -> Result<Self, ConfigError> {
        if !tolerance.is_finite() || tolerance <= 0.0 {
            return Err(ConfigError::Tolerance);
        }

        Ok(Self {
            tolerance,
            max_iters,
            max_calls,
            armijo: 1e-4,
            min_step: 1e-10,
            relative_step: DEFAULT_RELATIVE_STEP,
            refine_hessian: true,
            parallel: false,
        })
    }

    /// Sets the Armijo sufficient-decrease constant and the smallest step
    /// multiplier the backtracking line search will try.
    ///
    /// # Errors
    ///
    /// Returns an error if `armijo` is outside `(0, 1)` or `min_step` is
    /// outside `(0, 1]`.
    pub fn with_line_search(mut self, armijo: f64, min_step: f64) -> Result<Self, ConfigError> {
        if !(armijo > 0.0 && armijo < 1.0) {
            return Err(ConfigError::Armijo);
        }
        if !(min_step > 0.0 && min_step <= 1.0) {
            return Err(ConfigError::MinStep);
        }
        self.armijo = armijo;
        self.min_step = min_step;
        Ok(self)
    }

    /// Sets the finite-difference perturbation as a fraction of each
    /// parameter's step size.
    ///
    /// # Errors
    ///
    /// Returns an error if `relative_step` is not finite and positive.
    pub fn with_relative_step(mut self, relative_step: f64) -> Result<Self, ConfigError> {
        if !relative_step.is_finite() || relative_step <= 0.0 {
            return Err(ConfigError::RelativeStep);
        }
        self.relative_step = relative_step;
        Ok(self)
    }

    /// Enables or disables the full-Hessian check on tentative convergence.
    #[must_use]
    pub fn with_hessian_refinement(mut self, refine: bool) -> Self {
        self.refine_hessian = refine;
        self
    }

    /// Enables or disables parallel gradient evaluation.
    #[must_use]
    pub fn with_parallel_gradient(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Returns the EDM convergence tolerance.
    #[must_use]
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Returns the maximum number of iterations.
    #[must_use]
    pub fn max_iters(&self) -> usize {
        self.max_iters
    }

    /// Returns the configured call limit, if any.
    #[must_use]
    pub fn max_calls(&self) -> Option<usize> {
        self.max_calls
    }

    /// Returns the call limit for a problem with `n` parameters.
    #[must_use]
    pub fn call_limit(&self, n: usize) -> usize {
        self.max_calls.unwrap_or(200 + 100 * n + 5 * n * n)
    }

    /// Returns the Armijo constant.
    #[must_use]
    pub fn armijo(&self) -> f64 {
        self.armijo
    }

    /// Returns the smallest step multiplier tried by the line search.
    #[must_use]
    pub fn min_step(&self) -> f64 {
        self.min_step
    }

    /// Returns the relative finite-difference step.
    #[must_use]
    pub fn relative_step(&self) -> f64 {
        self.relative_step
    }

    /// Returns true if tentative convergence is checked with a full Hessian.
    #[must_use]
    pub fn refine_hessian(&self) -> bool {
        self.refine_hessian
    }

    /// Returns true if gradients are evaluated in parallel.
    #[must_use]
    pub fn parallel(&self) -> bool {
        self.parallel
    }
}
