use crate::optimization::covariance::Covariance;

/// Explains how a minimization run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// EDM fell below the configured tolerance.
    Converged,

    /// The iteration or objective-call limit was reached first.
    ReachedCallLimit,

    /// The line search could not find a lower cost while EDM was still above
    /// tolerance.
    AboveMaxEdm,

    /// The objective produced a non-finite value.
    NumericalFailure,

    /// Stopped early due to an observer decision.
    StoppedByObserver,
}

/// A fitted parameter with its standard error.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedParameter {
    pub name: String,
    pub value: f64,

    /// `None` when the covariance is unavailable.
    pub error: Option<f64>,
}

/// The result of a quasi-Newton minimization.
///
/// A run that did not converge still reports its best point, with
/// [`is_valid`](Self::is_valid) returning false and [`status`](Self::status)
/// explaining why.
#[derive(Debug, Clone)]
pub struct FunctionMinimum {
    /// Final solver status.
    pub status: Status,

    /// Best parameter values, in parameter-set order.
    pub parameters: Vec<FittedParameter>,

    /// Cost at the reported parameters.
    pub cost: f64,

    /// Estimated distance to minimum, in units of the error definition.
    pub edm: f64,

    /// Gradient at the reported parameters.
    pub gradient: Vec<f64>,

    /// Parameter covariance, absent if the final inverse-Hessian
    /// approximation could not yield one.
    pub covariance: Option<Covariance>,

    /// Error definition of the objective.
    pub error_definition: f64,

    /// Iteration count when the solver finished.
    pub iters: usize,

    /// Objective calls spent.
    pub calls: usize,
}

impl FunctionMinimum {
    /// Returns true if the run converged.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.status == Status::Converged
    }

    /// Best parameter values.
    #[must_use]
    pub fn values(&self) -> Vec<f64> {
        self.parameters.iter().map(|p| p.value).collect()
    }

    /// Standard errors, if the covariance is available.
    #[must_use]
    pub fn errors(&self) -> Option<&[f64]> {
        self.covariance.as_ref().map(Covariance::errors)
    }

    /// Looks up a fitted parameter by name.
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&FittedParameter> {
        self.parameters.iter().find(|p| p.name == name)
    }
}
