//! Quasi-Newton (BFGS) minimization with numeric gradients.
//!
//! # Algorithm
//!
//! Starting from the parameter values, the solver keeps an approximation `H`
//! of the inverse Hessian, seeded as `diag(step²)`. Each iteration:
//!
//! 1. Moves along `d = −H·g` with a backtracking line search that halves the
//!    step multiplier until the Armijo sufficient-decrease condition holds.
//! 2. Estimates the gradient at the accepted point by central differences.
//! 3. Applies the BFGS update to `H`, skipping it when `yᵀs ≤ 0`.
//! 4. Recomputes the estimated distance to minimum, `EDM = ½·gᵀHg / up`.
//!
//! If `d` is not a descent direction, or the line search stalls with an
//! updated `H`, the approximation is reset to the seed and the step retried.
//!
//! When EDM first drops below tolerance, the approximation is checked
//! against the inverse of a full finite-difference Hessian (unless disabled
//! in [`Config`]). Convergence is declared only if EDM is still below
//! tolerance after the check. This guards against a seed whose scale hides
//! how far the minimum really is. A line search that stalls while EDM is
//! already below tolerance goes through the same check, since rounding noise
//! at a minimum can defeat the sufficient-decrease test.
//!
//! # Results
//!
//! Non-convergence is not an error. The solver always returns the best point
//! it reached as a [`FunctionMinimum`] whose [`Status`] explains how the run
//! ended. Errors are reserved for invalid input and objective failures.
//!
//! # Observer Events
//!
//! - [`Event::Iterated`] after every accepted step
//! - [`Event::HessianRefined`] after every full-Hessian check
//!
//! Observers can return [`Action::StopEarly`] to halt, or
//! [`Action::RefineHessian`] after an iteration to force a full-Hessian check.

mod action;
mod config;
mod error;
mod event;
mod init;
mod iterate;
mod line_search;
mod search;
mod solution;
mod state;
mod update;


pub use action::Action;
pub use config::{Config, ConfigError};
pub use error::Error;
pub use event::Event;
pub use solution::{FittedParameter, FunctionMinimum, Status};

use fitkit_core::{ObjectiveFunction, Observer, ParameterSet};

use search::search;

/// Minimizes the objective starting from the given parameters.
///
/// The observer receives an [`Event`] after each iteration and each
/// full-Hessian check. See the [module docs](self) for details.
///
/// # Errors
///
/// Returns an error if the parameter set is empty, the objective rejects it,
/// the objective's error definition is not finite and positive, or the
/// objective fails during evaluation.
pub fn minimize<F, Obs>(
    objective: &F,
    params: &ParameterSet,
    config: &Config,
    observer: Obs,
) -> Result<FunctionMinimum, Error>
where
    F: ObjectiveFunction + Sync,
    Obs: for<'a> Observer<Event<'a>, Action>,
{
    search(objective, params, config, observer)
}

/// Minimizes the objective without observer support.
///
/// This is a convenience wrapper around [`minimize`] that uses a no-op observer.
///
/// # Errors
///
/// See [`minimize`].
pub fn minimize_unobserved<F>(
    objective: &F,
    params: &ParameterSet,
    config: &Config,
) -> Result<FunctionMinimum, Error>
where
    F: ObjectiveFunction + Sync,
{
    minimize(objective, params, config, ())
}
