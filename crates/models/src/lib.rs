//! Curve models and objectives for fitting observed samples.
//!
//! A [`CurveModel`] predicts `y` from `x` and a parameter vector. Wrapping a
//! model and a dataset of [`DataPoint`]s in [`LeastSquares`] yields an
//! [`ObjectiveFunction`] whose minimum is the least-squares fit.
//!
//! [`ObjectiveFunction`]: fitkit_core::ObjectiveFunction

mod data;
mod least_squares;
mod polynomial;

pub use data::DataPoint;
pub use least_squares::{LeastSquares, ObjectiveError};
pub use polynomial::Polynomial;

/// A parametric curve `y = f(x; params)`.
pub trait CurveModel {
    /// Number of parameters the model expects.
    fn parameter_count(&self) -> usize;

    /// Predicts `y` at `x`.
    ///
    /// Callers guarantee `params.len() == self.parameter_count()`.
    fn predict(&self, params: &[f64], x: f64) -> f64;
}
