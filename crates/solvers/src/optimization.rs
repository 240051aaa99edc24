//! Solvers for minimization problems.
//!
//! An [`ObjectiveFunction`] maps a parameter vector to a scalar cost. Solvers
//! in this module search for the vector that minimizes that cost and report
//! how well the minimum is determined.
//!
//! # Solvers
//!
//! - [`quasi_newton`] — gradient-based search that also estimates parameter
//!   uncertainties from its inverse-Hessian approximation
//!
//! # Building blocks
//!
//! - [`finite_diff`] — numeric derivatives for objectives without analytic ones
//! - [`covariance`] — turns an inverse Hessian into covariance and errors
//!
//! [`ObjectiveFunction`]: fitkit_core::ObjectiveFunction

pub mod covariance;
pub mod finite_diff;
pub mod quasi_newton;
