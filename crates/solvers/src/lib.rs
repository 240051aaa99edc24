//! Numerical minimizers for the fitkit framework.
//!
//! - [`optimization::quasi_newton`] — variable-metric minimizer with numeric
//!   gradients, Armijo line search, and BFGS updates
//! - [`optimization::finite_diff`] — central-difference gradients and Hessians
//! - [`optimization::covariance`] — parameter covariance and standard errors
//!   from an inverse Hessian

pub mod optimization;
