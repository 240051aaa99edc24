//! Core traits and types for the fitkit framework.
//!
//! This crate defines the shared abstractions that models, solvers, and
//! observers build on:
//!
//! - [`ObjectiveFunction`] — a scalar cost over a parameter vector, plus the
//!   error definition used to scale uncertainties
//! - [`FnObjective`] — adapts a plain closure into an [`ObjectiveFunction`]
//! - [`Observer`] — receives solver events and optionally returns control actions
//! - [`Parameter`], [`ParameterSet`] — the named, ordered free parameters of a fit

mod objective;
mod observer;
mod parameter;

pub use objective::{FnObjective, ObjectiveFunction};
pub use observer::Observer;
pub use parameter::{Bounds, Parameter, ParameterError, ParameterSet};
