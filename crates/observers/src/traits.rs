//! Capability traits for generic observers.
//!
//! These traits abstract over solver-specific event and action types, so an
//! observer can be written once and reused with every solver that implements
//! them.
//!
//! # Event traits
//!
//! - [`HasIteration`] — events tied to an iteration count
//! - [`HasObjective`] — events that carry an objective value
//! - [`HasEdm`] — events that carry an estimated distance to minimum
//!
//! # Action traits
//!
//! - [`CanStopEarly`] — actions that can signal early termination
//!
//! # Example
//!
//! ```rust
//! use fitkit_core::Observer;
//! use fitkit_observers::traits::{CanStopEarly, HasEdm, HasIteration};
//!
//! struct GoodEnough {
//!     edm: f64,
//!     min_iters: usize,
//! }
//!
//! impl<E: HasEdm + HasIteration, A: CanStopEarly> Observer<E, A> for GoodEnough {
//!     fn observe(&mut self, event: &E) -> Option<A> {
//!         if event.iteration() >= self.min_iters && event.edm() < self.edm {
//!             return Some(A::stop_early());
//!         }
//!         None
//!     }
//! }
//! ```

use fitkit_solvers::optimization::quasi_newton;

/// An event tied to an iteration count.
pub trait HasIteration {
    /// Returns the number of completed iterations.
    fn iteration(&self) -> usize;
}

/// An event that carries an objective value.
pub trait HasObjective {
    /// Returns the objective for this event.
    ///
    /// Returns `f64::NAN` when the event carries no objective.
    fn objective(&self) -> f64;
}

/// An event that carries an estimated distance to minimum.
pub trait HasEdm {
    /// Returns the estimated distance to minimum for this event.
    fn edm(&self) -> f64;
}

/// An action type that can signal early termination.
pub trait CanStopEarly {
    /// Returns the action that stops the solver early.
    fn stop_early() -> Self;
}

// --- quasi_newton::Event ---

impl HasIteration for quasi_newton::Event<'_> {
    fn iteration(&self) -> usize {
        quasi_newton::Event::iteration(self)
    }
}

impl HasObjective for quasi_newton::Event<'_> {
    fn objective(&self) -> f64 {
        self.cost().unwrap_or(f64::NAN)
    }
}

impl HasEdm for quasi_newton::Event<'_> {
    fn edm(&self) -> f64 {
        quasi_newton::Event::edm(self)
    }
}

// --- quasi_newton::Action ---

impl CanStopEarly for quasi_newton::Action {
    fn stop_early() -> Self {
        Self::StopEarly
    }
}
