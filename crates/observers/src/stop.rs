use fitkit_core::Observer;

use crate::traits::{CanStopEarly, HasObjective};

/// An observer that stops the run once the cost reaches a target.
///
/// Useful when any point below a known acceptable cost will do and the
/// remaining iterations would only polish it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StopBelow {
    target: f64,
}

impl StopBelow {
    #[must_use]
    pub fn new(target: f64) -> Self {
        Self { target }
    }

    #[must_use]
    pub fn target(&self) -> f64 {
        self.target
    }
}

impl<E, A> Observer<E, A> for StopBelow
where
    E: HasObjective,
    A: CanStopEarly,
{
    fn observe(&mut self, event: &E) -> Option<A> {
        // NaN compares false, so events without a cost never stop the run.
        (event.objective() <= self.target).then(A::stop_early)
    }
}
