use tracing::Level;

use fitkit_core::Observer;

use crate::traits::{HasEdm, HasIteration, HasObjective};

/// An observer that logs every event through `tracing`.
///
/// Never requests an action, so it can be attached to any run without
/// changing its outcome.
///
/// # Example
///
/// ```
/// use fitkit_core::{FnObjective, ParameterSet};
/// use fitkit_observers::TracingObserver;
/// use fitkit_solvers::optimization::quasi_newton::{Config, minimize};
///
/// let bowl = FnObjective::new(|p: &[f64]| (p[0] - 3.0).powi(2));
/// let mut params = ParameterSet::new();
/// params.add("x", 0.0, 0.5).unwrap();
///
/// let min = minimize(&bowl, &params, &Config::default(), TracingObserver::default()).unwrap();
/// assert!(min.is_valid());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TracingObserver {
    level: Level,
}

impl TracingObserver {
    /// Creates an observer that logs at `level`.
    #[must_use]
    pub fn new(level: Level) -> Self {
        Self { level }
    }

    /// The level events are logged at.
    #[must_use]
    pub fn level(&self) -> Level {
        self.level
    }
}

impl Default for TracingObserver {
    fn default() -> Self {
        Self::new(Level::DEBUG)
    }
}

impl<E, A> Observer<E, A> for TracingObserver
where
    E: HasIteration + HasObjective + HasEdm,
{
    fn observe(&mut self, event: &E) -> Option<A> {
        let (iteration, cost, edm) = (event.iteration(), event.objective(), event.edm());

        // The level must be a constant at each call site.
        if self.level == Level::ERROR {
            tracing::error!(iteration, cost, edm, "minimizer progress");
        } else if self.level == Level::WARN {
            tracing::warn!(iteration, cost, edm, "minimizer progress");
        } else if self.level == Level::INFO {
            tracing::info!(iteration, cost, edm, "minimizer progress");
        } else if self.level == Level::DEBUG {
            tracing::debug!(iteration, cost, edm, "minimizer progress");
        } else {
            tracing::trace!(iteration, cost, edm, "minimizer progress");
        }
        None
    }
}
