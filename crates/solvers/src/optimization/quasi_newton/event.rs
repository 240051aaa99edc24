/// Events emitted by the quasi-Newton solver.
///
/// Each event borrows the current parameter vector. Observers returning
/// [`Action::StopEarly`](super::Action::StopEarly) from any event end the run
/// with [`Status::StoppedByObserver`](super::Status::StoppedByObserver).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event<'a> {
    /// An iteration accepted a step.
    Iterated {
        /// Iterations completed, including this one.
        iteration: usize,

        /// Objective calls so far.
        calls: usize,

        /// Parameter values after the step.
        x: &'a [f64],

        /// Cost after the step.
        cost: f64,

        /// Estimated distance to minimum after the step.
        edm: f64,

        /// Accepted line-search step multiplier.
        step: f64,

        /// Whether the inverse-Hessian approximation was updated.
        updated: bool,
    },

    /// The inverse-Hessian approximation was checked against a full
    /// finite-difference Hessian.
    HessianRefined {
        /// Iterations completed.
        iteration: usize,

        /// Objective calls so far, including the Hessian evaluations.
        calls: usize,

        /// Current parameter values.
        x: &'a [f64],

        /// EDM from the approximation before the check.
        edm_before: f64,

        /// EDM after the check.
        edm: f64,

        /// False if the Hessian was not positive definite and the
        /// approximation was kept.
        positive_definite: bool,
    },
}

impl Event<'_> {
    /// Returns the number of completed iterations.
    #[must_use]
    pub fn iteration(&self) -> usize {
        match self {
            Self::Iterated { iteration, .. } | Self::HessianRefined { iteration, .. } => *iteration,
        }
    }

    /// Returns the objective call count.
    #[must_use]
    pub fn calls(&self) -> usize {
        match self {
            Self::Iterated { calls, .. } | Self::HessianRefined { calls, .. } => *calls,
        }
    }

    /// Returns the current parameter values.
    #[must_use]
    pub fn x(&self) -> &[f64] {
        match self {
            Self::Iterated { x, .. } | Self::HessianRefined { x, .. } => x,
        }
    }

    /// Returns the current estimated distance to minimum.
    #[must_use]
    pub fn edm(&self) -> f64 {
        match self {
            Self::Iterated { edm, .. } | Self::HessianRefined { edm, .. } => *edm,
        }
    }

    /// Returns the cost, if this event carries one.
    #[must_use]
    pub fn cost(&self) -> Option<f64> {
        match self {
            Self::Iterated { cost, .. } => Some(*cost),
            Self::HessianRefined { .. } => None,
        }
    }
}
