/// Actions an observer can take during quasi-Newton minimization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Stop the solver and return the current point, marked invalid.
    StopEarly,

    /// Replace the inverse-Hessian approximation with the inverse of a full
    /// finite-difference Hessian at the current point.
    ///
    /// Useful when an observer suspects the approximation has drifted, or to
    /// get accurate errors at every iteration. Costs `2n²` objective calls.
    RefineHessian,
}
