use std::convert::Infallible;

/// Defines a scalar cost to be minimized over a parameter vector.
///
/// Implementors close over whatever fixed data the cost depends on (for a
/// curve fit, the observed samples). Solvers call [`evaluate`] repeatedly with
/// candidate vectors whose length and ordering always match the
/// [`ParameterSet`] the fit was started with.
///
/// [`evaluate`]: ObjectiveFunction::evaluate
/// [`ParameterSet`]: crate::ParameterSet
pub trait ObjectiveFunction {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Computes the cost at `params`.
    ///
    /// Must be deterministic and free of side effects.
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if the cost cannot be computed for `params`.
    fn evaluate(&self, params: &[f64]) -> Result<f64, Self::Error>;

    /// The cost increase corresponding to one standard deviation.
    ///
    /// `1.0` is correct for a sum of squared residuals. Negative
    /// log-likelihood objectives use `0.5`.
    fn error_definition(&self) -> f64 {
        1.0
    }

    /// Checks that this objective can be evaluated with `count` parameters.
    ///
    /// Solvers call this once, before any evaluation.
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if the objective cannot accept `count`
    /// parameters or is otherwise not ready to be minimized.
    fn validate(&self, count: usize) -> Result<(), Self::Error> {
        let _ = count;
        Ok(())
    }
}

/// Adapter that turns a closure into an [`ObjectiveFunction`].
///
/// The closure cannot fail, so the error type is [`Infallible`].
/// Non-finite return values are left for the solver to detect.
///
/// # Example
///
/// ```
/// use fitkit_core::{FnObjective, ObjectiveFunction};
///
/// let bowl = FnObjective::new(|p: &[f64]| p.iter().map(|v| v * v).sum());
/// assert_eq!(bowl.evaluate(&[3.0, 4.0]).unwrap(), 25.0);
/// assert_eq!(bowl.error_definition(), 1.0);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FnObjective<F> {
    func: F,
    error_definition: f64,
}

impl<F> FnObjective<F>
where
    F: Fn(&[f64]) -> f64,
{
    /// Wraps `func` with an error definition of `1.0`.
    pub fn new(func: F) -> Self {
        Self {
            func,
            error_definition: 1.0,
        }
    }

    /// Replaces the error definition.
    #[must_use]
    pub fn with_error_definition(mut self, error_definition: f64) -> Self {
        self.error_definition = error_definition;
        self
    }
}

impl<F> ObjectiveFunction for FnObjective<F>
where
    F: Fn(&[f64]) -> f64,
{
    type Error = Infallible;

    fn evaluate(&self, params: &[f64]) -> Result<f64, Self::Error> {
        Ok((self.func)(params))
    }

    fn error_definition(&self) -> f64 {
        self.error_definition
    }
}
