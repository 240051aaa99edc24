use thiserror::Error;

use fitkit_core::ObjectiveFunction;

use crate::{CurveModel, DataPoint};

/// Errors raised by [`LeastSquares`] when it cannot be evaluated.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ObjectiveError {
    #[error("dataset is empty")]
    EmptyDataset,

    #[error("model expects {expected} parameters, got {found}")]
    ParameterCount { expected: usize, found: usize },
}

/// Sum of squared residuals of a [`CurveModel`] over a fixed dataset.
///
/// The cost at `params` is `Σ (model(params, x) − y)²` over all points.
/// The dataset is immutable for the lifetime of the objective; point order
/// does not affect the minimum.
#[derive(Debug, Clone)]
pub struct LeastSquares<M> {
    model: M,
    points: Vec<DataPoint>,
    error_definition: f64,
}

impl<M: CurveModel> LeastSquares<M> {
    /// Binds `model` to the observed `points`.
    ///
    /// An empty dataset is accepted here and reported by
    /// [`validate`](ObjectiveFunction::validate) when a fit is attempted.
    pub fn new(model: M, points: impl IntoIterator<Item = DataPoint>) -> Self {
        Self {
            model,
            points: points.into_iter().collect(),
            error_definition: 1.0,
        }
    }

    /// Replaces the error definition (default `1.0`).
    ///
    /// Use this when the residuals are scaled so that the cost is a
    /// different multiple of a chi-square or log-likelihood.
    #[must_use]
    pub fn with_error_definition(mut self, error_definition: f64) -> Self {
        self.error_definition = error_definition;
        self
    }

    /// The wrapped model.
    pub fn model(&self) -> &M {
        &self.model
    }

    /// The observed samples.
    pub fn points(&self) -> &[DataPoint] {
        &self.points
    }

    /// Residuals `model(params, x) − y` in dataset order.
    ///
    /// # Errors
    ///
    /// Returns an error if `params` does not match the model.
    pub fn residuals(&self, params: &[f64]) -> Result<Vec<f64>, ObjectiveError> {
        self.check_count(params.len())?;
        Ok(self
            .points
            .iter()
            .map(|p| self.model.predict(params, p.x) - p.y)
            .collect())
    }

    fn check_count(&self, found: usize) -> Result<(), ObjectiveError> {
        let expected = self.model.parameter_count();
        if found == expected {
            Ok(())
        } else {
            Err(ObjectiveError::ParameterCount { expected, found })
        }
    }
}

impl<M: CurveModel> ObjectiveFunction for LeastSquares<M> {
    type Error = ObjectiveError;

    fn evaluate(&self, params: &[f64]) -> Result<f64, Self::Error> {
        self.validate(params.len())?;
        Ok(self
            .points
            .iter()
            .map(|p| {
                let r = self.model.predict(params, p.x) - p.y;
                r * r
            })
            .sum())
    }

    fn error_definition(&self) -> f64 {
        self.error_definition
    }

    fn validate(&self, count: usize) -> Result<(), Self::Error> {
        if self.points.is_empty() {
            return Err(ObjectiveError::EmptyDataset);
        }
        self.check_count(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::Polynomial;

    fn points() -> Vec<DataPoint> {
        [(0.0, 1.0), (1.0, 2.0), (2.0, 5.0), (3.0, 10.0)]
            .into_iter()
            .map(DataPoint::from)
            .collect()
    }

    #[test]
    fn exact_parameters_cost_nothing() {
        let objective = LeastSquares::new(Polynomial::new(2), points());
        assert_relative_eq!(objective.evaluate(&[1.0, 0.0, 1.0]).unwrap(), 0.0);
    }

    #[test]
    fn sums_squared_residuals() {
        let objective = LeastSquares::new(Polynomial::new(1), points());

        // Line y = x: residuals are -1, -1, -3, -7.
        let cost = objective.evaluate(&[0.0, 1.0]).unwrap();
        assert_relative_eq!(cost, 1.0 + 1.0 + 9.0 + 49.0);

        let residuals = objective.residuals(&[0.0, 1.0]).unwrap();
        assert_eq!(residuals, vec![-1.0, -1.0, -3.0, -7.0]);
    }

    #[test]
    fn cost_ignores_point_order() {
        let forward = LeastSquares::new(Polynomial::new(2), points());
        let mut reversed_points = points();
        reversed_points.reverse();
        let reversed = LeastSquares::new(Polynomial::new(2), reversed_points);

        let params = [0.3, -1.2, 0.7];
        assert_relative_eq!(
            forward.evaluate(&params).unwrap(),
            reversed.evaluate(&params).unwrap(),
            max_relative = 1e-12
        );
    }

    #[test]
    fn rejects_wrong_parameter_count() {
        let objective = LeastSquares::new(Polynomial::new(2), points());

        assert_eq!(
            objective.evaluate(&[1.0, 2.0]),
            Err(ObjectiveError::ParameterCount {
                expected: 3,
                found: 2
            })
        );
        assert!(objective.validate(4).is_err());
        assert!(objective.validate(3).is_ok());
    }

    #[test]
    fn rejects_empty_dataset() {
        let objective = LeastSquares::new(Polynomial::new(1), Vec::new());

        assert_eq!(objective.validate(2), Err(ObjectiveError::EmptyDataset));
        assert_eq!(
            objective.evaluate(&[0.0, 0.0]),
            Err(ObjectiveError::EmptyDataset)
        );
    }

    #[test]
    fn error_definition_defaults_to_one() {
        let objective = LeastSquares::new(Polynomial::new(1), points());
        assert_relative_eq!(objective.error_definition(), 1.0);

        let objective = objective.with_error_definition(0.5);
        assert_relative_eq!(objective.error_definition(), 0.5);
    }
}
