use nalgebra::{DMatrix, DVector};
use tracing::info;

use fitkit_core::{ObjectiveFunction, ParameterSet};

use crate::optimization::{
    covariance::Covariance,
    finite_diff::{DiffError, NumericGradient},
};

use super::{Config, Error, FittedParameter, FunctionMinimum, Status, state::State};

/// Everything about a run that stays fixed while iterating.
pub(super) struct Context<'a, F> {
    pub(super) objective: &'a F,
    pub(super) config: &'a Config,
    pub(super) names: Vec<String>,
    pub(super) diff: NumericGradient,
    pub(super) seed: DMatrix<f64>,
    pub(super) call_limit: usize,
    pub(super) up: f64,
}

/// Result of evaluating the starting point.
pub(super) enum Start {
    Ready(State),

    /// The starting cost or gradient was not finite.
    Failed(State),
}

impl<'a, F: ObjectiveFunction + Sync> Context<'a, F> {
    /// Validates the inputs and fixes the derived run settings.
    pub(super) fn new(
        objective: &'a F,
        params: &ParameterSet,
        config: &'a Config,
    ) -> Result<Self, Error> {
        if params.is_empty() {
            return Err(Error::NoParameters);
        }

        let up = objective.error_definition();
        if !up.is_finite() || up <= 0.0 {
            return Err(Error::ErrorDefinition(up));
        }

        objective
            .validate(params.len())
            .map_err(Error::configuration)?;

        let steps = params.steps();
        let seed = DMatrix::from_diagonal(&DVector::from_iterator(
            steps.len(),
            steps.iter().map(|step| step * step),
        ));
        let diff = NumericGradient::new(&steps)
            .with_relative_step(config.relative_step())
            .with_parallel(config.parallel());

        Ok(Self {
            objective,
            config,
            names: params.names(),
            diff,
            seed,
            call_limit: config.call_limit(params.len()),
            up,
        })
    }

    /// Evaluates the cost and gradient at the starting values.
    pub(super) fn start(&self, params: &ParameterSet) -> Result<Start, Error> {
        let x = DVector::from_vec(params.values());
        let n = x.len();

        let cost = self
            .objective
            .evaluate(x.as_slice())
            .map_err(Error::objective)?;

        let mut state = State {
            x,
            cost,
            gradient: DVector::zeros(n),
            inverse_hessian: self.seed.clone(),
            edm: f64::INFINITY,
            iters: 0,
            calls: 1,
        };
        if !cost.is_finite() {
            return Ok(Start::Failed(state));
        }

        match self.diff.gradient(self.objective, &state.x, cost) {
            Ok(estimate) => {
                state.calls += estimate.calls;
                state.gradient = estimate.gradient;
            }
            Err(DiffError::NonFinite { .. }) => {
                state.calls += 2 * n;
                return Ok(Start::Failed(state));
            }
            Err(DiffError::Objective(err)) => return Err(Error::objective(err)),
        }

        state.refresh_edm(self.up);
        Ok(Start::Ready(state))
    }

    /// Packages the final state into a result.
    pub(super) fn finish(&self, state: State, status: Status) -> FunctionMinimum {
        let covariance = Covariance::estimate(&state.inverse_hessian, self.up);

        let parameters = self
            .names
            .iter()
            .zip(state.x.iter())
            .enumerate()
            .map(|(i, (name, &value))| FittedParameter {
                name: name.clone(),
                value,
                error: covariance.as_ref().map(|cov| cov.errors()[i]),
            })
            .collect();

        info!(
            ?status,
            iters = state.iters,
            calls = state.calls,
            cost = state.cost,
            edm = state.edm,
            "quasi-newton minimization finished"
        );

        FunctionMinimum {
            status,
            parameters,
            cost: state.cost,
            edm: state.edm,
            gradient: state.gradient.iter().copied().collect(),
            covariance,
            error_definition: self.up,
            iters: state.iters,
            calls: state.calls,
        }
    }
}
