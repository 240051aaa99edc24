use nalgebra::DVector;

use fitkit_core::ObjectiveFunction;

use crate::optimization::finite_diff::DiffError;

use super::{
    Error,
    init::Context,
    line_search::{self, Outcome},
    state::State,
    update,
};

/// Result of one quasi-Newton iteration.
pub(super) enum Step {
    Advanced {
        state: State,
        step: f64,
        updated: bool,
    },

    /// No acceptable step, even along the seed direction.
    Stalled(State),

    CallLimit(State),

    /// The gradient at the accepted point was not finite. Carries the state
    /// from before the step.
    NumericalFailure(State),
}

/// Result of checking the approximation against a full Hessian.
pub(super) enum Refined {
    Checked {
        state: State,
        positive_definite: bool,
    },
    NumericalFailure(State),
}

/// Takes one quasi-Newton step from `state`.
pub(super) fn iterate<F: ObjectiveFunction + Sync>(
    ctx: &Context<'_, F>,
    mut state: State,
) -> Result<Step, Error> {
    let mut reset = false;

    let trial = loop {
        let direction = -(&state.inverse_hessian * &state.gradient);
        let slope = state.gradient.dot(&direction);

        // Not a descent direction: the approximation lost positive definiteness.
        if slope > 0.0 && !reset {
            state.inverse_hessian = ctx.seed.clone();
            reset = true;
            continue;
        }

        let outcome = line_search::backtrack(
            ctx.objective,
            &state.x,
            state.cost,
            &direction,
            slope,
            ctx.config,
            &mut state.calls,
            ctx.call_limit,
        )
        .map_err(Error::objective)?;

        match outcome {
            Outcome::Accepted(trial) => break trial,
            Outcome::CallLimit => return Ok(Step::CallLimit(state)),
            Outcome::Stalled if reset || state.inverse_hessian == ctx.seed => {
                return Ok(Step::Stalled(state));
            }
            Outcome::Stalled => {
                state.inverse_hessian = ctx.seed.clone();
                reset = true;
            }
        }
    };

    let gradient = match ctx.diff.gradient(ctx.objective, &trial.x, trial.cost) {
        Ok(estimate) => {
            state.calls += estimate.calls;
            estimate.gradient
        }
        Err(DiffError::NonFinite { .. }) => {
            state.calls += 2 * state.x.len();
            return Ok(Step::NumericalFailure(state));
        }
        Err(DiffError::Objective(err)) => return Err(Error::objective(err)),
    };

    let s: DVector<f64> = &trial.x - &state.x;
    let y: DVector<f64> = &gradient - &state.gradient;
    let updated = update::bfgs(&mut state.inverse_hessian, &s, &y);

    state.x = trial.x;
    state.cost = trial.cost;
    state.gradient = gradient;
    state.refresh_edm(ctx.up);
    state.iters += 1;

    Ok(Step::Advanced {
        state,
        step: trial.step,
        updated,
    })
}

/// Replaces the approximation with the inverse of a full finite-difference
/// Hessian, if that Hessian is positive definite.
pub(super) fn refine<F: ObjectiveFunction + Sync>(
    ctx: &Context<'_, F>,
    mut state: State,
) -> Result<Refined, Error> {
    let estimate = match ctx.diff.hessian(ctx.objective, &state.x, state.cost) {
        Ok(estimate) => estimate,
        Err(DiffError::NonFinite { .. }) => {
            let n = state.x.len();
            state.calls += 2 * n * n;
            return Ok(Refined::NumericalFailure(state));
        }
        Err(DiffError::Objective(err)) => return Err(Error::objective(err)),
    };
    state.calls += estimate.calls;

    let Some(cholesky) = estimate.hessian.cholesky() else {
        return Ok(Refined::Checked {
            state,
            positive_definite: false,
        });
    };

    let inverse = cholesky.inverse();
    state.inverse_hessian = (&inverse + inverse.transpose()) * 0.5;
    state.refresh_edm(ctx.up);

    Ok(Refined::Checked {
        state,
        positive_definite: true,
    })
}
