use tracing::{debug, warn};

use fitkit_core::{ObjectiveFunction, Observer, ParameterSet};

use super::{
    Action, Config, Error, Event, FunctionMinimum, Status,
    init::{Context, Start},
    iterate::{Refined, Step, iterate, refine},
    state::State,
};

/// Core quasi-Newton minimization loop.
pub(super) fn search<F, Obs>(
    objective: &F,
    params: &ParameterSet,
    config: &Config,
    mut observer: Obs,
) -> Result<FunctionMinimum, Error>
where
    F: ObjectiveFunction + Sync,
    Obs: for<'a> Observer<Event<'a>, Action>,
{
    let ctx = Context::new(objective, params, config)?;

    let mut state = match ctx.start(params)? {
        Start::Ready(state) => state,
        Start::Failed(state) => {
            warn!(
                cost = state.cost,
                "non-finite objective at the starting point"
            );
            return Ok(ctx.finish(state, Status::NumericalFailure));
        }
    };
    debug!(
        cost = state.cost,
        edm = state.edm,
        calls = state.calls,
        "starting point evaluated"
    );

    loop {
        if state.iters >= config.max_iters() || state.calls >= ctx.call_limit {
            warn!(
                iters = state.iters,
                calls = state.calls,
                edm = state.edm,
                "call limit reached before convergence"
            );
            return Ok(ctx.finish(state, Status::ReachedCallLimit));
        }

        let (next, step, updated) = match iterate(&ctx, state)? {
            Step::Advanced {
                state,
                step,
                updated,
            } => (state, step, updated),
            Step::Stalled(state) => return stalled(&ctx, state, &mut observer),
            Step::CallLimit(state) => {
                warn!(
                    calls = state.calls,
                    "call limit reached during line search"
                );
                return Ok(ctx.finish(state, Status::ReachedCallLimit));
            }
            Step::NumericalFailure(state) => {
                warn!(
                    calls = state.calls,
                    "non-finite gradient at accepted point"
                );
                return Ok(ctx.finish(state, Status::NumericalFailure));
            }
        };
        state = next;

        debug!(
            iteration = state.iters,
            calls = state.calls,
            cost = state.cost,
            edm = state.edm,
            step,
            updated,
            "quasi-newton iteration"
        );

        let event = Event::Iterated {
            iteration: state.iters,
            calls: state.calls,
            x: state.x.as_slice(),
            cost: state.cost,
            edm: state.edm,
            step,
            updated,
        };
        let forced = match observer.observe(&event) {
            Some(Action::StopEarly) => return Ok(ctx.finish(state, Status::StoppedByObserver)),
            Some(Action::RefineHessian) => true,
            None => false,
        };

        let tentative = state.edm < config.tolerance() && config.refine_hessian();
        if forced || tentative {
            state = match refine_and_observe(&ctx, state, &mut observer)? {
                Flow::Continue(state) => state,
                Flow::Done(min) => return Ok(min),
            };
        }

        if state.edm < config.tolerance() {
            return Ok(ctx.finish(state, Status::Converged));
        }
    }
}

enum Flow {
    Continue(State),
    Done(FunctionMinimum),
}

/// Decides the outcome of a run whose line search found no lower cost.
///
/// At a minimum, rounding noise alone can defeat the sufficient-decrease
/// test, so a stall with EDM below tolerance still counts as convergence
/// once the Hessian check agrees.
fn stalled<F, Obs>(
    ctx: &Context<'_, F>,
    state: State,
    observer: &mut Obs,
) -> Result<FunctionMinimum, Error>
where
    F: ObjectiveFunction + Sync,
    Obs: for<'a> Observer<Event<'a>, Action>,
{
    let tolerance = ctx.config.tolerance();

    let state = if state.edm < tolerance && ctx.config.refine_hessian() {
        match refine_and_observe(ctx, state, observer)? {
            Flow::Continue(state) => state,
            Flow::Done(min) => return Ok(min),
        }
    } else {
        state
    };

    if state.edm < tolerance {
        return Ok(ctx.finish(state, Status::Converged));
    }

    warn!(edm = state.edm, cost = state.cost, "line search stalled");
    Ok(ctx.finish(state, Status::AboveMaxEdm))
}

/// Runs a full-Hessian check and reports it to the observer.
///
/// The check costs `2n²` calls; if those do not fit in the call budget the
/// run ends with [`Status::ReachedCallLimit`] instead.
fn refine_and_observe<F, Obs>(
    ctx: &Context<'_, F>,
    state: State,
    observer: &mut Obs,
) -> Result<Flow, Error>
where
    F: ObjectiveFunction + Sync,
    Obs: for<'a> Observer<Event<'a>, Action>,
{
    let n = state.x.len();
    if state.calls + 2 * n * n > ctx.call_limit {
        warn!(
            calls = state.calls,
            edm = state.edm,
            "call limit leaves no room for a hessian check"
        );
        return Ok(Flow::Done(ctx.finish(state, Status::ReachedCallLimit)));
    }

    let edm_before = state.edm;

    let (state, positive_definite) = match refine(ctx, state)? {
        Refined::Checked {
            state,
            positive_definite,
        } => (state, positive_definite),
        Refined::NumericalFailure(state) => {
            warn!(
                calls = state.calls,
                "non-finite objective while refining hessian"
            );
            return Ok(Flow::Done(ctx.finish(state, Status::NumericalFailure)));
        }
    };

    if !positive_definite {
        warn!(
            edm = state.edm,
            "hessian is not positive definite, keeping approximation"
        );
    }
    debug!(
        edm_before,
        edm = state.edm,
        calls = state.calls,
        "hessian refined"
    );

    let event = Event::HessianRefined {
        iteration: state.iters,
        calls: state.calls,
        x: state.x.as_slice(),
        edm_before,
        edm: state.edm,
        positive_definite,
    };
    if let Some(Action::StopEarly) = observer.observe(&event) {
        return Ok(Flow::Done(ctx.finish(state, Status::StoppedByObserver)));
    }

    Ok(Flow::Continue(state))
}
