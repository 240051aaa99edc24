use nalgebra::DVector;

use fitkit_core::ObjectiveFunction;

use super::Config;

/// A step accepted by the line search.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct Trial {
    pub(super) step: f64,
    pub(super) x: DVector<f64>,
    pub(super) cost: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub(super) enum Outcome {
    Accepted(Trial),

    /// The step multiplier fell below its floor without sufficient decrease.
    Stalled,

    /// The call budget ran out before a step was accepted.
    CallLimit,
}

/// Backtracking line search along `direction` from `x`.
///
/// Starts with a step multiplier of one and halves it until the Armijo
/// condition `f(x + α·d) ≤ f(x) + c·α·slope` holds. A non-finite trial cost
/// counts as a failed trial. Every evaluation increments `calls`.
#[allow(clippy::too_many_arguments)]
pub(super) fn backtrack<F: ObjectiveFunction>(
    objective: &F,
    x: &DVector<f64>,
    cost: f64,
    direction: &DVector<f64>,
    slope: f64,
    config: &Config,
    calls: &mut usize,
    call_limit: usize,
) -> Result<Outcome, F::Error> {
    let mut step = 1.0;

    while step >= config.min_step() {
        if *calls >= call_limit {
            return Ok(Outcome::CallLimit);
        }

        let trial = x + direction * step;
        let value = objective.evaluate(trial.as_slice())?;
        *calls += 1;

        if value.is_finite() && value <= cost + config.armijo() * step * slope {
            return Ok(Outcome::Accepted(Trial {
                step,
                x: trial,
                cost: value,
            }));
        }
        step *= 0.5;
    }

    Ok(Outcome::Stalled)
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use fitkit_core::FnObjective;

    fn parabola() -> FnObjective<impl Fn(&[f64]) -> f64> {
        FnObjective::new(|p: &[f64]| (p[0] - 1.0).powi(2))
    }

    #[test]
    fn accepts_full_newton_step() {
        let x = DVector::from_vec(vec![0.0]);
        let direction = DVector::from_vec(vec![1.0]);
        let mut calls = 0;

        let outcome = backtrack(
            &parabola(),
            &x,
            1.0,
            &direction,
            -2.0,
            &Config::default(),
            &mut calls,
            100,
        )
        .unwrap();

        let Outcome::Accepted(trial) = outcome else {
            panic!("expected acceptance, got {outcome:?}");
        };
        assert_relative_eq!(trial.step, 1.0);
        assert_relative_eq!(trial.x[0], 1.0);
        assert_relative_eq!(trial.cost, 0.0);
        assert_eq!(calls, 1);
    }

    #[test]
    fn halves_overshooting_step() {
        // Direction overshoots by a factor of four: x = 4 has cost 9 > 1.
        let x = DVector::from_vec(vec![0.0]);
        let direction = DVector::from_vec(vec![4.0]);
        let mut calls = 0;

        let outcome = backtrack(
            &parabola(),
            &x,
            1.0,
            &direction,
            -8.0,
            &Config::default(),
            &mut calls,
            100,
        )
        .unwrap();

        let Outcome::Accepted(trial) = outcome else {
            panic!("expected acceptance, got {outcome:?}");
        };
        assert_relative_eq!(trial.step, 0.25);
        assert_relative_eq!(trial.x[0], 1.0);
        assert_eq!(calls, 3);
    }

    #[test]
    fn stalls_on_ascent_direction() {
        let x = DVector::from_vec(vec![0.0]);
        let direction = DVector::from_vec(vec![-1.0]);
        let config = Config::default().with_line_search(1e-4, 1e-3).unwrap();
        let mut calls = 0;

        let outcome = backtrack(
            &parabola(),
            &x,
            1.0,
            &direction,
            -2.0,
            &config,
            &mut calls,
            100,
        )
        .unwrap();

        assert_eq!(outcome, Outcome::Stalled);
        // 1, 1/2, ..., 1/512 are tried; 1/1024 is below the floor.
        assert_eq!(calls, 10);
    }

    #[test]
    fn rejects_non_finite_trials() {
        let objective = FnObjective::new(|p: &[f64]| {
            if p[0] > 1.5 {
                f64::INFINITY
            } else {
                (p[0] - 1.0).powi(2)
            }
        });
        let x = DVector::from_vec(vec![0.0]);
        let direction = DVector::from_vec(vec![2.0]);
        let mut calls = 0;

        let outcome = backtrack(
            &objective,
            &x,
            1.0,
            &direction,
            -4.0,
            &Config::default(),
            &mut calls,
            100,
        )
        .unwrap();

        let Outcome::Accepted(trial) = outcome else {
            panic!("expected acceptance, got {outcome:?}");
        };
        assert_relative_eq!(trial.step, 0.5);
    }

    #[test]
    fn respects_call_limit() {
        let x = DVector::from_vec(vec![0.0]);
        let direction = DVector::from_vec(vec![-1.0]);
        let mut calls = 5;

        let outcome = backtrack(
            &parabola(),
            &x,
            1.0,
            &direction,
            -2.0,
            &Config::default(),
            &mut calls,
            7,
        )
        .unwrap();

        assert_eq!(outcome, Outcome::CallLimit);
        assert_eq!(calls, 7);
    }
}
