use approx::assert_relative_eq;

use fitkit_core::ObjectiveFunction;
use fitkit_models::{DataPoint, LeastSquares, Polynomial};
use fitkit_observers::History;
use fitkit_solvers::optimization::quasi_newton::{
    Config, Error, Event, Status, minimize, minimize_unobserved,
};

use integration_tests::{hessian_trace, parameters, sample};

fn parabola() -> Vec<DataPoint> {
    [(0.0, 1.0), (1.0, 2.0), (2.0, 5.0), (3.0, 10.0)]
        .map(DataPoint::from)
        .to_vec()
}

#[test]
fn recovers_quadratic_from_exact_samples() {
    let objective = LeastSquares::new(Polynomial::new(2), parabola());

    let start = parameters(&[0.0, 0.0, 0.0], 0.1);
    let min = minimize_unobserved(&objective, &start, &Config::default()).unwrap();

    assert!(min.is_valid());
    assert_eq!(min.status, Status::Converged);
    assert!(min.cost < 1e-3);

    let values = min.values();
    assert_relative_eq!(values[0], 1.0, epsilon = 0.05);
    assert_relative_eq!(values[1], 0.0, epsilon = 0.05);
    assert_relative_eq!(values[2], 1.0, epsilon = 0.05);
}

#[test]
fn recovers_cubic_coefficients() {
    let truth = [2.0, -1.5, 0.5, 0.25];
    let points = sample(&truth, (0..=10).map(|i| -2.0 + 0.5 * f64::from(i)));
    let objective = LeastSquares::new(Polynomial::new(3), points);
    let config = Config::new(1e-16, 1000, None).unwrap();

    let start = parameters(&[0.0, 1.0, 0.0, 0.0], 0.1);
    let min = minimize_unobserved(&objective, &start, &config).unwrap();

    assert!(min.is_valid());
    for (fitted, expected) in min.values().iter().zip(truth) {
        assert_relative_eq!(*fitted, expected, epsilon = 1e-6);
    }
    assert!(min.cost < 1e-12);
}

#[test]
fn higher_degree_model_recovers_lower_degree_data() {
    let points = sample(&[3.0, -2.0], (0..5).map(f64::from));
    let objective = LeastSquares::new(Polynomial::new(2), points);
    let config = Config::new(1e-16, 1000, None).unwrap();

    let start = parameters(&[0.0, 1.0, 0.0], 0.1);
    let min = minimize_unobserved(&objective, &start, &config).unwrap();

    assert!(min.is_valid());
    let values = min.values();
    assert_relative_eq!(values[0], 3.0, epsilon = 1e-6);
    assert_relative_eq!(values[1], -2.0, epsilon = 1e-6);
    assert_relative_eq!(values[2], 0.0, epsilon = 1e-6);
}

#[test]
fn gradient_is_small_at_a_valid_minimum() {
    for tolerance in [1e-3, 1e-10] {
        let objective = LeastSquares::new(Polynomial::new(2), parabola());
        let config = Config::new(tolerance, 1000, None).unwrap();

        let start = parameters(&[0.0, 0.0, 0.0], 0.1);
        let min = minimize_unobserved(&objective, &start, &config).unwrap();
        assert!(min.is_valid());

        // EDM = ½·gᵀH⁻¹g/up ≥ ½·|g|²/(up·λmax), and trace(H) ≥ λmax.
        let norm = min.gradient.iter().map(|g| g * g).sum::<f64>().sqrt();
        let trace = hessian_trace(&parabola(), 2);
        let bound = (2.0 * tolerance * objective.error_definition() * trace).sqrt();
        assert!(
            norm < bound,
            "|g| = {norm} exceeds {bound} at tolerance {tolerance}"
        );
    }
}

#[test]
fn edm_is_non_negative_and_below_tolerance_exactly_when_valid() {
    let objective = LeastSquares::new(Polynomial::new(2), parabola());

    for max_iters in [0, 1, 3, 1000] {
        let config = Config::new(1e-6, max_iters, None).unwrap();
        let mut history = History::new();

        let start = parameters(&[0.0, 0.0, 0.0], 0.1);
        let min = minimize(&objective, &start, &config, &mut history).unwrap();

        assert!(min.edm >= 0.0);
        assert!(history.records().iter().all(|r| r.edm >= 0.0));
        assert_eq!(
            min.is_valid(),
            min.edm < config.tolerance(),
            "max_iters = {max_iters}"
        );
    }
}

#[test]
fn empty_dataset_is_rejected_before_iterating() {
    let objective = LeastSquares::new(Polynomial::new(2), Vec::new());
    let mut events = 0;

    let result = minimize(
        &objective,
        &parameters(&[0.0, 1.0, 0.0], 0.1),
        &Config::default(),
        |_: &Event<'_>| {
            events += 1;
            None
        },
    );

    assert!(matches!(result, Err(Error::Configuration(_))));
    assert_eq!(events, 0);
}

#[test]
fn zero_iterations_returns_initial_values() {
    let objective = LeastSquares::new(Polynomial::new(2), parabola());
    let config = Config::new(1e-3, 0, None).unwrap();
    let start = [0.5, -0.5, 2.0];

    let min = minimize_unobserved(&objective, &parameters(&start, 0.1), &config).unwrap();

    assert!(!min.is_valid());
    assert_eq!(min.status, Status::ReachedCallLimit);
    assert_eq!(min.values(), start.to_vec());
}
