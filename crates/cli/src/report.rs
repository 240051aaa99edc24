//! Plain-text summary of a fit.

use std::fmt;

use fitkit_solvers::optimization::quasi_newton::{FunctionMinimum, Status};

/// Formats a [`FunctionMinimum`] for the terminal.
pub struct Report<'a>(pub &'a FunctionMinimum);

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let min = self.0;
        let validity = if min.is_valid() { "valid" } else { "invalid" };

        writeln!(f, "status      {} ({validity})", describe(min.status))?;
        writeln!(f, "cost        {:.6e}", min.cost)?;
        writeln!(f, "edm         {:.6e}", min.edm)?;
        writeln!(f, "up          {}", min.error_definition)?;
        writeln!(f, "iterations  {}", min.iters)?;
        writeln!(f, "calls       {}", min.calls)?;
        writeln!(f)?;

        writeln!(f, "{:<8}{:>16}{:>16}", "name", "value", "error")?;
        for param in &min.parameters {
            let error = param
                .error
                .map_or_else(|| "n/a".to_owned(), |e| format!("{e:.6e}"));
            writeln!(f, "{:<8}{:>16.6e}{error:>16}", param.name, param.value)?;
        }

        let Some(cov) = &min.covariance else {
            return writeln!(f, "\ncovariance unavailable");
        };

        writeln!(f, "\ncorrelation")?;
        for i in 0..cov.dimension() {
            write!(f, "{:<8}", min.parameters[i].name)?;
            for j in 0..cov.dimension() {
                match cov.correlation(i, j) {
                    Some(rho) => write!(f, "{rho:>9.4}")?,
                    None => write!(f, "{:>9}", "n/a")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

fn describe(status: Status) -> &'static str {
    match status {
        Status::Converged => "converged",
        Status::ReachedCallLimit => "call limit reached",
        Status::AboveMaxEdm => "line search stalled above tolerance",
        Status::NumericalFailure => "numerical failure",
        Status::StoppedByObserver => "stopped early",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use fitkit_core::ParameterSet;
    use fitkit_models::{DataPoint, LeastSquares, Polynomial};
    use fitkit_solvers::optimization::quasi_newton::{Config, FittedParameter, minimize_unobserved};

    #[test]
    fn shows_parameters_and_correlation_of_a_fit() {
        let points = [(0.0, 1.1), (1.0, 2.9), (2.0, 5.2), (3.0, 6.8)].map(DataPoint::from);
        let objective = LeastSquares::new(Polynomial::new(1), points);
        let mut params = ParameterSet::new();
        params.add("p0", 0.0, 0.1).unwrap();
        params.add("p1", 1.0, 0.1).unwrap();

        let min = minimize_unobserved(&objective, &params, &Config::default()).unwrap();
        let text = Report(&min).to_string();

        assert!(text.starts_with("status      converged (valid)"));
        assert!(text.contains("\np0 "));
        assert!(text.contains("\np1 "));
        assert!(text.contains("correlation"));
        assert!(!text.contains("n/a"));
    }

    #[test]
    fn marks_missing_covariance() {
        let min = FunctionMinimum {
            status: Status::NumericalFailure,
            parameters: vec![FittedParameter {
                name: "p0".to_owned(),
                value: 1.5,
                error: None,
            }],
            cost: f64::NAN,
            edm: f64::INFINITY,
            gradient: vec![0.0],
            covariance: None,
            error_definition: 1.0,
            iters: 0,
            calls: 1,
        };
        let text = Report(&min).to_string();

        assert!(text.starts_with("status      numerical failure (invalid)"));
        assert!(text.contains("n/a"));
        assert!(text.ends_with("covariance unavailable\n"));
    }
}
