//! Fits a polynomial to comma-separated `(x, y)` data by least squares.

mod loader;
mod report;

use std::{error::Error as StdError, path::PathBuf, process::ExitCode};

use clap::Parser;
use thiserror::Error;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use fitkit_core::{ParameterError, ParameterSet};
use fitkit_models::{LeastSquares, Polynomial};
use fitkit_observers::TracingObserver;
use fitkit_solvers::optimization::quasi_newton::{self, Config, ConfigError, FunctionMinimum};

use loader::LoadError;
use report::Report;

#[derive(Parser, Debug)]
#[command(name = "fit-data")]
#[command(about = "Fit a polynomial to comma-separated (x, y) data", long_about = None)]
struct Cli {
    /// Data file with one `x,y` sample per line.
    file: PathBuf,

    /// Polynomial degree.
    #[arg(short, long, default_value_t = 3)]
    degree: usize,

    /// Starting coefficients, lowest order first [default: 0,1,0,...].
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    start: Vec<f64>,

    /// Initial step size for every coefficient.
    #[arg(long, default_value_t = 0.1)]
    step: f64,

    /// EDM convergence tolerance.
    #[arg(long, default_value_t = 1e-3)]
    tolerance: f64,

    /// Iteration limit.
    #[arg(long, default_value_t = 1000)]
    max_iters: usize,

    /// Objective call limit [default: 200 + 100n + 5n²].
    #[arg(long)]
    max_calls: Option<usize>,

    /// Skip the first line of the data file that is neither blank nor a comment.
    #[arg(long)]
    skip_header: bool,

    /// Evaluate gradients on all cores.
    #[arg(long)]
    parallel: bool,

    /// Skip the full-Hessian check on tentative convergence.
    #[arg(long)]
    no_hessian_check: bool,

    /// Log every iteration.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("could not load data")]
    Load(#[from] LoadError),

    #[error("expected {expected} starting values for degree {degree}, got {found}")]
    StartCount {
        degree: usize,
        expected: usize,
        found: usize,
    },

    #[error("invalid parameter")]
    Parameter(#[from] ParameterError),

    #[error("invalid solver settings")]
    Config(#[from] ConfigError),

    #[error("fit failed")]
    Fit(#[from] quasi_newton::Error),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(min) => {
            print!("{}", Report(&min));
            if min.is_valid() {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(2)
            }
        }
        Err(err) => {
            eprintln!("error: {err}");
            let mut source = err.source();
            while let Some(cause) = source {
                eprintln!("  caused by: {cause}");
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}

/// Logs to stderr, honoring `RUST_LOG` when set.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<FunctionMinimum, CliError> {
    let points = loader::load(&cli.file, cli.skip_header)?;
    let objective = LeastSquares::new(Polynomial::new(cli.degree), points);
    tracing::info!(
        points = objective.points().len(),
        degree = objective.model().degree(),
        file = %cli.file.display(),
        "data loaded"
    );

    let params = starting_parameters(cli.degree, &cli.start, cli.step)?;

    let config = Config::new(cli.tolerance, cli.max_iters, cli.max_calls)?
        .with_hessian_refinement(!cli.no_hessian_check)
        .with_parallel_gradient(cli.parallel);

    let min = if cli.verbose {
        let observer = TracingObserver::new(Level::DEBUG);
        quasi_newton::minimize(&objective, &params, &config, observer)?
    } else {
        quasi_newton::minimize_unobserved(&objective, &params, &config)?
    };
    Ok(min)
}

/// Builds `p0..pn`, defaulting to `p1 = 1` and every other coefficient zero.
fn starting_parameters(degree: usize, start: &[f64], step: f64) -> Result<ParameterSet, CliError> {
    let count = degree + 1;
    let values = if start.is_empty() {
        (0..count).map(|i| if i == 1 { 1.0 } else { 0.0 }).collect()
    } else if start.len() == count {
        start.to_vec()
    } else {
        return Err(CliError::StartCount {
            degree,
            expected: count,
            found: start.len(),
        });
    };

    let mut params = ParameterSet::new();
    for (i, value) in values.into_iter().enumerate() {
        params.add(format!("p{i}"), value, step)?;
    }
    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;

    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_negative_start_values() {
        let cli = Cli::try_parse_from(["fit-data", "data.csv", "-d", "1", "--start", "-1.5,2"])
            .unwrap();
        assert_eq!(cli.degree, 1);
        assert_eq!(cli.start, vec![-1.5, 2.0]);
        assert_eq!(cli.max_calls, None);
    }

    #[test]
    fn default_start_matches_cubic_defaults() {
        let params = starting_parameters(3, &[], 0.1).unwrap();
        assert_eq!(params.names(), vec!["p0", "p1", "p2", "p3"]);
        assert_eq!(params.values(), vec![0.0, 1.0, 0.0, 0.0]);
        assert_eq!(params.steps(), vec![0.1; 4]);
    }

    #[test]
    fn constant_model_starts_at_zero() {
        let params = starting_parameters(0, &[], 0.1).unwrap();
        assert_eq!(params.values(), vec![0.0]);
    }

    #[test]
    fn rejects_wrong_start_count() {
        let err = starting_parameters(2, &[1.0, 2.0], 0.1).unwrap_err();
        assert!(matches!(
            err,
            CliError::StartCount {
                expected: 3,
                found: 2,
                ..
            }
        ));
    }

    #[test]
    fn rejects_bad_step() {
        let err = starting_parameters(1, &[], 0.0).unwrap_err();
        assert!(matches!(err, CliError::Parameter(_)));
    }
}
