use std::error::Error as StdError;

use thiserror::Error;

/// Errors that prevent the minimizer from producing a result.
///
/// Non-convergence is not an error; it is reported through
/// [`Status`](super::Status).
#[derive(Debug, Error)]
pub enum Error {
    #[error("parameter set is empty")]
    NoParameters,

    #[error("error definition must be finite and positive, got {0}")]
    ErrorDefinition(f64),

    #[error("objective rejected the parameter set")]
    Configuration(#[source] Box<dyn StdError + Send + Sync>),

    #[error("objective evaluation failed")]
    Objective(#[source] Box<dyn StdError + Send + Sync>),
}

impl Error {
    pub(super) fn configuration(err: impl StdError + Send + Sync + 'static) -> Self {
        Self::Configuration(Box::new(err))
    }

    pub(super) fn objective(err: impl StdError + Send + Sync + 'static) -> Self {
        Self::Objective(Box::new(err))
    }
}
