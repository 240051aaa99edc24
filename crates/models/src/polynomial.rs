use crate::CurveModel;

/// A polynomial of fixed degree, `y = Σ params[k] · x^k`.
///
/// Parameters are ordered by ascending power, so a degree-`n` polynomial
/// expects `n + 1` parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Polynomial {
    degree: usize,
}

impl Polynomial {
    /// Creates a polynomial model of the given degree.
    #[must_use]
    pub fn new(degree: usize) -> Self {
        Self { degree }
    }

    /// The polynomial degree.
    #[must_use]
    pub fn degree(&self) -> usize {
        self.degree
    }
}

impl CurveModel for Polynomial {
    fn parameter_count(&self) -> usize {
        self.degree + 1
    }

    fn predict(&self, params: &[f64], x: f64) -> f64 {
        // Horner's rule
        params.iter().rev().fold(0.0, |acc, &c| acc * x + c)
    }
}
