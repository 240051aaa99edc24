//! Parameter covariance from an inverse Hessian.
//!
//! For a cost whose one-sigma contour lies `up` above the minimum, the
//! covariance of the fitted parameters is `2 · up · H⁻¹`. Standard errors are
//! the square roots of its diagonal.

use nalgebra::DMatrix;

/// Covariance matrix and standard errors of fitted parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Covariance {
    matrix: DMatrix<f64>,
    errors: Vec<f64>,
}

impl Covariance {
    /// Estimates the covariance from an inverse Hessian and error definition.
    ///
    /// Returns `None` if the matrix is not square, has a non-finite entry, or
    /// has a negative diagonal entry, since standard errors would be
    /// meaningless.
    #[must_use]
    pub fn estimate(inverse_hessian: &DMatrix<f64>, error_definition: f64) -> Option<Self> {
        if !inverse_hessian.is_square() {
            return None;
        }

        let matrix = inverse_hessian * (2.0 * error_definition);
        if matrix.iter().any(|v| !v.is_finite()) {
            return None;
        }

        let diagonal = matrix.diagonal();
        if diagonal.iter().any(|&v| v < 0.0) {
            return None;
        }
        let errors = diagonal.iter().map(|v| v.sqrt()).collect();

        Some(Self { matrix, errors })
    }

    /// The covariance matrix.
    #[must_use]
    pub fn matrix(&self) -> &DMatrix<f64> {
        &self.matrix
    }

    /// Standard errors in parameter order.
    #[must_use]
    pub fn errors(&self) -> &[f64] {
        &self.errors
    }

    /// Number of parameters.
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.errors.len()
    }

    /// Correlation coefficient between parameters `i` and `j`.
    ///
    /// Returns `None` if an index is out of range or either variance is zero.
    #[must_use]
    pub fn correlation(&self, i: usize, j: usize) -> Option<f64> {
        let (ei, ej) = (*self.errors.get(i)?, *self.errors.get(j)?);
        if ei == 0.0 || ej == 0.0 {
            return None;
        }
        Some(self.matrix[(i, j)] / (ei * ej))
    }
}
