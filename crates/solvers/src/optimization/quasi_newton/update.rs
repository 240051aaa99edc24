use nalgebra::{DMatrix, DVector};

/// Applies the BFGS rank-2 update to an inverse-Hessian approximation.
///
/// `s` is the parameter step and `y` the gradient change over that step.
/// Returns false and leaves `h` untouched if the curvature condition
/// `yᵀs > 0` fails or the update is not finite.
pub(super) fn bfgs(h: &mut DMatrix<f64>, s: &DVector<f64>, y: &DVector<f64>) -> bool {
    let ys = y.dot(s);
    if !ys.is_finite() || ys <= 0.0 {
        return false;
    }

    let rho = 1.0 / ys;
    let hy = &*h * y;
    let yhy = y.dot(&hy);

    let cross = s * hy.transpose() + &hy * s.transpose();
    let outer = s * s.transpose();
    let next = &*h - cross * rho + outer * (rho * rho * yhy + rho);

    if next.iter().any(|v| !v.is_finite()) {
        return false;
    }
    *h = (&next + next.transpose()) * 0.5;
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn satisfies_secant_condition() {
        let mut h = DMatrix::identity(2, 2);
        let s = DVector::from_vec(vec![0.5, -0.25]);
        let y = DVector::from_vec(vec![1.5, 0.25]);

        assert!(bfgs(&mut h, &s, &y));

        let hy = &h * &y;
        assert_relative_eq!(hy[0], s[0], epsilon = 1e-12);
        assert_relative_eq!(hy[1], s[1], epsilon = 1e-12);
        assert_relative_eq!(h[(0, 1)], h[(1, 0)]);
    }

    #[test]
    fn learns_quadratic_curvature() {
        // Hessian diag(2, 8); two independent steps pin down its inverse.
        let hessian = DMatrix::from_row_slice(2, 2, &[2.0, 0.0, 0.0, 8.0]);
        let mut h = DMatrix::identity(2, 2);

        for s in [vec![1.0, 0.0], vec![0.0, 1.0]] {
            let s = DVector::from_vec(s);
            let y = &hessian * &s;
            assert!(bfgs(&mut h, &s, &y));
        }

        assert_relative_eq!(h[(0, 0)], 0.5, epsilon = 1e-12);
        assert_relative_eq!(h[(1, 1)], 0.125, epsilon = 1e-12);
        assert_relative_eq!(h[(0, 1)], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn skips_update_without_positive_curvature() {
        let original = DMatrix::identity(2, 2);
        let mut h = original.clone();
        let s = DVector::from_vec(vec![1.0, 0.0]);
        let y = DVector::from_vec(vec![-1.0, 0.0]);

        assert!(!bfgs(&mut h, &s, &y));
        assert_eq!(h, original);

        let zero = DVector::from_vec(vec![0.0, 0.0]);
        assert!(!bfgs(&mut h, &zero, &y));
        assert_eq!(h, original);
    }
}
