//! Finite-difference derivatives on tabulated, possibly non-uniform axes.

use nalgebra::DMatrix;
use wp_core::{WpError, WpResult, is_usable_divisor};

/// Derivative of `values` with respect to `coords`.
///
/// Central differences in the interior, a forward difference at the first
/// point and a backward difference at the last. Entries whose coordinate step
/// has magnitude `<= tolerance` are NaN, as is every entry when fewer than two
/// points are given.
pub fn differentiate(values: &[f64], coords: &[f64], tolerance: f64) -> WpResult<Vec<f64>> {
    if values.len() != coords.len() {
        return Err(WpError::LengthMismatch {
            what: "finite-difference coordinates",
            expected: values.len(),
            actual: coords.len(),
        });
    }

    let n = values.len();
    let mut out = vec![f64::NAN; n];
    if n < 2 {
        return Ok(out);
    }

    let slope = |hi: usize, lo: usize| {
        let step = coords[hi] - coords[lo];
        if is_usable_divisor(step, tolerance) {
            (values[hi] - values[lo]) / step
        } else {
            f64::NAN
        }
    };

    out[0] = slope(1, 0);
    for i in 1..n - 1 {
        out[i] = slope(i + 1, i - 1);
    }
    out[n - 1] = slope(n - 1, n - 2);
    Ok(out)
}

/// ∂/∂(pressure) of a (pressure × secondary) grid, one column at a time.
pub fn differentiate_along_pressure(
    grid: &DMatrix<f64>,
    pressures: &[f64],
    tolerance: f64,
) -> WpResult<DMatrix<f64>> {
    let mut out = DMatrix::from_element(grid.nrows(), grid.ncols(), f64::NAN);
    for j in 0..grid.ncols() {
        let column: Vec<f64> = grid.column(j).iter().copied().collect();
        let derivative = differentiate(&column, pressures, tolerance)?;
        for (i, d) in derivative.into_iter().enumerate() {
            out[(i, j)] = d;
        }
    }
    Ok(out)
}

/// ∂/∂(secondary) of a (pressure × secondary) grid, one row at a time.
pub fn differentiate_along_secondary(
    grid: &DMatrix<f64>,
    secondary: &[f64],
    tolerance: f64,
) -> WpResult<DMatrix<f64>> {
    let mut out = DMatrix::from_element(grid.nrows(), grid.ncols(), f64::NAN);
    for i in 0..grid.nrows() {
        let row: Vec<f64> = grid.row(i).iter().copied().collect();
        let derivative = differentiate(&row, secondary, tolerance)?;
        for (j, d) in derivative.into_iter().enumerate() {
            out[(i, j)] = d;
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-12;

    #[test]
    fn linear_function_is_exact_on_uniform_axis() {
        let x = [0.0, 1.0, 2.0, 3.0];
        let y: Vec<f64> = x.iter().map(|x| 3.0 * x - 2.0).collect();
        let d = differentiate(&y, &x, TOL).unwrap();
        assert_eq!(d, vec![3.0; 4]);
    }

    #[test]
    fn quadratic_uses_central_interior_and_one_sided_ends() {
        let x = [0.0, 1.0, 3.0];
        let y: Vec<f64> = x.iter().map(|x| x * x).collect();
        let d = differentiate(&y, &x, TOL).unwrap();
        assert_eq!(d[0], 1.0); // (1-0)/(1-0)
        assert_eq!(d[1], 3.0); // (9-0)/(3-0)
        assert_eq!(d[2], 4.0); // (9-1)/(3-1)
    }

    #[test]
    fn single_point_is_nan() {
        let d = differentiate(&[5.0], &[1.0], TOL).unwrap();
        assert_eq!(d.len(), 1);
        assert!(d[0].is_nan());
    }

    #[test]
    fn empty_input_is_empty() {
        assert!(differentiate(&[], &[], TOL).unwrap().is_empty());
    }

    #[test]
    fn two_points_share_the_same_slope() {
        let d = differentiate(&[1.0, 5.0], &[10.0, 12.0], TOL).unwrap();
        assert_eq!(d, vec![2.0, 2.0]);
    }

    #[test]
    fn repeated_coordinate_gives_nan_only_where_step_vanishes() {
        let x = [0.0, 1.0, 1.0, 2.0];
        let y = [0.0, 1.0, 1.0, 2.0];
        let d = differentiate(&y, &x, TOL).unwrap();
        assert_eq!(d[0], 1.0);
        assert_eq!(d[1], 1.0); // (1-0)/(1-0), spans the duplicate
        assert_eq!(d[2], 1.0);
        assert!(d[3].is_finite());

        let d = differentiate(&[1.0, 2.0], &[4.0, 4.0], TOL).unwrap();
        assert!(d.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn step_at_tolerance_is_guarded() {
        let d = differentiate(&[0.0, 1.0], &[0.0, 1e-3], 1e-3).unwrap();
        assert!(d.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn nan_values_propagate_without_error() {
        let d = differentiate(&[0.0, f64::NAN, 2.0], &[0.0, 1.0, 2.0], TOL).unwrap();
        assert!(d[0].is_nan());
        assert_eq!(d[1], 1.0);
        assert!(d[2].is_nan());
    }

    #[test]
    fn length_mismatch_is_an_error() {
        assert!(differentiate(&[1.0, 2.0], &[1.0], TOL).is_err());
    }

    #[test]
    fn grid_helpers_follow_their_axis() {
        // rho(p, t) = 2p + 3t
        let p = [1.0, 2.0, 4.0];
        let t = [10.0, 20.0];
        let grid = DMatrix::from_fn(3, 2, |i, j| 2.0 * p[i] + 3.0 * t[j]);

        let dp = differentiate_along_pressure(&grid, &p, TOL).unwrap();
        let dt = differentiate_along_secondary(&grid, &t, TOL).unwrap();
        assert!(dp.iter().all(|v| (v - 2.0).abs() < 1e-12));
        assert!(dt.iter().all(|v| (v - 3.0).abs() < 1e-12));
    }
}
