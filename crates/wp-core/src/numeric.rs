use crate::WpError;

/// Floating point type used throughout the converters
pub type Real = f64;

/// Tolerances shared by comparisons and the finite-difference zero guard.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, WpError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(WpError::NonFinite { what, value: v })
    }
}

/// True when `|divisor|` is large enough to divide by. NaN never is.
#[inline]
pub fn is_usable_divisor(divisor: Real, tolerance: Real) -> bool {
    divisor.abs() > tolerance
}
