use crate::CoreError;

/// Floating point type for flows, properties and tolerances.
pub type Real = f64;

/// Absolute and relative tolerance pair for float comparisons.
#[derive(Clone, Copy, Debug)]
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

/// Element-wise [`nearly_equal`] over equal-length slices.
pub fn all_nearly_equal(a: &[Real], b: &[Real], tol: Tolerances) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| nearly_equal(*x, *y, tol))
}

/// Pass `v` through, or fail when it is NaN or infinite.
pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, CoreError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CoreError::NonFinite { what, value: v })
    }
}

/// `a / b`, or zero when `b` is zero.
#[inline]
pub fn ratio_or_zero(a: Real, b: Real) -> Real {
    if b == 0.0 { 0.0 } else { a / b }
}

/// Divide every entry by the sum. An all-zero sum returns the values unchanged.
pub fn normalize_or_copy(values: &[Real]) -> Vec<Real> {
    let total: Real = values.iter().sum();
    if total == 0.0 {
        values.to_vec()
    } else {
        values.iter().map(|v| v / total).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearly_equal_basic() {
        let tol = Tolerances {
            abs: 1e-12,
            rel: 1e-9,
        };
        assert!(nearly_equal(1.0, 1.0 + 1e-12, tol));
        assert!(nearly_equal(0.0, 1e-13, tol));
        assert!(!nearly_equal(1.0, 1.0 + 1e-6, tol));
    }

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(Real::NAN, "test").unwrap_err();
        assert!(err.to_string().contains("Non-finite value for test"));
        assert_eq!(ensure_finite(2.5, "flow").unwrap(), 2.5);
    }

    #[test]
    fn ratio_guards_zero_denominator() {
        assert_eq!(ratio_or_zero(5.0, 0.0), 0.0);
        assert_eq!(ratio_or_zero(6.0, 3.0), 2.0);
    }

    #[test]
    fn normalize_zero_vector_is_unchanged() {
        assert_eq!(normalize_or_copy(&[0.0, 0.0]), vec![0.0, 0.0]);
        let z = normalize_or_copy(&[10.0, 5.0]);
        assert!(all_nearly_equal(&z, &[2.0 / 3.0, 1.0 / 3.0], Tolerances::default()));
    }
}
