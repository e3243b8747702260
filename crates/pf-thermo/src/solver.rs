//! Scalar root finders used for temperature solves.

use crate::error::{ThermoError, ThermoResult};
use std::fmt;

/// Pluggable one-dimensional root finder.
///
/// `f` is evaluated on `[bounds.0, bounds.1]` only; `x0` is an initial guess
/// inside the bounds.
pub trait RootSolver: fmt::Debug {
    fn name(&self) -> &str;

    fn solve(
        &self,
        f: &mut dyn FnMut(f64) -> ThermoResult<f64>,
        x0: f64,
        bounds: (f64, f64),
    ) -> ThermoResult<f64>;
}

/// Secant iteration clamped to the bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Secant {
    pub xtol: f64,
    pub ftol: f64,
    pub max_iter: usize,
}

impl Default for Secant {
    fn default() -> Self {
        Self {
            xtol: 1e-6,
            ftol: 1e-9,
            max_iter: 100,
        }
    }
}

impl RootSolver for Secant {
    fn name(&self) -> &str {
        "secant"
    }

    fn solve(
        &self,
        f: &mut dyn FnMut(f64) -> ThermoResult<f64>,
        x0: f64,
        bounds: (f64, f64),
    ) -> ThermoResult<f64> {
        let (lo, hi) = bounds;
        let mut x0 = x0.clamp(lo, hi);
        let mut f0 = f(x0)?;
        if f0.abs() <= self.ftol {
            return Ok(x0);
        }
        let step = 1e-3 * x0.abs().max(1.0);
        let mut x1 = if x0 + step <= hi { x0 + step } else { x0 - step };
        let mut f1 = f(x1)?;

        for _ in 0..self.max_iter {
            if f1.abs() <= self.ftol {
                return Ok(x1);
            }
            let df = f1 - f0;
            if df == 0.0 {
                break;
            }
            let x2 = (x1 - f1 * (x1 - x0) / df).clamp(lo, hi);
            if (x2 - x1).abs() <= self.xtol {
                return Ok(x2);
            }
            x0 = x1;
            f0 = f1;
            x1 = x2;
            f1 = f(x1)?;
        }
        Err(ThermoError::ConvergenceFailed {
            what: "secant iteration",
        })
    }
}

/// Bisection on a bracketing interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bisection {
    pub xtol: f64,
    pub max_iter: usize,
}

impl Default for Bisection {
    fn default() -> Self {
        Self {
            xtol: 1e-9,
            max_iter: 200,
        }
    }
}

impl RootSolver for Bisection {
    fn name(&self) -> &str {
        "bisection"
    }

    fn solve(
        &self,
        f: &mut dyn FnMut(f64) -> ThermoResult<f64>,
        _x0: f64,
        bounds: (f64, f64),
    ) -> ThermoResult<f64> {
        let (mut lo, mut hi) = bounds;
        let mut f_lo = f(lo)?;
        if f_lo == 0.0 {
            return Ok(lo);
        }
        let f_hi = f(hi)?;
        if f_hi == 0.0 {
            return Ok(hi);
        }
        if f_lo.signum() == f_hi.signum() {
            return Err(ThermoError::ConvergenceFailed {
                what: "bisection bracket has no sign change",
            });
        }

        for _ in 0..self.max_iter {
            let mid = 0.5 * (lo + hi);
            let f_mid = f(mid)?;
            if f_mid == 0.0 || (hi - lo) <= self.xtol {
                return Ok(mid);
            }
            if f_mid.signum() == f_lo.signum() {
                lo = mid;
                f_lo = f_mid;
            } else {
                hi = mid;
            }
        }
        Ok(0.5 * (lo + hi))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cubic(x: f64) -> ThermoResult<f64> {
        Ok(x * x * x - 8.0)
    }

    #[test]
    fn secant_finds_root() {
        let root = Secant::default()
            .solve(&mut cubic, 1.0, (0.0, 10.0))
            .unwrap();
        assert!((root - 2.0).abs() < 1e-6, "root = {root}");
    }

    #[test]
    fn secant_on_linear_function_is_exact() {
        let mut f = |x: f64| -> ThermoResult<f64> { Ok(3.0 * x - 900.0) };
        let root = Secant::default().solve(&mut f, 298.15, (1.0, 5000.0)).unwrap();
        assert!((root - 300.0).abs() < 1e-9);
    }

    #[test]
    fn secant_flat_function_fails() {
        let mut f = |_x: f64| -> ThermoResult<f64> { Ok(1.0) };
        let err = Secant::default().solve(&mut f, 1.0, (0.0, 2.0)).unwrap_err();
        assert!(matches!(err, ThermoError::ConvergenceFailed { .. }));
    }

    #[test]
    fn bisection_finds_root() {
        let root = Bisection::default()
            .solve(&mut cubic, 0.0, (0.0, 10.0))
            .unwrap();
        assert!((root - 2.0).abs() < 1e-8);
    }

    #[test]
    fn bisection_requires_bracket() {
        let err = Bisection::default()
            .solve(&mut cubic, 0.0, (3.0, 10.0))
            .unwrap_err();
        assert!(matches!(err, ThermoError::ConvergenceFailed { .. }));
    }

    #[test]
    fn errors_from_function_propagate() {
        let mut f = |_x: f64| -> ThermoResult<f64> {
            Err(ThermoError::NonPhysical { what: "test" })
        };
        let err = Bisection::default().solve(&mut f, 0.0, (0.0, 1.0)).unwrap_err();
        assert_eq!(err, ThermoError::NonPhysical { what: "test" });
    }
}
