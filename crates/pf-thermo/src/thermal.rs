//! Temperature and pressure of a material flow.

use crate::error::{ThermoError, ThermoResult};
use pf_core::constants::{P_REF_PA, T_REF_K};
use pf_core::units::{Pressure, Temperature, k, kelvin_of, pa, pascal_of};
use std::cell::RefCell;
use std::rc::Rc;

/// Mutable (T, P) state. T in K, P in Pa.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThermalCondition {
    pub t: f64,
    pub p: f64,
}

/// Shared handle to a thermal condition. Streams sharing the thermal facet
/// hold clones of the same handle.
pub type ThermalHandle = Rc<RefCell<ThermalCondition>>;

impl Default for ThermalCondition {
    fn default() -> Self {
        Self {
            t: T_REF_K,
            p: P_REF_PA,
        }
    }
}

impl ThermalCondition {
    /// Validated constructor: both T and P must be finite and positive.
    pub fn new(t: f64, p: f64) -> ThermoResult<Self> {
        if !(t.is_finite() && t > 0.0) {
            return Err(ThermoError::NonPhysical {
                what: "temperature must be positive and finite",
            });
        }
        if !(p.is_finite() && p > 0.0) {
            return Err(ThermoError::NonPhysical {
                what: "pressure must be positive and finite",
            });
        }
        Ok(Self { t, p })
    }

    pub fn from_quantities(t: Temperature, p: Pressure) -> ThermoResult<Self> {
        Self::new(kelvin_of(t), pascal_of(p))
    }

    pub fn temperature(&self) -> Temperature {
        k(self.t)
    }

    pub fn pressure(&self) -> Pressure {
        pa(self.p)
    }

    pub fn into_handle(self) -> ThermalHandle {
        Rc::new(RefCell::new(self))
    }

    /// Overwrite values in place, keeping the storage identity.
    pub fn copy_like(&mut self, other: &ThermalCondition) {
        self.t = other.t;
        self.p = other.p;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_reference_state() {
        let tc = ThermalCondition::default();
        assert_eq!(tc.t, 298.15);
        assert_eq!(tc.p, 101_325.0);
    }

    #[test]
    fn rejects_nonphysical_values() {
        assert!(ThermalCondition::new(-1.0, 101_325.0).is_err());
        assert!(ThermalCondition::new(300.0, 0.0).is_err());
        assert!(ThermalCondition::new(f64::NAN, 1.0).is_err());
    }

    #[test]
    fn shared_handle_sees_writes() {
        let a = ThermalCondition::default().into_handle();
        let b = Rc::clone(&a);
        b.borrow_mut().t = 350.0;
        assert_eq!(a.borrow().t, 350.0);
        assert_eq!(a.borrow().temperature().value, 350.0);
    }

    #[test]
    fn typed_quantities_round_trip() {
        let tc = ThermalCondition::from_quantities(k(350.0), pa(2.0e5)).unwrap();
        assert_eq!((tc.t, tc.p), (350.0, 2.0e5));
        assert_eq!(pascal_of(tc.pressure()), 2.0e5);
        assert!(ThermalCondition::from_quantities(k(0.0), pa(1.0)).is_err());
    }

    #[test]
    fn copy_like_keeps_identity() {
        let a = ThermalCondition::default().into_handle();
        let alias = Rc::clone(&a);
        let other = ThermalCondition::new(400.0, 2e5).unwrap();
        a.borrow_mut().copy_like(&other);
        assert!(Rc::ptr_eq(&a, &alias));
        assert_eq!(*alias.borrow(), other);
    }
}
