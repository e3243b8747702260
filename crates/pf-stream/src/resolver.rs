//! Unit-string resolution to a flow basis.
//!
//! Results are memoized per thread and never evicted; the vocabulary of
//! flow units used by a process model is small.

use crate::error::{StreamError, StreamResult};
use pf_core::{Dimension, conversion_factor, parse_units};
use pf_thermo::Basis;
use std::cell::RefCell;
use std::collections::HashMap;
use tracing::debug;

thread_local! {
    static CACHE: RefCell<HashMap<String, (Basis, f64)>> = RefCell::new(HashMap::new());
}

const BASES: [(Basis, Dimension); 3] = [
    (Basis::Molar, Dimension::MOLAR_FLOW),
    (Basis::Mass, Dimension::MASS_FLOW),
    (Basis::Volumetric, Dimension::VOLUMETRIC_FLOW),
];

/// Flow basis of `units` and the factor converting canonical basis values
/// (kmol/hr, kg/hr, m³/hr) into `units`.
pub fn resolve(units: &str) -> StreamResult<(Basis, f64)> {
    if let Some(hit) = CACHE.with(|cache| cache.borrow().get(units).copied()) {
        return Ok(hit);
    }

    let expr = parse_units(units).map_err(|e| StreamError::from_unit(units, e))?;
    let basis = BASES
        .iter()
        .find(|(_, dim)| *dim == expr.dim)
        .map(|(basis, _)| *basis)
        .ok_or_else(|| StreamError::DimensionMismatch {
            units: units.to_string(),
            dimensionality: expr.dim.to_string(),
        })?;
    let factor = conversion_factor(basis.canonical_units(), units)
        .map_err(|e| StreamError::from_unit(units, e))?;

    debug!(units, ?basis, factor, "resolved flow units");
    CACHE.with(|cache| {
        cache.borrow_mut().insert(units.to_string(), (basis, factor));
    });
    Ok((basis, factor))
}

/// Number of memoized unit strings on this thread.
pub fn cached_units() -> usize {
    CACHE.with(|cache| cache.borrow().len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pf_core::UnitError;

    #[test]
    fn canonical_units_have_unit_factor() {
        for (units, basis) in [
            ("kmol/hr", Basis::Molar),
            ("kg/hr", Basis::Mass),
            ("m3/hr", Basis::Volumetric),
        ] {
            let (b, f) = resolve(units).unwrap();
            assert_eq!(b, basis);
            assert!((f - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn pounds_per_hour_is_mass_basis() {
        let (basis, factor) = resolve("lb/hr").unwrap();
        assert_eq!(basis, Basis::Mass);
        assert!((factor - 2.204_622_6).abs() < 1e-6);
    }

    #[test]
    fn other_flow_units() {
        let (basis, factor) = resolve("mol/s").unwrap();
        assert_eq!(basis, Basis::Molar);
        assert!((factor - 1000.0 / 3600.0).abs() < 1e-12);

        let (basis, factor) = resolve("L/min").unwrap();
        assert_eq!(basis, Basis::Volumetric);
        assert!((factor - 1000.0 / 60.0).abs() < 1e-9);
    }

    #[test]
    fn unknown_atom_is_dimension_mismatch() {
        let err = resolve("foo/hr").unwrap_err();
        assert!(matches!(
            err,
            StreamError::DimensionMismatch {
                ref dimensionality,
                ..
            } if dimensionality == "undefined"
        ));
    }

    #[test]
    fn non_flow_dimension_is_rejected() {
        let err = resolve("kg").unwrap_err();
        assert_eq!(
            err,
            StreamError::DimensionMismatch {
                units: "kg".into(),
                dimensionality: "[mass]".into(),
            }
        );
    }

    #[test]
    fn bad_exponents_are_errors() {
        for units in ["kg/m^-128", "kmol/hr^200", "kmol/hr^", "kmol/(hr^100)^2"] {
            assert!(
                matches!(resolve(units), Err(StreamError::Unit(UnitError::Parse { .. }))),
                "{units}"
            );
        }
        let before = cached_units();
        assert!(resolve("kg/m^-128").is_err());
        assert_eq!(cached_units(), before);
    }

    #[test]
    fn results_are_memoized() {
        let before = cached_units();
        resolve("g/s").unwrap();
        let after = cached_units();
        resolve("g/s").unwrap();
        assert_eq!(after, before + 1);
        assert_eq!(cached_units(), after);
    }
}
