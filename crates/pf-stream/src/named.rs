//! Property access by name and units.

use crate::error::{StreamError, StreamResult};
use crate::stream::Stream;
use pf_core::{conversion_factor, convert_temperature};

/// Canonical units of every named property, in report order.
pub const PROPERTY_UNITS: [(&str, &str); 25] = [
    ("T", "K"),
    ("P", "Pa"),
    ("F_mol", "kmol/hr"),
    ("F_mass", "kg/hr"),
    ("F_vol", "m3/hr"),
    ("H", "kJ/hr"),
    ("S", "kJ/K/hr"),
    ("Hf", "kJ/hr"),
    ("Hc", "kJ/hr"),
    ("Hvap", "kJ/hr"),
    ("C", "kJ/K/hr"),
    ("cost", "USD/hr"),
    ("price", "USD/kg"),
    ("MW", "g/mol"),
    ("V", "m3/mol"),
    ("rho", "kg/m3"),
    ("Cn", "J/mol/K"),
    ("Cp", "J/g/K"),
    ("mu", "Pa*s"),
    ("kappa", "W/m/K"),
    ("nu", "m2/s"),
    ("alpha", "m2/s"),
    ("Pr", ""),
    ("sigma", "N/m"),
    ("epsilon", ""),
];

/// Names accepted by [`Stream::set_property`].
pub const SETTABLE_PROPERTIES: [&str; 7] = ["T", "P", "F_mol", "F_mass", "F_vol", "H", "price"];

/// Canonical units of `name`.
pub fn canonical_units(name: &str) -> StreamResult<&'static str> {
    PROPERTY_UNITS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, units)| *units)
        .ok_or_else(|| StreamError::UnknownProperty {
            name: name.to_string(),
        })
}

/// Convert between a property's canonical units and the caller's `units`;
/// errors always name the caller's units.
fn convert(value: f64, from: &str, to: &str, units: &str) -> StreamResult<f64> {
    if from == to {
        return Ok(value);
    }
    let factor = conversion_factor(from, to).map_err(|e| StreamError::from_unit(units, e))?;
    Ok(value * factor)
}

impl Stream {
    /// Value of the property `name` expressed in `units`.
    pub fn get_property(&self, name: &str, units: &str) -> StreamResult<f64> {
        let canonical = canonical_units(name)?;
        let value = match name {
            "T" => {
                return convert_temperature(self.t(), canonical, units)
                    .map_err(|e| StreamError::from_unit(units, e));
            }
            "P" => self.p(),
            "F_mol" => self.f_mol(),
            "F_mass" => self.f_mass()?,
            "F_vol" => self.f_vol()?,
            "H" => self.h()?,
            "S" => self.s()?,
            "Hf" => self.hf(),
            "Hc" => self.hc(),
            "Hvap" => self.hvap()?,
            "C" => self.c()?,
            "cost" => self.cost()?,
            "price" => self.price(),
            "MW" => self.mw()?,
            "V" => self.v()?,
            "rho" => self.rho()?,
            "Cn" => self.cn()?,
            "Cp" => self.cp()?,
            "mu" => self.mu()?,
            "kappa" => self.kappa()?,
            "nu" => self.nu()?,
            "alpha" => self.alpha()?,
            "Pr" => self.pr()?,
            "sigma" => self.sigma()?,
            "epsilon" => self.epsilon()?,
            _ => {
                return Err(StreamError::UnknownProperty {
                    name: name.to_string(),
                });
            }
        };
        convert(value, canonical, units, units)
    }

    /// Set the property `name` from a value given in `units`.
    pub fn set_property(&self, name: &str, value: f64, units: &str) -> StreamResult<()> {
        let canonical = canonical_units(name)?;
        if !SETTABLE_PROPERTIES.contains(&name) {
            return Err(StreamError::ReadOnlyProperty {
                name: name.to_string(),
            });
        }
        if name == "T" {
            let t = convert_temperature(value, units, canonical)
                .map_err(|e| StreamError::from_unit(units, e))?;
            return self.set_t(t);
        }
        let value = convert(value, units, canonical, units)?;
        match name {
            "P" => self.set_p(value),
            "F_mol" => self.set_f_mol(value),
            "F_mass" => self.set_f_mass(value),
            "F_vol" => self.set_f_vol(value),
            "H" => self.set_h(value),
            "price" => {
                self.set_price(value);
                Ok(())
            }
            _ => Err(StreamError::ReadOnlyProperty {
                name: name.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pf_thermo::Thermo;

    fn stream() -> Stream {
        Stream::builder()
            .thermo(Thermo::from_catalog(&["Water", "Ethanol"]).unwrap())
            .chemical("Water", 10.0)
            .chemical("Ethanol", 5.0)
            .build()
            .unwrap()
    }

    #[test]
    fn every_registered_property_is_readable() {
        let s = stream();
        for (name, units) in PROPERTY_UNITS {
            assert!(s.get_property(name, units).is_ok(), "{name}");
        }
    }

    #[test]
    fn unit_conversions() {
        let s = stream();
        let f = s.get_property("F_mol", "mol/s").unwrap();
        assert!((f - 15.0 * 1000.0 / 3600.0).abs() < 1e-9);
        let t = s.get_property("T", "degC").unwrap();
        assert!((t - 25.0).abs() < 1e-9);
        let p = s.get_property("P", "kPa").unwrap();
        assert!((p - 101.325).abs() < 1e-9);
    }

    #[test]
    fn setters_go_through_canonical_units() {
        let s = stream();
        s.set_property("T", 50.0, "degC").unwrap();
        assert!((s.t() - 323.15).abs() < 1e-9);
        s.set_property("F_mol", 30.0, "kmol/hr").unwrap();
        assert_eq!(s.mol(), vec![20.0, 10.0]);
        s.set_property("P", 2.0, "bar").unwrap();
        assert!((s.p() - 2.0e5).abs() < 1e-6);
    }

    #[test]
    fn unknown_and_read_only_names() {
        let s = stream();
        assert_eq!(
            s.get_property("Q", "kJ/hr"),
            Err(StreamError::UnknownProperty { name: "Q".into() })
        );
        assert_eq!(
            s.set_property("rho", 1.0, "kg/m3"),
            Err(StreamError::ReadOnlyProperty { name: "rho".into() })
        );
    }

    #[test]
    fn wrong_dimension_is_reported() {
        let s = stream();
        let expected = StreamError::DimensionMismatch {
            units: "kg".into(),
            dimensionality: "[mass]".into(),
        };
        assert_eq!(s.get_property("F_mass", "kg").unwrap_err(), expected);
        assert_eq!(s.set_property("F_mass", 1.0, "kg").unwrap_err(), expected);
        assert_eq!(s.mol(), vec![10.0, 5.0]);
    }
}
