//! Typed temperature and pressure at the edges of the thermal state.
//!
//! Streams store T and P as raw `f64` in K and Pa; these helpers move between
//! that storage and `uom` quantities for callers that prefer typed values.

use uom::si::f64::{Pressure as UomPressure, ThermodynamicTemperature};
use uom::si::pressure::pascal;
use uom::si::thermodynamic_temperature::kelvin;

pub type Temperature = ThermodynamicTemperature;
pub type Pressure = UomPressure;

#[inline]
pub fn k(v: f64) -> Temperature {
    Temperature::new::<kelvin>(v)
}

#[inline]
pub fn pa(v: f64) -> Pressure {
    Pressure::new::<pascal>(v)
}

#[inline]
pub fn kelvin_of(t: Temperature) -> f64 {
    t.get::<kelvin>()
}

#[inline]
pub fn pascal_of(p: Pressure) -> f64 {
    p.get::<pascal>()
}

pub mod constants {
    /// Reference temperature for enthalpy and entropy [K].
    pub const T_REF_K: f64 = 298.15;
    /// Reference pressure [Pa].
    pub const P_REF_PA: f64 = 101_325.0;
    /// Universal gas constant [J/(mol·K)].
    pub const R_J_PER_MOL_K: f64 = 8.314_462_618;
}
