//! pf-core: stable foundation for procflow.
//!
//! Contains:
//! - units (typed temperature/pressure and reference constants)
//! - dimension (unit-string dimensional analysis and conversion factors)
//! - numeric (Real + tolerances + float helpers)
//! - format (significant-figure formatting for reports)
//! - error (shared error types)

pub mod dimension;
pub mod error;
pub mod format;
pub mod numeric;
pub mod units;

// Re-exports for downstream crates
pub use dimension::{
    Dimension, UnitError, UnitExpr, conversion_factor, convert_temperature, dimensionality,
    parse_units,
};
pub use error::{CoreError, CoreResult};
pub use format::sig;
pub use numeric::*;
pub use units::*;
