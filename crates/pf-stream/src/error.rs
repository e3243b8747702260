//! Stream error types.

use pf_core::{CoreError, UnitError};
use pf_thermo::ThermoError;
use thiserror::Error;

/// Result type for stream operations.
pub type StreamResult<T> = Result<T, StreamError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StreamError {
    /// Units are not a molar, mass or volumetric flow (or not the dimension
    /// a named property expects).
    #[error("DimensionMismatch: '{units}' has dimensionality {dimensionality}")]
    DimensionMismatch {
        units: String,
        dimensionality: String,
    },

    #[error("Unknown property '{name}'")]
    UnknownProperty { name: String },

    #[error("Property '{name}' cannot be set")]
    ReadOnlyProperty { name: String },

    /// Phase set requested on a stream that was never cast to multi-phase.
    #[error("Stream has no phase set; assign one to cast it to a multi-phase stream")]
    MissingPhases,

    #[error("Cannot link streams: {reason}")]
    IncompatibleLink { reason: String },

    #[error("Not supported: {what}")]
    NotSupported { what: &'static str },

    /// Rescaling a stream whose total flow is zero.
    #[error("Cannot set {what} of a stream with no flow")]
    ZeroFlow { what: &'static str },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: String },

    #[error(transparent)]
    Thermo(#[from] ThermoError),

    #[error(transparent)]
    Unit(#[from] UnitError),

    #[error("Non-finite value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },
}

impl From<CoreError> for StreamError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NonFinite { what, value } => StreamError::NonFinite { what, value },
            CoreError::Unit(e) => StreamError::Unit(e),
            CoreError::Invariant { what } => StreamError::InvalidArg { what },
        }
    }
}

impl StreamError {
    /// Map a unit-table failure for `units` onto the stream error surface.
    /// Unknown atoms have no dimensionality and report as `undefined`.
    pub(crate) fn from_unit(units: &str, err: UnitError) -> Self {
        match err {
            UnitError::UnknownUnit { .. } => StreamError::DimensionMismatch {
                units: units.to_string(),
                dimensionality: "undefined".into(),
            },
            UnitError::DimensionMismatch {
                from,
                from_dim,
                to_dim,
                ..
            } => {
                let dim = if from == units { from_dim } else { to_dim };
                StreamError::DimensionMismatch {
                    units: units.to_string(),
                    dimensionality: dim.to_string(),
                }
            }
            other => StreamError::Unit(other),
        }
    }
}

impl From<StreamError> for CoreError {
    fn from(err: StreamError) -> Self {
        match err {
            StreamError::Thermo(e) => e.into(),
            StreamError::Unit(e) => CoreError::Unit(e),
            StreamError::NonFinite { what, value } => CoreError::NonFinite { what, value },
            other => CoreError::Invariant {
                what: other.to_string(),
            },
        }
    }
}
