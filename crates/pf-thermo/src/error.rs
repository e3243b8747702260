//! Thermodynamic collaborator errors.

use pf_core::{CoreError, UnitError};
use thiserror::Error;

/// Result type for thermodynamic operations.
pub type ThermoResult<T> = Result<T, ThermoError>;

/// Errors raised by the chemical registry, flow indexers and mixture models.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ThermoError {
    /// Chemical identifier is not part of the registry.
    #[error("Undefined chemical '{id}'")]
    UndefinedChemical { id: String },

    /// Chemical identifier is not in the built-in catalog.
    #[error("No catalog entry for chemical '{id}'")]
    UnknownCatalogEntry { id: String },

    /// Phase tag not recognized or not present in a phase set.
    #[error("Undefined phase '{phase}'")]
    UndefinedPhase { phase: String },

    /// Non-physical values (negative temperature, pressure, etc.).
    #[error("Non-physical value for {what}")]
    NonPhysical { what: &'static str },

    /// Invalid argument.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: String },

    /// Operation not supported by the model or storage layout.
    #[error("Not supported: {what}")]
    NotSupported { what: &'static str },

    /// Root finder did not converge (e.g., solving for T given H).
    #[error("Convergence failed for {what}")]
    ConvergenceFailed { what: &'static str },

    /// No thermodynamic context was given and no default is configured.
    #[error("No thermodynamic context configured; call settings::set_thermo first")]
    NoThermo,

    #[error(transparent)]
    Unit(#[from] UnitError),
}

impl From<ThermoError> for CoreError {
    fn from(err: ThermoError) -> Self {
        match err {
            ThermoError::Unit(u) => CoreError::Unit(u),
            ThermoError::NonPhysical { what } => CoreError::Invariant {
                what: format!("Non-physical thermodynamic value: {what}"),
            },
            other => CoreError::Invariant {
                what: other.to_string(),
            },
        }
    }
}
