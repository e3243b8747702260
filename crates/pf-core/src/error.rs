use thiserror::Error;

pub type CoreResult<T> = Result<T, CoreError>;

/// Lowest common error surface of the procflow crates. Higher layers convert
/// their own errors into this when a caller only needs a message.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Non-finite value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invariant violated: {what}")]
    Invariant { what: String },

    #[error(transparent)]
    Unit(#[from] crate::dimension::UnitError),
}
