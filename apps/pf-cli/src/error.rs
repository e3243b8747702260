//! Error type for the command line front end.

use pf_stream::StreamError;
use pf_thermo::ThermoError;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Failed to read stream file: {path}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid stream file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Thermo(#[from] ThermoError),

    #[error(transparent)]
    Stream(#[from] StreamError),
}

pub type CliResult<T> = Result<T, CliError>;
