// src/errors.rs

//! Crate-wide error aliases and helpers.
//!
//! Job-level failures are never errors: they are [`crate::exec::JobResult`]
//! variants. These errors cover the things that stop a whole action.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimbatchError {
    #[error("Invalid target pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Simulation environment was uninitialized ({0} is not set and no --setupenv script was given)")]
    EnvUninitialized(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, SimbatchError>;
