//! Unified error type for the ledmatrix-lib crate.
//!
//! [`MatrixError`] wraps native driver failures (`DriverError`) and
//! domain-specific error kinds (`Config`, `Color`). `From` impls allow `?`
//! to propagate across module boundaries.

use std::fmt;

use crate::driver::DriverError;

/// Unified error type for ledmatrix-lib operations.
#[derive(Debug)]
pub enum MatrixError {
    /// Native driver error (allocation, init or render status).
    Driver(DriverError),
    /// Standard I/O error (config persistence).
    Io(std::io::Error),
    /// Configuration error (unknown layout, bad sub-channel).
    Config(String),
    /// Color parsing error.
    Color(String),
}

impl fmt::Display for MatrixError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatrixError::Driver(e) => write!(f, "{e}"),
            MatrixError::Io(e) => write!(f, "I/O error: {e}"),
            MatrixError::Config(e) => write!(f, "Config error: {e}"),
            MatrixError::Color(e) => write!(f, "Color error: {e}"),
        }
    }
}

impl std::error::Error for MatrixError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MatrixError::Driver(e) => Some(e),
            MatrixError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<DriverError> for MatrixError {
    fn from(e: DriverError) -> Self {
        MatrixError::Driver(e)
    }
}

impl From<std::io::Error> for MatrixError {
    fn from(e: std::io::Error) -> Self {
        MatrixError::Io(e)
    }
}

/// Crate-level Result alias using [`MatrixError`].
pub type Result<T> = std::result::Result<T, MatrixError>;
