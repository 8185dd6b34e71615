//! Error types for polyeq

use ndarray_linalg::error::LinalgError;
use thiserror::Error;

use crate::lp::LinProgError;

/// Result type alias using polyeq's [`PolyError`]
pub type Result<T> = std::result::Result<T, PolyError>;

/// Errors raised by the solvers and predicates.
///
/// An equation without a solution is not an error: solvers report it as
/// `Ok(None)`. The variants below cover malformed input, invalid
/// configuration and failures of the numerical back ends.
#[derive(Error, Debug)]
pub enum PolyError {
    /// Polynomial is identically zero where a nonzero one is required
    #[error("polynomial is identically zero")]
    ZeroPolynomial,

    /// Unrecognised configuration value
    #[error("unsupported option '{0}'")]
    UnsupportedOption(String),

    /// Invalid argument provided to an operation
    #[error("invalid argument '{arg}': {reason}")]
    InvalidArgument {
        /// The argument name
        arg: &'static str,
        /// Why it was rejected
        reason: String,
    },

    /// A numerical step produced unusable output
    #[error("numerical failure: {0}")]
    Numerical(String),

    /// LAPACK reported a failure
    #[error("linear algebra failure: {0}")]
    Linalg(#[from] LinalgError),

    /// The linear program could not be solved
    #[error("linear program failed: {0}")]
    LinProg(#[from] LinProgError),
}
