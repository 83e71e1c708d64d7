//! # Error Types
//!
//! Errors raised at the boundaries of the optimizer framework. Failing to converge is
//! not one of them: it is reported through [`crate::optim::OptimizerStatus`] and the
//! bound [`crate::report::Reporter`], and the caller still receives a point.

/// Result alias used throughout the crate.
pub type OptimResult<T> = Result<T, OptimError>;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum OptimError {
    /// A stepsize search strategy was asked to search before `bind` gave it an objective.
    #[error("Stepsize search strategy '{0}' is not bound to an objective")]
    UnboundStrategy(&'static str),
    /// `optimize` was called before `init`.
    #[error("Optimizer '{0}' used before init()")]
    Uninitialized(&'static str),
    #[error("Dimension mismatch in {context}: expected {expected}, got {got}")]
    DimensionMismatch {
        context: String,
        expected: usize,
        got: usize,
    },
    #[error("Invalid parameter '{parameter}': {message}")]
    InvalidParameter { parameter: String, message: String },
}

impl OptimError {
    pub(crate) fn dimension(context: impl Into<String>, expected: usize, got: usize) -> Self {
        OptimError::DimensionMismatch {
            context: context.into(),
            expected,
            got,
        }
    }

    pub(crate) fn invalid(parameter: impl Into<String>, message: impl Into<String>) -> Self {
        OptimError::InvalidParameter {
            parameter: parameter.into(),
            message: message.into(),
        }
    }
}
