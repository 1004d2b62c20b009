use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LdpcError {
    // Structural violation found while constructing a parity-check matrix.
    #[error("Malformed matrix: {0}")]
    MalformedMatrix(String),
    #[error("Index {index} out of range, must be less than {limit}")]
    IndexOutOfRange { index: usize, limit: usize },
    #[error("Dimension mismatch: expected {expected} values, received {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
    #[error("Invalid iteration bound {0}: at least one iteration is required")]
    InvalidIterationBound(usize),
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

#[cfg(test)]
#[path = "./ldpc_error_spec.rs"]
mod ldpc_error_spec;
