use thiserror::Error;

/// Failures reported by the codec. Channel corruption is never one of them.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CodecError {
    #[error("Invalid dimensions: {0}")]
    InvalidDimensions(String),
    #[error("Invalid alphabet size q={0}: at least 2 symbols are required")]
    InvalidAlphabet(u32),
    #[error("Invalid error probability pe={0}: must lie in [0, 1]")]
    InvalidProbability(f64),
    #[error("Input length mismatch: expected {expected} symbols, got {actual}")]
    InputLengthMismatch { expected: usize, actual: usize },
    #[error("Invalid matrix: {0}")]
    InvalidMatrix(String),
    #[error("No coset leader for syndrome index {0}: table and parity-check matrix disagree")]
    DecodeError(usize),
    #[error("Coset leader enumeration too large: {bits} bits exceeds the limit of {limit}")]
    TableTooLarge { bits: usize, limit: usize },
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, CodecError>;

/// Fails with `InputLengthMismatch` unless `actual == expected`.
pub(crate) fn check_length(expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(CodecError::InputLengthMismatch { expected, actual });
    }
    Ok(())
}
