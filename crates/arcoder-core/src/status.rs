//! Status codes and error handling for coder operations.
//!
//! Every fallible operation returns a [`StatusResult`]. The error arm carries a
//! [`CoderError`], whose [`StatusCode`] tells callers which kind of failure
//! occurred without matching on messages.

use std::fmt;

use thiserror::Error;

/// Outcome kind of a coder operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StatusCode {
    /// Operation completed successfully
    #[default]
    Success,
    /// The output buffer could not grow
    AllocationFailure,
    /// A size or option passed by the caller is not acceptable
    InvalidArgument,
    /// The compressed input is detectably damaged or truncated
    CorruptedInput,
    /// The coder was used out of order (e.g. not initialized)
    InvalidState,
}

impl StatusCode {
    /// Returns the name of this code as a string
    pub const fn name(self) -> &'static str {
        match self {
            StatusCode::Success => "SUCCESS",
            StatusCode::AllocationFailure => "ALLOCATION_FAILURE",
            StatusCode::InvalidArgument => "INVALID_ARGUMENT",
            StatusCode::CorruptedInput => "CORRUPTED_INPUT",
            StatusCode::InvalidState => "INVALID_STATE",
        }
    }

    pub const fn is_success(self) -> bool {
        matches!(self, StatusCode::Success)
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Failure raised by the byte buffer, the model, or the coders.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoderError {
    #[error("Allocation failure: could not grow buffer to {requested} bytes")]
    AllocationFailure { requested: usize },
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Corrupted input: {0}")]
    CorruptedInput(String),
    #[error("Invalid state: {0}")]
    InvalidState(String),
}

impl CoderError {
    /// Returns the status code matching this error
    pub fn code(&self) -> StatusCode {
        match self {
            CoderError::AllocationFailure { .. } => StatusCode::AllocationFailure,
            CoderError::InvalidArgument(_) => StatusCode::InvalidArgument,
            CoderError::CorruptedInput(_) => StatusCode::CorruptedInput,
            CoderError::InvalidState(_) => StatusCode::InvalidState,
        }
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        CoderError::InvalidArgument(msg.into())
    }

    pub fn corrupted_input(msg: impl Into<String>) -> Self {
        CoderError::CorruptedInput(msg.into())
    }

    pub fn invalid_state(msg: impl Into<String>) -> Self {
        CoderError::InvalidState(msg.into())
    }
}

/// Result type used throughout the crate.
pub type StatusResult<T> = Result<T, CoderError>;

/// Result of an operation that produces no value.
pub type Status = StatusResult<()>;

/// Returns a success status
pub fn ok_status() -> Status {
    Ok(())
}

/// Converts any status result into its code.
pub fn status_code<T>(result: &StatusResult<T>) -> StatusCode {
    match result {
        Ok(_) => StatusCode::Success,
        Err(err) => err.code(),
    }
}

/// Report produced by a successful encode or decode call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodingSummary {
    pub status: StatusCode,
    /// Number of symbols (bytes) coded.
    pub symbols: u32,
    /// Bytes consumed from the input.
    pub input_bytes: usize,
    /// Bytes present in the output buffer afterwards.
    pub output_bytes: usize,
}

impl CodingSummary {
    pub(crate) fn success(symbols: u32, input_bytes: usize, output_bytes: usize) -> Self {
        Self {
            status: StatusCode::Success,
            symbols,
            input_bytes,
            output_bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_names() {
        assert_eq!(StatusCode::Success.name(), "SUCCESS");
        assert_eq!(StatusCode::AllocationFailure.name(), "ALLOCATION_FAILURE");
        assert_eq!(StatusCode::CorruptedInput.name(), "CORRUPTED_INPUT");
        assert_eq!(StatusCode::default(), StatusCode::Success);
    }

    #[test]
    fn test_error_codes() {
        let err = CoderError::AllocationFailure { requested: 16 };
        assert_eq!(err.code(), StatusCode::AllocationFailure);
        assert_eq!(CoderError::invalid_argument("x").code(), StatusCode::InvalidArgument);
        assert_eq!(CoderError::corrupted_input("x").code(), StatusCode::CorruptedInput);
        assert_eq!(CoderError::invalid_state("x").code(), StatusCode::InvalidState);
    }

    #[test]
    fn test_display() {
        let err = CoderError::invalid_argument("size is zero");
        assert_eq!(format!("{}", err), "Invalid argument: size is zero");
        assert_eq!(format!("{}", StatusCode::InvalidState), "INVALID_STATE");
    }

    #[test]
    fn test_status_code_of_result() {
        assert_eq!(status_code(&ok_status()), StatusCode::Success);
        let failed: Status = Err(CoderError::corrupted_input("truncated"));
        assert_eq!(status_code(&failed), StatusCode::CorruptedInput);
    }
}
