//! Fault types for the Funge engine
//!
//! This module defines [`FungeError`], which covers every fault that can be raised
//! while building a space, moving through it, or executing a program.
//!
//! All faults are fatal to a run: the tick loop does not retry or recover, and a
//! fault raised by an operation or an observer propagates straight to the caller.

use crate::space::Coord;
use thiserror::Error;

/// Faults raised by spaces, instruction pointers, the engine and language plugins
#[derive(Error, Debug)]
pub enum FungeError {
    /// A direction or coordinate was applied to a space of a different arity
    #[error("Dimension mismatch: expected {expected} axes, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// The space refuses to move along this direction
    #[error("Invalid direction: {message}")]
    InvalidDirection { message: String },

    /// A dense space was indexed outside its bounds
    #[error("Index {index} on axis {axis} is outside of the range [0, {size})")]
    IndexOutOfRange { axis: usize, index: i64, size: usize },

    /// A coordinate cannot be represented by the space's precision
    #[error("Coordinate {coord} is out of range for this space")]
    CoordinateOutOfRange { coord: Coord },

    /// A space was constructed with an unusable shape
    #[error("Invalid space shape: {message}")]
    InvalidShape { message: String },

    /// The `&` command read a token that is not a decimal integer
    #[error("Invalid number format given as input: '{token}'")]
    InputFormat { token: String },

    /// Input ended in the middle of a read
    #[error("Unexpected end of input")]
    UnexpectedEof,

    /// An operation popped more values than the stack holds
    #[error("Stack underflow: needed {needed}, {available} available")]
    StackUnderflow { needed: usize, available: usize },

    /// Division or modulo by zero
    #[error("{operation} by zero")]
    DivisionByZero { operation: &'static str },

    /// The language plugin does not support the space it was given
    #[error("Language '{language}' does not support a {shape} space")]
    UnsupportedSpace { language: String, shape: String },

    /// A state bag or shared-state entry was expected but not present
    #[error("Missing state entry '{key}'")]
    MissingState { key: &'static str },

    /// A state bag or shared-state entry holds a value of another type
    #[error("State entry '{key}' holds a value of an unexpected type")]
    StateTypeMismatch { key: &'static str },

    /// Failure in an input or output collaborator
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Raised by a notification subscriber
    #[error("Observer failed during {phase}: {message}")]
    Observer { phase: String, message: String },

    /// A background run was cancelled before it started
    #[error("Run was cancelled before it started")]
    Cancelled,

    /// A background run panicked
    #[error("Background run panicked")]
    WorkerPanicked,

    /// Snapshot history limit exceeded
    #[error("Snapshot memory limit exceeded: {current} bytes used, limit is {limit}")]
    SnapshotLimitExceeded { current: usize, limit: usize },

    /// History navigation failed
    #[error("History operation failed: {message}")]
    History { message: String },
}

/// Result type for engine operations
pub type FungeResult<T> = Result<T, FungeError>;

impl FungeError {
    /// Create an invalid-direction fault
    pub fn invalid_direction(message: impl Into<String>) -> Self {
        Self::InvalidDirection {
            message: message.into(),
        }
    }

    /// Create an invalid-shape fault
    pub fn invalid_shape(message: impl Into<String>) -> Self {
        Self::InvalidShape {
            message: message.into(),
        }
    }

    /// Create a history navigation fault
    pub fn history(message: impl Into<String>) -> Self {
        Self::History {
            message: message.into(),
        }
    }

    /// Whether this fault comes from reading program input
    pub fn is_input_fault(&self) -> bool {
        matches!(self, Self::InputFormat { .. } | Self::UnexpectedEof)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_underflow_message() {
        let err = FungeError::StackUnderflow {
            needed: 2,
            available: 1,
        };
        assert_eq!(err.to_string(), "Stack underflow: needed 2, 1 available");
    }

    #[test]
    fn test_io_errors_convert() {
        let err: FungeError = std::io::Error::new(std::io::ErrorKind::Other, "boom").into();
        assert!(matches!(err, FungeError::Io(_)));
        assert!(!err.is_input_fault());
        assert!(FungeError::UnexpectedEof.is_input_fault());
    }
}
