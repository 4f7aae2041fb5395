//! The fixed runtime error taxonomy and its stdout formatting.

use thiserror::Error;

/// The closed set of errors the engine can halt on, per the language's
/// error contract. Message text is part of the contract — do not reword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RuntimeError {
    #[error("FAILED TO PARSE INPUT")]
    ParseError,
    #[error("FAILED TO COMPUTE DUE TO INCOMPATIBLE TYPES")]
    TypeMismatch,
    #[error("CANNOT DIVIDE BY ZERO")]
    DivByZero,
    #[error("CANNOT COMPARE TYPES")]
    CompareType,
    #[error("TARGET LINE IS OUT OF BOUNDS")]
    OutOfBounds,
    #[error("MAXIMUM RECURSION REACHED")]
    RecursionDepth,
}

/// Formats a halting error the way the language contract requires:
/// `ERROR AT LINE <n>: <MESSAGE>`, with no trailing punctuation beyond the
/// newline the caller appends via `write_line`.
pub fn format_error(line: usize, error: RuntimeError) -> String {
    format!("ERROR AT LINE {line}: {error}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_div_by_zero() {
        assert_eq!(
            format_error(2, RuntimeError::DivByZero),
            "ERROR AT LINE 2: CANNOT DIVIDE BY ZERO"
        );
    }

    #[test]
    fn formats_compare_type() {
        assert_eq!(
            format_error(1, RuntimeError::CompareType),
            "ERROR AT LINE 1: CANNOT COMPARE TYPES"
        );
    }
}
