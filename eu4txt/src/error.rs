//! Error types for the Paradox-script parser.

use std::fmt;

/// Errors that can occur while parsing a token stream.
///
/// Positions are token indices, not byte offsets.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    /// Input ended inside an open `{`.
    UnexpectedEof { position: usize },
    /// A token appeared where a value was required.
    UnexpectedToken {
        position: usize,
        token: String,
        expected: String,
    },
    /// An assignment started with something other than a value (e.g. `= x`).
    InvalidLhs { position: usize, found: String },
    /// `key =` was not followed by a value or list.
    MissingRhs { position: usize },
    /// A stray `}` closed the root list before the input ended.
    UnconsumedTokens { position: usize, remaining: usize },
    /// The input held no tokens at all.
    EmptyInput,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::UnexpectedEof { position } => {
                write!(f, "unexpected end of input at token {} (unclosed brace)", position)
            }
            ParseError::UnexpectedToken {
                position,
                token,
                expected,
            } => write!(
                f,
                "unexpected token '{}' at token {}, expected {}",
                token, position, expected
            ),
            ParseError::InvalidLhs { position, found } => write!(
                f,
                "invalid left-hand side '{}' at token {}",
                found, position
            ),
            ParseError::MissingRhs { position } => {
                write!(f, "missing right-hand side at token {}", position)
            }
            ParseError::UnconsumedTokens {
                position,
                remaining,
            } => write!(
                f,
                "unbalanced '}}' at token {} ({} tokens left unparsed)",
                position, remaining
            ),
            ParseError::EmptyInput => write!(f, "cannot parse empty input"),
        }
    }
}

impl std::error::Error for ParseError {}
