//! Error type for path compilation.

use std::fmt;

/// Errors produced while compiling a path expression.
///
/// Evaluation never fails: `find` on a compiled path is total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// The lexer rejected the expression.
    Lex { position: usize, message: String },
    /// A lexeme appeared where the grammar does not allow it.
    UnexpectedLexeme { position: usize, found: String },
    /// An array subscript could not be parsed.
    InvalidSubscript { message: String },
    /// A filter expression could not be parsed.
    InvalidFilter { message: String },
    /// A regex literal failed to compile.
    InvalidRegex { pattern: String, message: String },
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathError::Lex { position, message } => {
                write!(f, "{} (at position {})", message, position)
            }
            PathError::UnexpectedLexeme { position, found } => {
                write!(f, "unexpected '{}' at position {}", found, position)
            }
            PathError::InvalidSubscript { message } => write!(f, "{}", message),
            PathError::InvalidFilter { message } => write!(f, "invalid filter: {}", message),
            PathError::InvalidRegex { pattern, message } => {
                write!(f, "invalid regular expression /{}/: {}", pattern, message)
            }
        }
    }
}

impl std::error::Error for PathError {}
