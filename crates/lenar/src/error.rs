//! Error types for lexing, parsing and evaluation

use thiserror::Error;

use crate::lexer::Span;

/// Error raised by the lexer when the source text is not tokenizable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LexError {
    /// A character that does not start any token
    #[error("unexpected character `{ch}` at {span}")]
    UnexpectedChar {
        /// The offending character
        ch: char,
        /// Where it was found
        span: Span,
    },

    /// A string literal that never closes
    #[error("unterminated string literal starting at {span}")]
    UnterminatedString {
        /// Where the string opened
        span: Span,
    },

    /// An unknown escape sequence inside a string literal
    #[error("invalid escape sequence `\\{ch}` at {span}")]
    InvalidEscape {
        /// The character following the backslash
        ch: char,
        /// Where the escape was found
        span: Span,
    },

    /// A numeric literal that does not fit the number type
    #[error("number literal `{text}` out of range at {span}")]
    NumberOutOfRange {
        /// The literal text
        text: String,
        /// Where it was found
        span: Span,
    },
}

/// Error raised by the parser on a malformed program.
///
/// Parsing never recovers: the first error aborts the parse and no
/// partial AST is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The parser expected one construct and found another token
    #[error("expected {expected}, found `{found}` at {span}")]
    UnexpectedToken {
        /// The construct the parser was looking for
        expected: String,
        /// The lexeme actually found
        found: String,
        /// Where it was found
        span: Span,
    },

    /// The token stream ended mid-construct
    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEof {
        /// The construct the parser was looking for
        expected: String,
    },

    /// Lexing failed while producing tokens for the parser
    #[error(transparent)]
    Lex(#[from] LexError),
}

/// Error raised during evaluation.
///
/// Evaluation errors abort the current expression and propagate up the
/// call/block chain to the host boundary. An error in a spawned context
/// terminates only that context and is reported through its join result.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    /// An identifier was not found in any enclosing scope
    #[error("unbound name `{name}`")]
    UnboundName {
        /// The unresolved identifier
        name: String,
    },

    /// A dotted path resolved its head but not a member segment
    #[error("`{namespace}` has no member `{member}`")]
    UnboundMember {
        /// The namespace the lookup started from
        namespace: String,
        /// The missing member segment
        member: String,
    },

    /// A value of the wrong kind was used in an operation
    #[error("type error: expected {expected}, got {got}")]
    TypeError {
        /// Expected value kind
        expected: String,
        /// Actual value kind
        got: String,
    },

    /// A value that is not a function was called
    #[error("`{got}` is not callable")]
    NotCallable {
        /// Kind of the value in call position
        got: String,
    },

    /// A call supplied the wrong number of arguments
    #[error("`{name}` expects {expected} argument(s), got {got}")]
    ArityMismatch {
        /// Name of the callee (or `<fn>` for anonymous functions)
        name: String,
        /// Declared parameter count
        expected: usize,
        /// Supplied argument count
        got: usize,
    },

    /// The call-depth limit was exceeded
    #[error("call depth limit exceeded ({depth}/{max})")]
    StackOverflow {
        /// Depth at the point of failure
        depth: usize,
        /// Configured maximum
        max: usize,
    },

    /// A native (host-provided) function reported a failure
    #[error("builtin `{name}` failed: {message}")]
    Builtin {
        /// Name of the native function
        name: String,
        /// Its failure message
        message: String,
    },

    /// Cooperative cancellation was observed at a statement boundary
    #[error("evaluation cancelled")]
    Cancelled,
}

impl EvalError {
    /// Message-style failure of a named native function.
    pub fn builtin(name: impl Into<String>, message: impl Into<String>) -> Self {
        EvalError::Builtin {
            name: name.into(),
            message: message.into(),
        }
    }
}

/// Umbrella error for the whole parse + evaluate pipeline.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LenarError {
    /// Lexing failed
    #[error(transparent)]
    Lex(#[from] LexError),

    /// Parsing failed
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Evaluation failed
    #[error(transparent)]
    Eval(#[from] EvalError),
}

/// Result type alias for fallible interpreter operations.
pub type Result<T> = std::result::Result<T, LenarError>;
