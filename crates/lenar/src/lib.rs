//! # Lenar
//!
//! An embeddable tree-walking interpreter for the Lenar scripting
//! language: a small, dynamically-typed, expression-oriented language
//! where functions are first-class closures, `if` is an expression, and
//! built-in identifiers expose host-provided values and functions.
//!
//! ## Architecture
//!
//! - **Lexer**: source text to a lazy token sequence
//! - **Parser**: handcrafted recursive descent, tokens to AST
//! - **Evaluator**: tree-walking interpretation with chained lexical
//!   environments and shared-by-reference closures
//! - **Runtime**: embedding surface and isolated, thread-per-context
//!   concurrency
//!
//! ## Example
//!
//! ```
//! use lenar::{BufferSink, Runtime};
//!
//! let sink = BufferSink::new();
//! let runtime = Runtime::with_sink(sink.clone());
//!
//! runtime
//!     .run(
//!         r#"
//!         if(isEqual("test" "test")) {
//!             let something = fn(v) { println(Lenar.version); "hi" };
//!             println(something("hey"));
//!         };
//!     "#,
//!     )
//!     .unwrap();
//!
//! assert_eq!(sink.lines(), vec!["1.0.0".to_string(), "hi".to_string()]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod ast;
pub mod context;
pub mod environment;
pub mod error;
pub mod eval;
pub mod lexer;
pub mod output;
pub mod parser;
pub mod runtime;
pub mod value;

// Re-export main types
pub use ast::{Block, Expr, Literal, Program};
pub use context::{EvalContext, DEFAULT_MAX_CALL_DEPTH};
pub use environment::{Environment, LANG_VERSION};
pub use error::{EvalError, LenarError, LexError, ParseError, Result};
pub use eval::{call_value, eval_block, eval_program, Evaluate};
pub use lexer::{tokenize, Lexer, Span, Token, TokenKind};
pub use output::{BufferSink, OutputSink, StdoutSink};
pub use parser::{parse, Parser};
pub use runtime::{ContextHandle, Runtime};
pub use value::{FunctionValue, Namespace, NativeFn, NativeFnPtr, Value};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_exists() {
        assert!(!VERSION.is_empty());
    }
}
