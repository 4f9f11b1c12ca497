//! Abstract syntax tree shared by the parser and the evaluator
//!
//! The tree is a closed sum type: evaluation dispatches by exhaustive
//! matching, so adding a node kind is a compile-time checked change.
//! Every node owns its children exclusively and the whole tree is
//! immutable once the parser returns it.

/// A literal value as written in the source.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// A string literal, escapes already decoded
    String(String),
    /// An integer literal
    Number(i64),
    /// `true` or `false`
    Bool(bool),
}

/// A brace-delimited sequence of statements.
///
/// The block's value is the value of its last expression; `Unit` if the
/// block is empty or its last statement is a `let`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Block {
    /// Statements in source order
    pub exprs: Vec<Expr>,
}

/// A single expression or statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A literal
    Literal(Literal),

    /// An identifier, possibly a dotted path such as `Lenar.version`.
    ///
    /// The path is kept as segments; member access is resolved at
    /// evaluation time.
    Identifier {
        /// Path segments, never empty
        path: Vec<String>,
    },

    /// `let name = value`: binds in the current scope, yields `Unit`
    Let {
        /// The bound name
        name: String,
        /// The bound expression
        value: Box<Expr>,
    },

    /// `fn(params) { body }`: a function literal; evaluating it
    /// produces a closure over the current environment
    Function {
        /// Ordered parameter names
        params: Vec<String>,
        /// The function body
        body: Block,
    },

    /// `callee(args)`: arguments evaluated eagerly, left to right
    Call {
        /// The expression in call position
        callee: Box<Expr>,
        /// Ordered argument expressions
        args: Vec<Expr>,
    },

    /// `if(cond) { then } else { else }`: an expression yielding the
    /// chosen branch's value, or `Unit` when the condition is false and
    /// there is no `else`
    If {
        /// The condition, which must evaluate to a boolean
        condition: Box<Expr>,
        /// Branch taken when the condition is true
        then_branch: Block,
        /// Optional branch taken when the condition is false
        else_branch: Option<Block>,
    },

    /// A standalone `{ ... }` block, evaluated in a fresh child scope
    Block(Block),
}

/// A parsed program: the ordered sequence of top-level statements.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    /// Top-level statements in source order
    pub exprs: Vec<Expr>,
}

impl Expr {
    /// Build an identifier expression from a single name.
    pub fn ident(name: impl Into<String>) -> Self {
        Expr::Identifier {
            path: vec![name.into()],
        }
    }
}
