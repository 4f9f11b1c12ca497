//! Runtime value representation

mod display;
mod impls;

use std::sync::Arc;

use indexmap::IndexMap;

use crate::ast::Block;
use crate::context::EvalContext;
use crate::environment::Environment;
use crate::error::EvalError;

/// Type alias for native function pointers.
///
/// Natives receive the evaluated arguments and the calling context, so
/// host callbacks that invoke language functions (e.g. `iter`) can call
/// back into the evaluator. Errors are structured: a native reports its
/// own failures with [`EvalError::builtin`] and passes evaluator errors
/// from nested calls through untouched, so `UnboundName` or `Cancelled`
/// raised inside a callback keeps its identity at the host boundary.
pub type NativeFnPtr =
    Arc<dyn Fn(&[Value], &EvalContext) -> Result<Value, EvalError> + Send + Sync>;

/// A runtime value.
///
/// Values are immutable: the language never exposes in-place mutation.
/// Inline kinds (`Unit`, `Bool`, `Number`) are unboxed; everything else
/// is `Arc`-wrapped so values clone cheaply and cross thread boundaries
/// safely.
#[derive(Clone)]
pub enum Value {
    /// The unit value: result of `let`, of an empty block, or of an
    /// `if` whose branch did not execute
    Unit,

    /// `true` or `false`
    Bool(bool),

    /// A 64-bit signed integer
    Number(i64),

    /// An immutable string
    String(Arc<String>),

    /// An immutable list built by the `list` builtin
    List(Arc<Vec<Value>>),

    /// A user-defined function closing over its definition environment
    Function(Arc<FunctionValue>),

    /// A host-provided native function
    NativeFn(NativeFn),

    /// A frozen host namespace such as `Lenar`, accessed by dotted path
    Namespace(Arc<Namespace>),
}

/// A user-defined function value.
///
/// The captured environment is the one active at the `fn` literal's
/// definition point (lexical scoping), shared by reference with every
/// other closure capturing the same scope.
#[derive(Debug, Clone)]
pub struct FunctionValue {
    /// Ordered parameter names
    pub params: Vec<String>,

    /// The function body
    pub body: Block,

    /// The environment captured at definition
    pub env: Arc<Environment>,
}

/// A host-provided native function.
///
/// Invoked with the same calling convention as language-defined
/// functions: evaluated arguments in source order.
#[derive(Clone)]
pub struct NativeFn {
    /// Function name, for display and error messages
    pub name: String,

    /// Required argument count; `-1` for variadic
    pub arity: i32,

    /// The host callback
    pub func: NativeFnPtr,
}

impl NativeFn {
    /// Create a native function value.
    pub fn new(
        name: impl Into<String>,
        arity: i32,
        func: impl Fn(&[Value], &EvalContext) -> Result<Value, EvalError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            arity,
            func: Arc::new(func),
        }
    }
}

/// A frozen namespace of host-exposed constants.
///
/// Member order is preserved for display purposes.
#[derive(Debug, Clone)]
pub struct Namespace {
    /// Namespace name, e.g. `Lenar`
    pub name: String,

    /// Member constants in registration order
    pub members: IndexMap<String, Value>,
}

impl Namespace {
    /// Create a namespace from a list of members.
    pub fn new(name: impl Into<String>, members: Vec<(String, Value)>) -> Self {
        Self {
            name: name.into(),
            members: members.into_iter().collect(),
        }
    }

    /// Look up a member by name.
    pub fn get(&self, member: &str) -> Option<&Value> {
        self.members.get(member)
    }
}
