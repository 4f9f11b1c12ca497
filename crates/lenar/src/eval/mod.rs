//! Tree-walking evaluation
//!
//! The AST is a closed sum type and the dispatcher below matches it
//! exhaustively, so an unhandled node kind is a compile-time error.

mod call;
mod control;
mod path;

pub use call::call_value;
pub use control::{eval_block, eval_block_stmts};

use std::sync::Arc;

use crate::ast::{Expr, Literal, Program};
use crate::context::EvalContext;
use crate::environment::Environment;
use crate::error::EvalError;
use crate::value::{FunctionValue, Value};

/// Trait for evaluating AST nodes to values.
pub trait Evaluate {
    /// Evaluate this node in the given environment.
    fn eval(&self, env: &Arc<Environment>, ctx: &EvalContext) -> Result<Value, EvalError>;
}

impl Evaluate for Expr {
    fn eval(&self, env: &Arc<Environment>, ctx: &EvalContext) -> Result<Value, EvalError> {
        match self {
            Expr::Literal(lit) => Ok(literal_value(lit)),

            Expr::Identifier { path } => path::resolve_path(path, env),

            Expr::Let { name, value } => {
                let bound = value.eval(env, ctx)?;
                env.define(name.clone(), bound);
                Ok(Value::Unit)
            }

            // A `fn` literal closes over the environment active right
            // here, not the one active at any later call site.
            Expr::Function { params, body } => {
                Ok(Value::Function(Arc::new(FunctionValue {
                    params: params.clone(),
                    body: body.clone(),
                    env: Arc::clone(env),
                })))
            }

            Expr::Call { callee, args } => {
                let func = callee.eval(env, ctx)?;
                let mut evaluated = Vec::with_capacity(args.len());
                for arg in args {
                    evaluated.push(arg.eval(env, ctx)?);
                }
                call_value(func, evaluated, ctx)
            }

            Expr::If {
                condition,
                then_branch,
                else_branch,
            } => control::eval_if(condition, then_branch, else_branch.as_ref(), env, ctx),

            Expr::Block(block) => eval_block(block, env, ctx),
        }
    }
}

fn literal_value(lit: &Literal) -> Value {
    match lit {
        Literal::String(s) => Value::string(s.clone()),
        Literal::Number(n) => Value::Number(*n),
        Literal::Bool(b) => Value::Bool(*b),
    }
}

/// Evaluate a program's top-level statements in the given scope.
///
/// Statements run top to bottom; the program's value is the value of
/// its last statement, or `Unit` for an empty program. Cancellation is
/// observed between statements.
pub fn eval_program(
    program: &Program,
    env: &Arc<Environment>,
    ctx: &EvalContext,
) -> Result<Value, EvalError> {
    let mut last = Value::Unit;
    for expr in &program.exprs {
        if ctx.is_interrupted() {
            return Err(EvalError::Cancelled);
        }
        last = expr.eval(env, ctx)?;
    }
    Ok(last)
}
