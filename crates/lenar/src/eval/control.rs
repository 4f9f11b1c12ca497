//! Block and `if` evaluation

use std::sync::Arc;

use crate::ast::{Block, Expr};
use crate::context::EvalContext;
use crate::environment::Environment;
use crate::error::EvalError;
use crate::value::Value;

use super::Evaluate;

/// Evaluate a block in a fresh child scope.
///
/// The block's value is the value of its last statement, or `Unit` if
/// the block is empty (a trailing `let` also yields `Unit`). Bindings
/// made inside the block do not leak into the enclosing scope.
pub fn eval_block(
    block: &Block,
    env: &Arc<Environment>,
    ctx: &EvalContext,
) -> Result<Value, EvalError> {
    let scope = env.child();
    eval_block_stmts(block, &scope, ctx)
}

/// Evaluate a block's statements in the given scope, without creating
/// a child. Used for function bodies, whose scope already holds the
/// bound parameters.
///
/// Cancellation is observed between statements.
pub fn eval_block_stmts(
    block: &Block,
    env: &Arc<Environment>,
    ctx: &EvalContext,
) -> Result<Value, EvalError> {
    let mut last = Value::Unit;
    for expr in &block.exprs {
        if ctx.is_interrupted() {
            return Err(EvalError::Cancelled);
        }
        last = expr.eval(env, ctx)?;
    }
    Ok(last)
}

/// Evaluate an `if` expression.
///
/// The condition must be a boolean; anything else is a type error. A
/// false condition with no `else` yields `Unit`.
pub fn eval_if(
    condition: &Expr,
    then_branch: &Block,
    else_branch: Option<&Block>,
    env: &Arc<Environment>,
    ctx: &EvalContext,
) -> Result<Value, EvalError> {
    let cond = condition.eval(env, ctx)?;
    let truthy = cond.as_bool().ok_or_else(|| EvalError::TypeError {
        expected: "Bool".into(),
        got: cond.kind_name().into(),
    })?;

    if truthy {
        eval_block(then_branch, env, ctx)
    } else if let Some(block) = else_branch {
        eval_block(block, env, ctx)
    } else {
        Ok(Value::Unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::eval_program;
    use crate::parser::parse;

    fn eval_src(src: &str) -> Result<Value, EvalError> {
        let program = parse(src).expect("parse failed");
        let env = Environment::new();
        let ctx = EvalContext::default();
        eval_program(&program, &env, &ctx)
    }

    #[test]
    fn test_block_value_is_last_expression() {
        assert_eq!(eval_src("{ 1; 2; 3 }").unwrap(), Value::Number(3));
    }

    #[test]
    fn test_empty_block_is_unit() {
        assert_eq!(eval_src("{}").unwrap(), Value::Unit);
    }

    #[test]
    fn test_block_ending_in_let_is_unit() {
        assert_eq!(eval_src("{ let x = 1 }").unwrap(), Value::Unit);
    }

    #[test]
    fn test_block_bindings_do_not_leak() {
        let err = eval_src("{ let x = 1 }; x").unwrap_err();
        assert!(matches!(err, EvalError::UnboundName { .. }));
    }

    #[test]
    fn test_if_true_takes_then_branch() {
        assert_eq!(eval_src("if(true) { 1 } else { 2 }").unwrap(), Value::Number(1));
    }

    #[test]
    fn test_if_false_takes_else_branch() {
        assert_eq!(eval_src("if(false) { 1 } else { 2 }").unwrap(), Value::Number(2));
    }

    #[test]
    fn test_if_false_without_else_is_unit() {
        assert_eq!(eval_src("if(false) { 1 }").unwrap(), Value::Unit);
    }

    #[test]
    fn test_if_condition_must_be_bool() {
        let err = eval_src("if(1) { 2 }").unwrap_err();
        assert_eq!(
            err,
            EvalError::TypeError {
                expected: "Bool".into(),
                got: "Number".into(),
            }
        );
    }
}
