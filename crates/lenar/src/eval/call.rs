//! Function call evaluation

use crate::context::EvalContext;
use crate::error::EvalError;
use crate::value::{FunctionValue, NativeFn, Value};

use super::eval_block_stmts;

/// Call a value as a function with already-evaluated arguments.
///
/// The caller's environment plays no part: a user-defined function's
/// free identifiers resolve against its captured definition scope
/// (lexical scoping), and natives see only their arguments.
pub fn call_value(func: Value, args: Vec<Value>, ctx: &EvalContext) -> Result<Value, EvalError> {
    match func {
        Value::Function(f) => call_function(&f, args, ctx),
        Value::NativeFn(f) => call_native(&f, args, ctx),
        other => Err(EvalError::NotCallable {
            got: other.kind_name().into(),
        }),
    }
}

/// Call a user-defined function.
///
/// Arguments bind positionally in a fresh child of the captured
/// environment; a count mismatch is an arity error, never silent
/// truncation or padding.
fn call_function(
    func: &FunctionValue,
    args: Vec<Value>,
    ctx: &EvalContext,
) -> Result<Value, EvalError> {
    if args.len() != func.params.len() {
        return Err(EvalError::ArityMismatch {
            name: "<fn>".into(),
            expected: func.params.len(),
            got: args.len(),
        });
    }

    ctx.enter_call()?;

    let scope = func.env.child();
    for (param, arg) in func.params.iter().zip(args) {
        scope.define(param.clone(), arg);
    }

    let result = eval_block_stmts(&func.body, &scope, ctx);
    ctx.exit_call();
    result
}

/// Call a host-provided native function.
///
/// The native's error passes through untouched: an evaluator error
/// raised inside a callback (an unbound name, a cancellation) keeps its
/// identity instead of being flattened into a builtin failure.
fn call_native(func: &NativeFn, args: Vec<Value>, ctx: &EvalContext) -> Result<Value, EvalError> {
    if func.arity >= 0 && args.len() != func.arity as usize {
        return Err(EvalError::ArityMismatch {
            name: func.name.clone(),
            expected: func.arity as usize,
            got: args.len(),
        });
    }

    (func.func)(&args, ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::Environment;
    use crate::eval::eval_program;
    use crate::parser::parse;
    use std::sync::Arc;

    fn eval_src(src: &str) -> Result<Value, EvalError> {
        let program = parse(src).expect("parse failed");
        let env = Environment::new();
        let ctx = EvalContext::default();
        eval_program(&program, &env, &ctx)
    }

    fn eval_with_env(src: &str, env: &Arc<Environment>) -> Result<Value, EvalError> {
        let program = parse(src).expect("parse failed");
        let ctx = EvalContext::default();
        eval_program(&program, env, &ctx)
    }

    #[test]
    fn test_call_binds_parameters_positionally() {
        assert_eq!(
            eval_src("let second = fn(a b) { b }; second(1 2)").unwrap(),
            Value::Number(2)
        );
    }

    #[test]
    fn test_call_too_few_arguments() {
        let err = eval_src("let f = fn(v) { v }; f()").unwrap_err();
        assert_eq!(
            err,
            EvalError::ArityMismatch {
                name: "<fn>".into(),
                expected: 1,
                got: 0,
            }
        );
    }

    #[test]
    fn test_call_too_many_arguments() {
        let err = eval_src("let f = fn(v) { v }; f(1 2)").unwrap_err();
        assert!(matches!(
            err,
            EvalError::ArityMismatch {
                expected: 1,
                got: 2,
                ..
            }
        ));
    }

    #[test]
    fn test_call_non_function() {
        let err = eval_src("let x = 1; x(2)").unwrap_err();
        assert_eq!(err, EvalError::NotCallable { got: "Number".into() });
    }

    #[test]
    fn test_native_arity_checked() {
        let env = Environment::new();
        env.define_native(NativeFn::new("one", 1, |args, _ctx| Ok(args[0].clone())));
        let err = eval_with_env("one(1 2)", &env).unwrap_err();
        assert!(matches!(err, EvalError::ArityMismatch { .. }));
    }

    #[test]
    fn test_native_error_carries_name() {
        let env = Environment::new();
        env.define_native(NativeFn::new("boom", 0, |_args, _ctx| {
            Err(EvalError::builtin("boom", "it broke"))
        }));
        let err = eval_with_env("boom()", &env).unwrap_err();
        assert_eq!(
            err,
            EvalError::Builtin {
                name: "boom".into(),
                message: "it broke".into(),
            }
        );
    }

    #[test]
    fn test_recursion_hits_depth_limit() {
        let program = parse("let f = fn(g) { g(g) }; f(f)").unwrap();
        let env = Environment::new();
        let ctx = EvalContext::with_max_call_depth(32);
        let err = eval_program(&program, &env, &ctx).unwrap_err();
        assert!(matches!(err, EvalError::StackOverflow { .. }));
    }
}
