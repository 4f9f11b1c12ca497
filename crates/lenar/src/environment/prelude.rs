//! Standard prelude with built-in functions and the `Lenar` namespace

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tracing::debug;

use super::Environment;
use crate::error::EvalError;
use crate::eval::call_value;
use crate::output::OutputSink;
use crate::value::{Namespace, NativeFn, Value};

/// Version constant exposed to programs as `Lenar.version`.
pub const LANG_VERSION: &str = "1.0.0";

impl Environment {
    /// Create a root environment with the standard prelude installed.
    ///
    /// `sink` is where `print` and `println` write; supply a
    /// [`BufferSink`](crate::output::BufferSink) to capture output.
    pub fn with_prelude(sink: Arc<dyn OutputSink>) -> Arc<Self> {
        let env = Self::new();
        env.load_prelude(sink);
        env
    }

    /// Install the standard prelude into this scope.
    pub fn load_prelude(&self, sink: Arc<dyn OutputSink>) {
        let print_sink = Arc::clone(&sink);
        self.define_native(NativeFn::new("print", -1, move |args, _ctx| {
            print_sink.write(&join_args(args));
            Ok(Value::Unit)
        }));

        self.define_native(NativeFn::new("println", -1, move |args, _ctx| {
            sink.write_line(&join_args(args));
            Ok(Value::Unit)
        }));

        // Structural equality; values of different kinds are never
        // equal, which is a result rather than an error.
        self.define_native(NativeFn::new("isEqual", 2, |args, _ctx| {
            Ok(Value::Bool(args[0] == args[1]))
        }));

        self.define_native(NativeFn::new("list", -1, |args, _ctx| {
            Ok(Value::list(args.to_vec()))
        }));

        // `iter(list fn)` calls `fn(item index)` for each element.
        // Errors raised by the callback propagate with their identity
        // intact, so an unbound name inside the callback surfaces as
        // `UnboundName` and a cancelled context as `Cancelled`.
        self.define_native(NativeFn::new("iter", 2, |args, ctx| {
            let items = match &args[0] {
                Value::List(items) => Arc::clone(items),
                other => {
                    return Err(EvalError::builtin(
                        "iter",
                        format!("expected a List, got {}", other.kind_name()),
                    ))
                }
            };
            let func = args[1].clone();
            for (index, item) in items.iter().enumerate() {
                call_value(
                    func.clone(),
                    vec![item.clone(), Value::Number(index as i64)],
                    ctx,
                )?;
            }
            Ok(Value::Unit)
        }));

        self.define_native(NativeFn::new("sleep", 1, |args, _ctx| {
            match args[0] {
                Value::Number(ms) if ms >= 0 => {
                    thread::sleep(Duration::from_millis(ms as u64));
                    Ok(Value::Unit)
                }
                ref other => Err(EvalError::builtin(
                    "sleep",
                    format!("expected a non-negative Number of milliseconds, got {:?}", other),
                )),
            }
        }));

        self.define(
            "Lenar",
            Value::namespace(Namespace::new(
                "Lenar",
                vec![("version".to_string(), Value::string(LANG_VERSION))],
            )),
        );

        debug!("prelude installed");
    }

    /// Register a native function under its own name.
    pub fn define_native(&self, native: NativeFn) {
        let name = native.name.clone();
        self.define(name, Value::NativeFn(native));
    }
}

fn join_args(args: &[Value]) -> String {
    args.iter().map(ToString::to_string).collect()
}
