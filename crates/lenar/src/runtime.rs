//! Embedding surface and concurrency layer
//!
//! A [`Runtime`] owns the shared root scope (prelude plus host
//! registrations) and the output sink. Evaluation contexts spawned from
//! it run on their own OS threads with a private environment chain
//! rooted at that shared, read-only scope: isolation is structural, not
//! lock-based. The only cross-context channels are the initial bindings
//! passed at spawn time, explicit `send`/`recv` messages, and the value
//! returned through [`ContextHandle::join`].

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{unbounded, Receiver, Sender, TryRecvError};
use dashmap::DashMap;
use tracing::debug;

use crate::ast::Program;
use crate::context::EvalContext;
use crate::environment::Environment;
use crate::error::{EvalError, LenarError};
use crate::eval::{call_value, eval_program};
use crate::output::{OutputSink, StdoutSink};
use crate::parser::parse;
use crate::value::{FunctionValue, Namespace, NativeFn, Value};

/// An embeddable interpreter instance.
///
/// Multiple runtimes coexist in one process without interference: the
/// root scope is an explicitly constructed value, not a process-wide
/// singleton.
///
/// # Example
///
/// ```
/// use lenar::Runtime;
///
/// let runtime = Runtime::new();
/// let value = runtime.run(r#"isEqual("a" "a")"#).unwrap();
/// assert_eq!(value, lenar::Value::Bool(true));
/// ```
pub struct Runtime {
    root: Arc<Environment>,
    sink: Arc<dyn OutputSink>,
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

impl Runtime {
    /// Create a runtime printing to standard output.
    pub fn new() -> Self {
        Self::with_sink(Arc::new(StdoutSink))
    }

    /// Create a runtime with a host-provided output sink.
    pub fn with_sink(sink: Arc<dyn OutputSink>) -> Self {
        let root = Environment::with_prelude(Arc::clone(&sink));
        install_thread_builtins(&root);
        Self { root, sink }
    }

    /// The shared root scope.
    ///
    /// Hosts may inspect it; programs never mutate it (every evaluation
    /// runs in a private child scope).
    pub fn root(&self) -> &Arc<Environment> {
        &self.root
    }

    /// The output sink `print`/`println` write to.
    pub fn sink(&self) -> &Arc<dyn OutputSink> {
        &self.sink
    }

    // ═══════════════════════════════════════════════════════════════════
    // Host registration (before evaluation)
    // ═══════════════════════════════════════════════════════════════════

    /// Register a host-provided native function in the root scope.
    pub fn register_native(
        &self,
        name: impl Into<String>,
        arity: i32,
        func: impl Fn(&[Value], &EvalContext) -> Result<Value, EvalError> + Send + Sync + 'static,
    ) {
        self.root.define_native(NativeFn::new(name, arity, func));
    }

    /// Register a host-provided constant in the root scope.
    pub fn register_const(&self, name: impl Into<String>, value: Value) {
        self.root.define(name, value);
    }

    /// Register a frozen namespace of constants, like `Lenar`.
    pub fn register_namespace(&self, name: impl Into<String>, members: Vec<(String, Value)>) {
        let name = name.into();
        self.root
            .define(name.clone(), Value::namespace(Namespace::new(name, members)));
    }

    // ═══════════════════════════════════════════════════════════════════
    // Synchronous evaluation
    // ═══════════════════════════════════════════════════════════════════

    /// Parse and evaluate `source`, returning the program's value.
    pub fn run(&self, source: &str) -> Result<Value, LenarError> {
        let program = parse(source)?;
        Ok(self.eval(&program)?)
    }

    /// Evaluate a parsed program in a private child of the root scope.
    pub fn eval(&self, program: &Program) -> Result<Value, EvalError> {
        let env = self.root.child();
        let ctx = EvalContext::default();
        eval_program(program, &env, &ctx)
    }

    // ═══════════════════════════════════════════════════════════════════
    // Spawned contexts
    // ═══════════════════════════════════════════════════════════════════

    /// Run a program in a new evaluation context on its own thread.
    ///
    /// The context's scope chain is a private child of the shared root,
    /// pre-populated with `initial` bindings and with `send`/`recv`
    /// natives wired to the returned handle's channels.
    pub fn spawn(&self, program: Program, initial: Vec<(String, Value)>) -> ContextHandle {
        let (host_tx, ctx_rx) = unbounded();
        let (ctx_tx, host_rx) = unbounded();
        let interrupt = Arc::new(AtomicBool::new(false));

        let root = Arc::clone(&self.root);
        let thread_interrupt = Arc::clone(&interrupt);

        debug!("spawning evaluation context");
        let handle = thread::spawn(move || {
            let env = root.child();
            for (name, value) in initial {
                env.define(name, value);
            }
            install_ports(&env, ctx_tx, ctx_rx);

            let ctx = EvalContext::with_interrupt(thread_interrupt);
            eval_program(&program, &env, &ctx)
        });

        ContextHandle {
            handle,
            interrupt,
            sender: host_tx,
            receiver: host_rx,
        }
    }

    /// Call a function value in a new evaluation context on its own
    /// thread.
    ///
    /// Free identifiers still resolve against the function's captured
    /// lexical scope; `send`/`recv` natives are layered in between the
    /// capture and the call scope.
    pub fn spawn_fn(&self, func: Value, args: Vec<Value>) -> Result<ContextHandle, EvalError> {
        let func = match func {
            Value::Function(f) => f,
            other => {
                return Err(EvalError::NotCallable {
                    got: other.kind_name().into(),
                })
            }
        };

        let (host_tx, ctx_rx) = unbounded();
        let (ctx_tx, host_rx) = unbounded();
        let interrupt = Arc::new(AtomicBool::new(false));
        let thread_interrupt = Arc::clone(&interrupt);

        debug!("spawning function context");
        let handle = thread::spawn(move || {
            let env = func.env.child();
            install_ports(&env, ctx_tx, ctx_rx);
            let rewired = Value::Function(Arc::new(FunctionValue {
                params: func.params.clone(),
                body: func.body.clone(),
                env,
            }));

            let ctx = EvalContext::with_interrupt(thread_interrupt);
            call_value(rewired, args, &ctx)
        });

        Ok(ContextHandle {
            handle,
            interrupt,
            sender: host_tx,
            receiver: host_rx,
        })
    }
}

/// Handle to a spawned evaluation context.
pub struct ContextHandle {
    handle: JoinHandle<Result<Value, EvalError>>,
    interrupt: Arc<AtomicBool>,
    sender: Sender<Value>,
    receiver: Receiver<Value>,
}

impl ContextHandle {
    /// Block until the context finishes and return its value.
    ///
    /// An error terminates only the joined context; other contexts are
    /// unaffected.
    pub fn join(self) -> Result<Value, EvalError> {
        match self.handle.join() {
            Ok(result) => result,
            Err(_) => Err(EvalError::Builtin {
                name: "spawn".into(),
                message: "evaluation context panicked".into(),
            }),
        }
    }

    /// Request cooperative cancellation.
    ///
    /// The context observes the request at its next statement boundary
    /// and finishes with [`EvalError::Cancelled`].
    pub fn cancel(&self) {
        self.interrupt.store(true, Ordering::Relaxed);
    }

    /// Whether the context has finished.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Send a value to the context's `recv` builtin.
    ///
    /// Returns `false` if the context is gone.
    pub fn send(&self, value: Value) -> bool {
        self.sender.send(value).is_ok()
    }

    /// Block until the context `send`s a value; `None` once the context
    /// has finished with no more messages queued.
    pub fn recv(&self) -> Option<Value> {
        self.receiver.recv().ok()
    }

    /// Receive a queued message without blocking.
    pub fn try_recv(&self) -> Option<Value> {
        match self.receiver.try_recv() {
            Ok(value) => Some(value),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }
}

impl fmt::Debug for ContextHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextHandle")
            .field("finished", &self.handle.is_finished())
            .field("cancelled", &self.interrupt.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

/// Wire `send`/`recv` natives in a context's private scope.
fn install_ports(env: &Arc<Environment>, tx: Sender<Value>, rx: Receiver<Value>) {
    env.define_native(NativeFn::new("send", 1, move |args, _ctx| {
        tx.send(args[0].clone())
            .map_err(|_| EvalError::builtin("send", "channel closed"))?;
        Ok(Value::Unit)
    }));

    env.define_native(NativeFn::new("recv", 0, move |_args, _ctx| {
        rx.recv()
            .map_err(|_| EvalError::builtin("recv", "channel closed"))
    }));
}

// ═══════════════════════════════════════════════════════════════════════
// In-language threads: `thread(fn args...)` / `wait(handle)`
// ═══════════════════════════════════════════════════════════════════════

/// Registry of contexts started by the `thread` builtin, keyed by the
/// numeric handle returned to the program.
#[derive(Default)]
struct ThreadRegistry {
    handles: DashMap<usize, JoinHandle<Result<Value, EvalError>>>,
    next_id: AtomicUsize,
}

fn install_thread_builtins(root: &Arc<Environment>) {
    let registry = Arc::new(ThreadRegistry::default());

    let spawn_registry = Arc::clone(&registry);
    root.define_native(NativeFn::new("thread", -1, move |args, ctx| {
        let (func, rest) = args
            .split_first()
            .ok_or_else(|| EvalError::builtin("thread", "expected a function to run"))?;
        if !matches!(func, Value::Function(_) | Value::NativeFn(_)) {
            return Err(EvalError::builtin(
                "thread",
                format!("expected a function, got {}", func.kind_name()),
            ));
        }

        // The child shares the spawning context's interrupt flag, so
        // cancelling that context cancels its language threads too.
        let interrupt = ctx.interrupt_flag();
        let func = func.clone();
        let call_args = rest.to_vec();
        let handle = thread::spawn(move || {
            let ctx = EvalContext::with_interrupt(interrupt);
            call_value(func, call_args, &ctx)
        });

        let id = spawn_registry.next_id.fetch_add(1, Ordering::Relaxed);
        spawn_registry.handles.insert(id, handle);
        debug!(id, "spawned language thread");
        Ok(Value::Number(id as i64))
    }));

    root.define_native(NativeFn::new("wait", 1, move |args, _ctx| {
        let id = args[0].as_number().ok_or_else(|| {
            EvalError::builtin(
                "wait",
                format!("expected a thread handle, got {}", args[0].kind_name()),
            )
        })?;
        let (_, handle) = registry
            .handles
            .remove(&(id as usize))
            .ok_or_else(|| EvalError::builtin("wait", format!("unknown thread handle {}", id)))?;

        debug!(id, "joining language thread");
        match handle.join() {
            // The joined context's error keeps its identity.
            Ok(result) => result,
            Err(_) => Err(EvalError::builtin("wait", "thread panicked")),
        }
    }));
}
