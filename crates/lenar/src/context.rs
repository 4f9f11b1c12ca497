//! Per-context evaluation configuration and state

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use crate::error::EvalError;

/// Configuration and state for one evaluation context.
///
/// Passed through all evaluation calls. Each spawned context owns its
/// own `EvalContext`; only the interrupt flag is shared (with the
/// host's handle), so a host can request cooperative cancellation.
#[derive(Debug)]
pub struct EvalContext {
    /// Maximum call depth (stack overflow protection)
    max_call_depth: usize,

    /// Interrupt flag; set to request cancellation, observed at
    /// statement boundaries
    interrupt: Arc<AtomicBool>,

    /// Current call depth
    depth: AtomicUsize,
}

/// Default call depth limit.
///
/// Each interpreter frame costs several native stack frames, so the
/// guard must trip well before a spawned thread's 2 MiB stack runs out,
/// unoptimized builds included.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 128;

impl Default for EvalContext {
    fn default() -> Self {
        Self {
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            interrupt: Arc::new(AtomicBool::new(false)),
            depth: AtomicUsize::new(0),
        }
    }
}

impl EvalContext {
    /// Create a context with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context with a custom call depth limit.
    pub fn with_max_call_depth(max_depth: usize) -> Self {
        Self {
            max_call_depth: max_depth,
            ..Default::default()
        }
    }

    /// Create a context observing an externally owned interrupt flag.
    pub fn with_interrupt(interrupt: Arc<AtomicBool>) -> Self {
        Self {
            interrupt,
            ..Default::default()
        }
    }

    /// The shared interrupt flag, for handing to a cancellation handle.
    pub fn interrupt_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.interrupt)
    }

    /// Check whether cancellation has been requested.
    pub fn is_interrupted(&self) -> bool {
        self.interrupt.load(Ordering::Relaxed)
    }

    /// Request cancellation of this context.
    pub fn interrupt(&self) {
        self.interrupt.store(true, Ordering::Relaxed);
    }

    /// Clear the interrupt flag.
    pub fn reset_interrupt(&self) {
        self.interrupt.store(false, Ordering::Relaxed);
    }

    /// Enter a function call. Fails once the depth limit is exceeded.
    pub fn enter_call(&self) -> Result<(), EvalError> {
        let depth = self.depth.fetch_add(1, Ordering::Relaxed);
        if depth >= self.max_call_depth {
            self.depth.fetch_sub(1, Ordering::Relaxed);
            return Err(EvalError::StackOverflow {
                depth,
                max: self.max_call_depth,
            });
        }
        Ok(())
    }

    /// Exit a function call.
    pub fn exit_call(&self) {
        self.depth.fetch_sub(1, Ordering::Relaxed);
    }

    /// Current call depth.
    pub fn call_depth(&self) -> usize {
        self.depth.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interrupt_round_trip() {
        let ctx = EvalContext::new();
        assert!(!ctx.is_interrupted());
        ctx.interrupt();
        assert!(ctx.is_interrupted());
        ctx.reset_interrupt();
        assert!(!ctx.is_interrupted());
    }

    #[test]
    fn test_call_depth_limit() {
        let ctx = EvalContext::with_max_call_depth(2);
        ctx.enter_call().unwrap();
        ctx.enter_call().unwrap();
        assert!(matches!(
            ctx.enter_call(),
            Err(EvalError::StackOverflow { .. })
        ));
        ctx.exit_call();
        ctx.exit_call();
        assert_eq!(ctx.call_depth(), 0);
    }

    #[test]
    fn test_default_depth_limit_guards_the_native_stack() {
        // The guard has to fire before unbounded recursion exhausts a
        // 2 MiB thread stack.
        let ctx = EvalContext::new();
        let mut entered = 0;
        while ctx.enter_call().is_ok() {
            entered += 1;
        }
        assert_eq!(entered, DEFAULT_MAX_CALL_DEPTH);
        assert!(entered <= 256);
    }

    #[test]
    fn test_shared_interrupt_flag() {
        let ctx = EvalContext::new();
        let flag = ctx.interrupt_flag();
        flag.store(true, Ordering::Relaxed);
        assert!(ctx.is_interrupted());
    }
}
