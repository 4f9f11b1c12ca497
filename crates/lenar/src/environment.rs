//! Chained lexical scopes for variable lookup and closure capture

mod prelude;

pub use prelude::LANG_VERSION;

use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;

use crate::value::Value;

/// One lexical scope, chained to its enclosing scope.
///
/// Scopes are handed around as `Arc<Environment>`: a closure stores the
/// `Arc` of the environment active at its definition point and shares
/// ownership with every other closure capturing the same scope. The
/// chain terminates at a root scope holding the built-ins. Environments
/// never hold references back to the closures that capture them, so the
/// graph stays acyclic.
///
/// # Example
///
/// ```
/// use lenar::{Environment, Value};
///
/// let root = Environment::new();
/// root.define("x", Value::Number(1));
///
/// let inner = root.child();
/// inner.define("x", Value::Number(10)); // shadows the outer x
/// inner.define("y", Value::Number(2));
///
/// assert_eq!(inner.get("x"), Some(Value::Number(10)));
/// assert_eq!(root.get("x"), Some(Value::Number(1)));
/// assert_eq!(root.get("y"), None);
/// ```
#[derive(Debug, Default)]
pub struct Environment {
    /// Bindings local to this scope, in definition order
    bindings: RwLock<IndexMap<String, Value>>,

    /// The enclosing scope; `None` at the root
    parent: Option<Arc<Environment>>,
}

impl Environment {
    /// Create an empty root scope.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Create a child scope enclosed by `self`.
    pub fn child(self: &Arc<Self>) -> Arc<Self> {
        Arc::new(Self {
            bindings: RwLock::new(IndexMap::new()),
            parent: Some(Arc::clone(self)),
        })
    }

    /// Define a binding in this scope.
    ///
    /// A later `let` for the same name in the same scope replaces the
    /// earlier binding (shadowing); bindings in enclosing scopes are
    /// untouched.
    pub fn define(&self, name: impl Into<String>, value: Value) {
        self.bindings.write().insert(name.into(), value);
    }

    /// Look up a binding, walking outward through enclosing scopes.
    pub fn get(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.bindings.read().get(name) {
            return Some(value.clone());
        }
        self.parent.as_ref().and_then(|p| p.get(name))
    }

    /// Whether `name` resolves in this scope or any enclosing one.
    pub fn contains(&self, name: &str) -> bool {
        self.bindings.read().contains_key(name)
            || self.parent.as_ref().is_some_and(|p| p.contains(name))
    }

    /// Whether `name` is bound in this scope itself.
    pub fn contains_local(&self, name: &str) -> bool {
        self.bindings.read().contains_key(name)
    }

    /// Names bound in this scope, in definition order.
    pub fn local_names(&self) -> Vec<String> {
        self.bindings.read().keys().cloned().collect()
    }

    /// Number of scopes from here to the root, inclusive.
    pub fn depth(&self) -> usize {
        1 + self.parent.as_ref().map_or(0, |p| p.depth())
    }
}
