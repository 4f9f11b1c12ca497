//! Constructors, accessors and equality for Value

use std::sync::Arc;

use super::{Namespace, Value};

impl Value {
    /// Create a string value.
    pub fn string(s: impl Into<String>) -> Self {
        Value::String(Arc::new(s.into()))
    }

    /// Create a list value.
    pub fn list(items: Vec<Value>) -> Self {
        Value::List(Arc::new(items))
    }

    /// Create a namespace value.
    pub fn namespace(ns: Namespace) -> Self {
        Value::Namespace(Arc::new(ns))
    }

    /// Whether this is the unit value.
    pub fn is_unit(&self) -> bool {
        matches!(self, Value::Unit)
    }

    /// Extract a boolean, if this is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Extract a number, if this is one.
    pub fn as_number(&self) -> Option<i64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Extract a string slice, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// A short name for this value's kind, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Unit => "Void",
            Value::Bool(_) => "Bool",
            Value::Number(_) => "Number",
            Value::String(_) => "String",
            Value::List(_) => "List",
            Value::Function(_) => "Function",
            Value::NativeFn(_) => "NativeFn",
            Value::Namespace(_) => "Namespace",
        }
    }
}

/// Structural equality.
///
/// Cross-kind comparison is always `false` (never an error), matching
/// the `isEqual` builtin's contract. Functions, natives and namespaces
/// never compare equal, not even to themselves.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Unit, Value::Unit) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eq_same_kind() {
        assert_eq!(Value::string("a"), Value::string("a"));
        assert_eq!(Value::Number(1), Value::Number(1));
        assert_eq!(Value::Unit, Value::Unit);
        assert_ne!(Value::string("a"), Value::string("b"));
    }

    #[test]
    fn test_eq_cross_kind_is_false() {
        assert_ne!(Value::Number(1), Value::string("1"));
        assert_ne!(Value::Bool(true), Value::Number(1));
        assert_ne!(Value::Unit, Value::Bool(false));
    }

    #[test]
    fn test_eq_lists_structural() {
        let a = Value::list(vec![Value::Number(1), Value::string("x")]);
        let b = Value::list(vec![Value::Number(1), Value::string("x")]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(Value::Unit.kind_name(), "Void");
        assert_eq!(Value::Number(0).kind_name(), "Number");
        assert_eq!(Value::string("").kind_name(), "String");
    }
}
