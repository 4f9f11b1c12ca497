//! Display and Debug implementations for Value

use std::fmt;

use super::Value;

impl fmt::Display for Value {
    /// User-facing rendering: what `println` emits.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Unit => write!(f, "Void"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "{}", s),
            Value::List(items) => {
                for item in items.iter() {
                    write!(f, "{}", item)?;
                }
                Ok(())
            }
            Value::Function(_) => write!(f, "<fn>"),
            Value::NativeFn(native) => write!(f, "<native {}>", native.name),
            Value::Namespace(ns) => write!(f, "{}", ns.name),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Unit => write!(f, "Void"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "{:?}", s.as_ref()),
            Value::List(items) => f.debug_list().entries(items.iter()).finish(),
            Value::Function(func) => write!(f, "<fn({})>", func.params.join(", ")),
            Value::NativeFn(native) => write!(f, "<native {}>", native.name),
            Value::Namespace(ns) => write!(f, "<namespace {}>", ns.name),
        }
    }
}

impl fmt::Debug for super::NativeFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NativeFn({})", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_primitives() {
        assert_eq!(Value::Unit.to_string(), "Void");
        assert_eq!(Value::Bool(true).to_string(), "true");
        assert_eq!(Value::Number(42).to_string(), "42");
        assert_eq!(Value::string("hi").to_string(), "hi");
    }

    #[test]
    fn test_display_list_concatenates() {
        let list = Value::list(vec![Value::string("a"), Value::Number(1)]);
        assert_eq!(list.to_string(), "a1");
    }

    #[test]
    fn test_debug_string_is_quoted() {
        assert_eq!(format!("{:?}", Value::string("hi")), "\"hi\"");
    }
}
