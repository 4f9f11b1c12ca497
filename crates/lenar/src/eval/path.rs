//! Identifier and dotted-path resolution

use std::sync::Arc;

use crate::environment::Environment;
use crate::error::EvalError;
use crate::value::Value;

/// Resolve an identifier path such as `x` or `Lenar.version`.
///
/// The first segment is looked up by walking the environment chain
/// outward; each remaining segment is member access on the value found
/// so far, which must be a namespace. A failed lookup leaves the
/// environment unmodified.
pub fn resolve_path(path: &[String], env: &Arc<Environment>) -> Result<Value, EvalError> {
    let (head, rest) = match path.split_first() {
        Some(parts) => parts,
        // The parser never produces an empty path.
        None => {
            return Err(EvalError::UnboundName {
                name: String::new(),
            })
        }
    };

    let mut value = env.get(head).ok_or_else(|| EvalError::UnboundName {
        name: head.clone(),
    })?;
    let mut resolved = head.clone();

    for segment in rest {
        match &value {
            Value::Namespace(ns) => {
                value = ns
                    .get(segment)
                    .cloned()
                    .ok_or_else(|| EvalError::UnboundMember {
                        namespace: resolved.clone(),
                        member: segment.clone(),
                    })?;
            }
            other => {
                return Err(EvalError::TypeError {
                    expected: "Namespace".into(),
                    got: other.kind_name().into(),
                })
            }
        }
        resolved.push('.');
        resolved.push_str(segment);
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Namespace;

    fn env_with_namespace() -> Arc<Environment> {
        let env = Environment::new();
        env.define(
            "Lenar",
            Value::namespace(Namespace::new(
                "Lenar",
                vec![("version".to_string(), Value::string("1.0.0"))],
            )),
        );
        env
    }

    fn path(segments: &[&str]) -> Vec<String> {
        segments.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_resolve_simple_name() {
        let env = Environment::new();
        env.define("x", Value::Number(7));
        assert_eq!(resolve_path(&path(&["x"]), &env), Ok(Value::Number(7)));
    }

    #[test]
    fn test_resolve_namespace_member() {
        let env = env_with_namespace();
        assert_eq!(
            resolve_path(&path(&["Lenar", "version"]), &env),
            Ok(Value::string("1.0.0"))
        );
    }

    #[test]
    fn test_unbound_head() {
        let env = Environment::new();
        assert_eq!(
            resolve_path(&path(&["doesNotExist"]), &env),
            Err(EvalError::UnboundName {
                name: "doesNotExist".into(),
            })
        );
    }

    #[test]
    fn test_unbound_member() {
        let env = env_with_namespace();
        assert_eq!(
            resolve_path(&path(&["Lenar", "codename"]), &env),
            Err(EvalError::UnboundMember {
                namespace: "Lenar".into(),
                member: "codename".into(),
            })
        );
    }

    #[test]
    fn test_member_access_on_non_namespace() {
        let env = Environment::new();
        env.define("x", Value::Number(1));
        assert!(matches!(
            resolve_path(&path(&["x", "y"]), &env),
            Err(EvalError::TypeError { .. })
        ));
    }
}
