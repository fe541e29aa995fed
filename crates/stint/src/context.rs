/*
 * context.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Variable bindings supplied at evaluation time.
//!
//! An [`Environment`] belongs to the caller, not to the template: the same
//! compiled template can be executed against any number of environments.

use std::collections::HashMap;
use std::hash::BuildHasher;

use serde_json::Value;

use crate::error::EnvironmentError;

/// A mapping from variable name to string value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    variables: HashMap<String, String>,
}

impl Environment {
    /// Create a new empty environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `key` to `value`, replacing any previous binding.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.variables.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.variables.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Build an environment from a JSON object.
    ///
    /// Strings are used as-is; numbers and booleans are stringified the way
    /// they print in JSON; `null` leaves the variable unbound. Arrays and
    /// nested objects have no string form and are rejected.
    pub fn from_json(value: &Value) -> Result<Self, EnvironmentError> {
        let Value::Object(map) = value else {
            return Err(EnvironmentError::NotAnObject {
                kind: json_kind(value),
            });
        };

        let mut env = Environment::new();
        for (key, value) in map {
            match value {
                Value::String(s) => env.insert(key, s.as_str()),
                Value::Number(n) => env.insert(key, n.to_string()),
                Value::Bool(b) => env.insert(key, b.to_string()),
                Value::Null => {}
                Value::Array(_) | Value::Object(_) => {
                    return Err(EnvironmentError::UnsupportedValue {
                        key: key.clone(),
                        kind: json_kind(value),
                    });
                }
            }
        }
        Ok(env)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl<S: BuildHasher> From<HashMap<String, String, S>> for Environment {
    fn from(variables: HashMap<String, String, S>) -> Self {
        Self {
            variables: variables.into_iter().collect(),
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Environment {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut env = Environment::new();
        for (k, v) in iter {
            env.insert(k, v);
        }
        env
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_insert_and_get() {
        let mut env = Environment::new();
        assert!(env.is_empty());
        env.insert("name", "Alice");
        env.insert("name", "Bob");
        assert_eq!(env.get("name"), Some("Bob"));
        assert_eq!(env.len(), 1);
        assert!(!env.contains_key("age"));
    }

    #[test]
    fn test_from_iterator() {
        let env: Environment = [("a", "1"), ("b", "2")].into_iter().collect();
        assert_eq!(env.get("a"), Some("1"));
        assert_eq!(env.get("b"), Some("2"));
    }

    #[test]
    fn test_from_hash_map() {
        let mut map = HashMap::new();
        map.insert("code".to_string(), "ABCD".to_string());
        let env = Environment::from(map);
        assert_eq!(env.get("code"), Some("ABCD"));
    }

    #[test]
    fn test_from_json_scalars() {
        let env = Environment::from_json(&json!({
            "name": "Alice",
            "age": 42,
            "ratio": 0.5,
            "admin": true,
            "nickname": null
        }))
        .unwrap();

        assert_eq!(env.get("name"), Some("Alice"));
        assert_eq!(env.get("age"), Some("42"));
        assert_eq!(env.get("ratio"), Some("0.5"));
        assert_eq!(env.get("admin"), Some("true"));
        assert!(!env.contains_key("nickname"));
    }

    #[test]
    fn test_from_json_rejects_non_scalars() {
        let err = Environment::from_json(&json!({"tags": ["a", "b"]})).unwrap_err();
        assert_eq!(
            err,
            EnvironmentError::UnsupportedValue {
                key: "tags".into(),
                kind: "array"
            }
        );

        let err = Environment::from_json(&json!("just a string")).unwrap_err();
        assert_eq!(err, EnvironmentError::NotAnObject { kind: "string" });
    }
}
