//! Absent-safe navigation over a JSON value tree
//!
//! A [`Node`] is a cursor that may point at nothing. Looking up a key that
//! does not exist, or descending through a value that is not a mapping,
//! yields an absent node instead of an error; absent nodes are falsy and
//! iterate as empty. Rules written against `Node` therefore never fault on
//! partially-filled or oddly-typed documents.

use serde_json::Value;

/// Cursor into a document that may be absent
#[derive(Debug, Clone, Copy, Default)]
pub struct Node<'a> {
    value: Option<&'a Value>,
}

impl<'a> Node<'a> {
    /// Cursor at `value`
    pub fn new(value: &'a Value) -> Self {
        Self { value: Some(value) }
    }

    /// Cursor pointing at nothing
    pub fn absent() -> Self {
        Self { value: None }
    }

    /// Underlying value; `None` when absent or `null`
    pub fn value(&self) -> Option<&'a Value> {
        self.value.filter(|v| !v.is_null())
    }

    /// True when the node exists and is not `null`
    pub fn is_present(&self) -> bool {
        self.value().is_some()
    }

    /// Child under `key`. Absent unless this node is a mapping holding `key`.
    pub fn get(&self, key: &str) -> Node<'a> {
        Node {
            value: self
                .value
                .and_then(Value::as_object)
                .and_then(|map| map.get(key)),
        }
    }

    /// Descend through several keys in turn
    pub fn path(&self, keys: &[&str]) -> Node<'a> {
        keys.iter().fold(*self, |node, key| node.get(key))
    }

    /// True when this node is a mapping containing `key`, whatever its value
    pub fn has(&self, key: &str) -> bool {
        self.value
            .and_then(Value::as_object)
            .is_some_and(|map| map.contains_key(key))
    }

    /// Truthiness: absent/null, `false`, zero, `""`, `[]` and `{}` are falsy
    pub fn is_truthy(&self) -> bool {
        match self.value {
            None | Some(Value::Null) => false,
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
            Some(Value::String(s)) => !s.is_empty(),
            Some(Value::Array(items)) => !items.is_empty(),
            Some(Value::Object(map)) => !map.is_empty(),
        }
    }

    /// String value, if this node is a string
    pub fn as_str(&self) -> Option<&'a str> {
        self.value.and_then(Value::as_str)
    }

    /// String value, or `""` when absent or not a string
    pub fn str_or_empty(&self) -> &'a str {
        self.as_str().unwrap_or("")
    }

    /// True when this node is a number equal to zero
    pub fn is_zero(&self) -> bool {
        match self.value {
            Some(Value::Number(n)) => n.as_f64() == Some(0.0),
            _ => false,
        }
    }

    /// Elements of a sequence; empty for anything that is not an array
    pub fn items(&self) -> impl Iterator<Item = Node<'a>> + 'a {
        self.value
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .map(Node::new)
    }
}
