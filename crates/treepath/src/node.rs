//! The read accessor a state tree must provide.

use crate::types::{Key, KeyPath};
use serde_json::Value;
use std::borrow::Cow;

/// Read access to a state tree by key path.
///
/// This is the only thing the traversals and queries know about a tree: how
/// to step one key down, how long a sequence is, and whether a value equals
/// a requested identifier. Everything else is key path arithmetic.
///
/// Implemented for [`serde_json::Value`]; implement it for your own
/// persistent structures to query them in place.
pub trait Node {
    /// The borrowed form callers use to name a node (e.g. `str`).
    type Id: ?Sized;

    /// The value one step below `self`, if there is one.
    fn lookup(&self, key: &Key) -> Option<&Self>;

    /// The number of elements, if `self` is an ordered sequence.
    fn seq_len(&self) -> Option<usize>;

    /// Whether `self`, read as an identifier, names `id`.
    fn matches_id(&self, id: &Self::Id) -> bool;

    /// Whether two identifier values name the same node, under the same
    /// comparison [`matches_id`](Node::matches_id) uses.
    fn same_id(&self, other: &Self) -> bool;

    /// The value at `path` below `self`. The empty path resolves to `self`.
    fn resolve(&self, path: &KeyPath) -> Option<&Self> {
        path.iter().try_fold(self, |node, key| node.lookup(key))
    }

    fn exists(&self, path: &KeyPath) -> bool {
        self.resolve(path).is_some()
    }
}

/// JSON trees: objects are read by key, arrays by index.
///
/// Index steps also address object members named by their decimal text, and
/// name steps made of digits address array elements. Identifiers compare by
/// text, so a numeric `"id": 7` matches `"7"`.
impl Node for Value {
    type Id = str;

    fn lookup(&self, key: &Key) -> Option<&Value> {
        match (self, key) {
            (Value::Object(map), Key::Name(name)) => map.get(name),
            (Value::Object(map), Key::Index(i)) => map.get(i.to_string().as_str()),
            (Value::Array(items), Key::Index(i)) => items.get(*i),
            (Value::Array(items), Key::Name(name)) => {
                name.parse::<usize>().ok().and_then(|i| items.get(i))
            }
            _ => None,
        }
    }

    fn seq_len(&self) -> Option<usize> {
        match self {
            Value::Array(items) => Some(items.len()),
            _ => None,
        }
    }

    fn matches_id(&self, id: &str) -> bool {
        id_text(self).is_some_and(|text| text == id)
    }

    fn same_id(&self, other: &Value) -> bool {
        match (id_text(self), id_text(other)) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

/// The text of a JSON value that can serve as an identifier.
fn id_text(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::String(s) => Some(Cow::Borrowed(s)),
        Value::Number(n) => Some(Cow::Owned(n.to_string())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn kp(s: &str) -> KeyPath {
        s.parse().unwrap()
    }

    #[test]
    fn test_resolve_nested() {
        let state = json!({"data": {"childNodes": [{"id": "a"}, {"id": "b"}]}});
        let node = state.resolve(&kp("data.childNodes.1.id")).unwrap();
        assert_eq!(node, "b");
    }

    #[test]
    fn test_resolve_empty_path_is_self() {
        let state = json!({"id": "root"});
        assert_eq!(state.resolve(&KeyPath::new()), Some(&state));
    }

    #[test]
    fn test_resolve_missing() {
        let state = json!({"childNodes": [{"id": "a"}]});
        assert!(state.resolve(&kp("childNodes.1")).is_none());
        assert!(state.resolve(&kp("childNodes.0.childNodes")).is_none());
        assert!(!state.exists(&kp("missing")));
        assert!(state.exists(&kp("childNodes.0")));
    }

    #[test]
    fn test_index_on_object_and_name_on_array() {
        let state = json!({"0": "zero", "list": ["x", "y"]});
        assert_eq!(state.lookup(&Key::Index(0)), Some(&json!("zero")));
        let list = state.lookup(&Key::from("list")).unwrap();
        assert_eq!(list.lookup(&Key::from("1")), Some(&json!("y")));
        assert_eq!(list.lookup(&Key::from("first")), None);
    }

    #[test]
    fn test_scalars_have_no_children() {
        assert_eq!(json!("text").lookup(&Key::Index(0)), None);
        assert_eq!(json!(null).lookup(&Key::from("id")), None);
    }

    #[test]
    fn test_seq_len() {
        assert_eq!(json!([1, 2, 3]).seq_len(), Some(3));
        assert_eq!(json!([]).seq_len(), Some(0));
        assert_eq!(json!({"a": 1}).seq_len(), None);
    }

    #[test]
    fn test_matches_id() {
        assert!(json!("node-1").matches_id("node-1"));
        assert!(json!(7).matches_id("7"));
        assert!(!json!(7).matches_id("07"));
        assert!(!json!(null).matches_id("null"));
        assert!(!json!({"id": "x"}).matches_id("x"));
    }

    #[test]
    fn test_same_id() {
        assert!(json!("7").same_id(&json!(7)));
        assert!(json!(7).same_id(&json!(7)));
        assert!(!json!("07").same_id(&json!(7)));
        assert!(!json!(null).same_id(&json!(null)));
        assert!(!json!(["a"]).same_id(&json!(["a"])));
    }
}
