//! Key path queries: identity lookup, navigation, and document order.
//!
//! Every query that is about one node takes an [`IdOrKeyPath`]. Identifiers
//! are resolved with a single traversal through [`find_id`]; key paths are
//! used as they are. After that, most queries are pure key path arithmetic
//! plus at most one read of the state.
//!
//! Missing results are `None` (or an empty [`QuerySet`]); pick your own
//! default with `unwrap_or`.

use crate::node::Node;
use crate::reduce::{filter, find};
use crate::types::{IdOrKeyPath, KeyPath, Options, QuerySet};

/// The value at `key_path`, if there is one.
pub fn resolve<'s, N: Node>(_options: &Options, state: &'s N, key_path: &KeyPath) -> Option<&'s N> {
    state.resolve(key_path)
}

/// The identifier value of the node at `key_path`.
pub fn get_id<'s, N: Node>(options: &Options, state: &'s N, key_path: &KeyPath) -> Option<&'s N> {
    state.resolve(&key_path.join(&options.id_path))
}

/// Resolve a lookup target to a key path.
///
/// A key path is returned unchanged without touching the state. An
/// identifier starts a traversal (from its start path, or the root path)
/// and yields the first node, in traversal order, whose identifier matches.
/// Identifiers are expected to be unique; with duplicates the first one
/// visited wins.
///
/// ```
/// use serde_json::json;
/// use treepath::v1::{KeyPath, Options, query};
///
/// let state = json!({"id": "a", "childNodes": [{"id": "b"}]});
/// let options = Options::default();
///
/// let b = query::find_id(&options, &state, "b").unwrap();
/// assert_eq!(b.to_string(), "childNodes.0");
/// assert_eq!(query::find_id(&options, &state, &b), Some(b.clone()));
/// assert_eq!(query::find_id(&options, &state, "z"), None);
/// ```
pub fn find_id<'a, N>(
    options: &Options,
    state: &N,
    target: impl Into<IdOrKeyPath<'a, N::Id>>,
) -> Option<KeyPath>
where
    N: Node,
    N::Id: 'a,
{
    match target.into() {
        IdOrKeyPath::KeyPath(key_path) => Some(key_path.clone()),
        IdOrKeyPath::Id { id, start } => {
            let found = find(
                options,
                state,
                |node, _| {
                    node.resolve(&options.id_path)
                        .is_some_and(|value| value.matches_id(id))
                },
                start,
            );
            if found.is_none() {
                tracing::debug!(start = ?start, "no node carries the requested identifier");
            }
            found
        }
    }
}

/// Whether `key_path` addresses a node strictly below the root.
fn below_root(options: &Options, key_path: &KeyPath) -> bool {
    key_path.len() > options.root_path.len() && key_path.starts_with(&options.root_path)
}

/// The index of `key_path` in its parent's children, `None` at the root or
/// outside the tree.
fn index_in_parent(options: &Options, key_path: &KeyPath) -> Option<usize> {
    if !below_root(options, key_path) {
        return None;
    }
    key_path.last_index()
}

/// The parent node, `None` for the root.
pub fn parent<'a, N>(
    options: &Options,
    state: &N,
    target: impl Into<IdOrKeyPath<'a, N::Id>>,
) -> Option<KeyPath>
where
    N: Node,
    N::Id: 'a,
{
    let key_path = find_id(options, state, target)?;
    if !below_root(options, &key_path) {
        return None;
    }
    let parent = key_path.drop_last(options.level_width())?;
    (parent.len() >= options.root_path.len()).then_some(parent)
}

/// The sibling right after the node.
pub fn next_sibling<'a, N>(
    options: &Options,
    state: &N,
    target: impl Into<IdOrKeyPath<'a, N::Id>>,
) -> Option<KeyPath>
where
    N: Node,
    N::Id: 'a,
{
    let key_path = find_id(options, state, target)?;
    let index = index_in_parent(options, &key_path)?;
    let sibling = key_path.with_last_index(index + 1);
    state.exists(&sibling).then_some(sibling)
}

/// The sibling right before the node.
pub fn previous_sibling<'a, N>(
    options: &Options,
    state: &N,
    target: impl Into<IdOrKeyPath<'a, N::Id>>,
) -> Option<KeyPath>
where
    N: Node,
    N::Id: 'a,
{
    let key_path = find_id(options, state, target)?;
    let index = index_in_parent(options, &key_path)?.checked_sub(1)?;
    let sibling = key_path.with_last_index(index);
    state.exists(&sibling).then_some(sibling)
}

pub fn first_child<'a, N>(
    options: &Options,
    state: &N,
    target: impl Into<IdOrKeyPath<'a, N::Id>>,
) -> Option<KeyPath>
where
    N: Node,
    N::Id: 'a,
{
    child_at(options, state, target, 0)
}

pub fn last_child<'a, N>(
    options: &Options,
    state: &N,
    target: impl Into<IdOrKeyPath<'a, N::Id>>,
) -> Option<KeyPath>
where
    N: Node,
    N::Id: 'a,
{
    let key_path = find_id(options, state, target)?;
    let collection_path = key_path.join(&options.child_nodes_path);
    let last = state.resolve(&collection_path)?.seq_len()?.checked_sub(1)?;
    Some(collection_path.child(last))
}

/// The child at `index`, if the node has that many children.
pub fn child_at<'a, N>(
    options: &Options,
    state: &N,
    target: impl Into<IdOrKeyPath<'a, N::Id>>,
    index: usize,
) -> Option<KeyPath>
where
    N: Node,
    N::Id: 'a,
{
    let key_path = find_id(options, state, target)?;
    let child = key_path.join(&options.child_nodes_path).child(index);
    state.exists(&child).then_some(child)
}

/// The position of the node among its siblings; `None` for the root or an
/// unknown node.
pub fn child_index<'a, N>(
    options: &Options,
    state: &N,
    target: impl Into<IdOrKeyPath<'a, N::Id>>,
) -> Option<usize>
where
    N: Node,
    N::Id: 'a,
{
    let key_path = find_id(options, state, target)?;
    index_in_parent(options, &key_path)
}

/// Whether the node has a non-empty children collection.
pub fn has_child_nodes<'a, N>(
    options: &Options,
    state: &N,
    target: impl Into<IdOrKeyPath<'a, N::Id>>,
) -> bool
where
    N: Node,
    N::Id: 'a,
{
    num_child_nodes(options, state, target).is_some_and(|n| n > 0)
}

/// The length of the children collection; `None` if the node has no
/// collection at all.
pub fn num_child_nodes<'a, N>(
    options: &Options,
    state: &N,
    target: impl Into<IdOrKeyPath<'a, N::Id>>,
) -> Option<usize>
where
    N: Node,
    N::Id: 'a,
{
    let key_path = find_id(options, state, target)?;
    state
        .resolve(&key_path.join(&options.child_nodes_path))?
        .seq_len()
}

/// All other children of the node's parent, left to right.
pub fn siblings<'a, N>(
    options: &Options,
    state: &N,
    target: impl Into<IdOrKeyPath<'a, N::Id>>,
) -> QuerySet
where
    N: Node,
    N::Id: 'a,
{
    let Some(key_path) = find_id(options, state, target) else {
        return Vec::new();
    };
    let Some(index) = index_in_parent(options, &key_path) else {
        return Vec::new();
    };
    let Some(collection_path) = key_path.drop_last(1) else {
        return Vec::new();
    };
    let len = state
        .resolve(&collection_path)
        .and_then(Node::seq_len)
        .unwrap_or(0);
    (0..len)
        .filter(|&i| i != index)
        .map(|i| collection_path.child(i))
        .collect()
}

/// The node's children, left to right.
pub fn child_nodes<'a, N>(
    options: &Options,
    state: &N,
    target: impl Into<IdOrKeyPath<'a, N::Id>>,
) -> QuerySet
where
    N: Node,
    N::Id: 'a,
{
    let Some(key_path) = find_id(options, state, target) else {
        return Vec::new();
    };
    let collection_path = key_path.join(&options.child_nodes_path);
    let len = state
        .resolve(&collection_path)
        .and_then(Node::seq_len)
        .unwrap_or(0);
    (0..len).map(|i| collection_path.child(i)).collect()
}

/// Every ancestor of the node, nearest first, ending at the root path.
///
/// This only decomposes the key path; the tree is not searched. An
/// identifier's start path narrows the lookup but ancestors always run up
/// to the configured root.
pub fn ancestors<'a, N>(
    options: &Options,
    state: &N,
    target: impl Into<IdOrKeyPath<'a, N::Id>>,
) -> QuerySet
where
    N: Node,
    N::Id: 'a,
{
    let Some(key_path) = find_id(options, state, target) else {
        return Vec::new();
    };
    if !below_root(options, &key_path) {
        return Vec::new();
    }
    let root_len = options.root_path.len();
    let width = options.level_width();
    (root_len..key_path.len())
        .rev()
        .filter(|i| (i - root_len) % width == 0)
        .map(|i| key_path.prefix(i))
        .collect()
}

/// Levels between the root path and the node; `0` for the root.
pub fn depth<'a, N>(
    options: &Options,
    state: &N,
    target: impl Into<IdOrKeyPath<'a, N::Id>>,
) -> Option<usize>
where
    N: Node,
    N::Id: 'a,
{
    let key_path = find_id(options, state, target)?;
    Some(key_path.len().saturating_sub(options.root_path.len()) / options.level_width())
}

/// Every node below the node, in traversal order.
///
/// The node itself is left out by comparing identifiers, not key paths: a
/// descendant that shares the node's identifier is left out as well, and a
/// node without an identifier has no descendants.
pub fn descendants<'a, N>(
    options: &Options,
    state: &N,
    target: impl Into<IdOrKeyPath<'a, N::Id>>,
) -> QuerySet
where
    N: Node,
    N::Id: 'a,
{
    let Some(key_path) = find_id(options, state, target) else {
        return Vec::new();
    };
    let Some(id) = get_id(options, state, &key_path) else {
        return Vec::new();
    };
    filter(
        options,
        state,
        |node, _| {
            !node
                .resolve(&options.id_path)
                .is_some_and(|other| other.same_id(id))
        },
        Some(&key_path),
    )
}

/// A number that orders nodes by document position.
///
/// Built from `1.` followed by the one-based index of the node at every
/// level below the root, so `position(a) > position(b)` exactly when `a`
/// follows `b` in pre-order. Indices are concatenated without separators:
/// levels with ten or more children produce ambiguous values. Not meant for
/// comparisons with the root itself.
///
/// ```
/// use serde_json::json;
/// use treepath::v1::{Options, query};
///
/// let state = json!({"id": "r", "childNodes": [
///     {"id": "a", "childNodes": [{"id": "a1"}]},
///     {"id": "b"}
/// ]});
/// let options = Options::default();
/// let position = |id| query::position(&options, &state, id).unwrap();
/// assert!(position("a") < position("a1"));
/// assert!(position("a1") < position("b"));
/// ```
pub fn position<'a, N>(
    options: &Options,
    state: &N,
    target: impl Into<IdOrKeyPath<'a, N::Id>>,
) -> Option<f64>
where
    N: Node,
    N::Id: 'a,
{
    let key_path = find_id(options, state, target)?;
    let width = options.level_width();
    let steps = &key_path.steps()[options.root_path.len().min(key_path.len())..];
    let digits: String = steps
        .iter()
        .skip(width - 1)
        .step_by(width)
        .filter_map(|key| key.as_index())
        .map(|i| (i + 1).to_string())
        .collect();
    if digits.is_empty() {
        return Some(1.0);
    }
    format!("1.{digits}").parse().ok()
}

/// The next node in document order.
///
/// In order of priority: the first child, the next sibling, or the next
/// sibling of the nearest ancestor that has one. `None` after the last
/// node of the tree.
pub fn right<'a, N>(
    options: &Options,
    state: &N,
    target: impl Into<IdOrKeyPath<'a, N::Id>>,
) -> Option<KeyPath>
where
    N: Node,
    N::Id: 'a,
{
    let key_path = find_id(options, state, target)?;
    if let Some(child) = first_child(options, state, &key_path) {
        return Some(child);
    }
    let mut current = key_path;
    loop {
        if let Some(sibling) = next_sibling(options, state, &current) {
            return Some(sibling);
        }
        current = parent(options, state, &current)?;
    }
}

/// The previous node in document order.
///
/// In order of priority: the last descendant of the previous sibling, the
/// previous sibling itself, or the parent. `None` at the root.
pub fn left<'a, N>(
    options: &Options,
    state: &N,
    target: impl Into<IdOrKeyPath<'a, N::Id>>,
) -> Option<KeyPath>
where
    N: Node,
    N::Id: 'a,
{
    let key_path = find_id(options, state, target)?;
    match previous_sibling(options, state, &key_path) {
        Some(sibling) => Some(last_descendant(options, state, &sibling).unwrap_or(sibling)),
        None => parent(options, state, &key_path),
    }
}

/// Same as [`first_child`].
pub fn first_descendant<'a, N>(
    options: &Options,
    state: &N,
    target: impl Into<IdOrKeyPath<'a, N::Id>>,
) -> Option<KeyPath>
where
    N: Node,
    N::Id: 'a,
{
    first_child(options, state, target)
}

/// The deepest node reached by always taking the last child; `None` for a
/// leaf.
pub fn last_descendant<'a, N>(
    options: &Options,
    state: &N,
    target: impl Into<IdOrKeyPath<'a, N::Id>>,
) -> Option<KeyPath>
where
    N: Node,
    N::Id: 'a,
{
    let mut current = last_child(options, state, target)?;
    while let Some(next) = last_child(options, state, &current) {
        current = next;
    }
    Some(current)
}
