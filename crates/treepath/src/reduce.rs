//! Folding a tree into a single value.

use crate::node::Node;
use crate::types::{KeyPath, Options, QuerySet};
use std::ops::ControlFlow;

/// Walk the tree with the configured traversal method and accumulate a
/// value.
///
/// The reducer returns [`ControlFlow::Continue`] with the next accumulator
/// to keep walking, or [`ControlFlow::Break`] with the final result to stop
/// right away. Breaking is allowed on any visit, including the first.
///
/// ```
/// use std::ops::ControlFlow;
/// use serde_json::json;
/// use treepath::v1::{Options, reduce_tree};
///
/// let state = json!({"id": "a", "childNodes": [{"id": "b"}, {"id": "c"}]});
///
/// let count = reduce_tree(&Options::default(), &state, |n, _, _| ControlFlow::Continue(n + 1), 0, None);
/// assert_eq!(count, 3);
///
/// let before_b = reduce_tree(
///     &Options::default(),
///     &state,
///     |n, node, _| if node["id"] == "b" { ControlFlow::Break(n) } else { ControlFlow::Continue(n + 1) },
///     0,
///     None,
/// );
/// assert_eq!(before_b, 1);
/// ```
pub fn reduce_tree<N, T, R>(
    options: &Options,
    state: &N,
    mut reducer: R,
    initial: T,
    start: Option<&KeyPath>,
) -> T
where
    N: Node,
    R: FnMut(T, &N, &KeyPath) -> ControlFlow<T, T>,
{
    let flow = options.traversal_method.fold(
        options,
        state,
        initial,
        |acc, node, key_path| {
            let flow = reducer(acc, node, key_path);
            if flow.is_break() {
                tracing::trace!(at = %key_path, "reduction stopped early");
            }
            flow
        },
        start,
    );
    match flow {
        ControlFlow::Continue(result) | ControlFlow::Break(result) => result,
    }
}

/// Key paths of every node, in traversal order.
///
/// This visits the whole tree; prefer a targeted query when one fits.
pub fn nodes<N: Node>(options: &Options, state: &N, start: Option<&KeyPath>) -> QuerySet {
    reduce_tree(
        options,
        state,
        |mut acc: QuerySet, _, key_path| {
            acc.push(key_path.clone());
            ControlFlow::Continue(acc)
        },
        Vec::new(),
        start,
    )
}

/// The key path of the first node, in traversal order, for which
/// `predicate` holds.
pub fn find<N, P>(
    options: &Options,
    state: &N,
    mut predicate: P,
    start: Option<&KeyPath>,
) -> Option<KeyPath>
where
    N: Node,
    P: FnMut(&N, &KeyPath) -> bool,
{
    reduce_tree(
        options,
        state,
        |acc, node, key_path| {
            if predicate(node, key_path) {
                ControlFlow::Break(Some(key_path.clone()))
            } else {
                ControlFlow::Continue(acc)
            }
        },
        None,
        start,
    )
}

/// Key paths of every node for which `predicate` holds, in traversal order.
pub fn filter<N, P>(
    options: &Options,
    state: &N,
    mut predicate: P,
    start: Option<&KeyPath>,
) -> QuerySet
where
    N: Node,
    P: FnMut(&N, &KeyPath) -> bool,
{
    reduce_tree(
        options,
        state,
        |mut acc: QuerySet, node, key_path| {
            if predicate(node, key_path) {
                acc.push(key_path.clone());
            }
            ControlFlow::Continue(acc)
        },
        Vec::new(),
        start,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TraversalMethod;
    use serde_json::{Value, json};

    fn kp(s: &str) -> KeyPath {
        s.parse().unwrap()
    }

    fn tree() -> Value {
        json!({
            "id": "root",
            "kind": "list",
            "childNodes": [
                {"id": "a", "kind": "item"},
                {"id": "b", "kind": "list", "childNodes": [{"id": "c", "kind": "item"}]}
            ]
        })
    }

    #[test]
    fn test_reduce_counts_every_node() {
        let count = reduce_tree(
            &Options::default(),
            &tree(),
            |n, _, _| ControlFlow::Continue(n + 1),
            0usize,
            None,
        );
        assert_eq!(count, 4);
    }

    #[test]
    fn test_reduce_break_is_final() {
        let mut visits = 0;
        let result = reduce_tree(
            &Options::default(),
            &tree(),
            |acc: Vec<String>, node, _| {
                visits += 1;
                let mut acc = acc;
                acc.push(node["id"].as_str().unwrap().to_string());
                if acc.len() == 2 {
                    ControlFlow::Break(acc)
                } else {
                    ControlFlow::Continue(acc)
                }
            },
            Vec::new(),
            None,
        );
        assert_eq!(result, ["root", "a"]);
        assert_eq!(visits, 2);
    }

    #[test]
    fn test_reduce_break_on_first_visit() {
        let result = reduce_tree(
            &Options::default(),
            &tree(),
            |_, _, key_path| ControlFlow::Break(key_path.len()),
            99,
            None,
        );
        assert_eq!(result, 0);
    }

    #[test]
    fn test_reduce_missing_start_returns_initial() {
        let result = reduce_tree(
            &Options::default(),
            &tree(),
            |n, _, _| ControlFlow::Continue(n + 1),
            41,
            Some(&kp("childNodes.9")),
        );
        assert_eq!(result, 41);
    }

    #[test]
    fn test_nodes_pre_order() {
        let all = nodes(&Options::default(), &tree(), None);
        assert_eq!(
            all,
            vec![
                KeyPath::new(),
                kp("childNodes.0"),
                kp("childNodes.1"),
                kp("childNodes.1.childNodes.0"),
            ]
        );
    }

    #[test]
    fn test_nodes_follow_configured_method() {
        let options = Options::new().with_traversal_method(TraversalMethod::PostOrder);
        let all = nodes(&options, &tree(), None);
        assert_eq!(all.first(), Some(&kp("childNodes.0")));
        assert_eq!(all.last(), Some(&KeyPath::new()));
    }

    #[test]
    fn test_nodes_from_start() {
        let all = nodes(&Options::default(), &tree(), Some(&kp("childNodes.1")));
        assert_eq!(all, vec![kp("childNodes.1"), kp("childNodes.1.childNodes.0")]);
    }

    #[test]
    fn test_find_first_match() {
        let found = find(
            &Options::default(),
            &tree(),
            |node, _| node["kind"] == "item",
            None,
        );
        assert_eq!(found, Some(kp("childNodes.0")));

        let options = Options::new().with_traversal_method(TraversalMethod::ReversePreOrder);
        let found = find(&options, &tree(), |node, _| node["kind"] == "item", None);
        assert_eq!(found, Some(kp("childNodes.1.childNodes.0")));
    }

    #[test]
    fn test_find_none() {
        let found = find(
            &Options::default(),
            &tree(),
            |node, _| node["kind"] == "table",
            None,
        );
        assert!(found.is_none());
    }

    #[test]
    fn test_filter() {
        let lists = filter(
            &Options::default(),
            &tree(),
            |node, _| node["kind"] == "list",
            None,
        );
        assert_eq!(lists, vec![KeyPath::new(), kp("childNodes.1")]);
    }

    #[test]
    fn test_filter_by_key_path() {
        let deep = filter(&Options::default(), &tree(), |_, key_path| key_path.len() > 2, None);
        assert_eq!(deep, vec![kp("childNodes.1.childNodes.0")]);
    }
}
