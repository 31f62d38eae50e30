//! The eight tree walks.
//!
//! Every strategy visits `(node, key_path)` pairs starting at a subtree root
//! (the configured root path unless another start path is given) and stops
//! as soon as the visitor returns [`ControlFlow::Break`].
//!
//! Internally each walk is a fold that threads an accumulator through the
//! visits; plain visiting is the fold over `()`.

use crate::node::Node;
use crate::types::{Key, KeyPath, Options, TraversalMethod};
use std::collections::VecDeque;
use std::ops::{ControlFlow, Range};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Forward,
    Reverse,
}

impl Direction {
    /// The indices of `range` in scan order.
    fn order(self, range: Range<usize>) -> impl Iterator<Item = usize> {
        let (start, end) = (range.start, range.end);
        range.map(move |i| match self {
            Direction::Forward => i,
            Direction::Reverse => start + end - 1 - i,
        })
    }
}

type Walk<N, T, F> = fn(&Options, &N, &mut KeyPath, T, &mut F, Direction) -> ControlFlow<T, T>;

/// The non-empty children collection of `node` and its length.
fn children<'n, N: Node>(options: &Options, node: &'n N) -> Option<(&'n N, usize)> {
    let collection = node.resolve(&options.child_nodes_path)?;
    let len = collection.seq_len()?;
    (len > 0).then_some((collection, len))
}

/// Run `walk` over the children at `indices`, extending `key_path` in place
/// and restoring it afterwards.
#[allow(clippy::too_many_arguments)]
fn walk_children<N, T, F>(
    options: &Options,
    collection: &N,
    indices: impl Iterator<Item = usize>,
    key_path: &mut KeyPath,
    mut acc: T,
    f: &mut F,
    direction: Direction,
    walk: Walk<N, T, F>,
) -> ControlFlow<T, T>
where
    N: Node,
{
    let base = key_path.len();
    key_path.extend_from(&options.child_nodes_path);
    for i in indices {
        let Some(child) = collection.lookup(&Key::Index(i)) else {
            continue;
        };
        key_path.push(i);
        let flow = walk(options, child, key_path, acc, f, direction);
        key_path.pop();
        match flow {
            ControlFlow::Continue(next) => acc = next,
            ControlFlow::Break(done) => {
                key_path.truncate(base);
                return ControlFlow::Break(done);
            }
        }
    }
    key_path.truncate(base);
    ControlFlow::Continue(acc)
}

fn pre_order_walk<N, T, F>(
    options: &Options,
    node: &N,
    key_path: &mut KeyPath,
    acc: T,
    f: &mut F,
    direction: Direction,
) -> ControlFlow<T, T>
where
    N: Node,
    F: FnMut(T, &N, &KeyPath) -> ControlFlow<T, T>,
{
    let acc = f(acc, node, key_path)?;
    match children(options, node) {
        Some((collection, len)) => walk_children(
            options,
            collection,
            direction.order(0..len),
            key_path,
            acc,
            f,
            direction,
            pre_order_walk,
        ),
        None => ControlFlow::Continue(acc),
    }
}

fn post_order_walk<N, T, F>(
    options: &Options,
    node: &N,
    key_path: &mut KeyPath,
    acc: T,
    f: &mut F,
    direction: Direction,
) -> ControlFlow<T, T>
where
    N: Node,
    F: FnMut(T, &N, &KeyPath) -> ControlFlow<T, T>,
{
    let acc = match children(options, node) {
        Some((collection, len)) => walk_children(
            options,
            collection,
            direction.order(0..len),
            key_path,
            acc,
            f,
            direction,
            post_order_walk,
        )?,
        None => acc,
    };
    f(acc, node, key_path)
}

/// Forward: children `[0, ceil(n/2))`, the node, then the rest.
/// Reverse is the exact mirror: the last `floor(n/2)` children right to
/// left, the node, then the first `ceil(n/2)` right to left.
fn in_order_walk<N, T, F>(
    options: &Options,
    node: &N,
    key_path: &mut KeyPath,
    acc: T,
    f: &mut F,
    direction: Direction,
) -> ControlFlow<T, T>
where
    N: Node,
    F: FnMut(T, &N, &KeyPath) -> ControlFlow<T, T>,
{
    let Some((collection, len)) = children(options, node) else {
        return f(acc, node, key_path);
    };
    let edge = len.div_ceil(2);
    let (before, after) = match direction {
        Direction::Forward => (0..edge, edge..len),
        Direction::Reverse => (edge..len, 0..edge),
    };
    let acc = walk_children(
        options,
        collection,
        direction.order(before),
        key_path,
        acc,
        f,
        direction,
        in_order_walk,
    )?;
    let acc = f(acc, node, key_path)?;
    walk_children(
        options,
        collection,
        direction.order(after),
        key_path,
        acc,
        f,
        direction,
        in_order_walk,
    )
}

fn breadth_first_walk<N, T, F>(
    options: &Options,
    root: &N,
    key_path: KeyPath,
    mut acc: T,
    f: &mut F,
    direction: Direction,
) -> ControlFlow<T, T>
where
    N: Node,
    F: FnMut(T, &N, &KeyPath) -> ControlFlow<T, T>,
{
    let mut queue = VecDeque::from([(root, key_path)]);
    while let Some((node, key_path)) = queue.pop_front() {
        acc = f(acc, node, &key_path)?;
        let Some((collection, len)) = children(options, node) else {
            continue;
        };
        let collection_path = key_path.join(&options.child_nodes_path);
        for i in direction.order(0..len) {
            if let Some(child) = collection.lookup(&Key::Index(i)) {
                queue.push_back((child, collection_path.child(i)));
            }
        }
    }
    ControlFlow::Continue(acc)
}

impl TraversalMethod {
    /// Fold `f` over the nodes of the tree in this order.
    ///
    /// Returns `Break` with the final accumulator if `f` stopped the walk,
    /// `Continue` otherwise. A start path that does not resolve visits
    /// nothing and returns `initial`.
    pub(crate) fn fold<N, T, F>(
        self,
        options: &Options,
        state: &N,
        initial: T,
        mut f: F,
        start: Option<&KeyPath>,
    ) -> ControlFlow<T, T>
    where
        N: Node,
        F: FnMut(T, &N, &KeyPath) -> ControlFlow<T, T>,
    {
        let key_path = start.unwrap_or(&options.root_path);
        let Some(root) = state.resolve(key_path) else {
            tracing::debug!(method = %self, start = %key_path, "traversal start path does not resolve");
            return ControlFlow::Continue(initial);
        };
        let mut key_path = key_path.clone();
        let f = &mut f;
        let direction = if self.is_reverse() {
            Direction::Reverse
        } else {
            Direction::Forward
        };
        match self {
            TraversalMethod::PreOrder | TraversalMethod::ReversePreOrder => {
                pre_order_walk(options, root, &mut key_path, initial, f, direction)
            }
            TraversalMethod::PostOrder | TraversalMethod::ReversePostOrder => {
                post_order_walk(options, root, &mut key_path, initial, f, direction)
            }
            TraversalMethod::InOrder | TraversalMethod::ReverseInOrder => {
                in_order_walk(options, root, &mut key_path, initial, f, direction)
            }
            TraversalMethod::BreadthFirst | TraversalMethod::ReverseBreadthFirst => {
                breadth_first_walk(options, root, key_path, initial, f, direction)
            }
        }
    }

    /// Visit the tree in this order until `visit` breaks.
    pub fn traverse<N, V>(self, options: &Options, state: &N, mut visit: V, start: Option<&KeyPath>)
    where
        N: Node,
        V: FnMut(&N, &KeyPath) -> ControlFlow<()>,
    {
        let _ = self.fold(options, state, (), |(), node, key_path| visit(node, key_path), start);
    }
}

/// Visit the tree with the strategy configured in `options`.
///
/// ```
/// use std::ops::ControlFlow;
/// use serde_json::json;
/// use treepath::v1::{Options, traversal};
///
/// let state = json!({"id": "a", "childNodes": [{"id": "b"}, {"id": "c"}]});
/// let mut seen = Vec::new();
/// traversal::traverse(&Options::default(), &state, |node, _| {
///     seen.push(node["id"].as_str().unwrap().to_string());
///     if seen.len() == 2 { ControlFlow::Break(()) } else { ControlFlow::Continue(()) }
/// }, None);
/// assert_eq!(seen, ["a", "b"]);
/// ```
pub fn traverse<N, V>(options: &Options, state: &N, visit: V, start: Option<&KeyPath>)
where
    N: Node,
    V: FnMut(&N, &KeyPath) -> ControlFlow<()>,
{
    options.traversal_method.traverse(options, state, visit, start)
}

/// Node before its children, children left to right.
pub fn pre_order<N, V>(options: &Options, state: &N, visit: V, start: Option<&KeyPath>)
where
    N: Node,
    V: FnMut(&N, &KeyPath) -> ControlFlow<()>,
{
    TraversalMethod::PreOrder.traverse(options, state, visit, start)
}

/// Node before its children, children right to left.
pub fn reverse_pre_order<N, V>(options: &Options, state: &N, visit: V, start: Option<&KeyPath>)
where
    N: Node,
    V: FnMut(&N, &KeyPath) -> ControlFlow<()>,
{
    TraversalMethod::ReversePreOrder.traverse(options, state, visit, start)
}

/// Node after its children, children left to right.
pub fn post_order<N, V>(options: &Options, state: &N, visit: V, start: Option<&KeyPath>)
where
    N: Node,
    V: FnMut(&N, &KeyPath) -> ControlFlow<()>,
{
    TraversalMethod::PostOrder.traverse(options, state, visit, start)
}

/// Node after its children, children right to left.
pub fn reverse_post_order<N, V>(options: &Options, state: &N, visit: V, start: Option<&KeyPath>)
where
    N: Node,
    V: FnMut(&N, &KeyPath) -> ControlFlow<()>,
{
    TraversalMethod::ReversePostOrder.traverse(options, state, visit, start)
}

/// Node between the first `ceil(n/2)` children and the rest.
pub fn in_order<N, V>(options: &Options, state: &N, visit: V, start: Option<&KeyPath>)
where
    N: Node,
    V: FnMut(&N, &KeyPath) -> ControlFlow<()>,
{
    TraversalMethod::InOrder.traverse(options, state, visit, start)
}

/// Mirror image of [`in_order`].
pub fn reverse_in_order<N, V>(options: &Options, state: &N, visit: V, start: Option<&KeyPath>)
where
    N: Node,
    V: FnMut(&N, &KeyPath) -> ControlFlow<()>,
{
    TraversalMethod::ReverseInOrder.traverse(options, state, visit, start)
}

/// Level by level, left to right within a level.
pub fn breadth_first<N, V>(options: &Options, state: &N, visit: V, start: Option<&KeyPath>)
where
    N: Node,
    V: FnMut(&N, &KeyPath) -> ControlFlow<()>,
{
    TraversalMethod::BreadthFirst.traverse(options, state, visit, start)
}

/// Level by level, right to left within a level.
pub fn reverse_breadth_first<N, V>(
    options: &Options,
    state: &N,
    visit: V,
    start: Option<&KeyPath>,
) where
    N: Node,
    V: FnMut(&N, &KeyPath) -> ControlFlow<()>,
{
    TraversalMethod::ReverseBreadthFirst.traverse(options, state, visit, start)
}
