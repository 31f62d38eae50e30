use crate::error::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Key paths
// ============================================================================

/// A single step of a [`KeyPath`]: a map key or a sequence index.
///
/// Serialized untagged, so `["data", "childNodes", 0]` is a valid JSON key
/// path. On input, strings holding a canonical decimal number (`"0"`, `"12"`,
/// not `"01"`) become indices, the same rule the dotted text form uses.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum Key {
    Index(usize),
    Name(String),
}

impl Key {
    /// Read one step of text: an index when it is a canonical decimal
    /// number, a name otherwise.
    pub fn parse_segment(segment: &str) -> Key {
        let canonical = !segment.is_empty()
            && segment.bytes().all(|b| b.is_ascii_digit())
            && (segment == "0" || !segment.starts_with('0'));
        match segment.parse::<usize>() {
            Ok(i) if canonical => Key::Index(i),
            _ => Key::Name(segment.to_string()),
        }
    }

    /// The numeric value of an index step.
    pub fn as_index(&self) -> Option<usize> {
        match self {
            Key::Index(i) => Some(*i),
            Key::Name(_) => None,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Index(i) => write!(f, "{}", i),
            Key::Name(name) => write!(f, "{}", name),
        }
    }
}

impl<'de> Deserialize<'de> for Key {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawKey {
            Index(usize),
            Name(String),
        }

        Ok(match RawKey::deserialize(deserializer)? {
            RawKey::Index(i) => Key::Index(i),
            RawKey::Name(name) => Key::parse_segment(&name),
        })
    }
}

impl From<usize> for Key {
    fn from(i: usize) -> Self {
        Key::Index(i)
    }
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        Key::Name(name.to_string())
    }
}

impl From<String> for Key {
    fn from(name: String) -> Self {
        Key::Name(name)
    }
}

/// An address of a value inside a state tree, from the state root downwards.
///
/// Key paths are plain values: two paths are equal when their steps are
/// equal, and every query returns freshly built paths.
///
/// The text form joins steps with dots; segments holding a canonical
/// decimal number are indices (see [`Key::parse_segment`]):
///
/// ```
/// use treepath::v1::{Key, KeyPath};
///
/// let path: KeyPath = "data.childNodes.1".parse().unwrap();
/// assert_eq!(path.len(), 3);
/// assert_eq!(path.last(), Some(&Key::Index(1)));
/// assert_eq!(path.to_string(), "data.childNodes.1");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyPath(Vec<Key>);

/// An ordered collection of key paths, the result of every "find many" query.
pub type QuerySet = Vec<KeyPath>;

impl KeyPath {
    /// The empty path, addressing the state value itself.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn steps(&self) -> &[Key] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Key> {
        self.0.iter()
    }

    pub fn last(&self) -> Option<&Key> {
        self.0.last()
    }

    /// The final step, if it is a sequence index.
    pub fn last_index(&self) -> Option<usize> {
        self.last().and_then(Key::as_index)
    }

    pub fn starts_with(&self, prefix: &KeyPath) -> bool {
        self.0.starts_with(&prefix.0)
    }

    pub fn push(&mut self, key: impl Into<Key>) {
        self.0.push(key.into());
    }

    pub fn pop(&mut self) -> Option<Key> {
        self.0.pop()
    }

    pub(crate) fn truncate(&mut self, len: usize) {
        self.0.truncate(len);
    }

    pub(crate) fn extend_from(&mut self, other: &KeyPath) {
        self.0.extend_from_slice(&other.0);
    }

    /// A new path with `other` appended.
    pub fn join(&self, other: &KeyPath) -> KeyPath {
        let mut joined = self.clone();
        joined.extend_from(other);
        joined
    }

    /// A new path with a single step appended.
    pub fn child(&self, key: impl Into<Key>) -> KeyPath {
        let mut child = self.clone();
        child.push(key);
        child
    }

    /// The first `len` steps (or the whole path when it is shorter).
    pub fn prefix(&self, len: usize) -> KeyPath {
        Self(self.0[..len.min(self.len())].to_vec())
    }

    /// The path without its last `count` steps, `None` if it is too short.
    pub fn drop_last(&self, count: usize) -> Option<KeyPath> {
        let len = self.len().checked_sub(count)?;
        Some(self.prefix(len))
    }

    /// The same path with the final step replaced by `index`.
    pub fn with_last_index(&self, index: usize) -> KeyPath {
        let mut sibling = self.clone();
        sibling.pop();
        sibling.push(index);
        sibling
    }
}

impl From<Vec<Key>> for KeyPath {
    fn from(steps: Vec<Key>) -> Self {
        Self(steps)
    }
}

impl FromIterator<Key> for KeyPath {
    fn from_iter<T: IntoIterator<Item = Key>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a KeyPath {
    type Item = &'a Key;
    type IntoIter = std::slice::Iter<'a, Key>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, key) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{}", key)?;
        }
        Ok(())
    }
}

impl FromStr for KeyPath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Ok(KeyPath::new());
        }
        s.split('.')
            .enumerate()
            .map(|(position, segment)| {
                if segment.is_empty() {
                    return Err(Error::EmptySegment {
                        input: s.to_string(),
                        position,
                    });
                }
                Ok(Key::parse_segment(segment))
            })
            .collect()
    }
}

// ============================================================================
// Traversal methods
// ============================================================================

/// The eight tree walks: four visiting orders, each forward or reversed.
///
/// Names are kebab-case in text and JSON (`"pre-order"`,
/// `"reverse-breadth-first"`, ...).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TraversalMethod {
    #[default]
    PreOrder,
    ReversePreOrder,
    PostOrder,
    ReversePostOrder,
    InOrder,
    ReverseInOrder,
    BreadthFirst,
    ReverseBreadthFirst,
}

impl TraversalMethod {
    pub const ALL: [TraversalMethod; 8] = [
        TraversalMethod::PreOrder,
        TraversalMethod::ReversePreOrder,
        TraversalMethod::PostOrder,
        TraversalMethod::ReversePostOrder,
        TraversalMethod::InOrder,
        TraversalMethod::ReverseInOrder,
        TraversalMethod::BreadthFirst,
        TraversalMethod::ReverseBreadthFirst,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TraversalMethod::PreOrder => "pre-order",
            TraversalMethod::ReversePreOrder => "reverse-pre-order",
            TraversalMethod::PostOrder => "post-order",
            TraversalMethod::ReversePostOrder => "reverse-post-order",
            TraversalMethod::InOrder => "in-order",
            TraversalMethod::ReverseInOrder => "reverse-in-order",
            TraversalMethod::BreadthFirst => "breadth-first",
            TraversalMethod::ReverseBreadthFirst => "reverse-breadth-first",
        }
    }

    /// Whether children are scanned right to left.
    pub fn is_reverse(self) -> bool {
        matches!(
            self,
            TraversalMethod::ReversePreOrder
                | TraversalMethod::ReversePostOrder
                | TraversalMethod::ReverseInOrder
                | TraversalMethod::ReverseBreadthFirst
        )
    }
}

impl fmt::Display for TraversalMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TraversalMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "bfs" => return Ok(TraversalMethod::BreadthFirst),
            "reverse-bfs" => return Ok(TraversalMethod::ReverseBreadthFirst),
            _ => {}
        }
        TraversalMethod::ALL
            .into_iter()
            .find(|method| method.name() == s)
            .ok_or_else(|| Error::UnknownTraversal(s.to_string()))
    }
}

// ============================================================================
// Options
// ============================================================================

/// The address configuration: how key paths map onto a concrete tree shape.
///
/// Every query takes the options explicitly. [`Options::default`] describes
/// a tree at the state root whose nodes keep their children under
/// `childNodes` and their identifier under `id`.
///
/// # JSON shape
///
/// ```json
/// {
///   "rootPath": ["data"],
///   "childNodesPath": ["childNodes"],
///   "idPath": ["id"],
///   "traversalMethod": "pre-order"
/// }
/// ```
///
/// Missing fields take their default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Options {
    /// Where the logical root node lives, relative to the state root.
    pub root_path: KeyPath,
    /// Where a node keeps its ordered children, relative to the node.
    pub child_nodes_path: KeyPath,
    /// Where a node keeps its identifier, relative to the node.
    pub id_path: KeyPath,
    /// Strategy used by reductions and identifier lookups.
    pub traversal_method: TraversalMethod,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            root_path: KeyPath::new(),
            child_nodes_path: KeyPath::from(vec![Key::from("childNodes")]),
            id_path: KeyPath::from(vec![Key::from("id")]),
            traversal_method: TraversalMethod::PreOrder,
        }
    }
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate options from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let options: Options = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Reject shapes no tree can have.
    pub fn validate(&self) -> Result<()> {
        if self.child_nodes_path.is_empty() {
            return Err(Error::EmptyChildNodesPath);
        }
        Ok(())
    }

    /// Number of key path steps between a node and each of its children.
    pub fn level_width(&self) -> usize {
        self.child_nodes_path.len() + 1
    }

    pub fn with_root_path(mut self, root_path: KeyPath) -> Self {
        self.root_path = root_path;
        self
    }

    pub fn with_child_nodes_path(mut self, child_nodes_path: KeyPath) -> Self {
        self.child_nodes_path = child_nodes_path;
        self
    }

    pub fn with_id_path(mut self, id_path: KeyPath) -> Self {
        self.id_path = id_path;
        self
    }

    pub fn with_traversal_method(mut self, traversal_method: TraversalMethod) -> Self {
        self.traversal_method = traversal_method;
        self
    }
}

// ============================================================================
// Lookup targets
// ============================================================================

/// What a query is about: a node identifier to search for, or a key path
/// that is already resolved.
///
/// Key paths pass through identifier resolution untouched, so query results
/// can be fed straight back into other queries without another search.
///
/// ```
/// use treepath::v1::{IdOrKeyPath, KeyPath};
///
/// let by_id: IdOrKeyPath<'_, str> = "node-4".into();
/// assert!(matches!(by_id, IdOrKeyPath::Id { start: None, .. }));
///
/// let subtree: KeyPath = "data.childNodes.1".parse().unwrap();
/// let narrowed = IdOrKeyPath::id("node-4").within(&subtree);
/// assert!(matches!(narrowed, IdOrKeyPath::Id { start: Some(_), .. }));
/// ```
#[derive(Debug)]
pub enum IdOrKeyPath<'a, I: ?Sized> {
    /// Search for the node whose identifier matches `id`, walking from
    /// `start` (the configured root path when `None`).
    Id {
        id: &'a I,
        start: Option<&'a KeyPath>,
    },
    KeyPath(&'a KeyPath),
}

impl<'a, I: ?Sized> IdOrKeyPath<'a, I> {
    pub fn id(id: &'a I) -> Self {
        IdOrKeyPath::Id { id, start: None }
    }

    /// Narrow an identifier search to the subtree at `start`. Has no effect
    /// on a key path.
    pub fn within(self, start: &'a KeyPath) -> Self {
        match self {
            IdOrKeyPath::Id { id, .. } => IdOrKeyPath::Id {
                id,
                start: Some(start),
            },
            key_path => key_path,
        }
    }
}

impl<I: ?Sized> Clone for IdOrKeyPath<'_, I> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<I: ?Sized> Copy for IdOrKeyPath<'_, I> {}

impl<'a, I: ?Sized> From<&'a KeyPath> for IdOrKeyPath<'a, I> {
    fn from(key_path: &'a KeyPath) -> Self {
        IdOrKeyPath::KeyPath(key_path)
    }
}

impl<'a> From<&'a str> for IdOrKeyPath<'a, str> {
    fn from(id: &'a str) -> Self {
        IdOrKeyPath::id(id)
    }
}

impl<'a> From<&'a String> for IdOrKeyPath<'a, str> {
    fn from(id: &'a String) -> Self {
        IdOrKeyPath::id(id.as_str())
    }
}
