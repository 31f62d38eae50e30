#![doc = include_str!("../README.md")]

mod error;
mod node;
mod query;
mod reduce;
mod traversal;
mod types;

pub use error::{Error, Result};

pub mod v1 {
    //! Versioned public API for tree traversal and key path queries.
    //!
    //! Everything you need is re-exported from this module. It is organized
    //! into four groups:
    //!
    //! # Addressing
    //!
    //! - [`KeyPath`] — an address inside a state tree, built from [`Key`]s
    //! - [`QuerySet`] — an ordered list of key paths
    //! - [`Options`] — where the root, the children and the identifier live
    //! - [`IdOrKeyPath`] — the node a query is about
    //!
    //! # Access
    //!
    //! - [`Node`] — the read accessor a state tree provides (implemented for
    //!   [`serde_json::Value`])
    //!
    //! # Walking
    //!
    //! - [`TraversalMethod`] and the [`traversal`] functions — the eight tree
    //!   walks
    //! - [`reduce_tree`], [`nodes`], [`find`], [`filter`] — folds over a walk
    //!
    //! # Querying
    //!
    //! - [`query`] — identity lookup, navigation, ancestry, and document order
    //!
    //! # Example — walk a document in document order
    //!
    //! ```
    //! use serde_json::json;
    //! use treepath::v1::*;
    //!
    //! let state = json!({
    //!     "tree": {
    //!         "id": "doc",
    //!         "childNodes": [
    //!             {"id": "intro"},
    //!             {"id": "list", "childNodes": [{"id": "item"}]}
    //!         ]
    //!     }
    //! });
    //! let options = Options::new().with_root_path("tree".parse().unwrap());
    //!
    //! let mut order = Vec::new();
    //! let mut cursor = query::find_id(&options, &state, "doc");
    //! while let Some(key_path) = cursor {
    //!     let id = query::get_id(&options, &state, &key_path).unwrap();
    //!     order.push(id.as_str().unwrap().to_string());
    //!     cursor = query::right(&options, &state, &key_path);
    //! }
    //! assert_eq!(order, ["doc", "intro", "list", "item"]);
    //! assert_eq!(nodes(&options, &state, None).len(), order.len());
    //! ```

    /// Key path queries over a tree.
    ///
    /// Each function takes the [`Options`] and the state first, then the
    /// node it is about as an identifier or a key path.
    ///
    /// # Example — navigate around a node
    ///
    /// ```
    /// use serde_json::json;
    /// use treepath::v1::{Options, query};
    ///
    /// let state = json!({
    ///     "id": "F",
    ///     "childNodes": [
    ///         {"id": "B", "childNodes": [{"id": "A"}, {"id": "D"}]},
    ///         {"id": "G"}
    ///     ]
    /// });
    /// let options = Options::default();
    ///
    /// let d = query::find_id(&options, &state, "D").unwrap();
    /// assert_eq!(query::siblings(&options, &state, &d).len(), 1);
    /// assert_eq!(query::depth(&options, &state, &d), Some(2));
    /// assert_eq!(query::child_index(&options, &state, "G"), Some(1));
    /// assert_eq!(query::child_index(&options, &state, "F"), None);
    /// assert_eq!(query::num_child_nodes(&options, &state, "F"), Some(2));
    /// assert!(!query::has_child_nodes(&options, &state, "G"));
    /// assert_eq!(query::right(&options, &state, &d), query::find_id(&options, &state, "G"));
    /// ```
    pub mod query {
        pub use crate::query::{
            ancestors, child_at, child_index, child_nodes, depth, descendants, find_id,
            first_child, first_descendant, get_id, has_child_nodes, last_child, last_descendant,
            left, next_sibling, num_child_nodes, parent, position, previous_sibling, resolve,
            right, siblings,
        };
    }

    /// The eight traversal strategies.
    ///
    /// Each takes the options, the state, a visitor, and an optional start
    /// path (the configured root path when `None`). The visitor returns
    /// [`ControlFlow::Break`](std::ops::ControlFlow::Break) to end the walk.
    pub mod traversal {
        pub use crate::traversal::{
            breadth_first, in_order, post_order, pre_order, reverse_breadth_first,
            reverse_in_order, reverse_post_order, reverse_pre_order, traverse,
        };
    }

    pub use crate::error::{Error, Result};
    pub use crate::node::Node;
    pub use crate::reduce::{filter, find, nodes, reduce_tree};
    pub use crate::types::{IdOrKeyPath, Key, KeyPath, Options, QuerySet, TraversalMethod};
}
