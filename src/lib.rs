//! Hierarchical container indexing values by fully-qualified domain name.
//!
//! Each node of a [`Tree`] is one name; a name's ancestors exist as nodes too,
//! either with their own value or as empty non-terminals (ENTs) created on
//! demand. Lookups degrade to the nearest existing ancestor instead of failing.
//!
//! ```
//! use nametree::{Node, Tree};
//!
//! let mut tree = Tree::new("example.jp", Some("apex"));
//! tree.insert_node(Node::new("www.sub.example.jp", Some("www"))).unwrap();
//!
//! let (node, exact) = tree.get_node("sub.example.jp.");
//! assert!(exact);
//! assert!(node.value().is_none());
//!
//! let (node, exact) = tree.get_node("mail.sub.Example.JP");
//! assert!(!exact);
//! assert_eq!(node.name().as_str(), "sub.example.jp.");
//!
//! tree.remove_node_with_ent("www.sub.example.jp");
//! assert_eq!(tree.node_count(), 1);
//! ```

pub mod config;
pub mod errors;
pub mod name;
pub mod node;
pub mod tree;
pub mod tree_traits;
pub mod util;

pub use config::Settings;
pub use errors::{TreeError, TreeResult};
pub use generational_arena::Index;
pub use name::Name;
pub use node::{is_ent, Node, NodeMut};
pub use tree::{Tree, TreeIterator};
pub use tree_traits::TreeNodeConvert;
