use std::fmt;

use generational_arena::Index;
use termtree::Tree as TermTree;
use tracing::instrument;

use crate::node::Node;
use crate::tree::Tree;

pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> TermTree<String>;
}

fn node_line<T>(node: &Node<T>) -> String {
    if node.has_value() {
        node.name().to_string()
    } else {
        format!("{} (ent)", node.name())
    }
}

impl<T> TreeNodeConvert for Tree<T> {
    #[instrument(level = "debug", skip(self))]
    fn to_tree_string(&self) -> TermTree<String> {
        fn build_tree<T>(tree: &Tree<T>, node_idx: Index, parent_tree: &mut TermTree<String>) {
            if let Some(node) = tree.node(node_idx) {
                for child_idx in node.sorted_children() {
                    if let Some(child) = tree.node(child_idx) {
                        let mut child_tree = TermTree::new(node_line(child));
                        build_tree(tree, child_idx, &mut child_tree);
                        parent_tree.push(child_tree);
                    }
                }
            }
        }

        let mut root = TermTree::new(node_line(self.root_node()));
        build_tree(self, self.root(), &mut root);
        root
    }
}

impl<T> fmt::Display for Tree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_tree_string())
    }
}
