use std::collections::HashMap;
use std::ops::Deref;

use generational_arena::Index;
use itertools::Itertools;

use crate::name::Name;

/// Default emptiness check used when pruning ENTs: a node without a value is empty.
pub fn is_ent<T>(value: Option<&T>) -> bool {
    value.is_none()
}

/// A single name in the hierarchy.
///
/// Nodes are built standalone with [`Node::new`] and handed to
/// [`Tree::insert_node`](crate::tree::Tree::insert_node); from then on the tree
/// owns them and links them by arena index.
#[derive(Debug)]
pub struct Node<T> {
    /// Canonical name, fixed for the node's lifetime
    name: Name,
    /// Payload, `None` for ENTs and cleared nodes
    value: Option<T>,
    /// Index of parent node in the arena, None for the root and detached nodes
    parent: Option<Index>,
    /// Immediate child label to arena index
    children: HashMap<String, Index>,
}

/// Clones name and value only; the copy is a standalone node without links.
impl<T: Clone> Clone for Node<T> {
    fn clone(&self) -> Self {
        Self::new(self.name.clone(), self.value.clone())
    }
}

impl<T> Node<T> {
    pub fn new(name: impl Into<Name>, value: Option<T>) -> Self {
        Self {
            name: name.into(),
            value,
            parent: None,
            children: HashMap::new(),
        }
    }

    pub(crate) fn ent(name: Name, parent: Index) -> Self {
        Self {
            name,
            value: None,
            parent: Some(parent),
            children: HashMap::new(),
        }
    }

    /// Canonical name of this node.
    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn value_mut(&mut self) -> Option<&mut T> {
        self.value.as_mut()
    }

    /// Replaces the value, returning the previous one.
    pub fn set_value(&mut self, value: T) -> Option<T> {
        self.value.replace(value)
    }

    /// Drops the value, turning the node into an ENT if it has children.
    pub fn clear_value(&mut self) -> Option<T> {
        self.value.take()
    }

    pub fn has_value(&self) -> bool {
        self.value.is_some()
    }

    pub fn parent(&self) -> Option<Index> {
        self.parent
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn children_len(&self) -> usize {
        self.children.len()
    }

    /// Child labels in canonical order.
    pub fn child_labels(&self) -> Vec<&str> {
        self.children.keys().map(String::as_str).sorted().collect()
    }

    /// Child indices ordered by label.
    pub(crate) fn sorted_children(&self) -> Vec<Index> {
        self.children
            .iter()
            .sorted_by(|a, b| a.0.cmp(b.0))
            .map(|(_, &idx)| idx)
            .collect()
    }

    pub(crate) fn child(&self, label: &str) -> Option<Index> {
        self.children.get(label).copied()
    }

    pub(crate) fn attach_child(&mut self, label: &str, idx: Index) {
        self.children.insert(label.to_string(), idx);
    }

    pub(crate) fn detach_child(&mut self, label: &str) -> Option<Index> {
        self.children.remove(label)
    }

    /// Drops any links so the node can be attached below `parent`.
    pub(crate) fn adopt(&mut self, parent: Index) {
        self.children.clear();
        self.parent = Some(parent);
    }

    pub(crate) fn take_children(&mut self) -> Vec<Index> {
        self.children.drain().map(|(_, idx)| idx).collect()
    }

    /// Own label relative to the parent, `None` for the root name.
    pub(crate) fn label(&self) -> Option<&str> {
        self.name.first_label()
    }
}

/// Mutable access to a node inside a tree.
///
/// Only the value can change; name and links stay under the tree's control.
#[derive(Debug)]
pub struct NodeMut<'a, T> {
    node: &'a mut Node<T>,
}

impl<'a, T> NodeMut<'a, T> {
    pub(crate) fn new(node: &'a mut Node<T>) -> Self {
        Self { node }
    }

    pub fn value_mut(&mut self) -> Option<&mut T> {
        self.node.value_mut()
    }

    pub fn set_value(&mut self, value: T) -> Option<T> {
        self.node.set_value(value)
    }

    pub fn clear_value(&mut self) -> Option<T> {
        self.node.clear_value()
    }
}

impl<T> Deref for NodeMut<'_, T> {
    type Target = Node<T>;

    fn deref(&self) -> &Node<T> {
        &*self.node
    }
}
