use generational_arena::{Arena, Index};
use tracing::{debug, instrument, trace};

use crate::config::Settings;
use crate::errors::{TreeError, TreeResult};
use crate::name::Name;
use crate::node::{is_ent, Node, NodeMut};

/// Arena-based name tree.
///
/// The tree owns every node; parent and child links are generational arena
/// indices, so a node never owns its parent. All names passed in are
/// canonicalized before use, and every operation stays inside the name-space
/// of the root node (the origin).
#[derive(Debug)]
pub struct Tree<T> {
    /// Arena storage for all tree nodes
    arena: Arena<Node<T>>,
    /// Index of the root node, never removed
    root: Index,
    /// Validate names before inserting them
    validate_names: bool,
}

impl<T> Tree<T> {
    #[instrument(level = "debug", skip(value))]
    pub fn new(name: &str, value: Option<T>) -> Self {
        let mut arena = Arena::new();
        let root = arena.insert(Node::new(name, value));
        Self {
            arena,
            root,
            validate_names: false,
        }
    }

    /// Builds a tree rooted at `settings.origin`.
    ///
    /// With `validate_names` enabled the origin itself must be a valid name and
    /// every inserted name is validated too.
    #[instrument(level = "debug", skip(value))]
    pub fn with_settings(settings: &Settings, value: Option<T>) -> TreeResult<Self> {
        if settings.validate_names {
            Name::parse(&settings.origin)?;
        }
        let mut tree = Self::new(&settings.origin, value);
        tree.validate_names = settings.validate_names;
        Ok(tree)
    }

    /// Name of the root node.
    pub fn origin(&self) -> &Name {
        self.arena[self.root].name()
    }

    pub fn root(&self) -> Index {
        self.root
    }

    pub fn root_node(&self) -> &Node<T> {
        &self.arena[self.root]
    }

    pub fn node(&self, idx: Index) -> Option<&Node<T>> {
        self.arena.get(idx)
    }

    pub fn node_mut(&mut self, idx: Index) -> Option<NodeMut<'_, T>> {
        self.arena.get_mut(idx).map(NodeMut::new)
    }

    pub fn parent_of(&self, node: &Node<T>) -> Option<&Node<T>> {
        node.parent().and_then(|idx| self.arena.get(idx))
    }

    /// Number of nodes, root and ENTs included.
    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    /// Number of levels below and including the root.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        self.calculate_depth(self.root)
    }

    fn calculate_depth(&self, node_idx: Index) -> usize {
        if let Some(node) = self.arena.get(node_idx) {
            1 + node
                .sorted_children()
                .into_iter()
                .map(|child| self.calculate_depth(child))
                .max()
                .unwrap_or(0)
        } else {
            0
        }
    }

    /// Attaches `node` below the root, creating ENTs for missing ancestors.
    ///
    /// Fails with [`TreeError::NotChild`] if the name is the origin, lies
    /// outside it, or is already present in the tree (as an ENT or not).
    /// Links carried by `node` are discarded.
    #[instrument(level = "debug", skip(self, node), fields(name = %node.name()))]
    pub fn insert_node(&mut self, node: Node<T>) -> TreeResult<Index> {
        if self.validate_names {
            node.name().validate()?;
        }
        let origin = self.origin();
        if node.name() == origin || !node.name().is_subdomain_of(origin) {
            return Err(not_child(origin, node.name()));
        }
        let depth = origin.label_count();
        let labels: Vec<String> = node
            .name()
            .labels()
            .into_iter()
            .map(str::to_string)
            .collect();

        let idx = self.insert_at(self.root, depth, &labels, node)?;
        debug!("inserted node");
        Ok(idx)
    }

    /// `depth` is the label count of the node at `at`; `labels` belong to
    /// `node` and are always more than `depth`.
    fn insert_at(
        &mut self,
        at: Index,
        depth: usize,
        labels: &[String],
        mut node: Node<T>,
    ) -> TreeResult<Index> {
        let pos = labels.len() - depth - 1;
        let label = labels[pos].as_str();

        if pos == 0 {
            if self.arena[at].child(label).is_some() {
                return Err(not_child(self.arena[at].name(), node.name()));
            }
            node.adopt(at);
            let idx = self.arena.insert(node);
            self.arena[at].attach_child(label, idx);
            return Ok(idx);
        }

        if let Some(child) = self.arena[at].child(label) {
            return self.insert_at(child, depth + 1, labels, node);
        }

        // an empty trailing label would collapse the ENT name onto its parent
        let ent_name = Name::new(&labels[pos..].join("."));
        if ent_name.label_count() != depth + 1 {
            return Err(not_child(self.arena[at].name(), node.name()));
        }
        trace!(ent = %ent_name, "creating ENT");
        let ent = self.arena.insert(Node::ent(ent_name, at));
        match self.insert_at(ent, depth + 1, labels, node) {
            Ok(idx) => {
                self.arena[at].attach_child(label, ent);
                Ok(idx)
            }
            Err(e) => {
                self.arena.remove(ent);
                Err(e)
            }
        }
    }

    /// Most specific node on the path to `name`, and whether it matches exactly.
    ///
    /// Never fails: names outside the origin give `(root, false)`, names below
    /// the deepest existing ancestor give that ancestor with `false`.
    #[instrument(level = "trace", skip(self))]
    pub fn get_node(&self, name: &str) -> (&Node<T>, bool) {
        let (idx, exact) = self.lookup(&Name::new(name));
        (&self.arena[idx], exact)
    }

    /// Like [`Tree::get_node`], with write access to the node's value.
    #[instrument(level = "trace", skip(self))]
    pub fn get_node_mut(&mut self, name: &str) -> (NodeMut<'_, T>, bool) {
        let (idx, exact) = self.lookup(&Name::new(name));
        (NodeMut::new(&mut self.arena[idx]), exact)
    }

    /// Value stored at exactly `name`.
    pub fn get(&self, name: &str) -> Option<&T> {
        match self.get_node(name) {
            (node, true) => node.value(),
            _ => None,
        }
    }

    fn lookup(&self, name: &Name) -> (Index, bool) {
        let origin = self.origin();
        if !name.is_subdomain_of(origin) {
            return (self.root, false);
        }
        self.lookup_from(self.root, origin.label_count(), &name.labels())
    }

    fn lookup_from(&self, at: Index, depth: usize, labels: &[&str]) -> (Index, bool) {
        if depth == labels.len() {
            return (at, true);
        }
        match self.arena[at].child(labels[labels.len() - depth - 1]) {
            Some(child) => self.lookup_from(child, depth + 1, labels),
            None => (at, false),
        }
    }

    /// Detaches the subtree at exactly `name`. Does nothing if the name is
    /// missing, outside the origin, or the origin itself.
    ///
    /// Ancestors left empty by the removal stay in place; see
    /// [`Tree::remove_node_with_ent`] for the pruning variant.
    #[instrument(level = "debug", skip(self))]
    pub fn remove_node(&mut self, name: &str) {
        if let Err(e) = self.try_remove_node(name) {
            debug!(error = %e, "nothing removed");
        }
    }

    /// Like [`Tree::remove_node`], but reports why nothing was removed.
    ///
    /// On success the detached node is returned with its value and former
    /// parent index; its descendants are dropped.
    #[instrument(level = "debug", skip(self))]
    pub fn try_remove_node(&mut self, name: &str) -> TreeResult<Node<T>> {
        let name = Name::new(name);
        let origin = self.origin().clone();
        if !name.is_subdomain_of(&origin) {
            return Err(TreeError::NotInDomain {
                origin: origin.to_string(),
                name: name.to_string(),
            });
        }

        let (idx, exact) = self.lookup(&name);
        if !exact {
            return Err(TreeError::NotFound(name.to_string()));
        }
        let Some(parent) = self.arena[idx].parent() else {
            return Err(TreeError::RemoveItself(name.to_string()));
        };

        if let Some(label) = self.arena[idx].label().map(str::to_string) {
            self.arena[parent].detach_child(&label);
        }
        // lookup just returned idx, so it is live
        let removed = self
            .reclaim(idx)
            .ok_or_else(|| TreeError::NotFound(name.to_string()))?;
        debug!(remaining = self.arena.len(), "removed subtree");
        Ok(removed)
    }

    /// Frees `idx` and all of its descendants from the arena.
    fn reclaim(&mut self, idx: Index) -> Option<Node<T>> {
        let mut node = self.arena.remove(idx)?;
        let mut stack = node.take_children();
        while let Some(child) = stack.pop() {
            if let Some(mut descendant) = self.arena.remove(child) {
                stack.extend(descendant.take_children());
            }
        }
        Some(node)
    }

    /// Removes `name`, then prunes ancestors that are left childless and
    /// valueless, stopping at the first one that is not, or at the root.
    pub fn remove_node_with_ent(&mut self, name: &str) {
        self.remove_node_with_ent_by(name, is_ent::<T>)
    }

    /// Like [`Tree::remove_node_with_ent`] with a custom emptiness check.
    #[instrument(level = "debug", skip(self, is_empty))]
    pub fn remove_node_with_ent_by<F>(&mut self, name: &str, is_empty: F)
    where
        F: Fn(Option<&T>) -> bool,
    {
        match self.try_remove_node(name) {
            Ok(removed) => {
                if let Some(parent) = removed.parent() {
                    self.prune_ent(parent, &is_empty);
                }
            }
            Err(e) => debug!(error = %e, "nothing removed"),
        }
    }

    fn prune_ent<F>(&mut self, start: Index, is_empty: &F)
    where
        F: Fn(Option<&T>) -> bool,
    {
        let mut current = start;
        while let Some(node) = self.arena.get(current) {
            if node.has_children() || !is_empty(node.value()) {
                break;
            }
            let Some(parent) = node.parent() else {
                break;
            };
            let label = node.label().map(str::to_string);
            trace!(ent = %node.name(), "pruning ENT");
            if let Some(label) = label {
                self.arena[parent].detach_child(&label);
            }
            self.arena.remove(current);
            current = parent;
        }
    }

    /// Walks the tree pre-order, children sorted by label.
    ///
    /// The visitor returns `Ok(true)` to descend, `Ok(false)` to skip the
    /// node's children, or an error which stops the walk and is returned.
    pub fn iterate_node<E, F>(&self, mut visitor: F) -> Result<(), E>
    where
        F: FnMut(&Node<T>) -> Result<bool, E>,
    {
        self.iterate_from(self.root, &mut visitor)
    }

    fn iterate_from<E, F>(&self, at: Index, visitor: &mut F) -> Result<(), E>
    where
        F: FnMut(&Node<T>) -> Result<bool, E>,
    {
        let node = &self.arena[at];
        if !visitor(node)? {
            return Ok(());
        }
        for child in node.sorted_children() {
            self.iterate_from(child, visitor)?;
        }
        Ok(())
    }

    pub fn iter(&self) -> TreeIterator<'_, T> {
        TreeIterator::new(self)
    }
}

fn not_child(parent: &Name, name: &Name) -> TreeError {
    TreeError::NotChild {
        parent: parent.to_string(),
        name: name.to_string(),
    }
}

/// Pre-order iterator, children in label order.
pub struct TreeIterator<'a, T> {
    tree: &'a Tree<T>,
    stack: Vec<Index>,
}

impl<'a, T> TreeIterator<'a, T> {
    fn new(tree: &'a Tree<T>) -> Self {
        Self {
            tree,
            stack: vec![tree.root],
        }
    }
}

impl<'a, T> Iterator for TreeIterator<'a, T> {
    type Item = (Index, &'a Node<T>);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.tree.arena.get(current_idx) {
                // Push children in reverse order for label-ordered traversal
                self.stack.extend(node.sorted_children().into_iter().rev());
                return Some((current_idx, node));
            }
        }
        None
    }
}

impl<'a, T> IntoIterator for &'a Tree<T> {
    type Item = (Index, &'a Node<T>);
    type IntoIter = TreeIterator<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
