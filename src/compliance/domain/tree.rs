//! Generic nested-set tree.
//!
//! Each node carries `lft`/`rgt` boundaries within its root's `tree_id`. A
//! node's descendants are exactly the nodes of the same `tree_id` whose
//! boundaries lie strictly between the node's own, so descendant queries are a
//! single range scan over the `(tree_id, lft)` index. Mutations only renumber
//! the nodes of the affected `tree_id` that sit to the right of the mutation
//! point, plus the ancestor chain.
//!
//! The tree is instantiated twice, once per [`TreeKind`] marker. Node ids carry
//! the marker type, so a product-tree id can never be used with the component
//! tree.

use super::EntityRef;
use crate::shared::error::OpenlcsError;
use crate::shared::Result;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// Marker trait distinguishing the tree instantiations
pub trait TreeKind {
    /// Human readable name, used in error messages
    const NAME: &'static str;

    /// Whether nodes of this tree may reference `entity`
    fn accepts(entity: &EntityRef) -> bool;
}

/// Product hierarchy: products, releases and the components shipped in them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductHierarchy;

impl TreeKind for ProductHierarchy {
    const NAME: &'static str = "product tree";

    fn accepts(_entity: &EntityRef) -> bool {
        true
    }
}

/// Component hierarchy: container images and the components they provide
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComponentHierarchy;

impl TreeKind for ComponentHierarchy {
    const NAME: &'static str = "component tree";

    fn accepts(entity: &EntityRef) -> bool {
        matches!(entity, EntityRef::Component(_))
    }
}

pub type ProductTree = Tree<ProductHierarchy>;
pub type ComponentTree = Tree<ComponentHierarchy>;
pub type ProductNodeId = NodeId<ProductHierarchy>;
pub type ComponentNodeId = NodeId<ComponentHierarchy>;

/// Identifier of a node within a tree of kind `K`
pub struct NodeId<K> {
    raw: u64,
    _kind: PhantomData<fn() -> K>,
}

impl<K> NodeId<K> {
    pub fn from_raw(raw: u64) -> Self {
        Self {
            raw,
            _kind: PhantomData,
        }
    }

    pub fn get(self) -> u64 {
        self.raw
    }
}

impl<K> Clone for NodeId<K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K> Copy for NodeId<K> {}

impl<K> PartialEq for NodeId<K> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl<K> Eq for NodeId<K> {}

impl<K> Hash for NodeId<K> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl<K> fmt::Debug for NodeId<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.raw)
    }
}

impl<K> fmt::Display for NodeId<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

/// A node of a [`Tree`]
#[derive(Debug, Clone)]
pub struct TreeNode<K> {
    id: NodeId<K>,
    name: String,
    parent: Option<NodeId<K>>,
    entity: EntityRef,
    tree_id: u64,
    lft: u64,
    rgt: u64,
    level: u32,
}

impl<K> TreeNode<K> {
    pub fn id(&self) -> NodeId<K> {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<NodeId<K>> {
        self.parent
    }

    pub fn entity(&self) -> EntityRef {
        self.entity
    }

    pub fn tree_id(&self) -> u64 {
        self.tree_id
    }

    pub fn lft(&self) -> u64 {
        self.lft
    }

    pub fn rgt(&self) -> u64 {
        self.rgt
    }

    /// Depth below the root (roots are level 0)
    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Number of nodes below this one
    pub fn descendant_count(&self) -> u64 {
        (self.rgt - self.lft - 1) / 2
    }

    /// True when `self` lies strictly inside `other`'s boundaries
    pub fn is_descendant_of(&self, other: &TreeNode<K>) -> bool {
        self.tree_id == other.tree_id && self.lft > other.lft && self.rgt < other.rgt
    }
}

/// Nested-set tree of [`EntityRef`]s, see the module docs
pub struct Tree<K> {
    nodes: HashMap<NodeId<K>, TreeNode<K>>,
    positions: BTreeMap<(u64, u64), NodeId<K>>,
    siblings: HashMap<(Option<NodeId<K>>, EntityRef), NodeId<K>>,
    by_entity: HashMap<EntityRef, Vec<NodeId<K>>>,
    next_node: u64,
    next_tree: u64,
}

impl<K> Default for Tree<K> {
    fn default() -> Self {
        Self {
            nodes: HashMap::new(),
            positions: BTreeMap::new(),
            siblings: HashMap::new(),
            by_entity: HashMap::new(),
            next_node: 1,
            next_tree: 1,
        }
    }
}

impl<K: TreeKind> Tree<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: NodeId<K>) -> Option<&TreeNode<K>> {
        self.nodes.get(&id)
    }

    fn node(&self, id: NodeId<K>) -> Result<&TreeNode<K>> {
        self.nodes
            .get(&id)
            .ok_or_else(|| OpenlcsError::not_found(&format!("{} node", K::NAME), id).into())
    }

    /// Inserts a node as the last child of `parent`, or as a new root.
    ///
    /// # Errors
    /// - `Validation` if this tree kind does not accept the entity kind
    /// - `NotFound` if `parent` is not a node of this tree
    /// - `Constraint` if a node with the same (parent, entity) already exists
    pub fn insert(
        &mut self,
        parent: Option<NodeId<K>>,
        entity: EntityRef,
        name: impl Into<String>,
    ) -> Result<NodeId<K>> {
        if !K::accepts(&entity) {
            return Err(OpenlcsError::validation(format!(
                "{} nodes cannot reference a {}",
                K::NAME,
                entity.kind()
            ))
            .into());
        }

        if let Some(existing) = self.siblings.get(&(parent, entity)) {
            return Err(OpenlcsError::constraint(
                "unique_parent_entity",
                format!(
                    "{} node {} already references {} under the same parent",
                    K::NAME,
                    existing,
                    entity
                ),
            )
            .into());
        }

        let (tree_id, lft, level) = match parent {
            None => {
                let tree_id = self.next_tree;
                self.next_tree += 1;
                (tree_id, 1, 0)
            }
            Some(parent_id) => {
                let parent_node = self.node(parent_id)?;
                let placement = (parent_node.tree_id, parent_node.rgt, parent_node.level + 1);
                self.shift_right_of(placement.0, placement.1, 2);
                self.adjust_ancestors(Some(parent_id), 2);
                placement
            }
        };

        let id = NodeId::from_raw(self.next_node);
        self.next_node += 1;

        let node = TreeNode {
            id,
            name: name.into(),
            parent,
            entity,
            tree_id,
            lft,
            rgt: lft + 1,
            level,
        };

        self.positions.insert((tree_id, lft), id);
        self.siblings.insert((parent, entity), id);
        self.by_entity.entry(entity).or_default().push(id);
        self.nodes.insert(id, node);

        tracing::debug!(tree = K::NAME, node = %id, %entity, "inserted tree node");
        Ok(id)
    }

    /// Returns the existing (parent, entity) node or inserts a new one.
    ///
    /// The boolean is true when the node was created.
    pub fn get_or_insert(
        &mut self,
        parent: Option<NodeId<K>>,
        entity: EntityRef,
        name: impl Into<String>,
    ) -> Result<(NodeId<K>, bool)> {
        if let Some(existing) = self.find_child(parent, entity) {
            return Ok((existing, false));
        }
        self.insert(parent, entity, name).map(|id| (id, true))
    }

    /// Removes `id` and its whole subtree, returning the removed nodes in
    /// pre-order.
    pub fn delete(&mut self, id: NodeId<K>) -> Result<Vec<TreeNode<K>>> {
        let (tree_id, lft, rgt, parent) = {
            let node = self.node(id)?;
            (node.tree_id, node.lft, node.rgt, node.parent)
        };

        let doomed: Vec<NodeId<K>> = self
            .positions
            .range((tree_id, lft)..=(tree_id, rgt))
            .map(|(_, node_id)| *node_id)
            .collect();

        let mut removed = Vec::with_capacity(doomed.len());
        for node_id in doomed {
            if let Some(node) = self.nodes.remove(&node_id) {
                self.positions.remove(&(node.tree_id, node.lft));
                self.siblings.remove(&(node.parent, node.entity));
                if let Some(ids) = self.by_entity.get_mut(&node.entity) {
                    ids.retain(|candidate| *candidate != node_id);
                    if ids.is_empty() {
                        self.by_entity.remove(&node.entity);
                    }
                }
                removed.push(node);
            }
        }

        if parent.is_some() {
            let width = rgt - lft + 1;
            self.shift_left_of(tree_id, rgt, width);
            self.adjust_ancestors_down(parent, width);
        }

        tracing::debug!(tree = K::NAME, node = %id, removed = removed.len(), "deleted subtree");
        Ok(removed)
    }

    /// All nodes below `id`, in pre-order.
    pub fn descendants(&self, id: NodeId<K>) -> Result<Vec<&TreeNode<K>>> {
        let node = self.node(id)?;
        Ok(self
            .positions
            .range((node.tree_id, node.lft + 1)..(node.tree_id, node.rgt))
            .filter_map(|(_, node_id)| self.nodes.get(node_id))
            .collect())
    }

    /// The chain from the parent of `id` up to its root, nearest first.
    pub fn ancestors(&self, id: NodeId<K>) -> Result<Vec<&TreeNode<K>>> {
        let node = self.node(id)?;
        let mut chain = Vec::with_capacity(node.level as usize);
        let mut cursor = node.parent;
        while let Some(parent_id) = cursor {
            let parent = self.node(parent_id)?;
            chain.push(parent);
            cursor = parent.parent;
        }
        Ok(chain)
    }

    /// Direct children of `id`, in insertion order.
    pub fn children(&self, id: NodeId<K>) -> Result<Vec<&TreeNode<K>>> {
        let node = self.node(id)?;
        let mut children = Vec::new();
        let mut position = node.lft + 1;
        while position < node.rgt {
            match self
                .positions
                .get(&(node.tree_id, position))
                .and_then(|child_id| self.nodes.get(child_id))
            {
                Some(child) => {
                    position = child.rgt + 1;
                    children.push(child);
                }
                None => break,
            }
        }
        Ok(children)
    }

    /// Root nodes, one per `tree_id`, in creation order.
    pub fn roots(&self) -> Vec<&TreeNode<K>> {
        self.positions
            .iter()
            .filter(|((_, lft), _)| *lft == 1)
            .filter_map(|(_, node_id)| self.nodes.get(node_id))
            .collect()
    }

    /// Every node referencing `entity`, in tree order.
    pub fn nodes_for(&self, entity: EntityRef) -> Vec<&TreeNode<K>> {
        let mut nodes: Vec<&TreeNode<K>> = self
            .by_entity
            .get(&entity)
            .map(|ids| ids.iter().filter_map(|id| self.nodes.get(id)).collect())
            .unwrap_or_default();
        nodes.sort_by_key(|node| (node.tree_id, node.lft));
        nodes
    }

    pub fn find_child(&self, parent: Option<NodeId<K>>, entity: EntityRef) -> Option<NodeId<K>> {
        self.siblings.get(&(parent, entity)).copied()
    }

    pub fn is_descendant_of(&self, id: NodeId<K>, ancestor: NodeId<K>) -> bool {
        match (self.nodes.get(&id), self.nodes.get(&ancestor)) {
            (Some(node), Some(other)) => node.is_descendant_of(other),
            _ => false,
        }
    }

    /// Every node in pre-order, tree by tree.
    pub fn iter(&self) -> impl Iterator<Item = &TreeNode<K>> {
        self.positions
            .values()
            .filter_map(move |node_id| self.nodes.get(node_id))
    }

    /// Moves every node of `tree_id` whose `lft` is past `boundary` right by `width`.
    fn shift_right_of(&mut self, tree_id: u64, boundary: u64, width: u64) {
        let moved: Vec<NodeId<K>> = self
            .positions
            .range((tree_id, boundary)..=(tree_id, u64::MAX))
            .map(|(_, node_id)| *node_id)
            .collect();
        self.renumber(tree_id, &moved, |value| value + width);
    }

    fn shift_left_of(&mut self, tree_id: u64, boundary: u64, width: u64) {
        let moved: Vec<NodeId<K>> = self
            .positions
            .range((tree_id, boundary + 1)..=(tree_id, u64::MAX))
            .map(|(_, node_id)| *node_id)
            .collect();
        self.renumber(tree_id, &moved, |value| value - width);
    }

    // Two passes so that re-inserted keys never collide with stale ones.
    fn renumber(&mut self, tree_id: u64, moved: &[NodeId<K>], shift: impl Fn(u64) -> u64) {
        for node_id in moved {
            if let Some(node) = self.nodes.get(node_id) {
                self.positions.remove(&(tree_id, node.lft));
            }
        }
        for node_id in moved {
            if let Some(node) = self.nodes.get_mut(node_id) {
                node.lft = shift(node.lft);
                node.rgt = shift(node.rgt);
                self.positions.insert((tree_id, node.lft), *node_id);
            }
        }
    }

    fn adjust_ancestors(&mut self, start: Option<NodeId<K>>, width: u64) {
        let mut cursor = start;
        while let Some(node_id) = cursor {
            cursor = match self.nodes.get_mut(&node_id) {
                Some(node) => {
                    node.rgt += width;
                    node.parent
                }
                None => None,
            };
        }
    }

    fn adjust_ancestors_down(&mut self, start: Option<NodeId<K>>, width: u64) {
        let mut cursor = start;
        while let Some(node_id) = cursor {
            cursor = match self.nodes.get_mut(&node_id) {
                Some(node) => {
                    node.rgt -= width;
                    node.parent
                }
                None => None,
            };
        }
    }

    /// Panics when the nested-set invariants do not hold.
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        use std::collections::BTreeSet;

        let mut per_tree: BTreeMap<u64, Vec<&TreeNode<K>>> = BTreeMap::new();
        for node in self.nodes.values() {
            per_tree.entry(node.tree_id).or_default().push(node);
        }

        for (tree_id, nodes) in per_tree {
            let count = nodes.len() as u64;
            let mut boundaries = BTreeSet::new();
            let mut roots = 0;
            for node in &nodes {
                assert!(node.lft < node.rgt, "lft must be below rgt");
                assert!(boundaries.insert(node.lft), "duplicate boundary");
                assert!(boundaries.insert(node.rgt), "duplicate boundary");
                assert_eq!(
                    self.positions.get(&(tree_id, node.lft)),
                    Some(&node.id),
                    "position index out of sync"
                );
                match node.parent {
                    None => {
                        roots += 1;
                        assert_eq!(node.lft, 1);
                        assert_eq!(node.rgt, 2 * count);
                        assert_eq!(node.level, 0);
                    }
                    Some(parent_id) => {
                        let parent = &self.nodes[&parent_id];
                        assert!(node.is_descendant_of(parent));
                        assert_eq!(node.level, parent.level + 1);
                    }
                }
            }
            assert_eq!(roots, 1, "exactly one root per tree_id");
            assert_eq!(boundaries, (1..=2 * count).collect::<BTreeSet<u64>>());
        }
        assert_eq!(self.positions.len(), self.nodes.len());
        assert_eq!(self.siblings.len(), self.nodes.len());
    }
}
