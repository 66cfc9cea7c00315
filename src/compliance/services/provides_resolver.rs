use crate::compliance::domain::{
    ComponentId, ComponentTree, EntityRef, ProductHierarchy, ProductTree, ReleaseId, TreeKind,
    TreeNode,
};
use crate::compliance::policies::ProvidesDisambiguation;
use crate::shared::error::OpenlcsError;
use crate::shared::Result;
use std::collections::HashSet;

/// Which tree answers "what does this component provide"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvidesScope {
    /// The component's own node in the component tree
    Canonical,
    /// The component's node inside one release of the product tree
    Release(ReleaseId),
}

/// ProvidesResolver - lists the components a component provides
pub struct ProvidesResolver {
    disambiguation: ProvidesDisambiguation,
}

impl ProvidesResolver {
    pub fn new(disambiguation: ProvidesDisambiguation) -> Self {
        Self { disambiguation }
    }

    /// Component ids below `component`'s node in pre-order, without duplicates.
    ///
    /// # Errors
    /// - `NotFound` if no node references `component` in the chosen scope, or
    ///   the release has no root node
    /// - `Constraint` if the component tree holds more than one node for the
    ///   component, or the release has several root nodes, or the
    ///   disambiguation policy rejects the candidates
    pub fn resolve(
        &self,
        component: ComponentId,
        scope: ProvidesScope,
        product_tree: &ProductTree,
        component_tree: &ComponentTree,
    ) -> Result<Vec<ComponentId>> {
        match scope {
            ProvidesScope::Canonical => self.canonical(component, component_tree),
            ProvidesScope::Release(release) => self.in_release(component, release, product_tree),
        }
    }

    /// Provides of `component` according to its component-tree node
    pub fn canonical(
        &self,
        component: ComponentId,
        component_tree: &ComponentTree,
    ) -> Result<Vec<ComponentId>> {
        let node = match component_tree
            .nodes_for(EntityRef::Component(component))
            .as_slice()
        {
            [] => return Err(OpenlcsError::not_found("Container node", component).into()),
            [node] => *node,
            nodes => {
                return Err(OpenlcsError::constraint(
                    "single_container_node",
                    format!(
                        "component {} has {} nodes in the component tree",
                        component,
                        nodes.len()
                    ),
                )
                .into())
            }
        };
        Ok(collect_components(component_tree.descendants(node.id())?))
    }

    /// Provides of `component` as shipped in `release`
    pub fn in_release(
        &self,
        component: ComponentId,
        release: ReleaseId,
        product_tree: &ProductTree,
    ) -> Result<Vec<ComponentId>> {
        let entity = EntityRef::Component(component);
        let root = release_root(product_tree, release)?;
        let candidates: Vec<_> = product_tree
            .nodes_for(entity)
            .into_iter()
            .filter(|node| node.is_descendant_of(root))
            .collect();
        let node = self
            .disambiguation
            .select(&candidates)?
            .ok_or_else(|| OpenlcsError::not_found("Release node", entity))?;
        if candidates.len() > 1 {
            tracing::debug!(
                %component,
                %release,
                candidates = candidates.len(),
                chosen = %node.id(),
                "disambiguated release provides"
            );
        }
        Ok(collect_components(product_tree.descendants(node.id())?))
    }
}

/// The single root node of `release` in the product tree
pub fn release_root(
    product_tree: &ProductTree,
    release: ReleaseId,
) -> Result<&TreeNode<ProductHierarchy>> {
    let roots: Vec<_> = product_tree
        .nodes_for(EntityRef::Release(release))
        .into_iter()
        .filter(|node| node.is_root())
        .collect();
    match roots.as_slice() {
        [] => Err(OpenlcsError::not_found("Release root node", release).into()),
        [root] => Ok(*root),
        _ => Err(OpenlcsError::constraint(
            "single_release_root",
            format!("release {} has {} root nodes", release, roots.len()),
        )
        .into()),
    }
}

fn collect_components<K: TreeKind>(nodes: Vec<&TreeNode<K>>) -> Vec<ComponentId> {
    let mut seen = HashSet::new();
    nodes
        .into_iter()
        .filter_map(|node| node.entity().as_component())
        .filter(|id| seen.insert(*id))
        .collect()
}
