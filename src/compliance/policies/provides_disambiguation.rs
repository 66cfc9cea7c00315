use crate::compliance::domain::{TreeKind, TreeNode};
use crate::shared::error::OpenlcsError;
use crate::shared::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// ProvidesDisambiguation - picks one node when a component appears several
/// times inside a release subtree
///
/// A component can be shipped both inside a container and next to it, so a
/// release may hold more than one node referencing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProvidesDisambiguation {
    /// Lowest level wins; ties go to the node that comes first in pre-order
    #[default]
    Shallowest,
    /// More than one candidate is an error
    Strict,
}

impl ProvidesDisambiguation {
    /// Chooses among `candidates`, which must all belong to the same tree.
    ///
    /// Returns `Ok(None)` for an empty candidate list.
    pub fn select<'a, K: TreeKind>(
        self,
        candidates: &[&'a TreeNode<K>],
    ) -> Result<Option<&'a TreeNode<K>>> {
        match self {
            ProvidesDisambiguation::Shallowest => Ok(candidates
                .iter()
                .copied()
                .min_by_key(|node| (node.level(), node.tree_id(), node.lft()))),
            ProvidesDisambiguation::Strict => match candidates {
                [] => Ok(None),
                [only] => Ok(Some(*only)),
                [first, ..] => Err(OpenlcsError::constraint(
                    "ambiguous_provides",
                    format!(
                        "{} nodes reference {} in the same release",
                        candidates.len(),
                        first.entity()
                    ),
                )
                .into()),
            },
        }
    }
}

impl fmt::Display for ProvidesDisambiguation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProvidesDisambiguation::Shallowest => write!(f, "shallowest"),
            ProvidesDisambiguation::Strict => write!(f, "strict"),
        }
    }
}

impl FromStr for ProvidesDisambiguation {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "shallowest" => Ok(ProvidesDisambiguation::Shallowest),
            "strict" => Ok(ProvidesDisambiguation::Strict),
            _ => Err(format!(
                "Invalid provides disambiguation: {}. Valid values are: shallowest, strict",
                s
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compliance::domain::{ComponentId, EntityRef, ProductTree, ReleaseId};

    fn tree_with_duplicate() -> ProductTree {
        let mut tree = ProductTree::new();
        let release = tree
            .insert(None, EntityRef::Release(ReleaseId::new(1)), "release")
            .unwrap();
        let container = tree
            .insert(Some(release), EntityRef::Component(ComponentId::new(1)), "container")
            .unwrap();
        tree.insert(Some(container), EntityRef::Component(ComponentId::new(2)), "bash")
            .unwrap();
        tree.insert(Some(release), EntityRef::Component(ComponentId::new(2)), "bash")
            .unwrap();
        tree
    }

    #[test]
    fn test_shallowest_picks_lowest_level() {
        let tree = tree_with_duplicate();
        let candidates = tree.nodes_for(EntityRef::Component(ComponentId::new(2)));
        assert_eq!(candidates.len(), 2);
        let chosen = ProvidesDisambiguation::Shallowest
            .select(&candidates)
            .unwrap()
            .unwrap();
        assert_eq!(chosen.level(), 1);
    }

    #[test]
    fn test_strict_rejects_ambiguity() {
        let tree = tree_with_duplicate();
        let candidates = tree.nodes_for(EntityRef::Component(ComponentId::new(2)));
        let err = ProvidesDisambiguation::Strict.select(&candidates).unwrap_err();
        assert!(err.to_string().contains("ambiguous_provides"));
    }

    #[test]
    fn test_empty_candidates() {
        let candidates: Vec<&TreeNode<crate::compliance::domain::ProductHierarchy>> = Vec::new();
        assert!(ProvidesDisambiguation::Strict.select(&candidates).unwrap().is_none());
        assert!(ProvidesDisambiguation::Shallowest.select(&candidates).unwrap().is_none());
    }

    #[test]
    fn test_from_str() {
        assert_eq!(
            "Strict".parse::<ProvidesDisambiguation>().unwrap(),
            ProvidesDisambiguation::Strict
        );
        assert!("first".parse::<ProvidesDisambiguation>().is_err());
    }
}
