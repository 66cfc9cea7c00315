use super::{Component, Product, Release};
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            pub fn new(id: u64) -> Self {
                Self(id)
            }

            pub fn get(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

entity_id!(
    /// Store-assigned identifier of a [`Product`]
    ProductId
);
entity_id!(
    /// Store-assigned identifier of a [`Release`]
    ReleaseId
);
entity_id!(
    /// Store-assigned identifier of a [`Component`]
    ComponentId
);
entity_id!(SourceId);
entity_id!(TaskId);

/// The kinds of entities a tree node may point at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Product,
    Release,
    Component,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Product => write!(f, "product"),
            EntityKind::Release => write!(f, "release"),
            EntityKind::Component => write!(f, "component"),
        }
    }
}

/// Weak, typed reference from a tree node to the entity it represents.
///
/// The tree never owns the entity; the reference is resolved through
/// [`crate::ports::outbound::EntityResolver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum EntityRef {
    Product(ProductId),
    Release(ReleaseId),
    Component(ComponentId),
}

impl EntityRef {
    pub fn kind(&self) -> EntityKind {
        match self {
            EntityRef::Product(_) => EntityKind::Product,
            EntityRef::Release(_) => EntityKind::Release,
            EntityRef::Component(_) => EntityKind::Component,
        }
    }

    pub fn as_component(&self) -> Option<ComponentId> {
        match self {
            EntityRef::Component(id) => Some(*id),
            _ => None,
        }
    }

    pub fn as_release(&self) -> Option<ReleaseId> {
        match self {
            EntityRef::Release(id) => Some(*id),
            _ => None,
        }
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityRef::Product(id) => write!(f, "product:{}", id),
            EntityRef::Release(id) => write!(f, "release:{}", id),
            EntityRef::Component(id) => write!(f, "component:{}", id),
        }
    }
}

impl From<ProductId> for EntityRef {
    fn from(id: ProductId) -> Self {
        EntityRef::Product(id)
    }
}

impl From<ReleaseId> for EntityRef {
    fn from(id: ReleaseId) -> Self {
        EntityRef::Release(id)
    }
}

impl From<ComponentId> for EntityRef {
    fn from(id: ComponentId) -> Self {
        EntityRef::Component(id)
    }
}

/// A resolved entity
#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    Product(Product),
    Release(Release),
    Component(Component),
}

impl Entity {
    /// Label used when describing a tree node that points at this entity
    pub fn node_label(&self) -> String {
        match self {
            Entity::Component(component) => format!("{} node", component.component_type),
            Entity::Release(_) | Entity::Product(_) => "Product node".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_ref_kind() {
        assert_eq!(EntityRef::from(ProductId::new(1)).kind(), EntityKind::Product);
        assert_eq!(EntityRef::from(ReleaseId::new(1)).kind(), EntityKind::Release);
        assert_eq!(
            EntityRef::from(ComponentId::new(1)).kind(),
            EntityKind::Component
        );
    }

    #[test]
    fn test_entity_ref_accessors() {
        let component = EntityRef::Component(ComponentId::new(7));
        assert_eq!(component.as_component(), Some(ComponentId::new(7)));
        assert_eq!(component.as_release(), None);
    }

    #[test]
    fn test_entity_ref_display() {
        assert_eq!(
            EntityRef::Release(ReleaseId::new(3)).to_string(),
            "release:3"
        );
    }

    #[test]
    fn test_entity_ref_serialization() {
        let json = serde_json::to_value(EntityRef::Component(ComponentId::new(5))).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "component", "id": 5}));
    }
}
