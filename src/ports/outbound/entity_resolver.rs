use crate::compliance::domain::{Entity, EntityRef};
use crate::shared::Result;

/// EntityResolver port turning a tree node's weak reference into the entity
pub trait EntityResolver {
    /// # Errors
    /// `OpenlcsError::NotFound` if the referenced entity does not exist
    fn resolve(&self, entity: EntityRef) -> Result<Entity>;
}
