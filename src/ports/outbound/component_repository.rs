use crate::compliance::domain::{Component, ComponentDraft, ComponentId, SourceId};
use crate::shared::Result;

/// ComponentRepository port for component records
pub trait ComponentRepository: Send + Sync {
    /// Inserts a component or updates the one with the same natural key.
    ///
    /// An update keeps the stored id and source link and replaces the
    /// remaining attributes.
    fn upsert_component(&self, draft: ComponentDraft) -> Result<Component>;

    fn get_component(&self, id: ComponentId) -> Option<Component>;

    /// The oldest component matching `draft` on everything but the uuid
    fn find_by_coordinates(&self, draft: &ComponentDraft) -> Option<Component>;

    /// Links a component to the source archive it was built from
    fn set_component_source(&self, id: ComponentId, source: SourceId) -> Result<()>;

    /// Components built from `source`, in id order
    fn components_of_source(&self, source: SourceId) -> Vec<ComponentId>;
}
