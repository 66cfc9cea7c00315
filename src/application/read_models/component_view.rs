//! Component view structs for read model
//!
//! These structs provide a flattened, query-optimized view of component data.

use crate::compliance::domain::{Component, ComponentId, ComponentType, SourceId};
use serde::Serialize;
use uuid::Uuid;

/// View representation of a component
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentView {
    pub id: ComponentId,
    pub uuid: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub component_type: ComponentType,
    pub version: Option<String>,
    pub release: Option<String>,
    pub arch: Option<String>,
    pub summary_license: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceId>,
}

impl From<&Component> for ComponentView {
    fn from(component: &Component) -> Self {
        Self {
            id: component.id,
            uuid: component.uuid,
            name: component.name.clone(),
            component_type: component.component_type.clone(),
            version: component.version.clone(),
            release: component.release.clone(),
            arch: component.arch.clone(),
            summary_license: component.summary_license.clone(),
            source: component.source,
        }
    }
}

/// A container image and the components it provides within one release
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContainerView {
    #[serde(flatten)]
    pub component: ComponentView,
    pub provides: Vec<ComponentView>,
}
