pub mod component;
pub mod component_link;
pub mod entity_ref;
pub mod product;
pub mod source;
pub mod task;
pub mod tree;

pub use component::{
    Component, ComponentDraft, ComponentField, ComponentKey, ComponentRecord, ComponentType,
};
pub use component_link::{parse_component_link, unquote_link};
pub use entity_ref::{
    ComponentId, Entity, EntityKind, EntityRef, ProductId, ReleaseId, SourceId, TaskId,
};
pub use product::{NewProduct, Package, Product, Release, ReleasePackage};
pub use source::{FileDetections, NewSource, Source, SourceState};
pub use task::{CorrelationId, NewTask, Task, TaskHandle, TaskParams};
pub use tree::{
    ComponentHierarchy, ComponentNodeId, ComponentTree, NodeId, ProductHierarchy, ProductNodeId,
    ProductTree, Tree, TreeKind, TreeNode,
};
