mod grouping;
mod provides_resolver;

pub use grouping::{ComponentGroup, ComponentGrouping};
pub use provides_resolver::{release_root, ProvidesResolver, ProvidesScope};
