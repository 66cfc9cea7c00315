//! Read models for CQRS-lite pattern
//!
//! This module contains view-optimized structs that provide
//! a denormalized representation of domain data for queries.

pub mod component_view;
pub mod release_report;
pub mod source_view;

pub use component_view::{ComponentView, ContainerView};
pub use release_report::{ReleasePackageView, ReleaseReport, ScanResult};
pub use source_view::SourceView;
