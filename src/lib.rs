//! openlcs - license and copyright compliance tracking core
//!
//! This library records packages, their components and sources, organizes
//! them into a product tree and a component tree, and hands scan-import work
//! to an external worker substrate, following hexagonal architecture and
//! Domain-Driven Design principles.
//!
//! # Architecture
//!
//! The library is organized into the following layers:
//!
//! - **Domain Layer** (`compliance`): trees, components, grouping and policies
//! - **Application Layer** (`application`): Use cases, DTOs and read models
//! - **Ports** (`ports`): Interface definitions for infrastructure
//! - **Adapters** (`adapters`): Concrete implementations of ports
//! - **Shared** (`shared`): Common utilities and error types
//!
//! # Example
//!
//! ```no_run
//! use openlcs::prelude::*;
//!
//! # async fn run() -> Result<()> {
//! let store = MemoryStore::new();
//! let dispatcher = FlowerTaskDispatcher::new("http://localhost:5555")?;
//!
//! let use_case = SubmitImportUseCase::new(
//!     dispatcher,
//!     store.clone(),
//!     store.clone(),
//!     StderrProgressReporter::new(),
//!     ImportSettings::default(),
//! );
//!
//! let batch = NvrImportRequest::new(vec!["bash-5.1-2.el8".to_string()]).into_batch()?;
//! let submission = use_case.execute(batch, None).await?;
//! println!("{}", serde_json::to_string_pretty(&submission)?);
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod application;
pub mod compliance;
pub mod ports;
pub mod shared;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::adapters::outbound::console::StderrProgressReporter;
    pub use crate::adapters::outbound::filesystem::{
        checksum, detect_mime_type, extract, pack, reset_dir, FileSystemWriter,
        JsonComponentDataReader, StdoutPresenter,
    };
    pub use crate::adapters::outbound::formatters::{JsonReportFormatter, MarkdownReportFormatter};
    pub use crate::adapters::outbound::network::FlowerTaskDispatcher;
    pub use crate::adapters::outbound::persistence::MemoryStore;
    pub use crate::application::dto::{BatchSubmission, ImportBatch, NvrImportRequest, OutputFormat};
    pub use crate::application::read_models::{ReleaseReport, SourceView};
    pub use crate::application::use_cases::{
        BuildReleaseReportUseCase, ImportSettings, LoadComponentsUseCase, SubmitImportUseCase,
    };
    pub use crate::compliance::domain::{
        Component, ComponentField, ComponentTree, ComponentType, EntityRef, ProductTree,
        TaskHandle,
    };
    pub use crate::compliance::policies::{FailurePolicy, ProvidesDisambiguation};
    pub use crate::compliance::services::{ComponentGrouping, ProvidesResolver, ProvidesScope};
    pub use crate::ports::outbound::{
        ComponentDataReader, OutputPresenter, ProgressReporter, ReportFormatter, TaskDispatcher,
    };
    pub use crate::shared::{OpenlcsError, Result};
}
