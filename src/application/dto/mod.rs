/// Data Transfer Objects for application layer
///
/// DTOs are used to transfer data between the application layer
/// and adapters, keeping the domain layer isolated.
mod component_document;
mod import_request;
mod import_response;
mod output_format;

pub use component_document::{ComponentData, ComponentDocument, ProductData};
pub use import_request::{
    product_release_of, ImportBatch, ImportItem, NvrImportRequest, PRODUCT_RELEASE_PARAM,
};
pub use import_response::BatchSubmission;
pub use output_format::OutputFormat;
