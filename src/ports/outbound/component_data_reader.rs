use crate::application::dto::ComponentDocument;
use crate::shared::Result;
use std::path::Path;

/// ComponentDataReader port for component registry exports
///
/// Abstracts where component data documents come from, so the loader can be
/// fed from files, fixtures or a registry client.
pub trait ComponentDataReader {
    /// Reads every component data document stored at `path`
    ///
    /// # Errors
    /// Returns an error if the source cannot be read or is not a valid
    /// component data document
    fn read_documents(&self, path: &Path) -> Result<Vec<ComponentDocument>>;
}
