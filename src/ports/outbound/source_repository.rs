use crate::compliance::domain::{FileDetections, NewSource, Source, SourceId, SourceState};
use crate::shared::Result;

/// SourceRepository port for source archives and their scan findings
pub trait SourceRepository: Send + Sync {
    /// Creates a source
    ///
    /// # Errors
    /// `OpenlcsError::Constraint` if a source with the same checksum exists
    fn create_source(&self, source: NewSource) -> Result<Source>;

    fn get_source(&self, id: SourceId) -> Option<Source>;

    fn find_source(&self, checksum: &str) -> Option<Source>;

    fn set_source_state(&self, id: SourceId, state: SourceState) -> Result<()>;

    /// Records the findings for one file of `source`, replacing earlier ones
    fn record_detections(&self, id: SourceId, detections: FileDetections) -> Result<()>;

    /// Distinct license keys detected anywhere in `source`, sorted
    fn license_keys(&self, id: SourceId) -> Vec<String>;

    /// Distinct copyright statements detected anywhere in `source`, sorted
    fn copyright_statements(&self, id: SourceId) -> Vec<String>;
}
