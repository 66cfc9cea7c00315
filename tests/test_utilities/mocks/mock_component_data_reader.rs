use openlcs::application::dto::ComponentDocument;
use openlcs::prelude::*;
use std::path::Path;

/// Mock ComponentDataReader serving in-memory documents for any path
pub struct MockComponentDataReader {
    documents: Vec<ComponentDocument>,
}

impl MockComponentDataReader {
    pub fn new(documents: Vec<ComponentDocument>) -> Self {
        Self { documents }
    }
}

impl ComponentDataReader for MockComponentDataReader {
    fn read_documents(&self, _path: &Path) -> Result<Vec<ComponentDocument>> {
        Ok(self.documents.clone())
    }
}
