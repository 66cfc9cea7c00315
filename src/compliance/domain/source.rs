use super::SourceId;
use serde::Serialize;
use std::fmt;

/// Processing state of a source archive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SourceState {
    #[default]
    Created,
    Scanning,
    Scanned,
    Failed,
}

impl fmt::Display for SourceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SourceState::Created => "created",
            SourceState::Scanning => "scanning",
            SourceState::Scanned => "scanned",
            SourceState::Failed => "failed",
        };
        write!(f, "{}", label)
    }
}

/// A content-addressed source archive.
///
/// `checksum` is the sha256 of the packed archive and is unique across sources.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Source {
    pub id: SourceId,
    pub checksum: String,
    pub name: String,
    pub url: Option<String>,
    pub state: SourceState,
    pub archive_type: Option<String>,
    pub scan_flag: Option<String>,
}

/// Fields of a source before the store assigns an id
#[derive(Debug, Clone, PartialEq)]
pub struct NewSource {
    pub checksum: String,
    pub name: String,
    pub url: Option<String>,
    pub archive_type: Option<String>,
}

impl NewSource {
    pub fn into_source(self, id: SourceId) -> Source {
        Source {
            id,
            checksum: self.checksum,
            name: self.name,
            url: self.url,
            state: SourceState::Created,
            archive_type: self.archive_type,
            scan_flag: None,
        }
    }
}

/// Scan findings recorded for one file of a source
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FileDetections {
    pub path: String,
    pub license_keys: Vec<String>,
    pub copyright_statements: Vec<String>,
}
