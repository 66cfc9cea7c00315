use crate::application::dto::ComponentDocument;
use crate::ports::outbound::ComponentDataReader;
use crate::shared::error::OpenlcsError;
use crate::shared::security::{validate_file_size, validate_regular_file, MAX_DATA_FILE_SIZE};
use crate::shared::Result;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// A data file holds one document or a list of them
#[derive(Deserialize)]
#[serde(untagged)]
enum DocumentFile {
    Many(Vec<ComponentDocument>),
    One(ComponentDocument),
}

/// JsonComponentDataReader adapter for component registry exports on disk
///
/// `path` may name a single JSON file or a directory; a directory is read as
/// every `*.json` file directly inside it, in file name order.
pub struct JsonComponentDataReader;

impl JsonComponentDataReader {
    pub fn new() -> Self {
        Self
    }

    /// Safely read a file with security checks:
    /// - Reject symbolic links
    /// - Check file size limits
    /// - Validate file is a regular file
    fn safe_read_file(&self, path: &Path) -> Result<String> {
        validate_regular_file(path, "component data file")?;
        let metadata = fs::metadata(path).map_err(|e| read_error(path, e))?;
        validate_file_size(metadata.len(), path, MAX_DATA_FILE_SIZE)?;
        fs::read_to_string(path).map_err(|e| read_error(path, e).into())
    }

    fn read_file(&self, path: &Path) -> Result<Vec<ComponentDocument>> {
        let content = self.safe_read_file(path)?;
        let parsed: DocumentFile =
            serde_json::from_str(&content).map_err(|e| read_error(path, e))?;
        Ok(match parsed {
            DocumentFile::Many(documents) => documents,
            DocumentFile::One(document) => vec![document],
        })
    }

    fn data_files(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in fs::read_dir(dir).map_err(|e| read_error(dir, e))? {
            let path = entry.map_err(|e| read_error(dir, e))?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }
}

impl Default for JsonComponentDataReader {
    fn default() -> Self {
        Self::new()
    }
}

impl ComponentDataReader for JsonComponentDataReader {
    fn read_documents(&self, path: &Path) -> Result<Vec<ComponentDocument>> {
        if !path.is_dir() {
            return self.read_file(path);
        }
        let mut documents = Vec::new();
        for file in self.data_files(path)? {
            documents.extend(self.read_file(&file)?);
        }
        tracing::debug!(dir = %path.display(), documents = documents.len(), "read component data");
        Ok(documents)
    }
}

fn read_error(path: &Path, details: impl ToString) -> OpenlcsError {
    OpenlcsError::FileReadError {
        path: path.to_path_buf(),
        details: details.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const PRODUCT_VERSION: &str = r#"{
        "ofuri": "o:redhat:rhel:8.6.0",
        "name": "rhel-8.6.0",
        "description": "Red Hat Enterprise Linux 8.6",
        "products": [{"name": "rhel"}],
        "components": [
            {"type": "RPM", "name": "bash", "version": "5.1", "release": "2.el8", "arch": "x86_64"}
        ]
    }"#;

    #[test]
    fn test_read_single_document() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("rhel.json");
        fs::write(&path, PRODUCT_VERSION).unwrap();

        let documents = JsonComponentDataReader::new().read_documents(&path).unwrap();
        assert_eq!(documents.len(), 1);
        assert!(documents[0].is_product_version());
        assert_eq!(documents[0].components[0].name.as_deref(), Some("bash"));
    }

    #[test]
    fn test_read_document_list() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("list.json");
        fs::write(&path, format!("[{}, {{\"components\": []}}]", PRODUCT_VERSION)).unwrap();

        let documents = JsonComponentDataReader::new().read_documents(&path).unwrap();
        assert_eq!(documents.len(), 2);
        assert!(!documents[1].is_product_version());
    }

    #[test]
    fn test_read_directory_in_name_order() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("b.json"), r#"{"components": []}"#).unwrap();
        fs::write(temp_dir.path().join("a.json"), PRODUCT_VERSION).unwrap();
        fs::write(temp_dir.path().join("notes.txt"), "ignored").unwrap();

        let documents = JsonComponentDataReader::new()
            .read_documents(temp_dir.path())
            .unwrap();
        assert_eq!(documents.len(), 2);
        assert!(documents[0].is_product_version());
    }

    #[test]
    fn test_read_invalid_json() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();

        let err = JsonComponentDataReader::new().read_documents(&path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<OpenlcsError>(),
            Some(OpenlcsError::FileReadError { .. })
        ));
    }

    #[test]
    fn test_read_missing_file() {
        let result =
            JsonComponentDataReader::new().read_documents(Path::new("/nonexistent/data.json"));
        assert!(result.is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_read_rejects_symlink() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("target.json");
        fs::write(&target, PRODUCT_VERSION).unwrap();
        let link = temp_dir.path().join("link.json");
        std::os::unix::fs::symlink(&target, &link).unwrap();

        let err = JsonComponentDataReader::new().read_documents(&link).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<OpenlcsError>(),
            Some(OpenlcsError::SecurityError { .. })
        ));
    }
}
