use crate::shared::error::OpenlcsError;
use crate::shared::Result;
use std::fs;
use std::path::Path;

/// Maximum size of a component data document (64 MB)
/// Registry exports for large product streams stay well below this.
pub const MAX_DATA_FILE_SIZE: u64 = 64 * 1024 * 1024;

/// Validates that a path exists and is a regular file (not a directory or symlink)
///
/// # Security
/// Uses `symlink_metadata()` so that the link itself is inspected, not its target.
///
/// # Arguments
/// * `path` - The path to validate
/// * `file_description` - Description of the file (e.g., "archive", "component data")
///
/// # Errors
/// Returns an error if:
/// - The path doesn't exist
/// - The path is a symbolic link
/// - The path is not a regular file
pub fn validate_regular_file(path: &Path, file_description: &str) -> Result<()> {
    let metadata = fs::symlink_metadata(path).map_err(|e| OpenlcsError::FileReadError {
        path: path.to_path_buf(),
        details: format!("Failed to read {} metadata: {}", file_description, e),
    })?;

    if metadata.is_symlink() {
        return Err(OpenlcsError::SecurityError {
            path: path.to_path_buf(),
            reason: format!("{} is a symbolic link", file_description),
            hint: "Pass the resolved path of the file instead of a link".to_string(),
        }
        .into());
    }

    if !metadata.is_file() {
        anyhow::bail!("{} is not a regular file", path.display());
    }

    Ok(())
}

/// Validates file size is within acceptable limits
///
/// # Errors
/// Returns an error if the file size exceeds the maximum
pub fn validate_file_size(file_size: u64, path: &Path, max_size: u64) -> Result<()> {
    if file_size > max_size {
        return Err(OpenlcsError::SecurityError {
            path: path.to_path_buf(),
            reason: format!(
                "file is too large ({} bytes). Maximum allowed size is {} bytes",
                file_size, max_size
            ),
            hint: "Split the document into several smaller files".to_string(),
        }
        .into());
    }
    Ok(())
}

/// Returns true when `candidate` would end up inside `dir`.
///
/// Both paths are compared lexically after making them absolute against the
/// current directory; `candidate` does not need to exist yet.
pub fn is_within(candidate: &Path, dir: &Path) -> bool {
    let absolute = |p: &Path| {
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            std::env::current_dir()
                .map(|cwd| cwd.join(p))
                .unwrap_or_else(|_| p.to_path_buf())
        }
    };
    let dir = dir.canonicalize().unwrap_or_else(|_| absolute(dir));
    let candidate = match (candidate.parent(), candidate.file_name()) {
        (Some(parent), Some(name)) if !parent.as_os_str().is_empty() => parent
            .canonicalize()
            .map(|p| p.join(name))
            .unwrap_or_else(|_| absolute(candidate)),
        _ => absolute(candidate),
    };
    candidate.starts_with(dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_validate_regular_file_success() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("data.json");
        fs::write(&file_path, "{}").unwrap();

        assert!(validate_regular_file(&file_path, "component data").is_ok());
    }

    #[test]
    fn test_validate_regular_file_is_directory() {
        let temp_dir = TempDir::new().unwrap();
        let result = validate_regular_file(temp_dir.path(), "component data");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("not a regular file"));
    }

    #[test]
    fn test_validate_regular_file_nonexistent() {
        let result = validate_regular_file(Path::new("/nonexistent/data.json"), "component data");
        assert!(result.is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_validate_regular_file_rejects_symlink() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("target.json");
        fs::write(&target, "{}").unwrap();
        let link = temp_dir.path().join("link.json");
        std::os::unix::fs::symlink(&target, &link).unwrap();

        let result = validate_regular_file(&link, "component data");
        let err = result.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<OpenlcsError>(),
            Some(OpenlcsError::SecurityError { .. })
        ));
    }

    #[test]
    fn test_validate_file_size_exceeds_limit() {
        let path = PathBuf::from("/test/data.json");
        assert!(validate_file_size(1000, &path, MAX_DATA_FILE_SIZE).is_ok());
        let result = validate_file_size(MAX_DATA_FILE_SIZE + 1, &path, MAX_DATA_FILE_SIZE);
        assert!(result.unwrap_err().to_string().contains("too large"));
    }

    #[test]
    fn test_is_within() {
        let temp_dir = TempDir::new().unwrap();
        let src = temp_dir.path().join("src");
        fs::create_dir(&src).unwrap();

        assert!(is_within(&src.join("out.tar.gz"), &src));
        assert!(is_within(&src.join("nested/out.tar.gz"), &src));
        assert!(!is_within(&temp_dir.path().join("out.tar.gz"), &src));
    }
}
