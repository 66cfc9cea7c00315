//! Source archive utilities.
//!
//! Sources are stored as gzip-compressed POSIX tarballs whose bytes depend
//! only on the packed tree, so that the sha256 of an archive can serve as the
//! source's content address.

use crate::shared::error::OpenlcsError;
use crate::shared::security::is_within;
use crate::shared::Result;
use bzip2::read::BzDecoder;
use flate2::read::GzDecoder;
use flate2::{Compression, GzBuilder};
use sha2::{Digest, Sha256};
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tar::HeaderMode;
use walkdir::WalkDir;
use xz2::read::XzDecoder;

const GZIP_MIME: &str = "application/gzip";
const BZIP2_MIME: &str = "application/x-bzip2";
const XZ_MIME: &str = "application/x-xz";

/// Unpacks a tarball into `dest_dir`.
///
/// The compression (none, gzip, bzip2 or xz) is detected from the file's
/// leading bytes, not its extension.
///
/// `dest_dir` defaults to the archive's parent directory and is created when
/// missing. The archive file is deleted once everything has been unpacked;
/// on failure partial output is left in place.
///
/// Returns the directory the archive was unpacked into.
///
/// # Errors
/// `OpenlcsError::Archive` if the archive cannot be opened, decoded or
/// unpacked.
pub fn extract(archive_path: &Path, dest_dir: Option<&Path>) -> Result<PathBuf> {
    let dest = match dest_dir {
        Some(dir) => dir.to_path_buf(),
        None => match archive_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        },
    };

    unpack_into(archive_path, &dest).map_err(|e| OpenlcsError::archive(archive_path, e))?;
    fs::remove_file(archive_path).map_err(|e| OpenlcsError::archive(archive_path, e))?;

    tracing::debug!(archive = %archive_path.display(), dest = %dest.display(), "extracted archive");
    Ok(dest)
}

fn unpack_into(archive_path: &Path, dest: &Path) -> io::Result<()> {
    fs::create_dir_all(dest)?;
    let mime = infer::get_from_path(archive_path)?.map(|kind| kind.mime_type());

    let reader = BufReader::new(File::open(archive_path)?);
    let decoded: Box<dyn Read> = match mime {
        Some(GZIP_MIME) => Box::new(GzDecoder::new(reader)),
        Some(BZIP2_MIME) => Box::new(BzDecoder::new(reader)),
        Some(XZ_MIME) => Box::new(XzDecoder::new(reader)),
        _ => Box::new(reader),
    };
    tar::Archive::new(decoded).unpack(dest)
}

/// Packs the whole of `src_dir` into a gzip-compressed tarball at
/// `dest_archive`, then deletes `src_dir`.
///
/// Entries are relative to `src_dir` and written in sorted order with
/// deterministic headers, and the gzip header carries neither a file name nor
/// a timestamp. Packing two identical trees therefore yields byte-identical
/// archives. The archive is written to a temporary file next to
/// `dest_archive` and moved into place once complete.
///
/// # Errors
/// - `Validation` if `dest_archive` lies inside `src_dir`
/// - `OpenlcsError::Archive` if reading the tree or writing the archive fails
pub fn pack(dest_archive: &Path, src_dir: &Path) -> Result<()> {
    if is_within(dest_archive, src_dir) {
        return Err(OpenlcsError::validation(format!(
            "archive {} must not be written inside the directory being packed ({})",
            dest_archive.display(),
            src_dir.display()
        ))
        .into());
    }

    write_archive(dest_archive, src_dir).map_err(|e| OpenlcsError::archive(dest_archive, e))?;
    fs::remove_dir_all(src_dir).map_err(|e| OpenlcsError::archive(src_dir, e))?;

    tracing::debug!(archive = %dest_archive.display(), src = %src_dir.display(), "packed archive");
    Ok(())
}

fn write_archive(dest_archive: &Path, src_dir: &Path) -> io::Result<()> {
    if !src_dir.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("{} is not a directory", src_dir.display()),
        ));
    }

    let parent = match dest_archive.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let temp = tempfile::Builder::new()
        .prefix(".openlcs-pack")
        .tempfile_in(parent)?;

    let encoder = GzBuilder::new()
        .mtime(0)
        .write(BufWriter::new(temp.as_file()), Compression::default());
    let mut builder = tar::Builder::new(encoder);
    builder.mode(HeaderMode::Deterministic);
    builder.follow_symlinks(false);

    for entry in WalkDir::new(src_dir).min_depth(1).sort_by_file_name() {
        let entry = entry?;
        let relative = entry
            .path()
            .strip_prefix(src_dir)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
        if entry.file_type().is_dir() {
            builder.append_dir(relative, entry.path())?;
        } else {
            builder.append_path_with_name(entry.path(), relative)?;
        }
    }

    let mut writer = builder.into_inner()?.finish()?;
    writer.flush()?;
    drop(writer);

    temp.persist(dest_archive).map_err(|e| e.error)?;
    Ok(())
}

/// Hex-encoded sha256 digest of the file at `path`
///
/// # Errors
/// `OpenlcsError::Archive` if the file cannot be read.
pub fn checksum(path: &Path) -> Result<String> {
    let digest = || -> io::Result<String> {
        let mut reader = BufReader::new(File::open(path)?);
        let mut hasher = Sha256::new();
        let mut buffer = [0u8; 64 * 1024];
        loop {
            let read = reader.read(&mut buffer)?;
            if read == 0 {
                break;
            }
            hasher.update(&buffer[..read]);
        }
        Ok(hex::encode(hasher.finalize()))
    };
    digest().map_err(|e| OpenlcsError::archive(path, e).into())
}

/// Recreates `path` as an empty directory.
///
/// Removal of an existing tree is best effort.
///
/// # Errors
/// `OpenlcsError::Dir` if the directory cannot be created.
pub fn reset_dir(path: &Path) -> Result<()> {
    if path.exists() {
        if let Err(e) = fs::remove_dir_all(path) {
            tracing::debug!(path = %path.display(), error = %e, "ignoring failed removal");
        }
    }
    fs::create_dir_all(path).map_err(|source| OpenlcsError::Dir {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}
