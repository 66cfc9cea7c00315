use std::path::Path;

/// Extension table consulted before any content sniffing.
///
/// Compressed tarballs report the type of the tarball, not of its outer
/// compression layer. Longer suffixes come first.
const EXTENSION_TABLE: &[(&str, &str)] = &[
    (".tar.gz", "application/x-tar"),
    (".tar.bz2", "application/x-tar"),
    (".tar.xz", "application/x-tar"),
    (".tgz", "application/x-tar"),
    (".tbz2", "application/x-tar"),
    (".txz", "application/x-tar"),
    (".tar", "application/x-tar"),
    (".zip", "application/zip"),
    (".jar", "application/java-archive"),
    (".json", "application/json"),
    (".xml", "text/xml"),
    (".html", "text/html"),
    (".htm", "text/html"),
    (".css", "text/css"),
    (".js", "text/javascript"),
    (".txt", "text/plain"),
    (".c", "text/plain"),
    (".h", "text/plain"),
    (".md", "text/markdown"),
    (".py", "text/x-python"),
    (".sh", "application/x-sh"),
    (".pdf", "application/pdf"),
    (".png", "image/png"),
    (".jpg", "image/jpeg"),
    (".jpeg", "image/jpeg"),
    (".gif", "image/gif"),
    (".svg", "image/svg+xml"),
];

/// Guesses the MIME type of `path`.
///
/// The file name is looked up in the extension table first; when that finds
/// nothing the file's leading bytes are sniffed. Unreadable or unrecognized
/// files yield `None`.
pub fn detect_mime_type(path: &Path) -> Option<String> {
    if let Some(mime) = from_extension(path) {
        return Some(mime.to_string());
    }
    match infer::get_from_path(path) {
        Ok(kind) => kind.map(|kind| kind.mime_type().to_string()),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "mime sniffing failed");
            None
        }
    }
}

fn from_extension(path: &Path) -> Option<&'static str> {
    let file_name = path.file_name()?.to_str()?.to_ascii_lowercase();
    EXTENSION_TABLE
        .iter()
        .find(|(suffix, _)| file_name.ends_with(suffix) && file_name.len() > suffix.len())
        .map(|(_, mime)| *mime)
}
