/// Filesystem adapters: source archives, component data files and output
pub mod archive;
mod file_reader;
mod file_writer;
pub mod mime;

pub use archive::{checksum, extract, pack, reset_dir};
pub use file_reader::JsonComponentDataReader;
pub use file_writer::{FileSystemWriter, StdoutPresenter};
pub use mime::detect_mime_type;
