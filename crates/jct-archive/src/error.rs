use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("io error mounting or reading archive: {0}")]
    Io(#[from] std::io::Error),
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("archive mount has already been closed")]
    Closed,
}
