use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum VfsError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Archive(#[from] jct_archive::ArchiveError),

    #[error(transparent)]
    Location(#[from] jct_location::LocationError),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("path does not exist or is not a directory: {}", .0.display())]
    PathNotFound(PathBuf),

    #[error("unrecognized archive extension: {}", .0.display())]
    UnrecognizedArchiveExtension(PathBuf),

    #[error("class not found: {0}")]
    ClassNotFound(String),

    #[error("class load failure for {name}")]
    ClassLoadFailure {
        name: String,
        #[source]
        source: Box<VfsError>,
    },

    #[error("{} child container(s) failed to close", .0.len())]
    Aggregate(Vec<VfsError>),
}

impl VfsError {
    /// The individual failures behind an [`VfsError::Aggregate`], or a single
    /// failure for anything else.
    pub fn children(&self) -> &[VfsError] {
        match self {
            VfsError::Aggregate(errors) => errors,
            _ => std::slice::from_ref(self),
        }
    }

    /// Run every closure, collecting failures rather than stopping at the
    /// first one; returns `Ok(())` if all succeeded or `Err(Aggregate)`
    /// otherwise.
    pub fn aggregate(results: impl IntoIterator<Item = Result<(), VfsError>>) -> Result<(), VfsError> {
        let failures: Vec<VfsError> = results.into_iter().filter_map(Result::err).collect();
        if failures.is_empty() {
            Ok(())
        } else {
            Err(VfsError::Aggregate(failures))
        }
    }
}
