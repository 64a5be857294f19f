use std::path::{Path, PathBuf};
use std::sync::Arc;

use jct_archive::ArchiveMount;

use crate::memfs::MemoryFileSystem;

/// The origin of a [`Container`](crate::container::Container)'s file tree: a
/// wrapped disk directory, a managed in-memory directory, or a mounted
/// archive.
///
/// Disk roots are borrowed — the workspace that added them never deletes
/// them. Memory and archive roots are owned by whatever created them and
/// closed along with it.
#[derive(Clone)]
pub enum PathRoot {
    Disk { root: PathBuf },
    Memory { fs: Arc<MemoryFileSystem>, root: PathBuf },
    Archive { mount: Arc<ArchiveMount> },
}

impl PathRoot {
    pub fn disk(root: impl Into<PathBuf>) -> Self {
        PathRoot::Disk { root: root.into() }
    }

    pub fn memory(fs: Arc<MemoryFileSystem>) -> Self {
        let root = PathBuf::from(fs.name());
        PathRoot::Memory { fs, root }
    }

    pub fn archive(mount: Arc<ArchiveMount>) -> Self {
        PathRoot::Archive { mount }
    }

    pub fn is_read_only(&self) -> bool {
        matches!(self, PathRoot::Archive { .. })
    }

    /// A human-readable identifier for the root, used in `FileObject` URIs.
    pub fn display_root(&self) -> String {
        match self {
            PathRoot::Disk { root } => root.display().to_string(),
            PathRoot::Memory { root, .. } => root.display().to_string(),
            PathRoot::Archive { mount } => mount.archive_path().display().to_string(),
        }
    }
}

/// Leading-separator paths are never accepted as relative paths; the
/// container is responsible for rejecting them before resolving under a
/// root.
pub fn reject_absolute(path: &Path) -> bool {
    path.is_absolute() || path.starts_with(std::path::Component::RootDir)
}
