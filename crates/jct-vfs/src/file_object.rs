use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use jct_archive::ArchiveMount;
use jct_location::{Kind, Location};

use crate::error::VfsError;
use crate::memfs::{MemoryFileSystem, MemoryWriteHandle};

/// A nesting kind, mirrored from JSR-199's `NestingKind`. Files handed back
/// by this core are always top-level from the compiler's point of view, so
/// only `None` is ever produced — the variants exist for API completeness.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NestingKind {
    TopLevel,
    Member,
    Local,
    Anonymous,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessLevel {
    Public,
    Protected,
    PackagePrivate,
    Private,
}

/// One file as seen by the compiler frontend and by [`ContainerClassLoader`](crate::class_loader::ContainerClassLoader).
///
/// `NestingKind`/`AccessLevel` are always `None` for external files, per
/// JSR-199 convention — this core never peeks inside `.class` files to
/// populate them.
#[derive(Clone)]
pub enum FileObject {
    Disk {
        location: Location,
        root: PathBuf,
        full_path: PathBuf,
        kind: Kind,
    },
    Memory {
        location: Location,
        fs: Arc<MemoryFileSystem>,
        root: PathBuf,
        relative_path: PathBuf,
        kind: Kind,
    },
    Archive {
        location: Location,
        mount: Arc<ArchiveMount>,
        logical_path: String,
        kind: Kind,
    },
}

impl FileObject {
    pub fn location(&self) -> &Location {
        match self {
            FileObject::Disk { location, .. }
            | FileObject::Memory { location, .. }
            | FileObject::Archive { location, .. } => location,
        }
    }

    pub fn kind(&self) -> Kind {
        match self {
            FileObject::Disk { kind, .. }
            | FileObject::Memory { kind, .. }
            | FileObject::Archive { kind, .. } => *kind,
        }
    }

    /// Full path relative to the owning root, with forward-slash separators.
    pub fn relative_path(&self) -> PathBuf {
        match self {
            FileObject::Disk { root, full_path, .. } => full_path
                .strip_prefix(root)
                .unwrap_or(full_path)
                .to_path_buf(),
            FileObject::Memory { relative_path, .. } => relative_path.clone(),
            FileObject::Archive { logical_path, .. } => PathBuf::from(logical_path),
        }
    }

    pub fn uri(&self) -> String {
        match self {
            FileObject::Disk { full_path, .. } => format!("file://{}", full_path.display()),
            FileObject::Memory { root, relative_path, .. } => {
                format!("mem://{}/{}", root.display(), relative_path.display())
            }
            FileObject::Archive { mount, logical_path, .. } => {
                format!("jar:file://{}!/{}", mount.archive_path().display(), logical_path)
            }
        }
    }

    /// True if `simple_name` (with `kind`'s extension) names the same file's
    /// final path segment.
    pub fn is_name_compatible(&self, simple_name: &str, kind: Kind) -> bool {
        if self.kind() != kind {
            return false;
        }
        let expected = format!("{simple_name}{}", kind.extension());
        self.relative_path()
            .file_name()
            .is_some_and(|name| name == expected.as_str())
    }

    pub fn last_modified(&self) -> Option<SystemTime> {
        match self {
            FileObject::Disk { full_path, .. } => std::fs::metadata(full_path).and_then(|m| m.modified()).ok(),
            FileObject::Memory { fs, relative_path, .. } => fs.last_modified(relative_path),
            FileObject::Archive { .. } => None,
        }
    }

    pub fn delete(&self) -> Result<bool, VfsError> {
        match self {
            FileObject::Disk { full_path, .. } => match std::fs::remove_file(full_path) {
                Ok(()) => Ok(true),
                Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
                Err(e) => Err(e.into()),
            },
            FileObject::Memory { fs, relative_path, .. } => Ok(fs.delete(relative_path)),
            FileObject::Archive { .. } => Err(VfsError::InvalidInput(
                "cannot delete an entry inside a read-only archive".to_string(),
            )),
        }
    }

    pub fn open_input_stream(&self) -> Result<Box<dyn Read + Send>, VfsError> {
        match self {
            FileObject::Disk { full_path, .. } => Ok(Box::new(std::fs::File::open(full_path)?)),
            FileObject::Memory { fs, relative_path, .. } => {
                let bytes = fs
                    .read(relative_path)
                    .ok_or_else(|| VfsError::Io(io::Error::new(io::ErrorKind::NotFound, "file removed")))?;
                Ok(Box::new(io::Cursor::new(bytes)))
            }
            FileObject::Archive { mount, logical_path, .. } => {
                let bytes = mount
                    .read(logical_path)?
                    .ok_or_else(|| VfsError::Io(io::Error::new(io::ErrorKind::NotFound, "archive entry removed")))?;
                Ok(Box::new(io::Cursor::new(bytes)))
            }
        }
    }

    pub fn open_output_stream(&self) -> Result<Box<dyn Write + Send>, VfsError> {
        match self {
            FileObject::Disk { full_path, .. } => {
                if let Some(parent) = full_path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                Ok(Box::new(std::fs::File::create(full_path)?))
            }
            FileObject::Memory { fs, relative_path, .. } => {
                Ok(Box::new(MemoryWriteHandle::new(fs.clone(), relative_path.clone())))
            }
            FileObject::Archive { .. } => Err(VfsError::InvalidInput(
                "archive containers are read-only".to_string(),
            )),
        }
    }

    pub fn get_char_content(&self) -> Result<String, VfsError> {
        let mut stream = self.open_input_stream()?;
        let mut bytes = Vec::new();
        stream.read_to_end(&mut bytes)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Always `None` for files produced by this core, per JSR-199 convention
    /// for external files.
    pub fn nesting_kind(&self) -> Option<NestingKind> {
        None
    }

    /// Always `None` for files produced by this core.
    pub fn access_level(&self) -> Option<AccessLevel> {
        None
    }
}

impl std::fmt::Debug for FileObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileObject")
            .field("location", &self.location().name())
            .field("kind", &self.kind())
            .field("uri", &self.uri())
            .finish()
    }
}

/// True iff `path` is under `root` *and* resolves to a regular file on disk.
pub fn disk_contains(root: &Path, path: &Path) -> bool {
    path.starts_with(root) && path.is_file()
}
