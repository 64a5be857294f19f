use std::path::{Path, PathBuf};
use std::sync::Arc;

use jct_archive::ArchiveMount;
use jct_location::{binary_name_to_relative_path, relative_path_to_binary_name, Kind, Location};

use crate::error::VfsError;
use crate::file_object::{disk_contains, FileObject};
use crate::path_root::{reject_absolute, PathRoot};

/// Where JPMS tooling would look for a module's own root within a container,
/// if the container is independently navigable as a module graph node.
///
/// Directory and in-memory containers are not independently navigable module
/// graphs (`None`); archive containers expose the path inside the mounted
/// archive that plays that role.
#[derive(Clone, Debug)]
pub struct ModuleFinderView {
    pub root: String,
}

/// One [`PathRoot`] exposed through the container's typed read/write
/// interface. A container never escapes the group that owns it.
#[derive(Clone)]
pub struct Container {
    location: Location,
    root: PathRoot,
}

impl Container {
    pub fn new(location: Location, root: PathRoot) -> Self {
        Self { location, root }
    }

    /// Build the appropriate container kind for `path`, dispatching on
    /// filename suffix: `.jar`/`.war`/`.zip` mount as an archive, a directory
    /// wraps the disk, anything else is rejected.
    pub fn from_disk_path(
        location: Location,
        path: &Path,
        release_version: Option<u16>,
    ) -> Result<Self, VfsError> {
        if path.is_dir() {
            return Ok(Self::new(location, PathRoot::disk(path)));
        }
        if path.is_file() {
            let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
            if matches!(extension, "jar" | "war" | "zip") {
                let mount = Arc::new(ArchiveMount::new(path, release_version));
                return Ok(Self::new(location, PathRoot::archive(mount)));
            }
            return Err(VfsError::UnrecognizedArchiveExtension(path.to_path_buf()));
        }
        Err(VfsError::PathNotFound(path.to_path_buf()))
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn root(&self) -> &PathRoot {
        &self.root
    }

    pub fn is_writable(&self) -> bool {
        !self.root.is_read_only()
    }

    pub fn module_finder_view(&self) -> Option<ModuleFinderView> {
        match &self.root {
            PathRoot::Archive { .. } => Some(ModuleFinderView { root: String::new() }),
            _ => None,
        }
    }

    pub fn contains(&self, file: &FileObject) -> bool {
        match (&self.root, file) {
            (PathRoot::Disk { root }, FileObject::Disk { full_path, .. }) => disk_contains(root, full_path),
            (PathRoot::Memory { fs, .. }, FileObject::Memory { fs: file_fs, relative_path, .. }) => {
                Arc::ptr_eq(fs, file_fs) && fs.contains_file(relative_path)
            }
            (PathRoot::Archive { mount }, FileObject::Archive { mount: file_mount, logical_path, .. }) => {
                Arc::ptr_eq(mount, file_mount) && mount.contains(logical_path).unwrap_or(false)
            }
            _ => false,
        }
    }

    /// Resolves `relative_path` under this container's root. Rejects
    /// absolute paths; returns `None` unless the result is a regular file.
    pub fn find_file(&self, relative_path: &Path) -> Result<Option<FileObject>, VfsError> {
        if reject_absolute(relative_path) {
            return Err(VfsError::InvalidInput(format!(
                "expected a relative path, got {}",
                relative_path.display()
            )));
        }
        match &self.root {
            PathRoot::Disk { root } => {
                let full_path = root.join(relative_path);
                if full_path.is_file() {
                    Ok(Some(FileObject::Disk {
                        location: self.location.clone(),
                        root: root.clone(),
                        full_path,
                        kind: Kind::from_extension(extension_of(relative_path)),
                    }))
                } else {
                    Ok(None)
                }
            }
            PathRoot::Memory { fs, root } => {
                if fs.contains_file(relative_path) {
                    Ok(Some(FileObject::Memory {
                        location: self.location.clone(),
                        fs: fs.clone(),
                        root: root.clone(),
                        relative_path: relative_path.to_path_buf(),
                        kind: Kind::from_extension(extension_of(relative_path)),
                    }))
                } else {
                    Ok(None)
                }
            }
            PathRoot::Archive { mount } => {
                let logical_path = to_logical_path(relative_path);
                if mount.contains(&logical_path)? {
                    Ok(Some(FileObject::Archive {
                        location: self.location.clone(),
                        mount: mount.clone(),
                        logical_path,
                        kind: Kind::from_extension(extension_of(relative_path)),
                    }))
                } else {
                    Ok(None)
                }
            }
        }
    }

    pub fn get_class_binary(&self, binary_name: &str) -> Result<Option<Vec<u8>>, VfsError> {
        let relative_path = binary_name_to_relative_path(binary_name, Kind::Class);
        self.read_bytes(&relative_path)
    }

    fn read_bytes(&self, relative_path: &Path) -> Result<Option<Vec<u8>>, VfsError> {
        match &self.root {
            PathRoot::Disk { root } => {
                let full_path = root.join(relative_path);
                if !full_path.is_file() {
                    return Ok(None);
                }
                Ok(Some(std::fs::read(full_path)?))
            }
            PathRoot::Memory { fs, .. } => Ok(fs.read(relative_path)),
            PathRoot::Archive { mount } => Ok(mount.read(&to_logical_path(relative_path))?),
        }
    }

    pub fn get_file_for_input(&self, package: &str, relative_name: &str) -> Result<Option<FileObject>, VfsError> {
        let path = package_relative_path(package, relative_name);
        self.find_file(&path)
    }

    pub fn get_file_for_output(&self, package: &str, relative_name: &str) -> Result<Option<FileObject>, VfsError> {
        if self.root.is_read_only() {
            return Ok(None);
        }
        let relative_path = package_relative_path(package, relative_name);
        self.output_file_object(&relative_path)
    }

    pub fn get_java_file_for_input(&self, binary_name: &str, kind: Kind) -> Result<Option<FileObject>, VfsError> {
        let relative_path = binary_name_to_relative_path(binary_name, kind);
        self.find_file(&relative_path)
    }

    pub fn get_java_file_for_output(&self, binary_name: &str, kind: Kind) -> Result<Option<FileObject>, VfsError> {
        if self.root.is_read_only() {
            return Ok(None);
        }
        let relative_path = binary_name_to_relative_path(binary_name, kind);
        self.output_file_object(&relative_path)
    }

    fn output_file_object(&self, relative_path: &Path) -> Result<Option<FileObject>, VfsError> {
        let kind = Kind::from_extension(extension_of(relative_path));
        match &self.root {
            PathRoot::Disk { root } => {
                let full_path = root.join(relative_path);
                Ok(Some(FileObject::Disk {
                    location: self.location.clone(),
                    root: root.clone(),
                    full_path,
                    kind,
                }))
            }
            PathRoot::Memory { fs, root } => Ok(Some(FileObject::Memory {
                location: self.location.clone(),
                fs: fs.clone(),
                root: root.clone(),
                relative_path: relative_path.to_path_buf(),
                kind,
            })),
            PathRoot::Archive { .. } => Ok(None),
        }
    }

    /// Leading slashes are stripped. Never returns a handle to a directory —
    /// archive-fs consumers rely on that.
    pub fn get_resource(&self, slash_path: &str) -> Result<Option<FileObject>, VfsError> {
        let stripped = slash_path.trim_start_matches('/');
        self.find_file(Path::new(stripped))
    }

    /// `Some` iff `file`'s full path is under this container's root.
    pub fn infer_binary_name(&self, file: &FileObject) -> Option<String> {
        if !self.contains(file) {
            return None;
        }
        relative_path_to_binary_name(&file.relative_path(), file.kind())
    }

    pub fn list(&self, package: &str, kinds: &[Kind], recurse: bool) -> Result<Vec<FileObject>, VfsError> {
        let package_path = PathBuf::from(package.replace('.', "/"));
        match &self.root {
            PathRoot::Disk { root } => {
                let dir = root.join(&package_path);
                if !dir.is_dir() {
                    return Ok(Vec::new());
                }
                let mut out = Vec::new();
                let walker = walkdir::WalkDir::new(&dir).max_depth(if recurse { usize::MAX } else { 1 });
                for entry in walker.into_iter().filter_map(Result::ok) {
                    if !entry.file_type().is_file() {
                        continue;
                    }
                    let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
                    let kind = Kind::from_extension(extension_of(relative));
                    if !kinds.contains(&kind) {
                        continue;
                    }
                    out.push(FileObject::Disk {
                        location: self.location.clone(),
                        root: root.clone(),
                        full_path: entry.path().to_path_buf(),
                        kind,
                    });
                }
                Ok(out)
            }
            PathRoot::Memory { fs, root } => Ok(fs
                .list_dir(&package_path, recurse)
                .into_iter()
                .filter_map(|relative| {
                    let kind = Kind::from_extension(extension_of(&relative));
                    kinds.contains(&kind).then(|| FileObject::Memory {
                        location: self.location.clone(),
                        fs: fs.clone(),
                        root: root.clone(),
                        relative_path: relative,
                        kind,
                    })
                })
                .collect()),
            PathRoot::Archive { mount } => {
                let listed = mount.list(package, recurse)?;
                Ok(listed
                    .into_iter()
                    .filter_map(|logical_path| {
                        let kind = Kind::from_extension(extension_of(Path::new(&logical_path)));
                        kinds.contains(&kind).then(|| FileObject::Archive {
                            location: self.location.clone(),
                            mount: mount.clone(),
                            logical_path,
                            kind,
                        })
                    })
                    .collect())
            }
        }
    }

    /// Idempotent. Directory-backed containers have nothing to release; this
    /// only does real work for archive containers.
    pub fn close(&self) -> Result<(), VfsError> {
        match &self.root {
            PathRoot::Disk { .. } | PathRoot::Memory { .. } => Ok(()),
            PathRoot::Archive { mount } => Ok(mount.close()?),
        }
    }
}

fn extension_of(path: &Path) -> &str {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => ext,
        None => "",
    }
}

fn package_relative_path(package: &str, relative_name: &str) -> PathBuf {
    let mut path = PathBuf::from(package.replace('.', "/"));
    path.push(relative_name);
    path
}

fn to_logical_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}