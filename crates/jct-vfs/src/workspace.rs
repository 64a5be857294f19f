use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use jct_location::{Kind, Location, ModuleName};
use parking_lot::{Mutex, RwLock};
use tempfile::TempDir;

use crate::class_loader::ContainerClassLoader;
use crate::container::Container;
use crate::error::VfsError;
use crate::file_object::FileObject;
use crate::group::{ModuleContainerGroup, OutputContainerGroup, PackageContainerGroup};
use crate::jar;
use crate::memfs::MemoryFileSystem;
use crate::path_root::PathRoot;

/// How `create_package`/`create_module` materialise a fresh managed
/// directory.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PathStrategy {
    /// A fresh in-memory filesystem instance with a canonical root.
    InMemory,
    /// A uniquely named host directory, removed recursively on close.
    TempDisk,
}

enum Group {
    Package(Arc<PackageContainerGroup>),
    Module(Arc<ModuleContainerGroup>),
    Output(Arc<OutputContainerGroup>),
}

enum OwnedRoot {
    Memory(Arc<MemoryFileSystem>),
    TempDir(TempDir),
}

impl OwnedRoot {
    fn close(&self) -> Result<(), VfsError> {
        match self {
            OwnedRoot::Memory(fs) => {
                fs.close();
                Ok(())
            }
            OwnedRoot::TempDir(_) => Ok(()),
        }
    }
}

/// Map from [`Location`] to the appropriate group kind; origin of
/// [`ContainerClassLoader`]s; lifecycle root for every managed directory it
/// created.
pub struct Workspace {
    path_strategy: PathStrategy,
    release_version: Option<u16>,
    groups: RwLock<HashMap<Location, Group>>,
    owned_roots: Mutex<Vec<OwnedRoot>>,
    next_managed_id: Mutex<u64>,
}

impl Workspace {
    pub fn new(path_strategy: PathStrategy) -> Self {
        Self::with_release_version(path_strategy, None)
    }

    pub fn with_release_version(path_strategy: PathStrategy, release_version: Option<u16>) -> Self {
        Self {
            path_strategy,
            release_version,
            groups: RwLock::new(HashMap::new()),
            owned_roots: Mutex::new(Vec::new()),
            next_managed_id: Mutex::new(0),
        }
    }

    /// `Location::Module` is never a top-level key in `self.groups`: its
    /// identity is a `(parent, module-name)` pair, and operations against it
    /// resolve to the module subgroup the parent's own group owns, so a
    /// query via the `ModuleLocation` and a query via the parent location's
    /// module-prefixed name both reach the same containers.
    fn group_for(&self, location: &Location) -> Result<Arc<dyn GroupOps>, VfsError> {
        if let Location::Module(module_location) = location {
            let parent = self.group_for(module_location.parent())?;
            return parent.module_subgroup(module_location.module_name().clone());
        }
        if let Some(group) = self.groups.read().get(location) {
            return Ok(group.as_ops());
        }
        let mut groups = self.groups.write();
        if let Some(group) = groups.get(location) {
            return Ok(group.as_ops());
        }
        let group = if location.is_output() {
            Group::Output(Arc::new(OutputContainerGroup::new(location.clone(), self.release_version)?))
        } else if location.is_module_oriented() {
            Group::Module(Arc::new(ModuleContainerGroup::new(location.clone(), self.release_version)?))
        } else {
            Group::Package(Arc::new(PackageContainerGroup::new(location.clone(), self.release_version)?))
        };
        let ops = group.as_ops();
        groups.insert(location.clone(), group);
        Ok(ops)
    }

    /// Requires `path` to exist, as a directory or a recognised archive file;
    /// rejects module-oriented, non-output locations — unless `location` is
    /// itself a `ModuleLocation`, which is always a valid package-level
    /// target (it names one module's own root).
    pub fn add_package(&self, location: Location, path: impl AsRef<Path>) -> Result<(), VfsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(VfsError::PathNotFound(path.to_path_buf()));
        }
        if !location.is_module_specific() && location.is_module_oriented() && !location.is_output() {
            return Err(VfsError::InvalidInput(format!(
                "{} is module-oriented; use add_module",
                location.name()
            )));
        }
        self.group_for(&location)?.add_path(path)
    }

    /// Delegates to `add_package(ModuleLocation(location, module_name), path)`;
    /// rejects non-output, non-module-oriented locations and nesting a
    /// module inside a `ModuleLocation`.
    pub fn add_module(
        &self,
        location: Location,
        module_name: impl Into<ModuleName>,
        path: impl AsRef<Path>,
    ) -> Result<(), VfsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(VfsError::PathNotFound(path.to_path_buf()));
        }
        if location.is_module_specific() {
            return Err(VfsError::InvalidInput(
                "cannot nest a module inside a ModuleLocation".to_string(),
            ));
        }
        if !location.is_output() && !location.is_module_oriented() {
            return Err(VfsError::InvalidInput(format!(
                "{} accepts neither modules nor module output",
                location.name()
            )));
        }
        let module_name = module_name.into();
        self.group_for(&location)?.add_module(module_name, path)
    }

    pub fn create_package(&self, location: Location) -> Result<PathBuf, VfsError> {
        if !location.is_module_specific() && location.is_module_oriented() && !location.is_output() {
            return Err(VfsError::InvalidInput(format!(
                "{} is module-oriented; use create_module",
                location.name()
            )));
        }
        let root = self.materialize_root(&location)?;
        self.group_for(&location)?.add_container(root.clone());
        Ok(root_display_path(&root))
    }

    pub fn create_module(&self, location: Location, module_name: impl Into<ModuleName>) -> Result<PathBuf, VfsError> {
        if location.is_module_specific() {
            return Err(VfsError::InvalidInput(
                "cannot nest a module inside a ModuleLocation".to_string(),
            ));
        }
        if !location.is_output() && !location.is_module_oriented() {
            return Err(VfsError::InvalidInput(format!(
                "{} accepts neither modules nor module output",
                location.name()
            )));
        }
        let module_name = module_name.into();
        let root = self.materialize_root(&location)?;
        self.group_for(&location)?.add_module_root(module_name, root.clone())?;
        Ok(root_display_path(&root))
    }

    fn materialize_root(&self, location: &Location) -> Result<PathRoot, VfsError> {
        match self.path_strategy {
            PathStrategy::InMemory => {
                let mut id = self.next_managed_id.lock();
                let name = format!("jct-mem-{}-{}", sanitize(&location.name()), *id);
                *id += 1;
                let fs = Arc::new(MemoryFileSystem::new(name));
                self.owned_roots.lock().push(OwnedRoot::Memory(fs.clone()));
                Ok(PathRoot::memory(fs))
            }
            PathStrategy::TempDisk => {
                let temp_dir = tempfile::Builder::new()
                    .prefix(&format!("jct-{}_", sanitize(&location.name())))
                    .tempdir()?;
                let path = temp_dir.path().to_path_buf();
                self.owned_roots.lock().push(OwnedRoot::TempDir(temp_dir));
                Ok(PathRoot::disk(path))
            }
        }
    }

    pub fn class_loader(&self, location: &Location) -> Result<Arc<ContainerClassLoader>, VfsError> {
        self.group_for(location)?.class_loader()
    }

    pub fn get_class_binary(&self, location: &Location, binary_name: &str) -> Result<Option<Vec<u8>>, VfsError> {
        self.group_for(location)?.get_class_binary(binary_name)
    }

    pub fn get_java_file_for_input(
        &self,
        location: &Location,
        binary_name: &str,
        kind: Kind,
    ) -> Result<Option<FileObject>, VfsError> {
        self.group_for(location)?.get_java_file_for_input(binary_name, kind)
    }

    pub fn get_java_file_for_output(
        &self,
        location: &Location,
        binary_name: &str,
        kind: Kind,
    ) -> Result<Option<FileObject>, VfsError> {
        self.group_for(location)?.get_java_file_for_output(binary_name, kind)
    }

    pub fn list(&self, location: &Location, package: &str, kinds: &[Kind], recurse: bool) -> Result<Vec<FileObject>, VfsError> {
        self.group_for(location)?.list(package, kinds, recurse)
    }

    /// Writes the first writable root of `location`'s group into a flat jar.
    pub fn write_jar(&self, location: &Location, output_path: &Path) -> Result<(), VfsError> {
        let root = self.group_for(location)?.first_writable_root()?;
        jar::write_directory_as_jar(&root, output_path)
    }

    /// Closes every owned managed directory; collects failures into a single
    /// aggregate error rather than stopping at the first one.
    pub fn close(&self) -> Result<(), VfsError> {
        let groups = self.groups.read().values().map(Group::as_ops).collect::<Vec<_>>();
        let group_results = groups.iter().map(|g| g.close());

        let owned_roots = std::mem::take(&mut *self.owned_roots.lock());
        let root_results = owned_roots.iter().map(OwnedRoot::close);

        VfsError::aggregate(group_results.chain(root_results))
    }
}

fn root_display_path(root: &PathRoot) -> PathBuf {
    match root {
        PathRoot::Disk { root } => root.clone(),
        PathRoot::Memory { root, .. } => root.clone(),
        PathRoot::Archive { mount } => mount.archive_path().to_path_buf(),
    }
}

fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

trait GroupOps: Send + Sync {
    fn add_path(&self, path: &Path) -> Result<(), VfsError>;
    fn add_module(&self, module_name: ModuleName, path: &Path) -> Result<(), VfsError>;
    fn add_container(&self, root: PathRoot);
    fn add_module_root(&self, module_name: ModuleName, root: PathRoot) -> Result<(), VfsError>;
    fn class_loader(&self) -> Result<Arc<ContainerClassLoader>, VfsError>;
    fn get_class_binary(&self, binary_name: &str) -> Result<Option<Vec<u8>>, VfsError>;
    fn get_java_file_for_input(&self, binary_name: &str, kind: Kind) -> Result<Option<FileObject>, VfsError>;
    fn get_java_file_for_output(&self, binary_name: &str, kind: Kind) -> Result<Option<FileObject>, VfsError>;
    fn list(&self, package: &str, kinds: &[Kind], recurse: bool) -> Result<Vec<FileObject>, VfsError>;
    fn first_writable_root(&self) -> Result<PathRoot, VfsError>;
    fn close(&self) -> Result<(), VfsError>;

    /// The subgroup a `ModuleLocation` naming this group as its parent
    /// resolves to. Only module-oriented and output groups have one.
    fn module_subgroup(&self, _name: ModuleName) -> Result<Arc<dyn GroupOps>, VfsError> {
        Err(VfsError::InvalidInput(
            "this location has no per-module subgroups".to_string(),
        ))
    }
}

impl Group {
    fn as_ops(&self) -> Arc<dyn GroupOps> {
        match self {
            Group::Package(g) => g.clone() as Arc<dyn GroupOps>,
            Group::Module(g) => g.clone() as Arc<dyn GroupOps>,
            Group::Output(g) => g.clone() as Arc<dyn GroupOps>,
        }
    }
}

impl GroupOps for PackageContainerGroup {
    fn add_path(&self, path: &Path) -> Result<(), VfsError> {
        PackageContainerGroup::add_path(self, path)
    }

    fn add_module(&self, _module_name: ModuleName, _path: &Path) -> Result<(), VfsError> {
        Err(VfsError::InvalidInput(format!(
            "{} does not accept modules",
            self.location().name()
        )))
    }

    fn add_container(&self, root: PathRoot) {
        PackageContainerGroup::add_container(self, Container::new(self.location().clone(), root));
    }

    fn add_module_root(&self, _module_name: ModuleName, _root: PathRoot) -> Result<(), VfsError> {
        Err(VfsError::InvalidInput(format!(
            "{} does not accept modules",
            self.location().name()
        )))
    }

    fn class_loader(&self) -> Result<Arc<ContainerClassLoader>, VfsError> {
        Ok(PackageContainerGroup::class_loader(self))
    }

    fn get_class_binary(&self, binary_name: &str) -> Result<Option<Vec<u8>>, VfsError> {
        PackageContainerGroup::get_class_binary(self, binary_name)
    }

    fn get_java_file_for_input(&self, binary_name: &str, kind: Kind) -> Result<Option<FileObject>, VfsError> {
        PackageContainerGroup::get_java_file_for_input(self, binary_name, kind)
    }

    fn get_java_file_for_output(&self, binary_name: &str, kind: Kind) -> Result<Option<FileObject>, VfsError> {
        PackageContainerGroup::get_java_file_for_output(self, binary_name, kind)
    }

    fn list(&self, package: &str, kinds: &[Kind], recurse: bool) -> Result<Vec<FileObject>, VfsError> {
        PackageContainerGroup::list(self, package, kinds, recurse)
    }

    fn first_writable_root(&self) -> Result<PathRoot, VfsError> {
        self.first_writable()
            .map(|c| c.root().clone())
            .ok_or_else(|| VfsError::InvalidInput("no writable root in this group".to_string()))
    }

    fn close(&self) -> Result<(), VfsError> {
        PackageContainerGroup::close(self)
    }
}

impl GroupOps for ModuleContainerGroup {
    fn add_path(&self, _path: &Path) -> Result<(), VfsError> {
        Err(VfsError::InvalidInput(format!(
            "{} is module-oriented; use add_module",
            self.location().name()
        )))
    }

    fn add_module(&self, module_name: ModuleName, path: &Path) -> Result<(), VfsError> {
        ModuleContainerGroup::add_module(self, module_name, path)
    }

    fn add_container(&self, _root: PathRoot) {}

    fn add_module_root(&self, module_name: ModuleName, root: PathRoot) -> Result<(), VfsError> {
        let group = self.get_or_create_module(module_name)?;
        group.add_container(Container::new(group.location().clone(), root));
        Ok(())
    }

    fn class_loader(&self) -> Result<Arc<ContainerClassLoader>, VfsError> {
        let mut module_containers = HashMap::new();
        for (name, group) in self.modules() {
            module_containers.insert(name, group.containers());
        }
        Ok(Arc::new(ContainerClassLoader::with_modules(
            self.location().clone(),
            Vec::new(),
            module_containers,
        )))
    }

    fn get_class_binary(&self, binary_name: &str) -> Result<Option<Vec<u8>>, VfsError> {
        match jct_location::try_extract_module_prefix(binary_name) {
            Some((module, rest)) => match self.modules().get(module) {
                Some(group) => group.get_class_binary(rest),
                None => Ok(None),
            },
            None => Ok(None),
        }
    }

    fn get_java_file_for_input(&self, binary_name: &str, kind: Kind) -> Result<Option<FileObject>, VfsError> {
        match jct_location::try_extract_module_prefix(binary_name) {
            Some((module, rest)) => match self.modules().get(module) {
                Some(group) => group.get_java_file_for_input(rest, kind),
                None => Ok(None),
            },
            None => Ok(None),
        }
    }

    fn get_java_file_for_output(&self, _binary_name: &str, _kind: Kind) -> Result<Option<FileObject>, VfsError> {
        Err(VfsError::InvalidInput(format!(
            "{} is not an output location",
            self.location().name()
        )))
    }

    fn list(&self, package: &str, kinds: &[Kind], recurse: bool) -> Result<Vec<FileObject>, VfsError> {
        let mut out = Vec::new();
        for group in self.modules().values() {
            out.extend(group.list(package, kinds, recurse)?);
        }
        Ok(out)
    }

    fn first_writable_root(&self) -> Result<PathRoot, VfsError> {
        Err(VfsError::InvalidInput(
            "module path locations have no single writable root".to_string(),
        ))
    }

    fn close(&self) -> Result<(), VfsError> {
        ModuleContainerGroup::close(self)
    }

    fn module_subgroup(&self, name: ModuleName) -> Result<Arc<dyn GroupOps>, VfsError> {
        Ok(self.get_or_create_module(name)? as Arc<dyn GroupOps>)
    }
}

impl GroupOps for OutputContainerGroup {
    fn add_path(&self, path: &Path) -> Result<(), VfsError> {
        OutputContainerGroup::add_path(self, path)
    }

    fn add_module(&self, module_name: ModuleName, path: &Path) -> Result<(), VfsError> {
        self.ensure_module(module_name)?.add_path(path)
    }

    fn add_container(&self, root: PathRoot) {
        OutputContainerGroup::add_container(self, Container::new(self.location().clone(), root));
    }

    fn add_module_root(&self, module_name: ModuleName, root: PathRoot) -> Result<(), VfsError> {
        let group = self.ensure_module(module_name)?;
        group.add_container(Container::new(group.location().clone(), root));
        Ok(())
    }

    fn class_loader(&self) -> Result<Arc<ContainerClassLoader>, VfsError> {
        let mut module_containers = HashMap::new();
        for (name, group) in self.modules() {
            module_containers.insert(name, group.containers());
        }
        Ok(Arc::new(ContainerClassLoader::with_modules(
            self.location().clone(),
            self.packages().containers(),
            module_containers,
        )))
    }

    fn get_class_binary(&self, binary_name: &str) -> Result<Option<Vec<u8>>, VfsError> {
        OutputContainerGroup::get_class_binary(self, binary_name)
    }

    fn get_java_file_for_input(&self, binary_name: &str, kind: Kind) -> Result<Option<FileObject>, VfsError> {
        OutputContainerGroup::get_java_file_for_input(self, binary_name, kind)
    }

    fn get_java_file_for_output(&self, binary_name: &str, kind: Kind) -> Result<Option<FileObject>, VfsError> {
        OutputContainerGroup::get_java_file_for_output(self, binary_name, kind)
    }

    fn list(&self, package: &str, kinds: &[Kind], recurse: bool) -> Result<Vec<FileObject>, VfsError> {
        OutputContainerGroup::list(self, package, kinds, recurse)
    }

    fn first_writable_root(&self) -> Result<PathRoot, VfsError> {
        self.packages()
            .first_writable()
            .map(|c| c.root().clone())
            .ok_or_else(|| VfsError::InvalidInput("no writable root in this group".to_string()))
    }

    fn close(&self) -> Result<(), VfsError> {
        OutputContainerGroup::close(self)
    }

    fn module_subgroup(&self, name: ModuleName) -> Result<Arc<dyn GroupOps>, VfsError> {
        Ok(self.get_or_create_module(name)? as Arc<dyn GroupOps>)
    }
}
