use std::path::Path;
use std::sync::Arc;

use jct_location::{Kind, Location};
use parking_lot::{Mutex, RwLock};

use crate::class_loader::ContainerClassLoader;
use crate::container::Container;
use crate::error::VfsError;
use crate::file_object::FileObject;

/// Ordered list of [`Container`]s bound to a single package-oriented
/// location. Reads visit containers in insertion order and stop at the
/// first match; writes always target the first writable container.
pub struct PackageContainerGroup {
    location: Location,
    release_version: Option<u16>,
    containers: RwLock<Vec<Arc<Container>>>,
    class_loader_cache: Mutex<Option<Arc<ContainerClassLoader>>>,
}

impl PackageContainerGroup {
    pub fn new(location: Location, release_version: Option<u16>) -> Result<Self, VfsError> {
        if location.is_module_oriented() && !location.is_output() {
            return Err(VfsError::InvalidInput(format!(
                "{} is module-oriented; use a ModuleContainerGroup instead",
                location.name()
            )));
        }
        Ok(Self {
            location,
            release_version,
            containers: RwLock::new(Vec::new()),
            class_loader_cache: Mutex::new(None),
        })
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    /// Appends `container` and invalidates the cached class loader — readers
    /// already holding a loader keep seeing the pre-add snapshot.
    pub fn add_container(&self, container: Container) {
        self.containers.write().push(Arc::new(container));
        *self.class_loader_cache.lock() = None;
    }

    pub fn add_path(&self, path: &Path) -> Result<(), VfsError> {
        let container = Container::from_disk_path(self.location.clone(), path, self.release_version)?;
        self.add_container(container);
        Ok(())
    }

    pub fn containers(&self) -> Vec<Arc<Container>> {
        self.containers.read().clone()
    }

    /// The first writable container, if any.
    pub fn first_writable(&self) -> Option<Arc<Container>> {
        self.containers.read().iter().find(|c| c.is_writable()).cloned()
    }

    pub fn get_class_binary(&self, binary_name: &str) -> Result<Option<Vec<u8>>, VfsError> {
        for container in self.containers.read().iter() {
            if let Some(bytes) = container.get_class_binary(binary_name)? {
                return Ok(Some(bytes));
            }
        }
        Ok(None)
    }

    pub fn get_file_for_input(&self, package: &str, relative_name: &str) -> Result<Option<FileObject>, VfsError> {
        for container in self.containers.read().iter() {
            if let Some(file) = container.get_file_for_input(package, relative_name)? {
                return Ok(Some(file));
            }
        }
        Ok(None)
    }

    pub fn get_file_for_output(&self, package: &str, relative_name: &str) -> Result<Option<FileObject>, VfsError> {
        match self.first_writable() {
            Some(container) => container.get_file_for_output(package, relative_name),
            None => Ok(None),
        }
    }

    pub fn get_java_file_for_input(&self, binary_name: &str, kind: Kind) -> Result<Option<FileObject>, VfsError> {
        for container in self.containers.read().iter() {
            if let Some(file) = container.get_java_file_for_input(binary_name, kind)? {
                return Ok(Some(file));
            }
        }
        Ok(None)
    }

    pub fn get_java_file_for_output(&self, binary_name: &str, kind: Kind) -> Result<Option<FileObject>, VfsError> {
        match self.first_writable() {
            Some(container) => container.get_java_file_for_output(binary_name, kind),
            None => Ok(None),
        }
    }

    pub fn get_resource(&self, slash_path: &str) -> Result<Option<FileObject>, VfsError> {
        for container in self.containers.read().iter() {
            if let Some(file) = container.get_resource(slash_path)? {
                return Ok(Some(file));
            }
        }
        Ok(None)
    }

    pub fn infer_binary_name(&self, file: &FileObject) -> Option<String> {
        self.containers.read().iter().find_map(|c| c.infer_binary_name(file))
    }

    pub fn contains(&self, file: &FileObject) -> bool {
        self.containers.read().iter().any(|c| c.contains(file))
    }

    pub fn list(&self, package: &str, kinds: &[Kind], recurse: bool) -> Result<Vec<FileObject>, VfsError> {
        let mut out = Vec::new();
        for container in self.containers.read().iter() {
            out.extend(container.list(package, kinds, recurse)?);
        }
        Ok(out)
    }

    /// Builds (and caches) a `ContainerClassLoader` over the current
    /// container snapshot. A loader handed out before a later `add_container`
    /// call never observes it.
    pub fn class_loader(&self) -> Arc<ContainerClassLoader> {
        let mut cache = self.class_loader_cache.lock();
        if let Some(loader) = cache.as_ref() {
            return loader.clone();
        }
        let loader = Arc::new(ContainerClassLoader::new(self.location.clone(), self.containers()));
        *cache = Some(loader.clone());
        loader
    }

    pub fn close(&self) -> Result<(), VfsError> {
        let containers = self.containers.read().clone();
        VfsError::aggregate(containers.iter().map(|c| c.close()))
    }
}
