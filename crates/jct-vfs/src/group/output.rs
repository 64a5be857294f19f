use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use jct_location::{try_extract_module_prefix, Kind, Location, ModuleLocation, ModuleName};
use parking_lot::RwLock;

use crate::container::Container;
use crate::error::VfsError;
use crate::file_object::FileObject;
use crate::group::package::PackageContainerGroup;
use crate::path_root::PathRoot;

/// A `PackageContainerGroup` that can additionally spawn module subgroups on
/// demand: output locations accept both flat packages and per-module output.
pub struct OutputContainerGroup {
    packages: PackageContainerGroup,
    release_version: Option<u16>,
    modules: RwLock<HashMap<ModuleName, Arc<PackageContainerGroup>>>,
}

impl OutputContainerGroup {
    pub fn new(location: Location, release_version: Option<u16>) -> Result<Self, VfsError> {
        if !location.is_output() {
            return Err(VfsError::InvalidInput(format!(
                "{} is not an output location",
                location.name()
            )));
        }
        Ok(Self {
            packages: PackageContainerGroup::new(location, release_version)?,
            release_version,
            modules: RwLock::new(HashMap::new()),
        })
    }

    pub fn location(&self) -> &Location {
        self.packages.location()
    }

    pub fn add_container(&self, container: Container) {
        self.packages.add_container(container);
    }

    pub fn add_path(&self, path: &Path) -> Result<(), VfsError> {
        self.packages.add_path(path)
    }

    /// Idempotent bookkeeping-only creation of the subgroup for `name` — no
    /// container is added. Used both by explicit `add_module_root` (which
    /// supplies its own externally materialised root) and as the first step
    /// of implicit on-demand creation in [`Self::get_or_create_module`].
    pub fn ensure_module(&self, name: ModuleName) -> Result<Arc<PackageContainerGroup>, VfsError> {
        if let Some(group) = self.modules.read().get(&name) {
            return Ok(group.clone());
        }
        let mut modules = self.modules.write();
        if let Some(group) = modules.get(&name) {
            return Ok(group.clone());
        }
        let module_location: Location = ModuleLocation::new(self.packages.location().clone(), name.clone())?.into();
        let group = Arc::new(PackageContainerGroup::new(module_location, self.release_version)?);
        modules.insert(name, group.clone());
        Ok(group)
    }

    /// Creates the module's backing subdirectory under the first root the
    /// first time `name` is routed to implicitly (via a module-prefixed
    /// package/class name); idempotent afterwards. Explicit module creation
    /// through a workspace goes through `ensure_module` instead, since it
    /// supplies its own root.
    pub fn get_or_create_module(&self, name: ModuleName) -> Result<Arc<PackageContainerGroup>, VfsError> {
        let group = self.ensure_module(name.clone())?;
        if !group.containers().is_empty() {
            return Ok(group);
        }

        let first_root = self
            .packages
            .containers()
            .first()
            .map(|c| c.root().clone())
            .ok_or_else(|| VfsError::InvalidInput("output group has no root to create a module under".to_string()))?;

        let module_location = group.location().clone();
        match first_root {
            PathRoot::Disk { root } => {
                let module_root = root.join(name.as_str());
                std::fs::create_dir_all(&module_root)?;
                group.add_container(Container::new(module_location, PathRoot::disk(module_root)));
            }
            PathRoot::Memory { fs, .. } => {
                group.add_container(Container::new(module_location, PathRoot::memory(fs)));
            }
            PathRoot::Archive { .. } => {
                return Err(VfsError::InvalidInput(
                    "cannot create a module output under a read-only archive root".to_string(),
                ));
            }
        }
        Ok(group)
    }

    pub fn modules(&self) -> HashMap<ModuleName, Arc<PackageContainerGroup>> {
        self.modules.read().clone()
    }

    pub fn get_class_binary(&self, binary_name: &str) -> Result<Option<Vec<u8>>, VfsError> {
        self.packages.get_class_binary(binary_name)
    }

    pub fn get_file_for_input(&self, package: &str, relative_name: &str) -> Result<Option<FileObject>, VfsError> {
        self.packages.get_file_for_input(package, relative_name)
    }

    /// Routes through the module-prefix extractor first, then falls back to
    /// the flat package path.
    pub fn get_file_for_output(&self, name: &str, relative_name: &str) -> Result<Option<FileObject>, VfsError> {
        match try_extract_module_prefix(name) {
            Some((module, rest)) => self
                .get_or_create_module(ModuleName::new(module))?
                .get_file_for_output(rest, relative_name),
            None => self.packages.get_file_for_output(name, relative_name),
        }
    }

    pub fn get_java_file_for_input(&self, binary_name: &str, kind: Kind) -> Result<Option<FileObject>, VfsError> {
        self.packages.get_java_file_for_input(binary_name, kind)
    }

    pub fn get_java_file_for_output(&self, binary_name: &str, kind: Kind) -> Result<Option<FileObject>, VfsError> {
        match try_extract_module_prefix(binary_name) {
            Some((module, rest)) => self
                .get_or_create_module(ModuleName::new(module))?
                .get_java_file_for_output(rest, kind),
            None => self.packages.get_java_file_for_output(binary_name, kind),
        }
    }

    pub fn get_resource(&self, slash_path: &str) -> Result<Option<FileObject>, VfsError> {
        self.packages.get_resource(slash_path)
    }

    pub fn infer_binary_name(&self, file: &FileObject) -> Option<String> {
        self.packages.infer_binary_name(file)
    }

    pub fn list(&self, package: &str, kinds: &[Kind], recurse: bool) -> Result<Vec<FileObject>, VfsError> {
        self.packages.list(package, kinds, recurse)
    }

    pub fn packages(&self) -> &PackageContainerGroup {
        &self.packages
    }

    pub fn close(&self) -> Result<(), VfsError> {
        let module_closes = self.modules.read().clone();
        VfsError::aggregate(
            std::iter::once(self.packages.close())
                .chain(module_closes.values().map(|group| group.close())),
        )
    }
}
