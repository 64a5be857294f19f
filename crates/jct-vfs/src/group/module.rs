use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use jct_location::{Location, ModuleLocation, ModuleName};
use parking_lot::RwLock;

use crate::container::ModuleFinderView;
use crate::error::VfsError;
use crate::file_object::FileObject;
use crate::group::package::PackageContainerGroup;

/// Module name -> the finder views its containers expose, for service-loader
/// style discovery. Recomputed on every call rather than cached, so it always
/// reflects concurrent `add_module` calls.
pub type ModuleGraph = HashMap<ModuleName, Vec<ModuleFinderView>>;

/// Map from module name to a [`PackageContainerGroup`], for a single
/// module-oriented, non-output location.
pub struct ModuleContainerGroup {
    location: Location,
    release_version: Option<u16>,
    modules: RwLock<HashMap<ModuleName, Arc<PackageContainerGroup>>>,
}

impl ModuleContainerGroup {
    pub fn new(location: Location, release_version: Option<u16>) -> Result<Self, VfsError> {
        if !location.is_module_oriented() || location.is_output() {
            return Err(VfsError::InvalidInput(format!(
                "{} is not a module-oriented, non-output location",
                location.name()
            )));
        }
        Ok(Self {
            location,
            release_version,
            modules: RwLock::new(HashMap::new()),
        })
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    /// Idempotent: returns the existing subgroup for `name`, creating one if
    /// this is the first time it has been seen.
    pub fn get_or_create_module(&self, name: ModuleName) -> Result<Arc<PackageContainerGroup>, VfsError> {
        if let Some(group) = self.modules.read().get(&name) {
            return Ok(group.clone());
        }
        let mut modules = self.modules.write();
        if let Some(group) = modules.get(&name) {
            return Ok(group.clone());
        }
        let module_location = ModuleLocation::new(self.location.clone(), name.clone())?;
        let group = Arc::new(PackageContainerGroup::new(module_location.into(), self.release_version)?);
        modules.insert(name, group.clone());
        Ok(group)
    }

    pub fn add_module(&self, name: ModuleName, path: &Path) -> Result<(), VfsError> {
        let group = self.get_or_create_module(name)?;
        group.add_path(path)
    }

    pub fn modules(&self) -> HashMap<ModuleName, Arc<PackageContainerGroup>> {
        self.modules.read().clone()
    }

    /// `false` unless `file` is addressed through a `ModuleLocation` this
    /// group knows about.
    pub fn contains(&self, file: &FileObject) -> bool {
        let Some(module_location) = file.location().as_module() else {
            return false;
        };
        self.modules
            .read()
            .get(module_location.module_name())
            .is_some_and(|group| group.contains(file))
    }

    pub fn module_graph(&self) -> ModuleGraph {
        self.modules
            .read()
            .iter()
            .map(|(name, group)| {
                let views = group
                    .containers()
                    .iter()
                    .filter_map(|c| c.module_finder_view())
                    .collect();
                (name.clone(), views)
            })
            .collect()
    }

    pub fn close(&self) -> Result<(), VfsError> {
        let modules = self.modules.read().clone();
        VfsError::aggregate(modules.values().map(|group| group.close()))
    }
}
