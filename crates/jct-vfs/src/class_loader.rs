use std::collections::HashMap;
use std::sync::Arc;

use jct_location::{try_extract_module_prefix, Kind, Location, ModuleName};

use crate::container::Container;
use crate::error::VfsError;

/// A parallel-capable class loader backed by an immutable snapshot of the
/// package and module containers for one location, taken at construction
/// time. Later mutations to the originating group are never observed —
/// publishing a new loader is the only way to pick them up.
pub struct ContainerClassLoader {
    location: Location,
    package_containers: Vec<Arc<Container>>,
    module_containers: HashMap<ModuleName, Vec<Arc<Container>>>,
}

impl ContainerClassLoader {
    pub fn new(location: Location, package_containers: Vec<Arc<Container>>) -> Self {
        Self {
            location,
            package_containers,
            module_containers: HashMap::new(),
        }
    }

    pub fn with_modules(
        location: Location,
        package_containers: Vec<Arc<Container>>,
        module_containers: HashMap<ModuleName, Vec<Arc<Container>>>,
    ) -> Self {
        Self {
            location,
            package_containers,
            module_containers,
        }
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    /// Raw class bytes via the same byte-reading path the compiler frontend
    /// uses, routed through this separate method so a caller holding a
    /// loader reference never aliases a `FileObject` the frontend has open.
    pub fn find_class(&self, name: &str) -> Result<Vec<u8>, VfsError> {
        if let Some((module, rest)) = try_extract_module_prefix(name) {
            if let Some(containers) = self.module_containers.get(module) {
                if let Some(bytes) = Self::search(containers, rest)? {
                    return Ok(bytes);
                }
                return Err(VfsError::ClassNotFound(name.to_string()));
            }
        }
        match Self::search(&self.package_containers, name)? {
            Some(bytes) => Ok(bytes),
            None => Err(VfsError::ClassNotFound(name.to_string())),
        }
    }

    fn search(containers: &[Arc<Container>], binary_name: &str) -> Result<Option<Vec<u8>>, VfsError> {
        for container in containers {
            match container.get_class_binary(binary_name) {
                Ok(Some(bytes)) => return Ok(Some(bytes)),
                Ok(None) => continue,
                Err(source) => {
                    return Err(VfsError::ClassLoadFailure {
                        name: binary_name.to_string(),
                        source: Box::new(source),
                    })
                }
            }
        }
        Ok(None)
    }

    /// Strips leading separators; I/O failures are swallowed (logged) and
    /// yield `None`, since the single-result API has no other channel.
    pub fn find_resource(&self, name: &str) -> Option<String> {
        let stripped = name.trim_start_matches('/');
        let (module, package_name) = match try_extract_module_prefix(stripped) {
            Some((module, rest)) => (Some(module), rest),
            None => (None, stripped),
        };

        let containers: Vec<&Arc<Container>> = match module {
            Some(module) => self.module_containers.get(module).into_iter().flatten().collect(),
            None => self.package_containers.iter().collect(),
        };

        for container in containers {
            match container.get_resource(package_name) {
                Ok(Some(file)) => return Some(file.uri()),
                Ok(None) => continue,
                Err(error) => {
                    tracing::warn!(%error, resource = name, "find_resource probe failed, treating as absent");
                    return None;
                }
            }
        }
        None
    }

    /// Every matching URI, module-matched containers first (if a module
    /// prefix was present), then every package container in insertion order.
    pub fn find_resources(&self, name: &str) -> Result<Vec<String>, VfsError> {
        let stripped = name.trim_start_matches('/');
        let (module, package_name) = match try_extract_module_prefix(stripped) {
            Some((module, rest)) => (Some(module), rest),
            None => (None, stripped),
        };

        let mut uris = Vec::new();
        if let Some(module) = module {
            if let Some(containers) = self.module_containers.get(module) {
                for container in containers {
                    if let Some(file) = container.get_resource(package_name)? {
                        uris.push(file.uri());
                    }
                }
            }
        }
        for container in &self.package_containers {
            if let Some(file) = container.get_resource(package_name)? {
                uris.push(file.uri());
            }
        }
        Ok(uris)
    }
}
