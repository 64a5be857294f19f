use crate::error::LocationError;
use crate::module_name::ModuleName;

/// A well-known, non-module-specific location.
///
/// Mirrors the JSR-199 standard location facets: whether the compiler writes
/// into it (`output`) and whether its contents are addressed by module name
/// first (`module_oriented`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StandardLocation {
    name: &'static str,
    output: bool,
    module_oriented: bool,
}

impl StandardLocation {
    pub const fn new(name: &'static str, output: bool, module_oriented: bool) -> Self {
        Self {
            name,
            output,
            module_oriented,
        }
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }

    pub const fn is_output(&self) -> bool {
        self.output
    }

    pub const fn is_module_oriented(&self) -> bool {
        self.module_oriented
    }
}

pub const CLASS_PATH: StandardLocation = StandardLocation::new("CLASS_PATH", false, false);
pub const SOURCE_PATH: StandardLocation = StandardLocation::new("SOURCE_PATH", false, false);
pub const MODULE_PATH: StandardLocation = StandardLocation::new("MODULE_PATH", false, true);
pub const MODULE_SOURCE_PATH: StandardLocation =
    StandardLocation::new("MODULE_SOURCE_PATH", false, true);
pub const ANNOTATION_PROCESSOR_PATH: StandardLocation =
    StandardLocation::new("ANNOTATION_PROCESSOR_PATH", false, false);
pub const ANNOTATION_PROCESSOR_MODULE_PATH: StandardLocation =
    StandardLocation::new("ANNOTATION_PROCESSOR_MODULE_PATH", false, true);
pub const CLASS_OUTPUT: StandardLocation = StandardLocation::new("CLASS_OUTPUT", true, false);
pub const SOURCE_OUTPUT: StandardLocation = StandardLocation::new("SOURCE_OUTPUT", true, false);
pub const NATIVE_HEADER_OUTPUT: StandardLocation =
    StandardLocation::new("NATIVE_HEADER_OUTPUT", true, false);
pub const PLATFORM_CLASS_PATH: StandardLocation =
    StandardLocation::new("PLATFORM_CLASS_PATH", false, false);
pub const SYSTEM_MODULES: StandardLocation = StandardLocation::new("SYSTEM_MODULES", false, true);
pub const UPGRADE_MODULE_PATH: StandardLocation =
    StandardLocation::new("UPGRADE_MODULE_PATH", false, true);
pub const PATCH_MODULE_PATH: StandardLocation =
    StandardLocation::new("PATCH_MODULE_PATH", false, true);

/// A `(parent-location, module-name)` pair. Identity is the pair itself, and a
/// `ModuleLocation` is always module-specific; it inherits output-ness from
/// its parent.
///
/// Construction is fallible: a `ModuleLocation` can never wrap another
/// `ModuleLocation`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ModuleLocation {
    parent: Box<Location>,
    module_name: ModuleName,
}

impl ModuleLocation {
    pub fn new(parent: Location, module_name: impl Into<ModuleName>) -> Result<Self, LocationError> {
        if let Location::Module(existing) = &parent {
            return Err(LocationError::NestedModuleLocation {
                parent: existing.name(),
            });
        }
        Ok(Self {
            parent: Box::new(parent),
            module_name: module_name.into(),
        })
    }

    pub fn parent(&self) -> &Location {
        &self.parent
    }

    pub fn module_name(&self) -> &ModuleName {
        &self.module_name
    }

    pub fn name(&self) -> String {
        format!("{}[{}]", self.parent.name(), self.module_name)
    }
}

/// A named role a file tree plays in compilation.
///
/// Either a well-known [`StandardLocation`] or a [`ModuleLocation`] scoping a
/// parent location to a single module.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Location {
    Standard(StandardLocation),
    Module(ModuleLocation),
}

impl Location {
    pub fn name(&self) -> String {
        match self {
            Location::Standard(s) => s.name().to_string(),
            Location::Module(m) => m.name(),
        }
    }

    /// True if the compiler writes into this location.
    ///
    /// A `ModuleLocation` inherits output-ness from its parent.
    pub fn is_output(&self) -> bool {
        match self {
            Location::Standard(s) => s.is_output(),
            Location::Module(m) => m.parent().is_output(),
        }
    }

    /// True if this location's contents are addressed by module name first.
    ///
    /// Every `ModuleLocation` is module-oriented by construction.
    pub fn is_module_oriented(&self) -> bool {
        match self {
            Location::Standard(s) => s.is_module_oriented(),
            Location::Module(_) => true,
        }
    }

    /// True iff this is a `ModuleLocation` (scoped to one named module).
    pub fn is_module_specific(&self) -> bool {
        matches!(self, Location::Module(_))
    }

    pub fn as_module(&self) -> Option<&ModuleLocation> {
        match self {
            Location::Module(m) => Some(m),
            Location::Standard(_) => None,
        }
    }
}

impl From<StandardLocation> for Location {
    fn from(value: StandardLocation) -> Self {
        Location::Standard(value)
    }
}

impl From<ModuleLocation> for Location {
    fn from(value: ModuleLocation) -> Self {
        Location::Module(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_output_locations_match_known_roles() {
        assert!(Location::from(CLASS_OUTPUT).is_output());
        assert!(Location::from(SOURCE_OUTPUT).is_output());
        assert!(Location::from(NATIVE_HEADER_OUTPUT).is_output());
        assert!(!Location::from(CLASS_PATH).is_output());
    }

    #[test]
    fn standard_module_oriented_locations_match_known_roles() {
        for loc in [
            MODULE_PATH,
            MODULE_SOURCE_PATH,
            ANNOTATION_PROCESSOR_MODULE_PATH,
            SYSTEM_MODULES,
            UPGRADE_MODULE_PATH,
            PATCH_MODULE_PATH,
        ] {
            assert!(Location::from(loc).is_module_oriented(), "{}", loc.name());
        }
        for loc in [CLASS_PATH, SOURCE_PATH, ANNOTATION_PROCESSOR_PATH] {
            assert!(!Location::from(loc).is_module_oriented(), "{}", loc.name());
        }
    }

    #[test]
    fn module_location_inherits_parent_output_ness() {
        let output_module = ModuleLocation::new(Location::from(CLASS_OUTPUT), "m.one").unwrap();
        assert!(Location::from(output_module).is_output());

        let path_module = ModuleLocation::new(Location::from(MODULE_PATH), "m.one").unwrap();
        assert!(!Location::from(path_module).is_output());
    }

    #[test]
    fn module_location_is_always_module_oriented_and_module_specific() {
        let module = ModuleLocation::new(Location::from(MODULE_PATH), "m.one").unwrap();
        let location = Location::from(module);
        assert!(location.is_module_oriented());
        assert!(location.is_module_specific());
    }

    #[test]
    fn nesting_a_module_location_is_rejected() {
        let inner = ModuleLocation::new(Location::from(MODULE_PATH), "m.one").unwrap();
        let err = ModuleLocation::new(Location::from(inner), "m.two").unwrap_err();
        assert!(matches!(err, LocationError::NestedModuleLocation { .. }));
    }

    #[test]
    fn module_locations_are_equal_iff_both_components_match() {
        let a = ModuleLocation::new(Location::from(MODULE_PATH), "m.one").unwrap();
        let b = ModuleLocation::new(Location::from(MODULE_PATH), "m.one").unwrap();
        let c = ModuleLocation::new(Location::from(MODULE_PATH), "m.two").unwrap();
        let d = ModuleLocation::new(Location::from(CLASS_OUTPUT), "m.one").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, d);
    }
}
