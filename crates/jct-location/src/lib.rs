//! Location identifiers, file kinds, and binary-name/path conversions shared
//! across the java-compiler-testing virtual file manager.
//!
//! This crate is intentionally small and dependency-light, mirroring
//! `nova-core`'s role as the shared, low-level vocabulary crate the rest of
//! the workspace builds on.

mod binary_name;
mod error;
mod kind;
mod location;
mod module_name;

pub use binary_name::{
    binary_name_to_relative_path, is_valid_module_name, relative_path_to_binary_name,
    try_extract_module_prefix,
};
pub use error::LocationError;
pub use kind::Kind;
pub use location::{
    Location, ModuleLocation, StandardLocation, ANNOTATION_PROCESSOR_MODULE_PATH,
    ANNOTATION_PROCESSOR_PATH, CLASS_OUTPUT, CLASS_PATH, MODULE_PATH, MODULE_SOURCE_PATH,
    NATIVE_HEADER_OUTPUT, PATCH_MODULE_PATH, PLATFORM_CLASS_PATH, SOURCE_OUTPUT, SOURCE_PATH,
    SYSTEM_MODULES, UPGRADE_MODULE_PATH,
};
pub use module_name::ModuleName;
