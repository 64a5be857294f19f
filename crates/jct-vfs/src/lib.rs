//! The virtual file-manager core of a JSR-199-style compiler test harness:
//! containers and groups aggregate disk directories, in-memory directories,
//! and mounted archives behind a location-keyed read/write interface, and a
//! [`Workspace`] owns their lifecycle end to end.

mod class_loader;
mod container;
mod error;
mod file_object;
mod frontend;
mod group;
mod jar;
mod memfs;
mod path_root;
mod workspace;

pub use class_loader::ContainerClassLoader;
pub use container::{Container, ModuleFinderView};
pub use error::VfsError;
pub use file_object::{AccessLevel, FileObject, NestingKind};
pub use frontend::{CompilationResult, CompilerInvoker, Diagnostic, DiagnosticKind, FlagBuilder};
pub use group::{ModuleContainerGroup, ModuleGraph, OutputContainerGroup, PackageContainerGroup};
pub use jar::write_directory_as_jar;
pub use memfs::MemoryFileSystem;
pub use path_root::PathRoot;
pub use workspace::{PathStrategy, Workspace};

pub use jct_location::{
    binary_name_to_relative_path, relative_path_to_binary_name, try_extract_module_prefix, Kind,
    Location, LocationError, ModuleLocation, ModuleName, StandardLocation, ANNOTATION_PROCESSOR_MODULE_PATH,
    ANNOTATION_PROCESSOR_PATH, CLASS_OUTPUT, CLASS_PATH, MODULE_PATH, MODULE_SOURCE_PATH, NATIVE_HEADER_OUTPUT,
    PATCH_MODULE_PATH, PLATFORM_CLASS_PATH, SOURCE_OUTPUT, SOURCE_PATH, SYSTEM_MODULES, UPGRADE_MODULE_PATH,
};
pub use jct_archive::{ArchiveError, ArchiveMount};
