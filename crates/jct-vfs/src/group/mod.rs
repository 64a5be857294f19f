pub mod module;
pub mod output;
pub mod package;

pub use module::{ModuleContainerGroup, ModuleGraph};
pub use output::OutputContainerGroup;
pub use package::PackageContainerGroup;
