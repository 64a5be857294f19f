use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LocationError {
    #[error("cannot nest a ModuleLocation inside another ModuleLocation (parent was {parent:?})")]
    NestedModuleLocation { parent: String },
}
