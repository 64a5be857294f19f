//! Trait contracts for the compiler frontend this core feeds. No real
//! `javac`-equivalent implementation lives here — only the stable interface a
//! test double or a future real adapter is written against.

use std::path::PathBuf;

use jct_location::Kind;

use crate::file_object::FileObject;

/// Diagnostic severity, mirroring the common `source, message, position`
/// triple every JSR-199-style diagnostic listener reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DiagnosticKind {
    Error,
    Warning,
    Mandatory,
    Note,
    Other,
}

/// One diagnostic emitted during a compilation.
#[derive(Clone, Debug)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    pub source: Option<PathBuf>,
    pub line: Option<u32>,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: DiagnosticKind::Error,
            message: message.into(),
            source: None,
            line: None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.kind, DiagnosticKind::Error | DiagnosticKind::Mandatory)
    }
}

/// The outcome of one compilation run.
#[derive(Clone, Debug)]
pub struct CompilationResult {
    pub success: bool,
    pub diagnostics: Vec<Diagnostic>,
}

impl CompilationResult {
    pub fn success(diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            success: true,
            diagnostics,
        }
    }

    pub fn failure(diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            success: false,
            diagnostics,
        }
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

/// Accumulates the flag list a `CompilerInvoker` is run with. Kept abstract
/// over concrete flag syntax so a fake frontend in a test does not need to
/// agree with a real one on spelling.
pub trait FlagBuilder {
    fn add(&mut self, flag: impl Into<String>) -> &mut Self;
    fn add_all(&mut self, flags: impl IntoIterator<Item = impl Into<String>>) -> &mut Self
    where
        Self: Sized,
    {
        for flag in flags {
            self.add(flag);
        }
        self
    }
    fn build(&self) -> Vec<String>;
}

/// A compiler the core can hand a configured file manager, a flag list, and a
/// set of source file objects to compile.
///
/// Implementors own the actual compiler invocation (in-process `javac`-style
/// call, subprocess, or a test fake). This core never implements one itself.
pub trait CompilerInvoker {
    type Flags: FlagBuilder;

    fn new_flags(&self) -> Self::Flags;

    fn compile(
        &self,
        flags: &Self::Flags,
        compilation_units: &[FileObject],
        source_kind: Kind,
    ) -> CompilationResult;
}
