//! End-to-end scenarios driving a [`Workspace`] the way a compiler frontend
//! would: writing sources, listing them, compiling with a fake
//! [`CompilerInvoker`], and reading back generated classes.

use std::io::Write;
use std::path::Path;

use jct_vfs::{
    CompilationResult, CompilerInvoker, Diagnostic, FileObject, FlagBuilder, Kind, Location, ModuleLocation,
    PathStrategy, VfsError, Workspace, CLASS_OUTPUT, CLASS_PATH,
};

#[derive(Default)]
struct VecFlags(Vec<String>);

impl FlagBuilder for VecFlags {
    fn add(&mut self, flag: impl Into<String>) -> &mut Self {
        self.0.push(flag.into());
        self
    }

    fn build(&self) -> Vec<String> {
        self.0.clone()
    }
}

/// A compiler double: "compiles" each source by writing a fixed byte payload
/// to the corresponding class file under the class-output location.
struct FakeCompiler<'a> {
    workspace: &'a Workspace,
}

impl<'a> CompilerInvoker for FakeCompiler<'a> {
    type Flags = VecFlags;

    fn new_flags(&self) -> VecFlags {
        VecFlags::default()
    }

    fn compile(&self, _flags: &VecFlags, compilation_units: &[FileObject], _source_kind: Kind) -> CompilationResult {
        let mut diagnostics = Vec::new();
        for unit in compilation_units {
            let Some(binary_name) = infer_binary_name(unit) else {
                diagnostics.push(Diagnostic::error(format!("cannot name {:?}", unit)));
                continue;
            };
            let class_output = Location::from(CLASS_OUTPUT);
            let class_file = match self.workspace.get_java_file_for_output(&class_output, &binary_name, Kind::Class) {
                Ok(Some(file)) => file,
                _ => {
                    diagnostics.push(Diagnostic::error("no writable class output"));
                    continue;
                }
            };
            if let Err(e) = class_file.open_output_stream().and_then(|mut w| w.write_all(b"CAFEBABE").map_err(VfsError::from)) {
                diagnostics.push(Diagnostic::error(e.to_string()));
            }
        }
        if diagnostics.iter().any(Diagnostic::is_error) {
            CompilationResult::failure(diagnostics)
        } else {
            CompilationResult::success(diagnostics)
        }
    }
}

fn infer_binary_name(unit: &FileObject) -> Option<String> {
    let relative = unit.relative_path();
    jct_vfs::relative_path_to_binary_name(&relative, Kind::Source)
}

/// S1: a single in-memory source compiles, and the class output location
/// ends up with exactly the one class file the fake compiler produced.
#[test]
fn single_file_compile_produces_expected_class_output() {
    let workspace = Workspace::new(PathStrategy::InMemory);
    let source_path = Location::from(jct_vfs::SOURCE_PATH);
    let class_output = Location::from(CLASS_OUTPUT);

    workspace.create_package(source_path.clone()).unwrap();
    workspace.create_package(class_output.clone()).unwrap();

    let source = workspace
        .get_java_file_for_output(&source_path, "pkg.Hello", Kind::Source)
        .unwrap()
        .unwrap();
    source.open_output_stream().unwrap().write_all(b"package pkg; class Hello {}").unwrap();

    let sources = workspace.list(&source_path, "pkg", &[Kind::Source], false).unwrap();
    assert_eq!(sources.len(), 1);

    let compiler = FakeCompiler { workspace: &workspace };
    let flags = compiler.new_flags();
    let result = compiler.compile(&flags, &sources, Kind::Source);

    assert!(result.success, "diagnostics: {:?}", result.diagnostics);
    assert!(result.diagnostics.is_empty());

    let class_bytes = workspace.get_class_binary(&class_output, "pkg.Hello").unwrap();
    assert_eq!(class_bytes, Some(b"CAFEBABE".to_vec()));

    workspace.close().unwrap();
}

fn write_file(dir: &Path, relative: &str, bytes: &[u8]) {
    let path = dir.join(relative);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, bytes).unwrap();
}

/// S3 + property 10: first-match read ordering across containers, and a
/// class loader snapshot taken before a later `add_package` never observes
/// what that add introduced, while a fresh snapshot does.
#[test]
fn first_match_ordering_and_class_loader_snapshot_isolation() {
    let workspace = Workspace::new(PathStrategy::TempDisk);
    let class_path = Location::from(CLASS_PATH);

    let dir_a = tempfile::tempdir().unwrap();
    write_file(dir_a.path(), "x/Y.class", b"A");
    workspace.add_package(class_path.clone(), dir_a.path()).unwrap();

    let loader_before = workspace.class_loader(&class_path).unwrap();
    assert_eq!(loader_before.find_class("x.Y").unwrap(), b"A".to_vec());

    let dir_b = tempfile::tempdir().unwrap();
    write_file(dir_b.path(), "x/Y.class", b"B");
    write_file(dir_b.path(), "x/Z.class", b"Z");
    workspace.add_package(class_path.clone(), dir_b.path()).unwrap();

    // First-match ordering: A was added first, so its bytes win.
    assert_eq!(
        workspace.get_class_binary(&class_path, "x.Y").unwrap(),
        Some(b"A".to_vec())
    );

    // The pre-add snapshot never sees container B's contribution.
    assert_eq!(loader_before.find_class("x.Y").unwrap(), b"A".to_vec());
    assert!(matches!(loader_before.find_class("x.Z"), Err(VfsError::ClassNotFound(_))));

    // A freshly obtained loader sees both containers.
    let loader_after = workspace.class_loader(&class_path).unwrap();
    assert_eq!(loader_after.find_class("x.Y").unwrap(), b"A".to_vec());
    assert_eq!(loader_after.find_class("x.Z").unwrap(), b"Z".to_vec());

    workspace.close().unwrap();
}

/// S4: writing through a module-prefixed binary name under an output
/// location lands under `<module-root>/pkg/Z.class`.
#[test]
fn module_routing_lands_under_module_subdirectory() {
    let workspace = Workspace::new(PathStrategy::TempDisk);
    let class_output = Location::from(CLASS_OUTPUT);

    let module_root = workspace.create_module(class_output.clone(), "m.one").unwrap();

    let file = workspace
        .get_java_file_for_output(&class_output, "m.one/pkg.Z", Kind::Class)
        .unwrap()
        .unwrap();
    file.open_output_stream().unwrap().write_all(b"Z-bytes").unwrap();

    let expected = module_root.join("pkg").join("Z.class");
    assert!(expected.is_file(), "expected {expected:?} to exist");
    assert_eq!(std::fs::read(&expected).unwrap(), b"Z-bytes");

    let module_location: Location = ModuleLocation::new(class_output, "m.one").unwrap().into();
    let listed = workspace.list(&module_location, "pkg", &[Kind::Class], false).unwrap();
    assert_eq!(listed.len(), 1);

    workspace.close().unwrap();
}

/// S2: a ZIP archive on the class path is readable by binary name, absent
/// classes report none rather than an error, and `list` returns exactly the
/// single matching entry.
#[test]
fn archive_classpath_entry_is_readable_by_binary_name() {
    let workspace = Workspace::new(PathStrategy::TempDisk);
    let class_path = Location::from(CLASS_PATH);

    let archive_dir = tempfile::tempdir().unwrap();
    let archive_path = archive_dir.path().join("lib.jar");
    let payload = vec![7u8; 118];
    {
        let file = std::fs::File::create(&archive_path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        zip.start_file("a/b/C.class", zip::write::FileOptions::<()>::default()).unwrap();
        zip.write_all(&payload).unwrap();
        zip.finish().unwrap();
    }

    workspace.add_package(class_path.clone(), &archive_path).unwrap();

    assert_eq!(workspace.get_class_binary(&class_path, "a.b.C").unwrap(), Some(payload));
    assert_eq!(workspace.get_class_binary(&class_path, "a.b.D").unwrap(), None);

    let listed = workspace.list(&class_path, "a.b", &[Kind::Class], false).unwrap();
    assert_eq!(listed.len(), 1);

    workspace.close().unwrap();
}

/// S6 (positive path): closing a workspace with several groups, each holding
/// several containers including a mounted archive, runs every close and
/// succeeds as a whole. Failure aggregation itself (collecting several
/// distinct errors into one `VfsError::Aggregate` rather than short-circuiting
/// on the first) is exercised directly against synthetic errors in
/// `error.rs`'s unit tests, since nothing in this core's supported containers
/// can be made to fail a close deterministically through the public API.
#[test]
fn close_runs_every_group_and_container_without_short_circuiting() {
    let workspace = Workspace::new(PathStrategy::TempDisk);
    let class_path = Location::from(CLASS_PATH);
    let class_output = Location::from(CLASS_OUTPUT);

    let dir_a = tempfile::tempdir().unwrap();
    write_file(dir_a.path(), "x/Y.class", b"A");
    workspace.add_package(class_path.clone(), dir_a.path()).unwrap();

    let dir_b = tempfile::tempdir().unwrap();
    write_file(dir_b.path(), "x/Z.class", b"B");
    workspace.add_package(class_path.clone(), dir_b.path()).unwrap();

    let archive_dir = tempfile::tempdir().unwrap();
    let archive_path = archive_dir.path().join("lib.jar");
    {
        let file = std::fs::File::create(&archive_path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        zip.start_file("x/W.class", zip::write::FileOptions::<()>::default()).unwrap();
        zip.write_all(b"W").unwrap();
        zip.finish().unwrap();
    }
    workspace.add_package(class_path.clone(), &archive_path).unwrap();
    // Force the archive to actually mount (lazily opened on first access).
    assert!(workspace.get_class_binary(&class_path, "x.W").unwrap().is_some());

    workspace.create_module(class_output.clone(), "m.one").unwrap();
    assert!(workspace.get_class_binary(&class_path, "x.Y").unwrap().is_some());

    workspace.close().unwrap();
}
