//! Universal invariants (not tied to one end-to-end scenario) checked
//! against the public [`Workspace`] API.

use jct_vfs::{Kind, Location, ModuleLocation, PathStrategy, VfsError, Workspace, CLASS_OUTPUT, CLASS_PATH, MODULE_PATH};

/// Property 2: adding a non-existent disk path is rejected as invalid input
/// and leaves the workspace's group untouched.
#[test]
fn add_package_rejects_nonexistent_path() {
    let workspace = Workspace::new(PathStrategy::TempDisk);
    let class_path = Location::from(CLASS_PATH);
    let missing = tempfile::tempdir().unwrap().path().join("does-not-exist");

    let err = workspace.add_package(class_path.clone(), &missing).unwrap_err();
    assert!(matches!(err, VfsError::PathNotFound(_)));

    assert_eq!(workspace.get_class_binary(&class_path, "a.B").unwrap(), None);
}

/// Property 3: a module-oriented, non-output location rejects `add_package`.
#[test]
fn add_package_rejects_module_oriented_non_output_location() {
    let workspace = Workspace::new(PathStrategy::TempDisk);
    let dir = tempfile::tempdir().unwrap();

    let err = workspace.add_package(Location::from(MODULE_PATH), dir.path()).unwrap_err();
    assert!(matches!(err, VfsError::InvalidInput(_)));
}

/// Property 4: nesting a module inside a `ModuleLocation` is rejected.
#[test]
fn add_module_rejects_nesting_inside_a_module_location() {
    let workspace = Workspace::new(PathStrategy::TempDisk);
    let dir = tempfile::tempdir().unwrap();

    let inner: Location = ModuleLocation::new(Location::from(MODULE_PATH), "m.one").unwrap().into();
    let err = workspace.add_module(inner, "m.two", dir.path()).unwrap_err();
    assert!(matches!(err, VfsError::InvalidInput(_)));
}

/// Property 6: every regular file written under a container's root is
/// reported present by the workspace that owns it.
#[test]
fn every_written_file_is_reported_present() {
    let workspace = Workspace::new(PathStrategy::TempDisk);
    let class_output = Location::from(CLASS_OUTPUT);
    workspace.create_package(class_output.clone()).unwrap();

    for name in ["a.B", "a.b.C", "Top"] {
        let file = workspace
            .get_java_file_for_output(&class_output, name, Kind::Class)
            .unwrap()
            .unwrap();
        file.open_output_stream().unwrap();
        std::io::Write::write_all(&mut file.open_output_stream().unwrap(), b"x").unwrap();

        let read_back = workspace.get_java_file_for_input(&class_output, name, Kind::Class).unwrap();
        assert!(read_back.is_some(), "{name} should be present after writing");
    }

    workspace.close().unwrap();
}

/// Module-oriented locations accept `add_module` and route lookups by module
/// prefix even when the backing disk path is added directly (not created
/// through `create_module`).
#[test]
fn add_module_on_module_path_is_discoverable_by_prefix() {
    let workspace = Workspace::new(PathStrategy::TempDisk);
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("pkg")).unwrap();
    std::fs::write(dir.path().join("pkg").join("Widget.class"), b"bytes").unwrap();

    workspace.add_module(Location::from(MODULE_PATH), "m.one", dir.path()).unwrap();

    let module_path = Location::from(MODULE_PATH);
    let binary = workspace.get_class_binary(&module_path, "m.one/pkg.Widget").unwrap();
    assert_eq!(binary, Some(b"bytes".to_vec()));

    workspace.close().unwrap();
}
