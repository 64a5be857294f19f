use std::io::Write;
use std::path::Path;

use zip::write::FileOptions;
use zip::ZipWriter;

use crate::error::VfsError;
use crate::memfs::MemoryFileSystem;
use crate::path_root::PathRoot;

/// Writes the contents of `root` into a flat zip archive at `output_path`,
/// with forward-slash entry names preserving the root's relative directory
/// structure. No special compression tuning is applied.
pub fn write_directory_as_jar(root: &PathRoot, output_path: &Path) -> Result<(), VfsError> {
    match root {
        PathRoot::Disk { root } => write_disk_as_jar(root, output_path),
        PathRoot::Memory { fs, .. } => write_memory_as_jar(fs, output_path),
        PathRoot::Archive { .. } => Err(VfsError::InvalidInput(
            "cannot write a jar from a read-only archive root".to_string(),
        )),
    }
}

fn write_disk_as_jar(root: &Path, output_path: &Path) -> Result<(), VfsError> {
    let file = std::fs::File::create(output_path)?;
    let mut zip = ZipWriter::new(file);
    let options = FileOptions::<()>::default();

    for entry in walkdir::WalkDir::new(root).into_iter().filter_map(Result::ok) {
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
        let entry_name = to_zip_entry_name(relative);
        zip.start_file(entry_name, options)?;
        let bytes = std::fs::read(entry.path())?;
        zip.write_all(&bytes)?;
    }

    zip.finish()?;
    Ok(())
}

fn write_memory_as_jar(fs: &MemoryFileSystem, output_path: &Path) -> Result<(), VfsError> {
    let file = std::fs::File::create(output_path)?;
    let mut zip = ZipWriter::new(file);
    let options = FileOptions::<()>::default();

    for relative in fs.list_dir(Path::new(""), true) {
        let Some(bytes) = fs.read(&relative) else { continue };
        zip.start_file(to_zip_entry_name(&relative), options)?;
        zip.write_all(&bytes)?;
    }

    zip.finish()?;
    Ok(())
}

fn to_zip_entry_name(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
