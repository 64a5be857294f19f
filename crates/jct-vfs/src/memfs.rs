use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use parking_lot::RwLock;

struct Entry {
    bytes: Vec<u8>,
    last_modified: SystemTime,
}

/// A POSIX-like in-memory directory tree, owned for its lifetime by whichever
/// [`Workspace`](crate::workspace::Workspace) created it.
///
/// Paths are stored normalized (no `.`/`..`, forward slashes on every
/// platform) relative to this filesystem's own root; callers never see that
/// normalization directly, they just pass `Path`s in and out.
pub struct MemoryFileSystem {
    name: String,
    files: RwLock<HashMap<PathBuf, Entry>>,
}

impl MemoryFileSystem {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            files: RwLock::new(HashMap::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn read(&self, path: &Path) -> Option<Vec<u8>> {
        self.files.read().get(path).map(|entry| entry.bytes.clone())
    }

    pub fn write(&self, path: &Path, bytes: Vec<u8>) {
        self.files.write().insert(
            path.to_path_buf(),
            Entry {
                bytes,
                last_modified: SystemTime::now(),
            },
        );
    }

    pub fn contains_file(&self, path: &Path) -> bool {
        self.files.read().contains_key(path)
    }

    pub fn last_modified(&self, path: &Path) -> Option<SystemTime> {
        self.files.read().get(path).map(|entry| entry.last_modified)
    }

    pub fn delete(&self, path: &Path) -> bool {
        self.files.write().remove(path).is_some()
    }

    /// Every file directly under `dir`, or transitively if `recurse`.
    pub fn list_dir(&self, dir: &Path, recurse: bool) -> Vec<PathBuf> {
        let files = self.files.read();
        let mut matches: Vec<PathBuf> = files
            .keys()
            .filter(|path| {
                let parent = path.parent().unwrap_or_else(|| Path::new(""));
                if recurse {
                    parent == dir || parent.starts_with(dir)
                } else {
                    parent == dir
                }
            })
            .cloned()
            .collect();
        matches.sort();
        matches
    }

    /// Drops every file. Closing an in-memory filesystem is its own
    /// teardown; there is no background finalizer to wait on.
    pub fn close(&self) {
        self.files.write().clear();
    }
}

pub struct MemoryWriteHandle {
    fs: std::sync::Arc<MemoryFileSystem>,
    path: PathBuf,
    buf: Vec<u8>,
}

impl MemoryWriteHandle {
    pub fn new(fs: std::sync::Arc<MemoryFileSystem>, path: PathBuf) -> Self {
        Self {
            fs,
            path,
            buf: Vec::new(),
        }
    }
}

impl io::Write for MemoryWriteHandle {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for MemoryWriteHandle {
    fn drop(&mut self) {
        self.fs.write(&self.path, std::mem::take(&mut self.buf));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_then_read_round_trips() {
        let fs = MemoryFileSystem::new("test");
        fs.write(Path::new("a/B.class"), vec![1, 2, 3]);
        assert_eq!(fs.read(Path::new("a/B.class")), Some(vec![1, 2, 3]));
        assert!(fs.contains_file(Path::new("a/B.class")));
        assert!(!fs.contains_file(Path::new("a/Missing.class")));
    }

    #[test]
    fn list_dir_respects_recursion() {
        let fs = MemoryFileSystem::new("test");
        fs.write(Path::new("a/B.class"), vec![]);
        fs.write(Path::new("a/b/C.class"), vec![]);
        fs.write(Path::new("z/D.class"), vec![]);

        let shallow = fs.list_dir(Path::new("a"), false);
        assert_eq!(shallow, vec![PathBuf::from("a/B.class")]);

        let mut deep = fs.list_dir(Path::new("a"), true);
        deep.sort();
        assert_eq!(deep, vec![PathBuf::from("a/B.class"), PathBuf::from("a/b/C.class")]);
    }

    #[test]
    fn write_handle_flushes_on_drop() {
        let fs = std::sync::Arc::new(MemoryFileSystem::new("test"));
        {
            let mut handle = MemoryWriteHandle::new(fs.clone(), PathBuf::from("out/X.class"));
            std::io::Write::write_all(&mut handle, b"hello").unwrap();
        }
        assert_eq!(fs.read(Path::new("out/X.class")), Some(b"hello".to_vec()));
    }
}
