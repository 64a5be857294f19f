use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tempfile::TempDir;
use zip::ZipArchive;

use crate::error::ArchiveError;

enum Lifecycle {
    NotMounted,
    Mounted(MountState),
    Closed,
}

struct MountState {
    // Held only for its `Drop` impl, which recursively removes the temp dir
    // (and the symlink/copy inside it) once the mount is closed.
    _temp_dir: TempDir,
    archive: Mutex<ZipArchive<File>>,
    /// Forward-slash logical path (post multi-release resolution) -> actual
    /// zip entry name.
    entries: HashMap<String, String>,
}

/// A lazily-opened, read-only view of an archive file (JAR/WAR/ZIP/JMOD),
/// mounted on a unique per-instance backing link so that many concurrent
/// `ArchiveMount`s over the same underlying file never contend on one open
/// handle.
pub struct ArchiveMount {
    archive_path: PathBuf,
    release_version: Option<u16>,
    lifecycle: Mutex<Lifecycle>,
}

impl std::fmt::Debug for ArchiveMount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArchiveMount")
            .field("archive_path", &self.archive_path)
            .field("release_version", &self.release_version)
            .finish()
    }
}

impl ArchiveMount {
    pub fn new(archive_path: impl Into<PathBuf>, release_version: Option<u16>) -> Self {
        Self {
            archive_path: archive_path.into(),
            release_version,
            lifecycle: Mutex::new(Lifecycle::NotMounted),
        }
    }

    pub fn archive_path(&self) -> &Path {
        &self.archive_path
    }

    pub fn release_version(&self) -> Option<u16> {
        self.release_version
    }

    /// Read a single entry by its logical (multi-release-resolved) relative
    /// path, e.g. `"a/b/C.class"`. Returns `Ok(None)` if absent — absence is
    /// never an error.
    pub fn read(&self, logical_relative_path: &str) -> Result<Option<Vec<u8>>, ArchiveError> {
        self.with_mounted(|state| {
            let Some(actual_name) = state.entries.get(logical_relative_path) else {
                return Ok(None);
            };
            let mut archive = state.archive.lock().unwrap();
            let mut entry = archive.by_name(actual_name)?;
            let mut bytes = Vec::with_capacity(entry.size() as usize);
            entry.read_to_end(&mut bytes)?;
            Ok(Some(bytes))
        })
    }

    /// True iff `logical_relative_path` names a regular file in the archive.
    pub fn contains(&self, logical_relative_path: &str) -> Result<bool, ArchiveError> {
        self.with_mounted(|state| Ok(state.entries.contains_key(logical_relative_path)))
    }

    /// List logical relative paths directly under `package` (dotted form, may
    /// be empty for the default package), or everything transitively under it
    /// when `recurse` is set.
    pub fn list(&self, package: &str, recurse: bool) -> Result<Vec<String>, ArchiveError> {
        self.with_mounted(|state| {
            let package_path = package.replace('.', "/");
            let mut out = Vec::new();
            for logical in state.entries.keys() {
                let dir = logical.rsplit_once('/').map(|(p, _)| p).unwrap_or("");
                let matches = if package_path.is_empty() {
                    recurse || dir.is_empty()
                } else if recurse {
                    dir == package_path || dir.starts_with(&format!("{package_path}/"))
                } else {
                    dir == package_path
                };
                if matches {
                    out.push(logical.clone());
                }
            }
            out.sort();
            Ok(out)
        })
    }

    /// Idempotent: clears the entry index, closes the archive handle, and
    /// recursively removes the backing temp dir. A no-op if never mounted or
    /// already closed.
    pub fn close(&self) -> Result<(), ArchiveError> {
        let mut lifecycle = self.lifecycle.lock().unwrap();
        if let Lifecycle::Mounted(state) = std::mem::replace(&mut *lifecycle, Lifecycle::Closed) {
            drop(state.archive);
            drop(state._temp_dir);
        }
        Ok(())
    }

    pub fn is_mounted(&self) -> bool {
        matches!(&*self.lifecycle.lock().unwrap(), Lifecycle::Mounted(_))
    }

    fn with_mounted<R>(
        &self,
        f: impl FnOnce(&MountState) -> Result<R, ArchiveError>,
    ) -> Result<R, ArchiveError> {
        let mut lifecycle = self.lifecycle.lock().unwrap();
        match &*lifecycle {
            Lifecycle::Closed => return Err(ArchiveError::Closed),
            Lifecycle::Mounted(_) => {}
            Lifecycle::NotMounted => {
                tracing::debug!(archive = %self.archive_path.display(), "mounting archive");
                let mounted = Self::mount(&self.archive_path, self.release_version)?;
                *lifecycle = Lifecycle::Mounted(mounted);
            }
        }
        match &*lifecycle {
            Lifecycle::Mounted(state) => f(state),
            _ => unreachable!("just ensured mounted"),
        }
    }

    fn mount(archive_path: &Path, release_version: Option<u16>) -> Result<MountState, ArchiveError> {
        let file_name = archive_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "archive".to_string());

        // Each mount gets its own temp dir, so many containers can point at
        // the same underlying archive without contending on a single open
        // file handle. On any failure below, `temp_dir` drops here and
        // recursively removes itself.
        let temp_dir = tempfile::Builder::new()
            .prefix(&format!("jct-archive-{file_name}-"))
            .tempdir()?;
        let link_path = temp_dir.path().join(&file_name);

        symlink_or_copy(archive_path, &link_path)?;

        let file = File::open(&link_path)?;
        let mut archive = ZipArchive::new(file)?;
        let entries = index_entries(&mut archive, release_version)?;

        Ok(MountState {
            _temp_dir: temp_dir,
            archive: Mutex::new(archive),
            entries,
        })
    }
}

fn symlink_or_copy(src: &Path, dst: &Path) -> std::io::Result<()> {
    #[cfg(unix)]
    {
        if std::os::unix::fs::symlink(src, dst).is_ok() {
            return Ok(());
        }
    }
    #[cfg(windows)]
    {
        if std::os::windows::fs::symlink_file(src, dst).is_ok() {
            return Ok(());
        }
    }
    std::fs::copy(src, dst).map(|_| ())
}

/// Walk every entry once and resolve multi-release overlays into a single
/// logical-path -> actual-entry-name map.
///
/// When `release_version` is `None`, base entries always win and a
/// `META-INF/versions/<n>/...` overlay is only used when the base entry is
/// missing (preferring the highest version present) -- the conservative
/// default used when the caller hasn't told us which JDK release to target.
/// When `Some(target)`, the highest version `<= target` wins, falling back to
/// the base entry if no qualifying overlay exists.
fn index_entries(
    archive: &mut ZipArchive<File>,
    release_version: Option<u16>,
) -> Result<HashMap<String, String>, ArchiveError> {
    let mut best: HashMap<String, (u32, String)> = HashMap::new();
    let target = release_version.map(u32::from);

    for i in 0..archive.len() {
        let entry = archive.by_index(i)?;
        if !entry.is_file() {
            continue;
        }
        let name = entry.name().to_string();
        drop(entry);

        let (logical, version) = match name.strip_prefix("META-INF/versions/") {
            Some(rest) => {
                let Some((version_str, path)) = rest.split_once('/') else {
                    continue;
                };
                if path.is_empty() {
                    continue;
                }
                let Ok(version) = version_str.parse::<u32>() else {
                    continue;
                };
                (path.to_string(), version)
            }
            None => (name.clone(), 0),
        };

        if let Some(target) = target {
            if version > target {
                continue;
            }
        }

        match best.get(&logical) {
            None => {
                best.insert(logical, (version, name));
            }
            Some((existing_version, _)) => {
                let replace = match target {
                    Some(_) => version > *existing_version,
                    None => *existing_version != 0 && (version == 0 || version > *existing_version),
                };
                if replace {
                    best.insert(logical, (version, name));
                }
            }
        }
    }

    Ok(best.into_iter().map(|(logical, (_, actual))| (logical, actual)).collect())
}
