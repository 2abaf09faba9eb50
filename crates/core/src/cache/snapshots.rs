//! Snapshot file compare-and-store.
//!
//! The whole file content is the last-seen normalized fragment. No header, no
//! metadata, so the file can be inspected or seeded by hand.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tempfile::NamedTempFile;

use crate::Error;

/// How the current fragment relates to the stored snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    /// No snapshot existed; it now holds the current fragment.
    Created,
    /// Snapshot matches byte-for-byte and was left untouched.
    Unchanged,
    /// Snapshot differed and was replaced.
    Changed,
}

/// Handle to one target's snapshot file.
#[derive(Debug, Clone)]
pub struct SnapshotFile {
    path: PathBuf,
}

impl SnapshotFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored snapshot, if any.
    pub fn read(&self) -> Result<Option<String>, Error> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::cache(format!("reading {}", self.path.display()), e)),
        }
    }

    /// Sibling file holding the advisory lock, `<name>.lock`.
    pub fn lock_path(&self) -> Result<PathBuf, Error> {
        let name = self.path.file_name().ok_or_else(|| {
            Error::cache(
                format!("resolving {}", self.path.display()),
                io::Error::new(io::ErrorKind::InvalidInput, "snapshot path has no file name"),
            )
        })?;

        let mut lock_name = name.to_os_string();
        lock_name.push(".lock");
        Ok(self.path.with_file_name(lock_name))
    }

    fn dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    /// Compare `text` against the snapshot and store it when it differs.
    ///
    /// The read-compare-write sequence runs under an exclusive advisory lock on
    /// a sibling lock file, so processes sharing one path are serialized. The
    /// new content is written to a temporary file in the same directory and
    /// renamed over the snapshot, so a failed write leaves the previous
    /// snapshot intact.
    pub fn compare_and_store(&self, text: &str) -> Result<Comparison, Error> {
        let dir = self.dir();
        fs::create_dir_all(dir).map_err(|e| Error::cache(format!("creating {}", dir.display()), e))?;

        let lock_path = self.lock_path()?;
        let lock = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|e| Error::cache(format!("opening {}", lock_path.display()), e))?;

        lock.lock_exclusive()
            .map_err(|e| Error::cache(format!("locking {}", lock_path.display()), e))?;

        let result = self.compare_locked(text);
        let _ = FileExt::unlock(&lock);
        result
    }

    fn compare_locked(&self, text: &str) -> Result<Comparison, Error> {
        let shown = self.path.display();

        let previous = match fs::read(&self.path) {
            Ok(bytes) => Some(bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => return Err(Error::cache(format!("reading {shown}"), e)),
        };

        match previous {
            None => {
                replace(self.dir(), &self.path, text).map_err(|e| Error::cache(format!("writing {shown}"), e))?;
                tracing::debug!("created snapshot {}", shown);
                Ok(Comparison::Created)
            }
            Some(previous) if previous == text.as_bytes() => Ok(Comparison::Unchanged),
            Some(previous) => {
                replace(self.dir(), &self.path, text).map_err(|e| Error::cache(format!("writing {shown}"), e))?;
                tracing::debug!("updated snapshot {} ({} -> {} bytes)", shown, previous.len(), text.len());
                Ok(Comparison::Changed)
            }
        }
    }
}

/// Write `text` to a temporary file in `dir`, then rename it onto `path`.
fn replace(dir: &Path, path: &Path, text: &str) -> io::Result<()> {
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(text.as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
