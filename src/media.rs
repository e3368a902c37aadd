//! Managed media file storage.
//!
//! Recordings arrive as temporary files produced by the recording layer and
//! are moved (never copied) into a single managed directory, named by the
//! owning capsule id plus the canonical extension for the media kind.

use std::fs;
use std::path::{Path, PathBuf};

use sysinfo::Disks;
use tracing::warn;

use crate::capsule::MediaKind;
use crate::error::{Result, StoreError};

/// Disk usage for the managed directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UsageStats {
    /// Capacity of the volume holding the managed directory.
    pub total_bytes: u64,
    /// Free space on that volume.
    pub free_bytes: u64,
    /// Bytes consumed by managed media files.
    pub used_by_media_bytes: u64,
}

/// Owns the on-disk directory of permanent media files.
#[derive(Debug, Clone)]
pub struct MediaStore {
    dir: PathBuf,
}

impl MediaStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the managed files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Idempotently create the managed directory.
    pub fn ensure_ready(&self) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(|source| StoreError::StorageUnavailable {
            dir: self.dir.clone(),
            source,
        })
    }

    /// Move a temporary recording into managed storage.
    ///
    /// The managed name is `<stem>.<ext>` where `stem` is the owning capsule
    /// id. Returns the relative name; on success the temporary file no
    /// longer exists.
    pub fn adopt(&self, temp_path: &Path, kind: MediaKind, stem: &str) -> Result<String> {
        self.ensure_ready()?;

        if !temp_path.exists() {
            return Err(StoreError::SourceFileMissing {
                path: temp_path.to_path_buf(),
            });
        }

        let name = format!("{stem}.{}", kind.extension());
        let target = self.dir.join(&name);
        fs::rename(temp_path, &target).map_err(|source| StoreError::MoveFailed { source })?;

        Ok(name)
    }

    /// Best-effort deletion of a managed file.
    ///
    /// A missing file only warrants a warning: the metadata record is the
    /// source of truth and its removal must never be blocked here.
    pub fn remove(&self, name: &str) {
        let path = self.dir.join(name);
        if let Err(err) = fs::remove_file(&path) {
            warn!(file = %path.display(), error = %err, "failed to delete managed media file");
        }
    }

    /// Absolute path for a managed file name. Does not check existence.
    pub fn resolve(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    /// Disk usage of the managed directory and its volume.
    ///
    /// Individual stat failures are skipped with a warning rather than
    /// aborting the whole computation.
    pub fn usage_stats(&self) -> UsageStats {
        let mut used = 0u64;

        match fs::read_dir(&self.dir) {
            Ok(entries) => {
                for entry in entries {
                    let entry = match entry {
                        Ok(entry) => entry,
                        Err(err) => {
                            warn!(dir = %self.dir.display(), error = %err, "failed to read managed media entry");
                            continue;
                        }
                    };
                    match entry.metadata() {
                        Ok(meta) if meta.is_file() => used += meta.len(),
                        Ok(_) => {}
                        Err(err) => {
                            warn!(file = %entry.path().display(), error = %err, "failed to stat managed media file");
                        }
                    }
                }
            }
            Err(err) => {
                warn!(dir = %self.dir.display(), error = %err, "failed to scan managed media directory");
            }
        }

        let (total_bytes, free_bytes) = volume_space(&self.dir);
        UsageStats {
            total_bytes,
            free_bytes,
            used_by_media_bytes: used,
        }
    }
}

/// Total and available bytes for the volume containing `path`, picked by the
/// longest matching disk mount point.
fn volume_space(path: &Path) -> (u64, u64) {
    let canonical = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    let disks = Disks::new_with_refreshed_list();
    let best = disks
        .list()
        .iter()
        .filter(|disk| canonical.starts_with(disk.mount_point()))
        .max_by_key(|disk| disk.mount_point().as_os_str().len());

    match best {
        Some(disk) => (disk.total_space(), disk.available_space()),
        None => {
            warn!(path = %canonical.display(), "no disk found for managed media directory");
            (0, 0)
        }
    }
}
