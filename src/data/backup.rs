use chrono::{DateTime, FixedOffset, Utc};
use std::path::{Path, PathBuf};

use crate::{
    error::store::StoreError,
    model::backup::DocumentKind,
    util::time::{backup_stamp, is_backup_stamp},
};

/// Timestamped copies of the live documents.
///
/// Rotation generations are named `<kind>_<YYYYMMDD_HHMMSS>.json` and capped per kind.
/// Restore snapshots carry an extra label (`<kind>_pre_<stamp>.json`) and are never pruned.
pub struct BackupManager {
    dir: PathBuf,
    keep: usize,
    offset: FixedOffset,
}

impl BackupManager {
    /// Creates a backup manager.
    ///
    /// # Arguments
    /// - `dir` - Backup directory, created on first use
    /// - `keep` - Rotation generations kept per document kind
    /// - `offset` - Offset used to render the file name timestamps
    pub fn new(dir: impl Into<PathBuf>, keep: usize, offset: FixedOffset) -> Self {
        Self {
            dir: dir.into(),
            keep,
            offset,
        }
    }

    /// Copies every existing live document into a new rotation generation, then prunes.
    ///
    /// # Arguments
    /// - `data_dir` - Directory holding the live documents
    /// - `at` - Time used for the generation stamp
    ///
    /// # Returns
    /// - `Ok(Vec<String>)` - File names of the copies that were written
    /// - `Err(StoreError::Io)` - Directory creation or copy failed
    pub fn snapshot_all(
        &self,
        data_dir: &Path,
        at: DateTime<Utc>,
    ) -> Result<Vec<String>, StoreError> {
        self.ensure_dir()?;
        let stamp = backup_stamp(at, self.offset);

        let mut written = Vec::new();
        for kind in DocumentKind::ALL {
            let source = data_dir.join(kind.file_name());
            if !source.exists() {
                continue;
            }

            let name = kind.backup_file_name(&stamp);
            copy(&source, &self.dir.join(&name))?;
            written.push(name);
        }

        for kind in DocumentKind::ALL {
            if let Err(e) = self.prune(kind) {
                tracing::error!("Failed to prune {} backups: {}", kind, e);
            }
        }

        Ok(written)
    }

    /// Copies one live document into a labeled snapshot outside rotation.
    ///
    /// # Arguments
    /// - `kind` - Document kind, used as the file name prefix
    /// - `source` - Live file to copy
    /// - `label` - Label placed between kind and stamp (`pre`, `restored`)
    /// - `at` - Time used for the stamp
    ///
    /// # Returns
    /// - `Ok(Some(String))` - Name of the snapshot file
    /// - `Ok(None)` - Source file does not exist
    /// - `Err(StoreError::Io)` - Copy failed
    pub fn snapshot_labeled(
        &self,
        kind: DocumentKind,
        source: &Path,
        label: &str,
        at: DateTime<Utc>,
    ) -> Result<Option<String>, StoreError> {
        if !source.exists() {
            return Ok(None);
        }
        self.ensure_dir()?;

        let name = format!("{}_{}_{}.json", kind.name(), label, backup_stamp(at, self.offset));
        copy(source, &self.dir.join(&name))?;
        Ok(Some(name))
    }

    /// Deletes rotation generations of `kind` beyond the newest `keep`.
    ///
    /// # Returns
    /// - `Ok(usize)` - Number of files deleted
    /// - `Err(StoreError::Io)` - Listing or deletion failed
    pub fn prune(&self, kind: DocumentKind) -> Result<usize, StoreError> {
        let stamps = self.list(kind)?;
        let mut removed = 0;

        for stamp in stamps.iter().skip(self.keep) {
            let path = self.dir.join(kind.backup_file_name(stamp));
            std::fs::remove_file(&path).map_err(|e| StoreError::io(&path, e))?;
            removed += 1;
        }

        if removed > 0 {
            tracing::debug!("Pruned {} old {} backups", removed, kind);
        }

        Ok(removed)
    }

    /// Lists rotation generation stamps of `kind`, newest first.
    ///
    /// Labeled restore snapshots are not included.
    ///
    /// # Returns
    /// - `Ok(Vec<String>)` - `YYYYMMDD_HHMMSS` stamps; empty when the directory is missing
    /// - `Err(StoreError::Io)` - Directory could not be read
    pub fn list(&self, kind: DocumentKind) -> Result<Vec<String>, StoreError> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let prefix = format!("{}_", kind.name());
        let entries = std::fs::read_dir(&self.dir).map_err(|e| StoreError::io(&self.dir, e))?;

        let mut stamps = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StoreError::io(&self.dir, e))?;
            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                continue;
            };

            let stamp = name
                .strip_prefix(&prefix)
                .and_then(|rest| rest.strip_suffix(".json"));
            if let Some(stamp) = stamp.filter(|stamp| is_backup_stamp(stamp)) {
                stamps.push(stamp.to_string());
            }
        }

        stamps.sort_unstable_by(|a, b| b.cmp(a));
        Ok(stamps)
    }

    /// Resolves the path of a rotation generation.
    ///
    /// # Returns
    /// - `Ok(PathBuf)` - Existing backup file
    /// - `Err(StoreError::BackupNotFound)` - No generation with that stamp
    pub fn generation_path(&self, kind: DocumentKind, stamp: &str) -> Result<PathBuf, StoreError> {
        let name = kind.backup_file_name(stamp);
        let path = self.dir.join(&name);
        if path.is_file() {
            Ok(path)
        } else {
            Err(StoreError::BackupNotFound(name))
        }
    }

    fn ensure_dir(&self) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.dir).map_err(|e| StoreError::io(&self.dir, e))
    }
}

fn copy(source: &Path, target: &Path) -> Result<(), StoreError> {
    std::fs::copy(source, target)
        .map(drop)
        .map_err(|e| StoreError::io(target, e))
}
