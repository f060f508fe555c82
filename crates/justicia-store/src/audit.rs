//! Write-once JSON audit records, one file per processed document.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use justicia_core::AuditRecord;
use tempfile::NamedTempFile;
use tracing::info;

use crate::error::StoreError;

pub const RECORD_SUFFIX: &str = "_result.json";

/// A directory of `<stem>_result.json` records.
pub struct AuditStore {
    dir: PathBuf,
}

impl AuditStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, stem: &str) -> PathBuf {
        self.dir.join(format!("{stem}{RECORD_SUFFIX}"))
    }

    /// Persist `record` atomically under `stem`.
    ///
    /// Without `overwrite`, an existing record for the same stem is an error.
    pub fn write(
        &self,
        stem: &str,
        record: &AuditRecord,
        overwrite: bool,
    ) -> Result<PathBuf, StoreError> {
        validate_stem(stem)?;
        let path = self.path_for(stem);
        if !overwrite && path.exists() {
            return Err(StoreError::Exists(path));
        }

        fs::create_dir_all(&self.dir)?;
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        serde_json::to_writer_pretty(&mut tmp, record)?;
        tmp.write_all(b"\n")?;
        tmp.as_file().sync_all()?;

        if overwrite {
            tmp.persist(&path).map_err(|e| e.error)?;
        } else {
            tmp.persist_noclobber(&path).map_err(|e| match e.error.kind() {
                ErrorKind::AlreadyExists => StoreError::Exists(path.clone()),
                _ => StoreError::Io(e.error),
            })?;
        }

        info!(path = %path.display(), accepted = record.decision.accepted, "wrote audit record");
        Ok(path)
    }

    pub fn read(path: &Path) -> Result<AuditRecord, StoreError> {
        let bytes = fs::read(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => StoreError::NotFound(path.to_path_buf()),
            _ => StoreError::Io(e),
        })?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Sorted record paths. A missing directory holds no records.
    pub fn list(&self) -> Result<Vec<PathBuf>, StoreError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut paths = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.is_file()
                && path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.ends_with(RECORD_SUFFIX))
            {
                paths.push(path);
            }
        }
        paths.sort();
        Ok(paths)
    }
}

/// Stem of an input file, used to name its record.
pub fn stem_of(path: &Path) -> Option<String> {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| validate_stem(s).is_ok())
}

/// Current time as RFC 3339, second precision, UTC.
pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn validate_stem(stem: &str) -> Result<(), StoreError> {
    let bad = stem.is_empty()
        || stem == "."
        || stem == ".."
        || stem.contains(['/', '\\'])
        || stem.contains('\0');
    if bad {
        return Err(StoreError::InvalidStem(stem.to_string()));
    }
    Ok(())
}
