//! Durable storage for repro packs.
//!
//! One JSON file per incident, named by incident id. Writes are keyed by
//! the globally-unique id, so concurrent generation cannot conflict and a
//! failed write cannot touch previously persisted packs.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{TriageError, TriageResult};

use super::ReproPack;

/// File-backed repro pack store.
#[derive(Debug, Clone)]
pub struct ReproPackStore {
    dir: PathBuf,
}

impl ReproPackStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Persist a pack, returning the path it was written to.
    pub fn persist(&self, pack: &ReproPack) -> TriageResult<PathBuf> {
        std::fs::create_dir_all(&self.dir).map_err(|source| TriageError::Persistence {
            path: self.dir.display().to_string(),
            source,
        })?;

        let path = self.dir.join(format!("{}.json", pack.incident_id));
        let json = serde_json::to_string_pretty(pack)?;
        std::fs::write(&path, json).map_err(|source| TriageError::Persistence {
            path: path.display().to_string(),
            source,
        })?;

        info!(
            incident_id = %pack.incident_id,
            repro_type = %pack.repro_type,
            path = %path.display(),
            "repro pack persisted"
        );

        Ok(path)
    }
}
