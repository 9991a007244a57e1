//! Per-`video_id` checkpoint persistence (`spec.md` §4.3).
//!
//! One JSON file per video, named `{video_id}.rtt.json`, written with an
//! atomic replace (write to a sibling temp file, then rename) so a crash
//! mid-write never leaves a torn file behind. Grounded on the
//! load/save-status pattern in the original implementation's single-video
//! driver (`main.py`'s `_load_status`/`_save_status`).

use std::path::{Path, PathBuf};

use rtt_models::Checkpoint;
use tracing::debug;

use crate::error::{CheckpointError, CheckpointResult};

#[derive(Debug, Clone)]
pub struct CheckpointStore {
    dir: PathBuf,
}

impl CheckpointStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, video_id: &str) -> PathBuf {
        self.dir.join(format!("{video_id}.rtt.json"))
    }

    /// Returns `Checkpoint::New` if no checkpoint file exists yet
    /// (`spec.md` §4.3: "Read returns `{"status": "new"}` if absent").
    pub async fn load(&self, video_id: &str) -> CheckpointResult<Checkpoint> {
        let path = self.path_for(video_id);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Checkpoint::New),
            Err(source) => return Err(CheckpointError::Read { path, source }),
        };
        serde_json::from_slice(&bytes).map_err(|source| CheckpointError::Deserialize { path, source })
    }

    /// Atomic-replace write: serialize to `{video_id}.rtt.json.tmp-{pid}`
    /// in the same directory, then rename over the final path. The rename
    /// is atomic on the same filesystem, so a reader never observes a
    /// partially-written checkpoint.
    pub async fn save(&self, video_id: &str, checkpoint: &Checkpoint) -> CheckpointResult<()> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| CheckpointError::Write { path: self.dir.clone(), source })?;

        let path = self.path_for(video_id);
        let tmp_path = self.dir.join(format!("{video_id}.rtt.json.tmp-{}", std::process::id()));
        let body = serde_json::to_vec_pretty(checkpoint)?;

        tokio::fs::write(&tmp_path, &body)
            .await
            .map_err(|source| CheckpointError::Write { path: tmp_path.clone(), source })?;
        tokio::fs::rename(&tmp_path, &path)
            .await
            .map_err(|source| CheckpointError::Write { path: path.clone(), source })?;

        debug!(video_id, status = checkpoint.status_str(), "checkpoint saved");
        Ok(())
    }

    /// Deletes the checkpoint file. Called once the archive has been
    /// emitted successfully; never called on failure (`spec.md` §4.4.5).
    pub async fn delete(&self, video_id: &str) -> CheckpointResult<()> {
        let path = self.path_for(video_id);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(CheckpointError::Write { path, source }),
        }
    }

    /// Checks whether an archive already exists for this video
    /// (`spec.md` §4.4.3: "If `{video_id}.rtt` already exists → skipped").
    pub fn archive_exists(&self, video_id: &str) -> bool {
        self.dir.join(format!("{video_id}.rtt")).exists()
    }

    pub fn archive_path(&self, video_id: &str) -> PathBuf {
        self.dir.join(format!("{video_id}.rtt"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rtt_models::checkpoint::PersistedSegment;

    #[tokio::test]
    async fn absent_checkpoint_loads_as_new() {
        let dir = tempfile::tempdir().unwrap();
        let store = CheckpointStore::new(dir.path());
        let cp = store.load("missing").await.unwrap();
        assert_eq!(cp, Checkpoint::New);
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = CheckpointStore::new(dir.path());
        let cp = Checkpoint::Transcribed {
            segments: vec![PersistedSegment {
                segment_id: "v1_00000".into(),
                start: 0.0,
                end: 1.0,
                text: "hi".into(),
            }],
            transcript_source: "asr".into(),
        };
        store.save("v1", &cp).await.unwrap();
        let loaded = store.load("v1").await.unwrap();
        assert_eq!(loaded, cp);
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = CheckpointStore::new(dir.path());
        store.delete("never-existed").await.unwrap();
        store.save("v1", &Checkpoint::Downloaded).await.unwrap();
        store.delete("v1").await.unwrap();
        assert_eq!(store.load("v1").await.unwrap(), Checkpoint::New);
    }

    #[test]
    fn archive_exists_checks_sibling_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = CheckpointStore::new(dir.path());
        assert!(!store.archive_exists("v1"));
        std::fs::write(store.archive_path("v1"), b"fake").unwrap();
        assert!(store.archive_exists("v1"));
    }
}
