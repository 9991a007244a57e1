//! Append-only `failures.jsonl` writer (`spec.md` §4.4.5/§6): one JSON
//! line per dropped job, serialized through a single mutex so concurrent
//! stage workers never interleave partial lines.

use std::path::PathBuf;

use serde::Serialize;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

#[derive(Debug, Serialize)]
struct FailureRecord<'a> {
    video_id: &'a str,
    source_url: &'a str,
    title: &'a str,
    error: &'a str,
}

pub struct FailuresLog {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FailuresLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), lock: Mutex::new(()) }
    }

    pub async fn append(&self, video_id: &str, source_url: &str, title: &str, error: &str) -> std::io::Result<()> {
        let line = serde_json::to_string(&FailureRecord { video_id, source_url, title, error })
            .expect("FailureRecord always serializes");

        let _guard = self.lock.lock().await;
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.write_all(b"\n").await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn appends_one_json_line_per_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("failures.jsonl");
        let log = FailuresLog::new(&path);

        log.append("v1", "https://example.com/v1", "Video One", "transcript was empty").await.unwrap();
        log.append("v2", "https://example.com/v2", "Video Two", "transcriber timed out").await.unwrap();

        let contents = tokio::fs::read_to_string(&path).await.unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["video_id"], "v1");
        assert_eq!(first["error"], "transcript was empty");
    }
}
