//! Boot-time archive scan: discovers `.rtt` files under the given roots,
//! opens each metadata-only, skips archives whose embedding width doesn't
//! match, and builds the merged `VectorIndex` plus video lookup tables
//! the handlers query against. Grounded on `server.py`'s `_collect_rtt_files`
//! and `create_app` boot sequence (`spec.md` §4.6, §8 scenario S6).

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use rtt_archive::ArchiveReader;
use rtt_index::{SegmentRow, VectorIndex};
use rtt_models::EMBEDDING_DIM;
use tracing::{info, warn};

use crate::state::VideoInfo;

pub struct LoadedArchives {
    pub index: VectorIndex,
    pub videos: HashMap<String, VideoInfo>,
    pub rtt_paths_by_video: HashMap<String, PathBuf>,
}

/// Recursively collects `.rtt` files under directories, passing through
/// direct `.rtt` file paths unchanged.
fn collect_rtt_files(roots: &[PathBuf]) -> Vec<PathBuf> {
    let mut out = Vec::new();
    for root in roots {
        collect_rtt_files_into(root, &mut out);
    }
    out.sort();
    out
}

fn collect_rtt_files_into(path: &Path, out: &mut Vec<PathBuf>) {
    if path.is_file() {
        if path.extension().and_then(|e| e.to_str()) == Some("rtt") {
            out.push(path.to_path_buf());
        }
        return;
    }
    let Ok(entries) = std::fs::read_dir(path) else {
        warn!(path = %path.display(), "could not read archive root");
        return;
    };
    for entry in entries.flatten() {
        let child = entry.path();
        if child.is_dir() {
            collect_rtt_files_into(&child, out);
        } else if child.extension().and_then(|e| e.to_str()) == Some("rtt") {
            out.push(child);
        }
    }
}

/// Runs the full synchronous scan. Blocking — callers should run this on
/// a `spawn_blocking` task, mirroring `rtt-pipeline`'s archive-write call.
pub fn load_sync(archive_roots: &[PathBuf]) -> LoadedArchives {
    let mut index = VectorIndex::new();
    let mut videos = HashMap::new();
    let mut rtt_paths_by_video = HashMap::new();

    let files = collect_rtt_files(archive_roots);
    info!(count = files.len(), "discovered archive files");

    for path in files {
        let reader = match ArchiveReader::open_metadata(&path) {
            Ok(r) => r,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "skipping archive: failed to open");
                continue;
            }
        };

        match reader.embedding_width() {
            Some(w) if w == EMBEDDING_DIM => {}
            Some(w) => {
                warn!(path = %path.display(), width = w, expected = EMBEDDING_DIM, "skipping archive: wrong embedding width");
                continue;
            }
            None => {
                warn!(path = %path.display(), "skipping archive: no embedding column");
                continue;
            }
        }

        let embeddings = match reader.embeddings() {
            Ok(e) => e,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "skipping archive: failed to decode embeddings");
                continue;
            }
        };

        let video = reader.video();
        let segments = reader.segments();
        let segment_count = segments.len();
        let rows: Vec<SegmentRow> = segments.iter().map(SegmentRow::from).collect();

        if let Err(e) = index.add_table(rows, embeddings) {
            warn!(path = %path.display(), error = %e, "skipping archive: row/embedding shape mismatch");
            continue;
        }

        let local_dir = path.parent().map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from("."));
        videos.insert(
            video.video_id.clone(),
            VideoInfo {
                title: video.title.clone(),
                remote_url: (!video.source_url.is_empty()).then(|| video.source_url.clone()),
                page_url: (!video.page_url.is_empty()).then(|| video.page_url.clone()),
                collection: video.collection.clone(),
                context: video.context.clone(),
                local_dir,
            },
        );
        rtt_paths_by_video.insert(video.video_id.clone(), path);

        info!(video_id = %video.video_id, segments = segment_count, "loaded archive");
    }

    index.ensure_merged();
    index.compact();

    info!(videos = videos.len(), rows = index.len(), "archive load complete");

    LoadedArchives { index, videos, rtt_paths_by_video }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rtt_archive::write_archive;
    use rtt_models::{Segment, Video, VideoStatus};

    fn sample_video(id: &str) -> Video {
        Video {
            video_id: id.to_string(),
            title: "Title".into(),
            source_url: "https://example.com/v.mp4".into(),
            page_url: String::new(),
            context: "ctx".into(),
            collection: "prelinger".into(),
            duration_seconds: 5.0,
            status: VideoStatus::Ready,
        }
    }

    fn sample_segments(id: &str, width: usize) -> Vec<Segment> {
        vec![Segment {
            segment_id: format!("{id}_00000"),
            video_id: id.to_string(),
            start_seconds: 0.0,
            end_seconds: 1.0,
            transcript_raw: "hello".into(),
            transcript_enriched: "hello".into(),
            text_embedding: vec![0.1f32; width],
            frame_path: String::new(),
            has_speech: true,
            source: "transcript".into(),
            collection: "prelinger".into(),
        }]
    }

    #[test]
    fn loads_valid_archive_and_merges() {
        let tmp = tempfile::tempdir().unwrap();
        let frames_dir = tmp.path().join("frames");
        std::fs::create_dir(&frames_dir).unwrap();
        let archive_path = tmp.path().join("a.rtt");
        write_archive(&sample_video("a"), &sample_segments("a", EMBEDDING_DIM), &frames_dir, &archive_path).unwrap();

        let loaded = load_sync(&[tmp.path().to_path_buf()]);
        assert_eq!(loaded.index.len(), 1);
        assert!(loaded.videos.contains_key("a"));
        assert!(loaded.rtt_paths_by_video.contains_key("a"));
    }

    #[test]
    fn skips_archive_with_wrong_embedding_width() {
        let tmp = tempfile::tempdir().unwrap();
        let frames_dir = tmp.path().join("frames");
        std::fs::create_dir(&frames_dir).unwrap();
        let archive_path = tmp.path().join("bad.rtt");
        write_archive(&sample_video("bad"), &sample_segments("bad", 384), &frames_dir, &archive_path).unwrap();

        let loaded = load_sync(&[tmp.path().to_path_buf()]);
        assert_eq!(loaded.index.len(), 0);
        assert!(!loaded.videos.contains_key("bad"));
    }

    #[test]
    fn recurses_into_nested_directories() {
        let tmp = tempfile::tempdir().unwrap();
        let nested = tmp.path().join("nested");
        std::fs::create_dir(&nested).unwrap();
        let frames_dir = nested.join("frames");
        std::fs::create_dir(&frames_dir).unwrap();
        let archive_path = nested.join("n.rtt");
        write_archive(&sample_video("n"), &sample_segments("n", EMBEDDING_DIM), &frames_dir, &archive_path).unwrap();

        let files = collect_rtt_files(&[tmp.path().to_path_buf()]);
        assert_eq!(files, vec![archive_path]);
    }
}
