//! Archive read contract (`spec.md` §4.1): opening an archive yields the
//! `Video` header, the segment list (without embeddings), and a columnar
//! handle that can stream the embedding column separately — the
//! metadata-only open never decodes embeddings into the segment list,
//! which is what lets the search service load hundreds of thousands of
//! segments without copying the whole embedding matrix twice.

use std::io::Read as _;
use std::path::{Path, PathBuf};

use arrow::array::{Array, FixedSizeListArray, Float32Array};
use bytes::Bytes;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use rtt_models::{Segment, Video};
use zip::ZipArchive;

use crate::error::{ArchiveError, ArchiveResult};
use crate::manifest::Manifest;
use crate::schema;

pub struct ArchiveReader {
    path: PathBuf,
    manifest: Manifest,
    /// The raw (decompressed) `segments.parquet` bytes, kept around so
    /// `embeddings()` can be called lazily without reopening the zip.
    parquet_bytes: Bytes,
    embedding_width: Option<usize>,
}

impl ArchiveReader {
    /// Opens the archive and parses `manifest.json` plus the parquet
    /// footer's schema. Does not decode any parquet row groups.
    pub fn open_metadata(path: impl AsRef<Path>) -> ArchiveResult<Self> {
        let path = path.as_ref().to_path_buf();
        let file = std::fs::File::open(&path).map_err(|e| ArchiveError::io(&path, e))?;
        let mut zip = ZipArchive::new(file)?;

        let manifest: Manifest = {
            let mut entry = zip
                .by_name("manifest.json")
                .map_err(|_| ArchiveError::MissingEntry("manifest.json"))?;
            let mut buf = String::new();
            entry.read_to_string(&mut buf).map_err(|e| ArchiveError::io("manifest.json", e))?;
            serde_json::from_str(&buf)?
        };

        let parquet_bytes: Bytes = {
            let mut entry = zip
                .by_name("segments.parquet")
                .map_err(|_| ArchiveError::MissingEntry("segments.parquet"))?;
            let mut buf = Vec::with_capacity(entry.size() as usize);
            entry.read_to_end(&mut buf).map_err(|e| ArchiveError::io("segments.parquet", e))?;
            Bytes::from(buf)
        };

        let builder = ParquetRecordBatchReaderBuilder::try_new(parquet_bytes.clone())?;
        let embedding_width = schema::embedding_width(builder.schema());

        Ok(Self { path, manifest, parquet_bytes, embedding_width })
    }

    pub fn video(&self) -> Video {
        self.manifest.video()
    }

    pub fn segments(&self) -> Vec<Segment> {
        self.manifest.segments_without_embeddings()
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Declared width of the `text_embedding` column, taken from the
    /// parquet schema. `None` if the column isn't a fixed-size list.
    pub fn embedding_width(&self) -> Option<usize> {
        self.embedding_width
    }

    /// Decodes every row of the `text_embedding` column, in the same row
    /// order as `segments()`. This is the expensive call the metadata-only
    /// open is designed to let callers defer or skip entirely.
    pub fn embeddings(&self) -> ArchiveResult<Vec<Vec<f32>>> {
        let builder = ParquetRecordBatchReaderBuilder::try_new(self.parquet_bytes.clone())?;
        let reader = builder.build()?;

        let mut out = Vec::with_capacity(self.manifest.segments.len());
        for batch in reader {
            let batch = batch?;
            let col = batch
                .column_by_name("text_embedding")
                .ok_or_else(|| ArchiveError::data_shape("segments.parquet missing text_embedding column"))?;
            let list = col
                .as_any()
                .downcast_ref::<FixedSizeListArray>()
                .ok_or_else(|| ArchiveError::data_shape("text_embedding column is not a fixed-size list"))?;
            for i in 0..list.len() {
                let values = list.value(i);
                let floats = values
                    .as_any()
                    .downcast_ref::<Float32Array>()
                    .ok_or_else(|| ArchiveError::data_shape("text_embedding values are not float32"))?;
                out.push(floats.values().to_vec());
            }
        }
        Ok(out)
    }

    /// Reads a single frame's raw JPEG bytes out of the archive on
    /// demand. Used by the search service's `/static/frames` handler.
    pub fn read_frame(&self, filename: &str) -> ArchiveResult<Vec<u8>> {
        let file = std::fs::File::open(&self.path).map_err(|e| ArchiveError::io(&self.path, e))?;
        let mut zip = ZipArchive::new(file)?;
        let mut entry = zip
            .by_name(&format!("frames/{filename}"))
            .map_err(|_| ArchiveError::MissingEntry("frames entry"))?;
        let mut buf = Vec::with_capacity(entry.size() as usize);
        entry.read_to_end(&mut buf).map_err(|e| ArchiveError::io(filename, e))?;
        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::write::write_archive;
    use rtt_models::{Video, VideoStatus};

    fn sample_video() -> Video {
        Video {
            video_id: "duck_and_cover".into(),
            title: "Duck and Cover".into(),
            source_url: "https://example.com/duck.mp4".into(),
            page_url: String::new(),
            context: "Cold War civil defense film".into(),
            collection: "prelinger".into(),
            duration_seconds: 12.0,
            status: VideoStatus::Ready,
        }
    }

    fn sample_segments() -> Vec<Segment> {
        vec![
            Segment {
                segment_id: "duck_and_cover_00000".into(),
                video_id: "duck_and_cover".into(),
                start_seconds: 0.5,
                end_seconds: 2.0,
                transcript_raw: "Duck and cover.".into(),
                transcript_enriched: "Duck and cover.".into(),
                text_embedding: vec![0.1f32; rtt_models::segment::EMBEDDING_DIM],
                frame_path: "frames/000000.jpg".into(),
                has_speech: true,
                source: "transcript".into(),
                collection: "prelinger".into(),
            },
            Segment {
                segment_id: "duck_and_cover_00001".into(),
                video_id: "duck_and_cover".into(),
                start_seconds: 3.0,
                end_seconds: 6.5,
                transcript_raw: "When you see the flash, duck and cover.".into(),
                transcript_enriched: "When you see the flash, duck and cover.".into(),
                text_embedding: vec![0.2f32; rtt_models::segment::EMBEDDING_DIM],
                frame_path: String::new(),
                has_speech: true,
                source: "transcript".into(),
                collection: "prelinger".into(),
            },
        ]
    }

    #[test]
    fn round_trips_manifest_and_embeddings() {
        let tmp = tempfile::tempdir().unwrap();
        let frames_dir = tmp.path().join("frames");
        std::fs::create_dir(&frames_dir).unwrap();
        std::fs::write(frames_dir.join("000000.jpg"), b"\xff\xd8fake").unwrap();

        let archive_path = tmp.path().join("duck_and_cover.rtt");
        write_archive(&sample_video(), &sample_segments(), &frames_dir, &archive_path).unwrap();

        let reader = ArchiveReader::open_metadata(&archive_path).unwrap();
        assert_eq!(reader.embedding_width(), Some(rtt_models::segment::EMBEDDING_DIM));

        let video = reader.video();
        assert_eq!(video.video_id, "duck_and_cover");
        assert_eq!(video.duration_seconds, 12.0);

        let segments = reader.segments();
        assert_eq!(segments.len(), 2);
        assert!(segments[0].text_embedding.is_empty());
        assert_eq!(segments[0].segment_id, "duck_and_cover_00000");

        let embeddings = reader.embeddings().unwrap();
        assert_eq!(embeddings.len(), 2);
        assert_eq!(embeddings[0].len(), rtt_models::segment::EMBEDDING_DIM);
        assert!((embeddings[0][0] - 0.1).abs() < 1e-6);

        let frame = reader.read_frame("000000.jpg").unwrap();
        assert_eq!(frame, b"\xff\xd8fake");
        assert!(reader.read_frame("missing.jpg").is_err());
    }

    #[test]
    fn rejects_mismatched_video_id() {
        let tmp = tempfile::tempdir().unwrap();
        let frames_dir = tmp.path().join("frames");
        std::fs::create_dir(&frames_dir).unwrap();
        let mut segments = sample_segments();
        segments[0].video_id = "other".into();
        let archive_path = tmp.path().join("bad.rtt");
        let err = write_archive(&sample_video(), &segments, &frames_dir, &archive_path).unwrap_err();
        assert!(matches!(err, ArchiveError::DataShape(_)));
    }
}
