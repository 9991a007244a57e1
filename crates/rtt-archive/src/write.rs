//! Archive write contract (`spec.md` §4.1): given a video header, its
//! ordered segments, and a directory of already-extracted frame files,
//! produce a single `.rtt` container whose manifest segment order matches
//! the parquet row order.
//!
//! Grounded on the original implementation's `package.create()`: a
//! `zipfile.ZipFile` holding `manifest.json`, `segments.parquet`, and
//! `frames/*.jpg`, translated from pyarrow to the `arrow`/`parquet` crates.

use std::io::Write as _;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{
    ArrayRef, BooleanArray, Float32Builder, Float64Array, FixedSizeListBuilder, StringArray,
};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use rtt_models::{Segment, Video};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::{ArchiveError, ArchiveResult};
use crate::manifest::Manifest;
use crate::schema::segment_schema;

/// Builds the single `RecordBatch` backing `segments.parquet`. Column
/// order matches `schema::segment_schema()`.
fn build_record_batch(segments: &[Segment]) -> ArchiveResult<RecordBatch> {
    let schema = segment_schema();

    let segment_id: ArrayRef = Arc::new(StringArray::from_iter_values(segments.iter().map(|s| s.segment_id.as_str())));
    let video_id: ArrayRef = Arc::new(StringArray::from_iter_values(segments.iter().map(|s| s.video_id.as_str())));
    let start_seconds: ArrayRef = Arc::new(Float64Array::from_iter_values(segments.iter().map(|s| s.start_seconds)));
    let end_seconds: ArrayRef = Arc::new(Float64Array::from_iter_values(segments.iter().map(|s| s.end_seconds)));
    let transcript_raw: ArrayRef = Arc::new(StringArray::from_iter_values(segments.iter().map(|s| s.transcript_raw.as_str())));
    let transcript_enriched: ArrayRef = Arc::new(StringArray::from_iter_values(segments.iter().map(|s| s.transcript_enriched.as_str())));

    let mut embedding_builder = FixedSizeListBuilder::new(Float32Builder::new(), rtt_models::segment::EMBEDDING_DIM as i32);
    for s in segments {
        if s.text_embedding.len() != rtt_models::segment::EMBEDDING_DIM {
            return Err(ArchiveError::data_shape(format!(
                "segment {} has embedding width {}, expected {}",
                s.segment_id,
                s.text_embedding.len(),
                rtt_models::segment::EMBEDDING_DIM
            )));
        }
        embedding_builder.values().append_slice(&s.text_embedding);
        embedding_builder.append(true);
    }
    let text_embedding: ArrayRef = Arc::new(embedding_builder.finish());

    let frame_path: ArrayRef = Arc::new(StringArray::from_iter_values(segments.iter().map(|s| s.frame_path.as_str())));
    let has_speech: ArrayRef = Arc::new(BooleanArray::from_iter(segments.iter().map(|s| Some(s.has_speech))));
    let source: ArrayRef = Arc::new(StringArray::from_iter_values(segments.iter().map(|s| s.source.as_str())));
    let collection: ArrayRef = Arc::new(StringArray::from_iter_values(segments.iter().map(|s| s.collection.as_str())));

    RecordBatch::try_new(
        schema,
        vec![
            segment_id,
            video_id,
            start_seconds,
            end_seconds,
            transcript_raw,
            transcript_enriched,
            text_embedding,
            frame_path,
            has_speech,
            source,
            collection,
        ],
    )
    .map_err(ArchiveError::from)
}

/// Writes the archive. `frames_dir` holds zero or more `NNNNNN.jpg` files;
/// any segment whose `frame_path` is empty has no corresponding frame.
/// The write is atomic: the archive is assembled at a sibling temp path
/// and renamed into place only once every entry has been written.
pub fn write_archive(video: &Video, segments: &[Segment], frames_dir: &Path, output_path: &Path) -> ArchiveResult<()> {
    for s in segments {
        if s.video_id != video.video_id {
            return Err(ArchiveError::data_shape(format!(
                "segment {} has video_id {} but archive video_id is {}",
                s.segment_id, s.video_id, video.video_id
            )));
        }
    }

    let manifest = Manifest::from_video_and_segments(video, segments);
    let manifest_bytes = serde_json::to_vec_pretty(&manifest)?;
    let batch = build_record_batch(segments)?;

    let tmp_path = output_path.with_extension("rtt.tmp");
    let file = std::fs::File::create(&tmp_path).map_err(|e| ArchiveError::io(&tmp_path, e))?;
    let mut zip = ZipWriter::new(file);

    let json_opts = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    zip.start_file("manifest.json", json_opts)?;
    zip.write_all(&manifest_bytes).map_err(|e| ArchiveError::io("manifest.json", e))?;

    let parquet_opts = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    zip.start_file("segments.parquet", parquet_opts)?;
    {
        let props = WriterProperties::builder().set_compression(Compression::SNAPPY).build();
        let mut writer = ArrowWriter::try_new(&mut zip, batch.schema(), Some(props))?;
        writer.write(&batch)?;
        writer.close()?;
    }

    let frame_opts = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
    if frames_dir.is_dir() {
        let mut entries: Vec<_> = std::fs::read_dir(frames_dir)
            .map_err(|e| ArchiveError::io(frames_dir, e))?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("jpg"))
            .collect();
        entries.sort();
        for frame_path in entries {
            let name = frame_path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
            let bytes = std::fs::read(&frame_path).map_err(|e| ArchiveError::io(&frame_path, e))?;
            zip.start_file(format!("frames/{name}"), frame_opts)?;
            zip.write_all(&bytes).map_err(|e| ArchiveError::io(&frame_path, e))?;
        }
    }

    zip.finish()?;
    std::fs::rename(&tmp_path, output_path).map_err(|e| ArchiveError::io(output_path, e))?;
    Ok(())
}
