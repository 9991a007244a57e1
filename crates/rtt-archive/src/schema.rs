//! Arrow schema for `segments.parquet`: every segment field, including
//! the 768-wide embedding that `manifest.json` omits (`spec.md` §4.1).

use std::sync::Arc;

use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use rtt_models::segment::EMBEDDING_DIM;

pub fn segment_schema() -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new("segment_id", DataType::Utf8, false),
        Field::new("video_id", DataType::Utf8, false),
        Field::new("start_seconds", DataType::Float64, false),
        Field::new("end_seconds", DataType::Float64, false),
        Field::new("transcript_raw", DataType::Utf8, false),
        Field::new("transcript_enriched", DataType::Utf8, false),
        Field::new(
            "text_embedding",
            DataType::FixedSizeList(
                Arc::new(Field::new("item", DataType::Float32, true)),
                EMBEDDING_DIM as i32,
            ),
            false,
        ),
        Field::new("frame_path", DataType::Utf8, false),
        Field::new("has_speech", DataType::Boolean, false),
        Field::new("source", DataType::Utf8, false),
        Field::new("collection", DataType::Utf8, false),
    ]))
}

/// Returns the declared width of the `text_embedding` column if it's a
/// fixed-size list, so callers can reject archives with the wrong
/// dimensionality without decoding any rows (`spec.md` §4.6, §8 invariant 2).
pub fn embedding_width(schema: &Schema) -> Option<usize> {
    let field = schema.field_with_name("text_embedding").ok()?;
    match field.data_type() {
        DataType::FixedSizeList(_, width) => Some(*width as usize),
        _ => None,
    }
}
