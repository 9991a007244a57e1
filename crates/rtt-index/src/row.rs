//! A segment's metadata columns, without its embedding — the shape
//! `closest`/`list_segments`/`video_segments` hand back to callers
//! (`spec.md` §4.5.2: "plain dictionaries, including all metadata columns
//! except the embedding itself").

#[derive(Debug, Clone, PartialEq)]
pub struct SegmentRow {
    pub segment_id: String,
    pub video_id: String,
    pub start_seconds: f64,
    pub end_seconds: f64,
    pub transcript_raw: String,
    pub transcript_enriched: String,
    pub frame_path: String,
    pub has_speech: bool,
    pub source: String,
    pub collection: String,
}

impl From<&rtt_models::Segment> for SegmentRow {
    fn from(s: &rtt_models::Segment) -> Self {
        Self {
            segment_id: s.segment_id.clone(),
            video_id: s.video_id.clone(),
            start_seconds: s.start_seconds,
            end_seconds: s.end_seconds,
            transcript_raw: s.transcript_raw.clone(),
            transcript_enriched: s.transcript_enriched.clone(),
            frame_path: s.frame_path.clone(),
            has_speech: s.has_speech,
            source: s.source.clone(),
            collection: s.collection.clone(),
        }
    }
}

/// A search hit: the row plus its cosine distance from the query
/// (`1 - score`, per `spec.md` §4.5.2 point 5).
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredRow {
    pub row: SegmentRow,
    pub distance: f32,
}
