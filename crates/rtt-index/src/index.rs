//! In-memory cosine-similarity vector index (C6), grounded on the
//! original implementation's `rtt.vector.Database`: accepts whole
//! per-archive columnar tables, defers merging until first query,
//! shuffles table order before concatenation to avoid adjacency bias,
//! L2-normalizes once, and stores normalized vectors as half-precision
//! floats to halve memory (`spec.md` §4.5).

use half::f16;
use rand::seq::SliceRandom;
use rayon::prelude::*;

use rtt_models::segment::EMBEDDING_DIM;

use crate::error::{IndexError, IndexResult};
use crate::row::{ScoredRow, SegmentRow};

/// Rows are processed in chunks of this size when scoring a query, to
/// bound peak working memory (`spec.md` §4.5.2 point 2).
const QUERY_CHUNK_ROWS: usize = 20_000;

struct PendingTable {
    rows: Vec<SegmentRow>,
    embeddings: Vec<Vec<f32>>,
}

/// The merged, query-ready state: one flat half-precision embedding
/// matrix (row-major, `EMBEDDING_DIM` per row) alongside the metadata rows
/// in the same order.
struct Merged {
    rows: Vec<SegmentRow>,
    embeddings: Vec<f16>,
}

impl Merged {
    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn row_vector(&self, idx: usize) -> &[f16] {
        let start = idx * EMBEDDING_DIM;
        &self.embeddings[start..start + EMBEDDING_DIM]
    }
}

pub struct VectorIndex {
    pending: Vec<PendingTable>,
    merged: Option<Merged>,
}

impl Default for VectorIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl VectorIndex {
    pub fn new() -> Self {
        Self { pending: Vec::new(), merged: None }
    }

    /// Adds one archive's worth of rows and embeddings. Invalidates any
    /// prior merge — `spec.md` §9: "re-adding tables invalidates the merge".
    pub fn add_table(&mut self, rows: Vec<SegmentRow>, embeddings: Vec<Vec<f32>>) -> IndexResult<()> {
        if rows.len() != embeddings.len() {
            return Err(IndexError::RowEmbeddingMismatch { rows: rows.len(), embeddings: embeddings.len() });
        }
        for (i, e) in embeddings.iter().enumerate() {
            if e.len() != EMBEDDING_DIM {
                return Err(IndexError::WrongEmbeddingWidth { row: i, width: e.len(), expected: EMBEDDING_DIM });
            }
        }
        self.merged = None;
        self.pending.push(PendingTable { rows, embeddings });
        Ok(())
    }

    pub fn is_merged(&self) -> bool {
        self.merged.is_some()
    }

    /// Concatenates every pending table, shuffling table order first so a
    /// collection-filtered query does proportionate work regardless of
    /// insertion order, L2-normalizes every embedding once, and stores the
    /// result as half-precision floats. Idempotent: does nothing if
    /// already merged and no tables are pending.
    pub fn ensure_merged(&mut self) {
        if self.merged.is_some() && self.pending.is_empty() {
            return;
        }

        let mut tables = std::mem::take(&mut self.pending);
        let existing = self.merged.take();

        let mut rng = rand::thread_rng();
        tables.shuffle(&mut rng);

        let total_rows: usize = tables.iter().map(|t| t.rows.len()).sum::<usize>()
            + existing.as_ref().map(Merged::row_count).unwrap_or(0);

        let mut rows = Vec::with_capacity(total_rows);
        let mut embeddings = Vec::with_capacity(total_rows * EMBEDDING_DIM);

        if let Some(existing) = existing {
            rows.extend(existing.rows);
            embeddings.extend(existing.embeddings);
        }

        for table in tables {
            for (row, embedding) in table.rows.into_iter().zip(table.embeddings.into_iter()) {
                let norm = l2_norm(&embedding);
                let norm = if norm == 0.0 { 1.0 } else { norm };
                rows.push(row);
                embeddings.extend(embedding.iter().map(|v| f16::from_f32(v / norm)));
            }
        }

        self.merged = Some(Merged { rows, embeddings });
    }

    /// Drops any per-archive state no longer needed now that the merge is
    /// complete (`spec.md` §4.5.1: "`compact()` may discard the per-archive
    /// lists, keeping only the merged state").
    pub fn compact(&mut self) {
        self.pending.shrink_to_fit();
    }

    pub fn len(&self) -> usize {
        self.merged.as_ref().map(Merged::row_count).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `closest(query, n, collections?)` (`spec.md` §4.5.2).
    pub fn closest(&self, query: &[f32], n: usize, collections: Option<&[String]>) -> Vec<ScoredRow> {
        let Some(merged) = &self.merged else {
            return Vec::new();
        };
        if query.len() != EMBEDDING_DIM {
            return Vec::new();
        }

        let norm = l2_norm(query);
        if norm == 0.0 {
            return Vec::new();
        }
        let query: Vec<f32> = query.iter().map(|v| v / norm).collect();

        let row_count = merged.row_count();
        let mut scores = vec![f32::NEG_INFINITY; row_count];

        scores
            .par_chunks_mut(QUERY_CHUNK_ROWS)
            .enumerate()
            .for_each(|(chunk_idx, chunk)| {
                let base = chunk_idx * QUERY_CHUNK_ROWS;
                for (offset, score) in chunk.iter_mut().enumerate() {
                    let idx = base + offset;
                    if let Some(cols) = collections {
                        if !cols.iter().any(|c| c == &merged.rows[idx].collection) {
                            continue;
                        }
                    }
                    let vector = merged.row_vector(idx);
                    *score = dot_f16_f32(vector, &query);
                }
            });

        let mut indexed: Vec<(usize, f32)> = scores.into_iter().enumerate().collect();
        indexed.sort_unstable_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        indexed
            .into_iter()
            .filter(|(_, score)| score.is_finite())
            .take(n)
            .map(|(idx, score)| ScoredRow { row: merged.rows[idx].clone(), distance: 1.0 - score })
            .collect()
    }

    pub fn get_segment(&self, segment_id: &str) -> Option<(SegmentRow, Vec<f32>)> {
        let merged = self.merged.as_ref()?;
        let idx = merged.rows.iter().position(|r| r.segment_id == segment_id)?;
        let embedding = merged.row_vector(idx).iter().map(|v| v.to_f32()).collect();
        Some((merged.rows[idx].clone(), embedding))
    }

    pub fn list_segments(&self, offset: usize, limit: usize, collections: Option<&[String]>) -> Vec<SegmentRow> {
        let Some(merged) = &self.merged else {
            return Vec::new();
        };
        merged
            .rows
            .iter()
            .filter(|r| collections.map(|cols| cols.iter().any(|c| c == &r.collection)).unwrap_or(true))
            .skip(offset)
            .take(limit)
            .cloned()
            .collect()
    }

    pub fn video_segments(&self, video_id: &str) -> Vec<SegmentRow> {
        let Some(merged) = &self.merged else {
            return Vec::new();
        };
        let mut rows: Vec<SegmentRow> = merged.rows.iter().filter(|r| r.video_id == video_id).cloned().collect();
        rows.sort_by(|a, b| a.start_seconds.partial_cmp(&b.start_seconds).unwrap_or(std::cmp::Ordering::Equal));
        rows
    }

    pub fn count(&self, collections: Option<&[String]>) -> usize {
        let Some(merged) = &self.merged else {
            return 0;
        };
        match collections {
            None => merged.row_count(),
            Some(cols) => merged.rows.iter().filter(|r| cols.iter().any(|c| c == &r.collection)).count(),
        }
    }
}

fn l2_norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

fn dot_f16_f32(a: &[f16], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x.to_f32() * y).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_embedding(hot_index: usize) -> Vec<f32> {
        let mut v = vec![0.0f32; EMBEDDING_DIM];
        v[hot_index] = 1.0;
        v
    }

    fn row(id: &str, video_id: &str, start: f64, collection: &str) -> SegmentRow {
        SegmentRow {
            segment_id: id.to_string(),
            video_id: video_id.to_string(),
            start_seconds: start,
            end_seconds: start + 1.0,
            transcript_raw: "text".into(),
            transcript_enriched: "text".into(),
            frame_path: String::new(),
            has_speech: true,
            source: "transcript".into(),
            collection: collection.to_string(),
        }
    }

    #[test]
    fn closest_returns_exact_match_first() {
        let mut index = VectorIndex::new();
        index
            .add_table(
                vec![row("nuclear", "v1", 0.0, ""), row("cake", "v1", 1.0, "")],
                vec![unit_embedding(0), unit_embedding(1)],
            )
            .unwrap();
        index.ensure_merged();

        let results = index.closest(&unit_embedding(0), 2, None);
        assert_eq!(results[0].row.segment_id, "nuclear");
        assert!(results[0].distance < 1e-4);
    }

    #[test]
    fn closest_respects_collection_filter() {
        let mut index = VectorIndex::new();
        index
            .add_table(
                vec![row("a", "v1", 0.0, "prelinger"), row("b", "v2", 0.0, "youtube")],
                vec![unit_embedding(0), unit_embedding(0)],
            )
            .unwrap();
        index.ensure_merged();

        let results = index.closest(&unit_embedding(0), 10, Some(&["prelinger".to_string()]));
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].row.segment_id, "a");
    }

    #[test]
    fn zero_vector_query_returns_empty() {
        let mut index = VectorIndex::new();
        index.add_table(vec![row("a", "v1", 0.0, "")], vec![unit_embedding(0)]).unwrap();
        index.ensure_merged();

        let zero = vec![0.0f32; EMBEDDING_DIM];
        assert!(index.closest(&zero, 10, None).is_empty());
    }

    #[test]
    fn count_matches_list_segments_length_for_full_page() {
        let mut index = VectorIndex::new();
        index
            .add_table(
                vec![row("a", "v1", 0.0, "x"), row("b", "v1", 1.0, "y"), row("c", "v1", 2.0, "x")],
                vec![unit_embedding(0), unit_embedding(1), unit_embedding(2)],
            )
            .unwrap();
        index.ensure_merged();

        let total = index.count(Some(&["x".to_string()]));
        let listed = index.list_segments(0, total, Some(&["x".to_string()]));
        assert_eq!(total, listed.len());
        assert_eq!(total, 2);
    }

    #[test]
    fn video_segments_sorted_by_start() {
        let mut index = VectorIndex::new();
        index
            .add_table(
                vec![row("b", "v1", 5.0, ""), row("a", "v1", 1.0, "")],
                vec![unit_embedding(0), unit_embedding(1)],
            )
            .unwrap();
        index.ensure_merged();

        let segs = index.video_segments("v1");
        assert_eq!(segs[0].segment_id, "a");
        assert_eq!(segs[1].segment_id, "b");
    }

    #[test]
    fn add_table_rejects_mismatched_lengths() {
        let mut index = VectorIndex::new();
        let err = index.add_table(vec![row("a", "v1", 0.0, "")], vec![]).unwrap_err();
        assert!(matches!(err, IndexError::RowEmbeddingMismatch { .. }));
    }

    #[test]
    fn get_segment_returns_embedding() {
        let mut index = VectorIndex::new();
        index.add_table(vec![row("a", "v1", 0.0, "")], vec![unit_embedding(5)]).unwrap();
        index.ensure_merged();

        let (row, embedding) = index.get_segment("a").unwrap();
        assert_eq!(row.segment_id, "a");
        assert_eq!(embedding.len(), EMBEDDING_DIM);
        assert!((embedding[5] - 1.0).abs() < 1e-3);
        assert!(index.get_segment("missing").is_none());
    }
}
