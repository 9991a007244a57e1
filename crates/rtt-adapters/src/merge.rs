//! Word-to-segment merge policy shared by ASR adapters that receive
//! per-word timing instead of pre-grouped utterances (`spec.md` §9's
//! ASR/subtitle merge-policy open question, resolved here as a tunable
//! config rather than a hard-coded constant).

use rtt_models::Segment;

/// A single timed word, as returned by a word-level ASR response.
#[derive(Debug, Clone)]
pub struct TimedWord {
    pub text: String,
    pub start_ms: u64,
    pub end_ms: u64,
}

/// Tunables for grouping timed words into segments, grounded on
/// `transcribe.py`'s `_segments_from_words(max_gap_ms=1500)`.
#[derive(Debug, Clone, Copy)]
pub struct SegmentMergeConfig {
    /// Segments shorter than this are merged into the following segment.
    pub min_duration_secs: f64,
    /// A gap to the next word larger than this starts a new segment.
    pub max_gap_ms: u64,
}

impl Default for SegmentMergeConfig {
    fn default() -> Self {
        Self { min_duration_secs: 1.0, max_gap_ms: 1500 }
    }
}

/// Groups timed words into `Segment`s: a new segment starts whenever the
/// gap to the previous word's end exceeds `max_gap_ms`. Any resulting
/// chunk shorter than `min_duration_secs` is folded into the previous
/// segment instead of standing alone (or kept as-is if it's the first).
pub fn segments_from_words(words: &[TimedWord], video_id: &str, config: SegmentMergeConfig) -> Vec<Segment> {
    let mut chunks: Vec<Vec<&TimedWord>> = vec![Vec::new()];
    for w in words {
        if let Some(last) = chunks.last().unwrap().last() {
            if w.start_ms.saturating_sub(last.end_ms) > config.max_gap_ms {
                chunks.push(Vec::new());
            }
        }
        chunks.last_mut().unwrap().push(w);
    }
    chunks.retain(|c| !c.is_empty());

    let mut merged: Vec<Vec<&TimedWord>> = Vec::new();
    for chunk in chunks {
        let duration = (chunk.last().unwrap().end_ms - chunk.first().unwrap().start_ms) as f64 / 1000.0;
        if duration < config.min_duration_secs && !merged.is_empty() {
            merged.last_mut().unwrap().extend(chunk);
        } else {
            merged.push(chunk);
        }
    }

    merged
        .into_iter()
        .enumerate()
        .filter_map(|(i, chunk)| {
            let text = chunk.iter().map(|w| w.text.as_str()).collect::<Vec<_>>().join(" ");
            let text = text.trim();
            if text.is_empty() {
                return None;
            }
            let start = chunk.first().unwrap().start_ms as f64 / 1000.0;
            let end = chunk.last().unwrap().end_ms as f64 / 1000.0;
            Some(Segment::new(video_id, i, start, end, text))
        })
        .collect()
}
