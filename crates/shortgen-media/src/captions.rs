//! Caption timeline planner.
//!
//! Converts transcriber caption spans into short chunks of bounded word
//! count for progressive on-screen reveal. Chunks within a span share its
//! interval in equal parts: a three-word chunk and a one-word tail get the
//! same duration. This mirrors the display behavior the product shipped
//! with; word-proportional timing was considered and deliberately not
//! introduced here.

use serde::{Deserialize, Serialize};
use shortgen_models::CaptionSpan;

/// Default maximum words per caption chunk.
pub const DEFAULT_CHUNK_WORDS: usize = 3;

/// A time-bounded caption fragment derived from a span.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionChunk {
    /// Display start in seconds
    pub start: f64,
    /// Display end in seconds
    pub end: f64,
    /// At most `chunk_word_count` words of the parent span
    pub text: String,
}

/// Subdivide caption spans into timed chunks.
///
/// Each span's words are grouped into consecutive runs of at most
/// `chunk_word_count` words (the last run may be shorter). The span's
/// interval is split into `ceil(words / chunk_word_count)` equal parts,
/// one per chunk, partitioning it with no gaps or overlaps. `time_offset`
/// shifts every chunk to compensate for a voiceover track mixed in after
/// the video's own timeline zero.
///
/// Spans with no words are dropped. Spans are processed independently;
/// overlap between spans is the transcriber's concern, not ours.
pub fn plan_captions(
    spans: &[CaptionSpan],
    chunk_word_count: usize,
    time_offset: f64,
) -> Vec<CaptionChunk> {
    let chunk_word_count = chunk_word_count.max(1);
    let mut chunks = Vec::new();

    for span in spans {
        let words: Vec<&str> = span.text.split_whitespace().collect();
        if words.is_empty() {
            continue;
        }

        let num_chunks = words.len().div_ceil(chunk_word_count);
        let chunk_duration = span.duration() / num_chunks as f64;

        for (j, group) in words.chunks(chunk_word_count).enumerate() {
            let start = span.start + j as f64 * chunk_duration;
            chunks.push(CaptionChunk {
                start: start + time_offset,
                end: start + chunk_duration + time_offset,
                text: group.join(" "),
            });
        }
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-6;

    #[test]
    fn test_even_split() {
        let spans = [CaptionSpan::new(2.0, 5.0, "one two three four five six")];
        let chunks = plan_captions(&spans, 3, 0.0);

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].text, "one two three");
        assert_eq!(chunks[1].text, "four five six");
        assert!((chunks[0].start - 2.0).abs() < EPS);
        assert!((chunks[0].end - 3.5).abs() < EPS);
        assert!((chunks[1].start - 3.5).abs() < EPS);
        assert!((chunks[1].end - 5.0).abs() < EPS);
    }

    #[test]
    fn test_time_offset_shifts_both_ends() {
        let spans = [CaptionSpan::new(2.0, 5.0, "one two three four five six")];
        let chunks = plan_captions(&spans, 3, 8.0);

        assert!((chunks[0].start - 10.0).abs() < EPS);
        assert!((chunks[0].end - 11.5).abs() < EPS);
        assert!((chunks[1].start - 11.5).abs() < EPS);
        assert!((chunks[1].end - 13.0).abs() < EPS);
    }

    #[test]
    fn test_uneven_tail_chunk() {
        let spans = [CaptionSpan::new(0.0, 3.0, "a b c d")];
        let chunks = plan_captions(&spans, 3, 0.0);

        // Equal durations regardless of word count per chunk.
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].text, "a b c");
        assert_eq!(chunks[1].text, "d");
        assert!((chunks[0].end - chunks[0].start - 1.5).abs() < EPS);
        assert!((chunks[1].end - chunks[1].start - 1.5).abs() < EPS);
    }

    #[test]
    fn test_chunks_partition_span() {
        let spans = [CaptionSpan::new(1.25, 7.75, "w1 w2 w3 w4 w5 w6 w7 w8 w9 w10 w11")];
        let chunks = plan_captions(&spans, 3, 0.0);

        let total: f64 = chunks.iter().map(|c| c.end - c.start).sum();
        assert!((total - 6.5).abs() < EPS);

        for pair in chunks.windows(2) {
            assert!((pair[0].end - pair[1].start).abs() < EPS, "gap or overlap");
        }
        assert!((chunks[0].start - 1.25).abs() < EPS);
        assert!((chunks.last().unwrap().end - 7.75).abs() < EPS);
    }

    #[test]
    fn test_empty_span_dropped() {
        let spans = [
            CaptionSpan::new(0.0, 1.0, "   "),
            CaptionSpan::new(1.0, 2.0, "kept"),
        ];
        let chunks = plan_captions(&spans, 3, 0.0);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "kept");
    }

    #[test]
    fn test_spans_chunked_independently() {
        let spans = [
            CaptionSpan::new(0.0, 2.0, "a b c"),
            CaptionSpan::new(2.0, 4.0, "d e f g"),
        ];
        let chunks = plan_captions(&spans, 3, 0.0);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[1].text, "d e f");
        assert_eq!(chunks[2].text, "g");
    }
}
