use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use crossbeam_channel::Sender;
use thiserror::Error;

use crate::audio::domain::audio_chunk::AudioChunk;
use crate::pipeline::events::PipelineEvent;
use crate::recognition::domain::speech_recognizer::{RecognizedSegment, SpeechRecognizer};
use crate::transcript::domain::segment::Segment;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("chunk {index} (offset {start_offset}s) failed to transcribe: {message}")]
    ChunkTranscription {
        index: usize,
        start_offset: f64,
        message: String,
    },
    #[error("chunk worker thread panicked")]
    WorkerPanicked,
    #[error("transcription cancelled")]
    Cancelled,
}

/// What to do when a single chunk fails to transcribe.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Abort the whole run (no partial transcript is returned).
    #[default]
    Abort,
    /// Substitute an empty segment spanning the failed chunk and continue;
    /// useful for interview audio with the odd unreadable stretch.
    Placeholder,
}

/// Per-run knobs shared by the use case and the executor.
///
/// `on_progress` receives `(chunks_completed, total)`; returning `false`
/// cancels the run, as does setting `cancelled`. Cancellation takes
/// effect before the next not-yet-started chunk.
pub struct RunConfig {
    pub failure_policy: FailurePolicy,
    pub on_progress: Option<Box<dyn Fn(usize, usize) -> bool + Send + Sync>>,
    pub cancelled: Arc<AtomicBool>,
    pub events: Option<Sender<PipelineEvent>>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            failure_policy: FailurePolicy::default(),
            on_progress: None,
            cancelled: Arc::new(AtomicBool::new(false)),
            events: None,
        }
    }
}

/// Abstracts how the per-chunk inference loop is executed.
///
/// This is a port (application-layer interface). Infrastructure provides
/// sequential and worker-pool implementations; both must return segments
/// ordered by (chunk index, intra-chunk order) regardless of completion
/// order.
pub trait ChunkExecutor: Send + Sync {
    fn execute(
        &self,
        chunks: Vec<AudioChunk>,
        recognizer: Arc<dyn SpeechRecognizer>,
        config: &RunConfig,
    ) -> Result<Vec<Segment>, EngineError>;
}

/// Shift chunk-local timestamps onto the original media timeline.
pub(crate) fn offset_segments(chunk: &AudioChunk, raw: Vec<RecognizedSegment>) -> Vec<Segment> {
    raw.into_iter()
        .map(|r| {
            Segment::new(
                chunk.start_offset + r.start,
                chunk.start_offset + r.end,
                r.text,
            )
        })
        .collect()
}

/// Empty segment spanning a failed chunk, used by `FailurePolicy::Placeholder`.
pub(crate) fn placeholder_segment(start_offset: f64, duration: f64) -> Segment {
    Segment::new(start_offset, start_offset + duration, "")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::domain::audio_segment::AudioSegment;
    use approx::assert_relative_eq;

    #[test]
    fn test_offset_segments_applies_chunk_offset() {
        let chunk = AudioChunk::new(2, 120.0, AudioSegment::new(vec![0.0; 100], 100, 1));
        let raw = vec![
            RecognizedSegment {
                start: 0.5,
                end: 2.0,
                text: "first".to_string(),
            },
            RecognizedSegment {
                start: 2.0,
                end: 3.25,
                text: "second".to_string(),
            },
        ];
        let segments = offset_segments(&chunk, raw);

        assert_relative_eq!(segments[0].start, 120.5);
        assert_relative_eq!(segments[0].end, 122.0);
        assert_relative_eq!(segments[1].start, 122.0);
        assert_relative_eq!(segments[1].end, 123.25);
        assert_eq!(segments[0].text, "first");
    }

    #[test]
    fn test_placeholder_segment_spans_chunk() {
        let seg = placeholder_segment(120.0, 30.0);
        assert_relative_eq!(seg.start, 120.0);
        assert_relative_eq!(seg.end, 150.0);
        assert!(seg.text.is_empty());
    }
}
