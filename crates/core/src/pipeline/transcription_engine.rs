use std::path::Path;
use std::sync::Arc;

use crate::audio::domain::audio_chunk::AudioChunk;
use crate::pipeline::chunk_executor::{ChunkExecutor, EngineError, RunConfig};
use crate::pipeline::infrastructure::sequential_chunk_executor::SequentialChunkExecutor;
use crate::recognition::domain::model_size::ModelSize;
use crate::recognition::domain::speech_recognizer::SpeechRecognizer;
use crate::transcript::domain::transcript::Transcript;

/// Turns an ordered chunk list into a transcript on the original media
/// timeline.
///
/// Execution strategy (sequential or worker pool) is injected; the engine
/// itself only owns the contract: segments come back ordered by
/// (chunk index, intra-chunk order) with chunk offsets applied, and the
/// failure policy from `RunConfig` decides whether a bad chunk kills the
/// run or degrades to a placeholder.
pub struct TranscriptionEngine {
    executor: Box<dyn ChunkExecutor>,
}

impl TranscriptionEngine {
    pub fn new(executor: Box<dyn ChunkExecutor>) -> Self {
        Self { executor }
    }

    /// Engine with the default one-chunk-at-a-time executor.
    pub fn sequential() -> Self {
        Self::new(Box::new(SequentialChunkExecutor))
    }

    pub fn transcribe(
        &self,
        source_path: &Path,
        model_size: ModelSize,
        chunks: Vec<AudioChunk>,
        recognizer: Arc<dyn SpeechRecognizer>,
        config: &RunConfig,
    ) -> Result<Transcript, EngineError> {
        let total = chunks.len();
        let segments = self.executor.execute(chunks, recognizer, config)?;
        log::info!(
            "transcribed {} into {} segments across {total} chunks",
            source_path.display(),
            segments.len()
        );
        Ok(Transcript::new(source_path, model_size, segments))
    }
}

impl Default for TranscriptionEngine {
    fn default() -> Self {
        Self::sequential()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::domain::audio_segment::AudioSegment;
    use crate::audio::domain::chunker::Chunker;
    use crate::recognition::domain::speech_recognizer::RecognizedSegment;

    struct FixedRecognizer;

    impl SpeechRecognizer for FixedRecognizer {
        fn transcribe(
            &self,
            _: &AudioSegment,
        ) -> Result<Vec<RecognizedSegment>, Box<dyn std::error::Error + Send + Sync>> {
            Ok(vec![RecognizedSegment {
                start: 0.0,
                end: 1.0,
                text: "ok".to_string(),
            }])
        }
    }

    #[test]
    fn test_transcript_carries_source_and_model_metadata() {
        let chunks = Chunker::new(30.0)
            .unwrap()
            .split(&AudioSegment::new(vec![0.0; 9000], 100, 1))
            .unwrap();

        let engine = TranscriptionEngine::sequential();
        let transcript = engine
            .transcribe(
                Path::new("/tmp/interview.mp3"),
                ModelSize::Small,
                chunks,
                Arc::new(FixedRecognizer),
                &RunConfig::default(),
            )
            .unwrap();

        assert_eq!(transcript.source_path(), Path::new("/tmp/interview.mp3"));
        assert_eq!(transcript.model_size(), ModelSize::Small);
        assert_eq!(transcript.len(), 3);

        // Each segment's start lies within its source chunk's window
        for (i, segment) in transcript.segments().iter().enumerate() {
            let chunk_start = i as f64 * 30.0;
            assert!(segment.start >= chunk_start && segment.start < chunk_start + 30.0);
        }
    }
}
