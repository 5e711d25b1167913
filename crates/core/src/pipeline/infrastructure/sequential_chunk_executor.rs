use std::sync::atomic::Ordering;
use std::sync::Arc;

use crate::audio::domain::audio_chunk::AudioChunk;
use crate::pipeline::chunk_executor::{
    offset_segments, placeholder_segment, ChunkExecutor, EngineError, FailurePolicy, RunConfig,
};
use crate::pipeline::events::{emit, PipelineEvent};
use crate::recognition::domain::speech_recognizer::SpeechRecognizer;
use crate::transcript::domain::segment::Segment;

/// Transcribes chunks one at a time in sequence order.
///
/// Each chunk is consumed and dropped as soon as its transcription
/// finishes, so peak memory stays at one chunk's samples beyond the
/// decoded source.
pub struct SequentialChunkExecutor;

impl ChunkExecutor for SequentialChunkExecutor {
    fn execute(
        &self,
        chunks: Vec<AudioChunk>,
        recognizer: Arc<dyn SpeechRecognizer>,
        config: &RunConfig,
    ) -> Result<Vec<Segment>, EngineError> {
        let total = chunks.len();
        let mut segments = Vec::new();

        for chunk in chunks {
            if config.cancelled.load(Ordering::Relaxed) {
                return Err(EngineError::Cancelled);
            }

            emit(
                &config.events,
                PipelineEvent::ChunkStarted {
                    index: chunk.index,
                    total,
                },
            );

            match recognizer.transcribe(&chunk.audio) {
                Ok(raw) => segments.extend(offset_segments(&chunk, raw)),
                Err(e) => match config.failure_policy {
                    FailurePolicy::Abort => {
                        return Err(EngineError::ChunkTranscription {
                            index: chunk.index,
                            start_offset: chunk.start_offset,
                            message: e.to_string(),
                        })
                    }
                    FailurePolicy::Placeholder => {
                        log::warn!(
                            "chunk {} (offset {}s) failed: {e}; substituting placeholder",
                            chunk.index,
                            chunk.start_offset
                        );
                        segments.push(placeholder_segment(chunk.start_offset, chunk.duration()));
                    }
                },
            }

            emit(
                &config.events,
                PipelineEvent::ChunkCompleted {
                    index: chunk.index,
                    total,
                },
            );

            if let Some(ref callback) = config.on_progress {
                if !callback(chunk.index + 1, total) {
                    config.cancelled.store(true, Ordering::Relaxed);
                    return Err(EngineError::Cancelled);
                }
            }
        }

        Ok(segments)
    }
}
