use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::thread;

use crate::audio::domain::audio_chunk::AudioChunk;
use crate::pipeline::chunk_executor::{
    offset_segments, placeholder_segment, ChunkExecutor, EngineError, FailurePolicy, RunConfig,
};
use crate::pipeline::events::{emit, PipelineEvent};
use crate::recognition::domain::speech_recognizer::SpeechRecognizer;
use crate::transcript::domain::segment::Segment;

struct ChunkOutcome {
    index: usize,
    start_offset: f64,
    duration: f64,
    result: Result<Vec<Segment>, String>,
}

/// Transcribes chunks on a bounded worker pool.
///
/// Chunks are independent once the model is loaded, so workers pull from
/// a shared queue and inference overlaps. Completion order is arbitrary;
/// outcomes are re-sorted by chunk index before the failure policy is
/// applied, so the ordering guarantee matches the sequential executor.
pub struct ThreadedChunkExecutor {
    workers: usize,
}

impl ThreadedChunkExecutor {
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }
}

impl ChunkExecutor for ThreadedChunkExecutor {
    fn execute(
        &self,
        chunks: Vec<AudioChunk>,
        recognizer: Arc<dyn SpeechRecognizer>,
        config: &RunConfig,
    ) -> Result<Vec<Segment>, EngineError> {
        let total = chunks.len();
        if total == 0 {
            return Ok(Vec::new());
        }
        let workers = self.workers.min(total);

        let (job_tx, job_rx) = crossbeam_channel::unbounded::<AudioChunk>();
        let (outcome_tx, outcome_rx) = crossbeam_channel::unbounded::<ChunkOutcome>();

        for chunk in chunks {
            // Receiver is alive; an unbounded send cannot fail here
            let _ = job_tx.send(chunk);
        }
        drop(job_tx);

        let handles: Vec<_> = (0..workers)
            .map(|_| {
                let job_rx = job_rx.clone();
                let outcome_tx = outcome_tx.clone();
                let recognizer = recognizer.clone();
                let cancelled = config.cancelled.clone();
                let events = config.events.clone();
                thread::spawn(move || {
                    for chunk in job_rx {
                        // Not-yet-started chunks are abandoned on cancel
                        if cancelled.load(Ordering::Relaxed) {
                            break;
                        }
                        emit(
                            &events,
                            PipelineEvent::ChunkStarted {
                                index: chunk.index,
                                total,
                            },
                        );
                        let outcome = ChunkOutcome {
                            index: chunk.index,
                            start_offset: chunk.start_offset,
                            duration: chunk.duration(),
                            result: recognizer
                                .transcribe(&chunk.audio)
                                .map(|raw| offset_segments(&chunk, raw))
                                .map_err(|e| e.to_string()),
                        };
                        if outcome_tx.send(outcome).is_err() {
                            break;
                        }
                    }
                })
            })
            .collect();
        drop(outcome_tx);
        drop(job_rx);

        let mut outcomes: Vec<ChunkOutcome> = Vec::with_capacity(total);
        let mut completed = 0usize;
        for outcome in outcome_rx {
            completed += 1;
            emit(
                &config.events,
                PipelineEvent::ChunkCompleted {
                    index: outcome.index,
                    total,
                },
            );

            // Under the abort policy a failure stops scheduling; the drain
            // continues so the workers wind down cleanly.
            if outcome.result.is_err() && config.failure_policy == FailurePolicy::Abort {
                config.cancelled.store(true, Ordering::Relaxed);
            }

            if let Some(ref callback) = config.on_progress {
                if !callback(completed, total) {
                    config.cancelled.store(true, Ordering::Relaxed);
                }
            }

            outcomes.push(outcome);
        }

        let mut worker_panicked = false;
        for handle in handles {
            if handle.join().is_err() {
                worker_panicked = true;
            }
        }

        outcomes.sort_by_key(|o| o.index);

        let collected = outcomes.len();
        let mut segments = Vec::new();
        for outcome in outcomes {
            match outcome.result {
                Ok(chunk_segments) => segments.extend(chunk_segments),
                Err(message) => match config.failure_policy {
                    FailurePolicy::Abort => {
                        return Err(EngineError::ChunkTranscription {
                            index: outcome.index,
                            start_offset: outcome.start_offset,
                            message,
                        })
                    }
                    FailurePolicy::Placeholder => {
                        log::warn!(
                            "chunk {} (offset {}s) failed: {message}; substituting placeholder",
                            outcome.index,
                            outcome.start_offset
                        );
                        segments
                            .push(placeholder_segment(outcome.start_offset, outcome.duration));
                    }
                },
            }
        }

        if worker_panicked {
            return Err(EngineError::WorkerPanicked);
        }
        if collected < total {
            return Err(EngineError::Cancelled);
        }
        Ok(segments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::domain::audio_segment::AudioSegment;
    use crate::audio::domain::chunker::Chunker;
    use crate::recognition::domain::speech_recognizer::RecognizedSegment;
    use std::time::Duration;

    /// Derives its output from the chunk's own samples (first sample value
    /// encodes the chunk index), so assertions are independent of
    /// completion order.
    struct MarkerRecognizer {
        fail_marker: Option<f32>,
        delay: Duration,
    }

    impl SpeechRecognizer for MarkerRecognizer {
        fn transcribe(
            &self,
            audio: &AudioSegment,
        ) -> Result<Vec<RecognizedSegment>, Box<dyn std::error::Error + Send + Sync>> {
            thread::sleep(self.delay);
            let marker = audio.samples()[0];
            if self.fail_marker == Some(marker) {
                return Err(format!("bad chunk marker {marker}").into());
            }
            Ok(vec![RecognizedSegment {
                start: 0.5,
                end: 1.0,
                text: format!("chunk {marker}"),
            }])
        }
    }

    /// 100 Hz audio split into 10s chunks; each chunk's first sample is
    /// its index.
    fn marked_chunks(count: usize) -> Vec<AudioChunk> {
        let mut samples = vec![0.0f32; count * 1000];
        for i in 0..count {
            samples[i * 1000] = i as f32;
        }
        Chunker::new(10.0)
            .unwrap()
            .split(&AudioSegment::new(samples, 100, 1))
            .unwrap()
    }

    #[test]
    fn test_segments_are_ordered_despite_arbitrary_completion() {
        let executor = ThreadedChunkExecutor::new(4);
        let segments = executor
            .execute(
                marked_chunks(8),
                Arc::new(MarkerRecognizer {
                    fail_marker: None,
                    delay: Duration::from_millis(5),
                }),
                &RunConfig::default(),
            )
            .unwrap();

        assert_eq!(segments.len(), 8);
        for (i, segment) in segments.iter().enumerate() {
            assert_eq!(segment.text, format!("chunk {}", i as f32));
            assert_eq!(segment.start, i as f64 * 10.0 + 0.5);
        }
        assert!(segments.windows(2).all(|w| w[0].start <= w[1].start));
    }

    #[test]
    fn test_abort_policy_reports_lowest_failed_index() {
        let executor = ThreadedChunkExecutor::new(2);
        let result = executor.execute(
            marked_chunks(6),
            Arc::new(MarkerRecognizer {
                fail_marker: Some(3.0),
                delay: Duration::from_millis(1),
            }),
            &RunConfig::default(),
        );

        match result {
            Err(EngineError::ChunkTranscription {
                index,
                start_offset,
                ..
            }) => {
                assert_eq!(index, 3);
                assert_eq!(start_offset, 30.0);
            }
            other => panic!("expected ChunkTranscription error, got {other:?}"),
        }
    }

    #[test]
    fn test_placeholder_policy_fills_failed_chunk() {
        let executor = ThreadedChunkExecutor::new(3);
        let config = RunConfig {
            failure_policy: FailurePolicy::Placeholder,
            ..RunConfig::default()
        };
        let segments = executor
            .execute(
                marked_chunks(5),
                Arc::new(MarkerRecognizer {
                    fail_marker: Some(2.0),
                    delay: Duration::from_millis(1),
                }),
                &config,
            )
            .unwrap();

        assert_eq!(segments.len(), 5);
        assert_eq!(segments[2].start, 20.0);
        assert_eq!(segments[2].end, 30.0);
        assert!(segments[2].text.is_empty());
    }

    #[test]
    fn test_single_worker_matches_sequential_behavior() {
        let executor = ThreadedChunkExecutor::new(1);
        let segments = executor
            .execute(
                marked_chunks(3),
                Arc::new(MarkerRecognizer {
                    fail_marker: None,
                    delay: Duration::ZERO,
                }),
                &RunConfig::default(),
            )
            .unwrap();
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0].text, "chunk 0");
    }

    #[test]
    fn test_preset_cancellation_transcribes_nothing() {
        let config = RunConfig::default();
        config.cancelled.store(true, Ordering::Relaxed);

        let result = ThreadedChunkExecutor::new(2).execute(
            marked_chunks(4),
            Arc::new(MarkerRecognizer {
                fail_marker: None,
                delay: Duration::ZERO,
            }),
            &config,
        );
        assert!(matches!(result, Err(EngineError::Cancelled)));
    }

    #[test]
    fn test_empty_chunk_list_yields_empty_segments() {
        let segments = ThreadedChunkExecutor::new(2)
            .execute(
                Vec::new(),
                Arc::new(MarkerRecognizer {
                    fail_marker: None,
                    delay: Duration::ZERO,
                }),
                &RunConfig::default(),
            )
            .unwrap();
        assert!(segments.is_empty());
    }
}
