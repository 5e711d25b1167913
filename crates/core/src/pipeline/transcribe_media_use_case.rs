use std::path::Path;
use std::sync::Arc;

use thiserror::Error;

use crate::audio::domain::chunker::{ChunkError, Chunker};
use crate::media::domain::media_loader::{MediaError, MediaLoader};
use crate::pipeline::chunk_executor::{EngineError, RunConfig};
use crate::pipeline::events::{emit, PipelineEvent};
use crate::pipeline::transcription_engine::TranscriptionEngine;
use crate::recognition::domain::model_size::ModelSize;
use crate::recognition::infrastructure::model_manager::{ModelError, ModelManager};
use crate::shared::constants::WHISPER_SAMPLE_RATE;
use crate::transcript::domain::transcript::Transcript;

#[derive(Error, Debug)]
pub enum TranscribeError {
    #[error(transparent)]
    Media(#[from] MediaError),
    #[error(transparent)]
    Chunk(#[from] ChunkError),
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Orchestrates one full transcription run:
/// load → chunk → get model → transcribe → transcript.
///
/// The model manager is shared across runs (handles survive and are
/// reused); everything else is per-run state. Reusable: `run` borrows its
/// components, so a GUI or CLI can hold one use case for the lifetime of
/// the process.
pub struct TranscribeMediaUseCase {
    loader: Box<dyn MediaLoader>,
    model_manager: Arc<ModelManager>,
    engine: TranscriptionEngine,
}

impl TranscribeMediaUseCase {
    pub fn new(
        loader: Box<dyn MediaLoader>,
        model_manager: Arc<ModelManager>,
        engine: TranscriptionEngine,
    ) -> Self {
        Self {
            loader,
            model_manager,
            engine,
        }
    }

    pub fn run(
        &self,
        path: &Path,
        model_size: ModelSize,
        chunk_duration: f64,
        config: &RunConfig,
    ) -> Result<Transcript, TranscribeError> {
        emit(
            &config.events,
            PipelineEvent::MediaLoadStarted {
                path: path.to_path_buf(),
            },
        );
        let loaded = self.loader.load(path, WHISPER_SAMPLE_RATE)?;
        emit(
            &config.events,
            PipelineEvent::MediaLoaded {
                duration: loaded.source.duration,
            },
        );

        let chunker = Chunker::new(chunk_duration)?;
        let chunks = chunker.split(&loaded.audio)?;
        emit(
            &config.events,
            PipelineEvent::ChunkingCompleted {
                chunks: chunks.len(),
            },
        );
        log::info!(
            "split {} ({:.1}s) into {} chunk(s) of up to {chunk_duration}s",
            path.display(),
            loaded.source.duration,
            chunks.len()
        );
        drop(loaded.audio);

        emit(
            &config.events,
            PipelineEvent::ModelLoadStarted { size: model_size },
        );
        let recognizer = self.model_manager.get(model_size)?;
        emit(
            &config.events,
            PipelineEvent::ModelLoadCompleted { size: model_size },
        );

        let transcript =
            self.engine
                .transcribe(path, model_size, chunks, recognizer, config)?;
        Ok(transcript)
    }

    /// Release cached model handles and the backend's on-disk cache.
    pub fn clear_model_cache(&self) -> Result<(), TranscribeError> {
        self.model_manager.evict_all()?;
        Ok(())
    }
}
