use std::path::PathBuf;

use crossbeam_channel::{Receiver, Sender};

use crate::recognition::domain::model_size::ModelSize;

/// Discrete lifecycle notifications emitted during a pipeline run.
///
/// The interface layer (GUI, CLI) subscribes via a channel instead of the
/// core blocking its thread; a full or disconnected receiver never stalls
/// the pipeline.
#[derive(Clone, Debug, PartialEq)]
pub enum PipelineEvent {
    MediaLoadStarted { path: PathBuf },
    MediaLoaded { duration: f64 },
    ChunkingCompleted { chunks: usize },
    ModelLoadStarted { size: ModelSize },
    ModelLoadCompleted { size: ModelSize },
    ChunkStarted { index: usize, total: usize },
    ChunkCompleted { index: usize, total: usize },
}

/// Unbounded event channel for wiring a subscriber into [`RunConfig`].
///
/// [`RunConfig`]: crate::pipeline::chunk_executor::RunConfig
pub fn channel() -> (Sender<PipelineEvent>, Receiver<PipelineEvent>) {
    crossbeam_channel::unbounded()
}

/// Send an event if a subscriber is attached. A gone receiver is ignored.
pub(crate) fn emit(events: &Option<Sender<PipelineEvent>>, event: PipelineEvent) {
    if let Some(tx) = events {
        let _ = tx.send(event);
    }
}
