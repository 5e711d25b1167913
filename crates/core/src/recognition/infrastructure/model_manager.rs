use std::collections::HashMap;
use std::sync::{Arc, Condvar, Mutex};

use thiserror::Error;

use super::model_resolver::{self, ProgressFn};
use super::whisper_recognizer::WhisperRecognizer;
use crate::recognition::domain::model_size::ModelSize;
use crate::recognition::domain::speech_recognizer::SpeechRecognizer;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("failed to load {size} model: {message}")]
    Load { size: ModelSize, message: String },
    #[error("failed to clear model cache: {message}")]
    Evict { message: String },
}

/// A loaded, shareable recognizer. Weights are read-only during
/// inference, so one handle serves any number of chunk workers.
pub type ModelHandle = Arc<dyn SpeechRecognizer>;

type LoaderFn = dyn Fn(ModelSize) -> Result<ModelHandle, String> + Send + Sync;
type EvictFn = dyn Fn() -> Result<(), String> + Send + Sync;

/// Process-wide cache of loaded models, keyed by size.
///
/// `get` loads lazily and at most once per size: the first requester runs
/// the loader while concurrent requesters block on the slot and reuse the
/// result. Built as an injectable service object; callers share it via
/// `Arc` rather than reaching for a global.
pub struct ModelManager {
    slots: Mutex<HashMap<ModelSize, Arc<ModelSlot>>>,
    loader: Box<LoaderFn>,
    on_evict: Option<Box<EvictFn>>,
}

struct ModelSlot {
    result: Mutex<Option<Result<ModelHandle, String>>>,
    ready: Condvar,
}

impl ModelManager {
    pub fn new(loader: Box<LoaderFn>, on_evict: Option<Box<EvictFn>>) -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
            loader,
            on_evict,
        }
    }

    /// Manager backed by the whisper.cpp recognizer: resolves weights
    /// through the on-disk cache (downloading on a miss, reporting via
    /// `progress`) and evicts that cache on `evict_all`.
    pub fn with_whisper(progress: Option<Arc<dyn Fn(u64, u64) + Send + Sync>>) -> Self {
        let loader = move |size: ModelSize| -> Result<ModelHandle, String> {
            let progress_fn: Option<ProgressFn> = progress
                .clone()
                .map(|cb| Box::new(move |downloaded, total| cb(downloaded, total)) as ProgressFn);
            let path = model_resolver::resolve(size, progress_fn).map_err(|e| e.to_string())?;
            let recognizer = WhisperRecognizer::new(&path).map_err(|e| e.to_string())?;
            Ok(Arc::new(recognizer) as ModelHandle)
        };
        Self::new(
            Box::new(loader),
            Some(Box::new(|| {
                model_resolver::clear_cache().map_err(|e| e.to_string())
            })),
        )
    }

    /// Get the handle for `size`, loading it on first use.
    pub fn get(&self, size: ModelSize) -> Result<ModelHandle, ModelError> {
        let (slot, load_here) = {
            let mut slots = self.slots.lock().unwrap();
            match slots.get(&size) {
                Some(slot) => (slot.clone(), false),
                None => {
                    let slot = Arc::new(ModelSlot::new());
                    slots.insert(size, slot.clone());
                    (slot, true)
                }
            }
        };

        let result = if load_here {
            log::info!("loading {size} model");
            let result = (self.loader)(size);
            *slot.result.lock().unwrap() = Some(result.clone());
            slot.ready.notify_all();

            // A failed load is not cached: waiters see the error, but the
            // next request starts over (the weights may appear on disk, or
            // a transient download failure may clear).
            if result.is_err() {
                let mut slots = self.slots.lock().unwrap();
                if slots
                    .get(&size)
                    .is_some_and(|current| Arc::ptr_eq(current, &slot))
                {
                    slots.remove(&size);
                }
            }
            result
        } else {
            slot.wait()
        };

        result.map_err(|message| ModelError::Load { size, message })
    }

    /// Sizes with a live (or in-flight) handle.
    pub fn loaded_sizes(&self) -> Vec<ModelSize> {
        self.slots.lock().unwrap().keys().copied().collect()
    }

    /// Release all cached handles and the backend's on-disk cache.
    /// Safe to call with nothing loaded.
    pub fn evict_all(&self) -> Result<(), ModelError> {
        self.slots.lock().unwrap().clear();
        if let Some(ref on_evict) = self.on_evict {
            on_evict().map_err(|message| ModelError::Evict { message })?;
        }
        Ok(())
    }
}

impl ModelSlot {
    fn new() -> Self {
        Self {
            result: Mutex::new(None),
            ready: Condvar::new(),
        }
    }

    fn wait(&self) -> Result<ModelHandle, String> {
        let mut guard = self.result.lock().unwrap();
        while guard.is_none() {
            guard = self.ready.wait(guard).unwrap();
        }
        guard.as_ref().cloned().unwrap()
    }
}
