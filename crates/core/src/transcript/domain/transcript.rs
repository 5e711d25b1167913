use std::path::{Path, PathBuf};

use serde::Serialize;

use super::segment::Segment;
use crate::recognition::domain::model_size::ModelSize;

/// The fully assembled transcript for one media file. Immutable once
/// built; segments are ordered by start time.
#[derive(Clone, Debug, Serialize)]
pub struct Transcript {
    source_path: PathBuf,
    model_size: ModelSize,
    segments: Vec<Segment>,
}

impl Transcript {
    pub fn new(source_path: &Path, model_size: ModelSize, segments: Vec<Segment>) -> Self {
        debug_assert!(
            segments.windows(2).all(|w| w[0].start <= w[1].start),
            "segments must be ordered by start time"
        );
        Self {
            source_path: source_path.to_path_buf(),
            model_size,
            segments,
        }
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    pub fn model_size(&self) -> ModelSize {
        self.model_size
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}
