use std::path::{Path, PathBuf};

use thiserror::Error;

use super::media_source::MediaSource;
use crate::audio::domain::audio_segment::AudioSegment;

#[derive(Error, Debug)]
pub enum MediaError {
    #[error("unsupported format '{extension}' for {path}")]
    UnsupportedFormat { path: PathBuf, extension: String },
    #[error("no audio track in {path}")]
    NoAudioTrack { path: PathBuf },
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// A probed source together with its decoded mono audio.
#[derive(Clone, Debug)]
pub struct LoadedMedia {
    pub source: MediaSource,
    pub audio: AudioSegment,
}

/// Domain interface for turning an input path into decoded audio.
///
/// Implementations validate the extension, demux video containers down to
/// their audio track, and decode to mono PCM at the requested rate.
pub trait MediaLoader: Send {
    fn load(&self, path: &Path, target_sample_rate: u32) -> Result<LoadedMedia, MediaError>;
}
