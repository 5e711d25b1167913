use std::path::{Path, PathBuf};

use crate::shared::constants::{AUDIO_EXTENSIONS, VIDEO_EXTENSIONS};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MediaKind {
    Audio,
    Video,
}

/// Classify a path by extension. Returns `None` for unsupported formats.
pub fn kind_for_path(path: &Path) -> Option<MediaKind> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    if AUDIO_EXTENSIONS.contains(&ext.as_str()) {
        Some(MediaKind::Audio)
    } else if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
        Some(MediaKind::Video)
    } else {
        None
    }
}

/// Probed metadata for one input file. `sample_rate` and `channels`
/// describe the original stream, not the mono decode target.
#[derive(Clone, Debug, PartialEq)]
pub struct MediaSource {
    pub path: PathBuf,
    pub kind: MediaKind,
    pub duration: f64,
    pub sample_rate: u32,
    pub channels: u16,
}
