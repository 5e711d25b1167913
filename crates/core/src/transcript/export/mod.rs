//! Pure transcript renderers plus a thin file-writing helper.
//!
//! Rendering never touches the filesystem; `write_transcript` is the one
//! place a file handle is opened, and an `ExportError` from it leaves the
//! in-memory transcript untouched for a retry elsewhere.

mod json;
mod plain;
mod srt;

pub use json::render_json;
pub use plain::render_plain;
pub use srt::render_srt;

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::transcript::domain::transcript::Transcript;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("failed to write transcript to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize transcript: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    Plain,
    Srt,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Plain => "txt",
            ExportFormat::Srt => "srt",
            ExportFormat::Json => "json",
        }
    }
}

/// Render `transcript` in the given format.
pub fn render(transcript: &Transcript, format: ExportFormat) -> Result<String, ExportError> {
    match format {
        ExportFormat::Plain => Ok(render_plain(transcript)),
        ExportFormat::Srt => Ok(render_srt(transcript)),
        ExportFormat::Json => render_json(transcript),
    }
}

/// Render and write to `path`. The file handle is scoped to this call and
/// flushed before close.
pub fn write_transcript(
    path: &Path,
    transcript: &Transcript,
    format: ExportFormat,
) -> Result<(), ExportError> {
    let text = render(transcript, format)?;
    let io_err = |source: std::io::Error| ExportError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut file = File::create(path).map_err(io_err)?;
    file.write_all(text.as_bytes()).map_err(io_err)?;
    file.flush().map_err(io_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recognition::domain::model_size::ModelSize;
    use crate::transcript::domain::segment::Segment;
    use tempfile::TempDir;

    fn sample_transcript() -> Transcript {
        Transcript::new(
            Path::new("/tmp/interview.mp3"),
            ModelSize::Base,
            vec![
                Segment::new(0.0, 2.5, "hello and welcome"),
                Segment::new(2.5, 5.0, "thanks for having me"),
            ],
        )
    }

    #[test]
    fn test_write_transcript_creates_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("out.txt");
        write_transcript(&path, &sample_transcript(), ExportFormat::Plain).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, render_plain(&sample_transcript()));
    }

    #[test]
    fn test_write_transcript_to_bad_path_is_io_error() {
        let result = write_transcript(
            Path::new("/nonexistent-dir/out.txt"),
            &sample_transcript(),
            ExportFormat::Plain,
        );
        assert!(matches!(result, Err(ExportError::Io { .. })));
    }

    #[test]
    fn test_format_extensions() {
        assert_eq!(ExportFormat::Plain.extension(), "txt");
        assert_eq!(ExportFormat::Srt.extension(), "srt");
        assert_eq!(ExportFormat::Json.extension(), "json");
    }

    #[test]
    fn test_render_is_idempotent_across_formats() {
        let transcript = sample_transcript();
        for format in [ExportFormat::Plain, ExportFormat::Srt, ExportFormat::Json] {
            let first = render(&transcript, format).unwrap();
            let second = render(&transcript, format).unwrap();
            assert_eq!(first, second);
        }
    }
}
