use thiserror::Error;

use super::audio_chunk::AudioChunk;
use super::audio_segment::AudioSegment;

#[derive(Error, Debug)]
pub enum ChunkError {
    #[error("media has no audio samples")]
    EmptyMedia,
    #[error("chunk duration must be positive, got {0}")]
    InvalidChunkDuration(f64),
}

/// Splits decoded audio into contiguous, non-overlapping chunks.
///
/// Chunk boundaries are computed in whole samples, so the chunks tile the
/// source exactly: `chunk[i].start_offset + chunk[i].duration()` equals
/// `chunk[i+1].start_offset`. The last chunk may be shorter than the
/// configured duration.
#[derive(Clone, Debug)]
pub struct Chunker {
    chunk_duration: f64,
}

impl Chunker {
    pub fn new(chunk_duration: f64) -> Result<Self, ChunkError> {
        if !chunk_duration.is_finite() || chunk_duration <= 0.0 {
            return Err(ChunkError::InvalidChunkDuration(chunk_duration));
        }
        Ok(Self { chunk_duration })
    }

    pub fn chunk_duration(&self) -> f64 {
        self.chunk_duration
    }

    pub fn split(&self, audio: &AudioSegment) -> Result<Vec<AudioChunk>, ChunkError> {
        if audio.is_empty() {
            return Err(ChunkError::EmptyMedia);
        }

        let chunk_samples = audio.samples_for_duration(self.chunk_duration).max(1);
        let total = audio.samples().len();
        let samples_per_sec = audio.sample_rate() as f64 * audio.channels() as f64;

        let mut chunks = Vec::with_capacity(total.div_ceil(chunk_samples));
        let mut start = 0usize;
        while start < total {
            let end = (start + chunk_samples).min(total);
            chunks.push(AudioChunk::new(
                chunks.len(),
                start as f64 / samples_per_sec,
                audio.slice(start, end),
            ));
            start = end;
        }

        Ok(chunks)
    }
}
