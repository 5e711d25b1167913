pub mod audio_chunk;
pub mod audio_segment;
pub mod chunker;
