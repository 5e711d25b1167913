//! Interview transcription pipeline: media decoding, chunked Whisper
//! inference, and timestamped transcript assembly.
//!
//! The library is organized into bounded contexts, each split into a
//! `domain` layer (types and ports) and an `infrastructure` layer
//! (ffmpeg, whisper.cpp, filesystem, threads):
//!
//! - [`media`]: source probing and audio decoding
//! - [`audio`]: PCM segments and chunking
//! - [`recognition`]: model sizes, the recognizer port, model lifecycle
//! - [`transcript`]: segments, transcripts, and rendering
//! - [`pipeline`]: orchestration, executors, progress and cancellation

pub mod audio;
pub mod media;
pub mod pipeline;
pub mod recognition;
pub mod shared;
pub mod transcript;
