pub mod chunk_executor;
pub mod events;
pub mod infrastructure;
pub mod transcribe_media_use_case;
pub mod transcription_engine;
