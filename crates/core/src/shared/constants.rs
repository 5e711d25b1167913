pub const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "m4a"];
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "avi", "mov"];

/// Whisper models expect 16 kHz mono input.
pub const WHISPER_SAMPLE_RATE: u32 = 16000;

/// Default chunk length, matching the 5-minute default of the desktop app.
pub const DEFAULT_CHUNK_DURATION_SECS: f64 = 300.0;

pub const MODEL_BASE_URL: &str = "https://huggingface.co/ggerganov/whisper.cpp/resolve/main";

/// Subdirectory name used for the on-disk model cache.
pub const APP_DIR_NAME: &str = "Intervox";
