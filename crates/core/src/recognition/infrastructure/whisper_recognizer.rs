use std::path::{Path, PathBuf};

use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use crate::audio::domain::audio_segment::AudioSegment;
use crate::recognition::domain::speech_recognizer::{RecognizedSegment, SpeechRecognizer};

/// Speech recognizer using whisper.cpp via whisper-rs.
///
/// The context (model weights) is loaded once in `new`; each `transcribe`
/// call creates its own inference state, so one recognizer can serve
/// concurrent chunk workers.
pub struct WhisperRecognizer {
    ctx: WhisperContext,
    model_path: PathBuf,
}

impl WhisperRecognizer {
    /// Load the model weights at `model_path`. This is the slow, memory
    /// heavy step; keep the returned recognizer around for reuse.
    pub fn new(model_path: &Path) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        if !model_path.exists() {
            return Err(format!("model weights not found at: {}", model_path.display()).into());
        }
        let ctx = WhisperContext::new_with_params(
            model_path
                .to_str()
                .ok_or("model path is not valid UTF-8")?,
            WhisperContextParameters::default(),
        )
        .map_err(|e| format!("failed to load model: {e}"))?;

        Ok(Self {
            ctx,
            model_path: model_path.to_path_buf(),
        })
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }
}

impl SpeechRecognizer for WhisperRecognizer {
    fn transcribe(
        &self,
        audio: &AudioSegment,
    ) -> Result<Vec<RecognizedSegment>, Box<dyn std::error::Error + Send + Sync>> {
        let mut state = self
            .ctx
            .create_state()
            .map_err(|e| format!("failed to create inference state: {e}"))?;

        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 0 });
        params.set_language(Some("auto"));
        params.set_translate(false);
        params.set_print_special(false);
        params.set_print_progress(false);
        params.set_print_realtime(false);
        params.set_print_timestamps(false);
        params.set_n_threads(num_cpus().min(4) as i32);

        state
            .full(params, audio.samples())
            .map_err(|e| format!("inference failed: {e}"))?;

        let mut segments = Vec::new();
        let num_segments = state.full_n_segments();

        for seg_idx in 0..num_segments {
            let segment = match state.get_segment(seg_idx) {
                Some(s) => s,
                None => continue,
            };

            let text = match segment.to_str() {
                Ok(t) => t.trim(),
                Err(_) => continue,
            };
            if text.is_empty() || text.starts_with('[') || text.starts_with('<') {
                continue;
            }

            // Segment timestamps are in centiseconds (10ms units)
            let start = segment.start_timestamp() as f64 / 100.0;
            let end = segment.end_timestamp() as f64 / 100.0;
            if end <= start {
                continue;
            }

            segments.push(RecognizedSegment {
                start,
                end,
                text: text.to_string(),
            });
        }

        Ok(segments)
    }
}

fn num_cpus() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_nonexistent_path_returns_error() {
        let result = WhisperRecognizer::new(Path::new("/nonexistent/ggml-base.bin"));
        assert!(result.is_err());
    }

    #[test]
    fn test_new_nonexistent_path_error_message() {
        let err = WhisperRecognizer::new(Path::new("/nonexistent/ggml-base.bin"))
            .err()
            .unwrap()
            .to_string();
        assert!(
            err.contains("not found"),
            "Expected 'not found' in error, got: {err}"
        );
    }

    #[test]
    #[ignore] // Requires downloaded model weights
    fn test_transcribe_does_not_crash_on_sine_wave() {
        use crate::recognition::domain::model_size::ModelSize;
        use crate::recognition::infrastructure::model_resolver;

        let model_path =
            model_resolver::resolve(ModelSize::Base, None).expect("failed to resolve model");
        let recognizer = WhisperRecognizer::new(&model_path).expect("failed to load model");

        let sample_rate = 16000u32;
        let len = (3.0 * sample_rate as f64) as usize;
        let samples: Vec<f32> = (0..len)
            .map(|i| {
                let t = i as f64 / sample_rate as f64;
                (2.0 * std::f64::consts::PI * 440.0 * t).sin() as f32
            })
            .collect();
        let audio = AudioSegment::new(samples, sample_rate, 1);

        let result = recognizer.transcribe(&audio);
        assert!(result.is_ok(), "transcription should not error: {result:?}");
    }
}
