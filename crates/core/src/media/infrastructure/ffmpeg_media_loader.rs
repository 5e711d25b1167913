use std::path::Path;

use crate::audio::domain::audio_segment::AudioSegment;
use crate::media::domain::media_loader::{LoadedMedia, MediaError, MediaLoader};
use crate::media::domain::media_source::{kind_for_path, MediaSource};

/// Decodes audio from audio files and video containers using ffmpeg-next.
///
/// Video inputs are demuxed in place: the best audio stream is decoded and
/// the picture track is never touched, so no scratch file is written. All
/// output is resampled to mono f32 at the requested rate.
pub struct FfmpegMediaLoader;

impl FfmpegMediaLoader {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FfmpegMediaLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaLoader for FfmpegMediaLoader {
    fn load(&self, path: &Path, target_sample_rate: u32) -> Result<LoadedMedia, MediaError> {
        let kind = kind_for_path(path).ok_or_else(|| MediaError::UnsupportedFormat {
            path: path.to_path_buf(),
            extension: path
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("")
                .to_string(),
        })?;

        let read_err = |source: ffmpeg_next::Error| MediaError::Read {
            path: path.to_path_buf(),
            source: Box::new(source),
        };

        ffmpeg_next::init().map_err(read_err)?;

        let mut ictx = ffmpeg_next::format::input(path).map_err(read_err)?;

        let audio_stream = ictx
            .streams()
            .best(ffmpeg_next::media::Type::Audio)
            .ok_or_else(|| MediaError::NoAudioTrack {
                path: path.to_path_buf(),
            })?;
        let audio_stream_index = audio_stream.index();

        let codec_ctx =
            ffmpeg_next::codec::context::Context::from_parameters(audio_stream.parameters())
                .map_err(read_err)?;
        let mut decoder = codec_ctx.decoder().audio().map_err(read_err)?;

        let source_rate = decoder.rate();
        let source_channels = decoder.channels() as u16;

        let mut resampler = ffmpeg_next::software::resampling::Context::get(
            decoder.format(),
            decoder.channel_layout(),
            source_rate,
            ffmpeg_next::format::Sample::F32(ffmpeg_next::format::sample::Type::Planar),
            ffmpeg_next::ChannelLayout::MONO,
            target_sample_rate,
        )
        .map_err(read_err)?;

        let mut samples: Vec<f32> = Vec::new();
        let mut decoded_frame = ffmpeg_next::util::frame::audio::Audio::empty();
        let mut resampled_frame = ffmpeg_next::util::frame::audio::Audio::empty();

        for (stream, packet) in ictx.packets() {
            if stream.index() != audio_stream_index {
                continue;
            }

            decoder.send_packet(&packet).map_err(read_err)?;
            while decoder.receive_frame(&mut decoded_frame).is_ok() {
                resampler
                    .run(&decoded_frame, &mut resampled_frame)
                    .map_err(read_err)?;
                extract_f32_samples(&resampled_frame, &mut samples);
            }
        }

        // Flush the decoder, then the resampler's internal buffer
        decoder.send_eof().map_err(read_err)?;
        while decoder.receive_frame(&mut decoded_frame).is_ok() {
            resampler
                .run(&decoded_frame, &mut resampled_frame)
                .map_err(read_err)?;
            extract_f32_samples(&resampled_frame, &mut samples);
        }
        if let Ok(Some(delay)) = resampler.flush(&mut resampled_frame) {
            if delay.output > 0 {
                extract_f32_samples(&resampled_frame, &mut samples);
            }
        }

        let audio = AudioSegment::new(samples, target_sample_rate, 1);
        let source = MediaSource {
            path: path.to_path_buf(),
            kind,
            duration: audio.duration(),
            sample_rate: source_rate,
            channels: source_channels,
        };

        log::debug!(
            "decoded {} ({:?}, {:.1}s, {} Hz, {} ch)",
            path.display(),
            source.kind,
            source.duration,
            source.sample_rate,
            source.channels
        );

        Ok(LoadedMedia { source, audio })
    }
}

/// Extract f32 samples from a planar mono resampled frame.
fn extract_f32_samples(frame: &ffmpeg_next::util::frame::audio::Audio, out: &mut Vec<f32>) {
    let num_samples = frame.samples();
    if num_samples == 0 {
        return;
    }
    let data = frame.data(0);
    let floats = unsafe { std::slice::from_raw_parts(data.as_ptr() as *const f32, num_samples) };
    out.extend_from_slice(floats);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::constants::WHISPER_SAMPLE_RATE;

    #[test]
    fn test_unsupported_extension_is_rejected_before_io() {
        let loader = FfmpegMediaLoader::new();
        let result = loader.load(Path::new("/nonexistent/notes.txt"), WHISPER_SAMPLE_RATE);
        assert!(matches!(
            result,
            Err(MediaError::UnsupportedFormat { extension, .. }) if extension == "txt"
        ));
    }

    #[test]
    fn test_missing_extension_is_rejected() {
        let loader = FfmpegMediaLoader::new();
        let result = loader.load(Path::new("/nonexistent/recording"), WHISPER_SAMPLE_RATE);
        assert!(matches!(result, Err(MediaError::UnsupportedFormat { .. })));
    }

    #[test]
    fn test_nonexistent_file_is_a_read_error() {
        let loader = FfmpegMediaLoader::new();
        let path = if cfg!(windows) {
            Path::new("Z:\\nonexistent\\interview.mp4")
        } else {
            Path::new("/nonexistent/interview.mp4")
        };
        let result = loader.load(path, WHISPER_SAMPLE_RATE);
        assert!(matches!(result, Err(MediaError::Read { .. })));
    }
}
