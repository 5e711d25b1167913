use crate::transcript::domain::transcript::Transcript;

/// SRT timecodes use a comma before the millisecond field.
fn srt_timecode(seconds: f64) -> String {
    let total_ms = (seconds.max(0.0) * 1000.0).round() as u64;
    let hours = total_ms / 3_600_000;
    let mins = (total_ms % 3_600_000) / 60_000;
    let secs = (total_ms % 60_000) / 1_000;
    let millis = total_ms % 1_000;
    format!("{hours:02}:{mins:02}:{secs:02},{millis:03}")
}

/// Render as SubRip subtitles: 1-based counter, timecode range, text,
/// blank separator.
pub fn render_srt(transcript: &Transcript) -> String {
    let mut out = String::new();
    for (i, segment) in transcript.segments().iter().enumerate() {
        out.push_str(&format!(
            "{}\n{} --> {}\n{}\n\n",
            i + 1,
            srt_timecode(segment.start),
            srt_timecode(segment.end),
            segment.text
        ));
    }
    out
}
