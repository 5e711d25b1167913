/// Format seconds as `HH:MM:SS.mmm`.
///
/// Fixed-width and millisecond-precise, so a rendered pair of timecodes
/// round-trips the segment boundary unambiguously.
pub fn format_timecode(seconds: f64) -> String {
    let total_ms = (seconds.max(0.0) * 1000.0).round() as u64;
    let hours = total_ms / 3_600_000;
    let mins = (total_ms % 3_600_000) / 60_000;
    let secs = (total_ms % 60_000) / 1_000;
    let millis = total_ms % 1_000;
    format!("{hours:02}:{mins:02}:{secs:02}.{millis:03}")
}
