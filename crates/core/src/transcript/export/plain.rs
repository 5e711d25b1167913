use crate::transcript::domain::timecode::format_timecode;
use crate::transcript::domain::transcript::Transcript;

/// Render one line per segment: `[start - end] text`.
pub fn render_plain(transcript: &Transcript) -> String {
    let mut out = String::new();
    for segment in transcript.segments() {
        out.push_str(&format!(
            "[{} - {}] {}\n",
            format_timecode(segment.start),
            format_timecode(segment.end),
            segment.text
        ));
    }
    out
}
