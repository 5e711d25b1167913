use super::ExportError;
use crate::transcript::domain::transcript::Transcript;

/// Render the transcript (metadata plus segments) as pretty-printed JSON.
pub fn render_json(transcript: &Transcript) -> Result<String, ExportError> {
    let mut text = serde_json::to_string_pretty(transcript)?;
    text.push('\n');
    Ok(text)
}
