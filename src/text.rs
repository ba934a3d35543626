//! Transcript text cleanup.

/// Collapse every whitespace run to a single space and trim both ends.
///
/// Line breaks, tabs and repeated spaces left over from transcription tools
/// all become one space. Empty or whitespace-only input yields an empty string.
pub fn normalize(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// True when the text has no non-whitespace content.
pub fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}
