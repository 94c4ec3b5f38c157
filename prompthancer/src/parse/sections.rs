//! Ordered-marker tokenizer for labeled model replies.
//!
//! Given marker literals such as `"ENHANCED PROMPT:"`, [`split_sections`] finds the
//! first occurrence of each and slices the content that follows it up to the
//! earliest occurrence of any other marker at or after that point. Spans are
//! forward-only and never contain another marker.

/// One labeled span of a reply.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Section<'a> {
    /// The marker literal that opened this span.
    pub marker: &'a str,
    /// Byte offset of the marker in the source text.
    pub offset: usize,
    /// Trimmed content between the marker and the next marker (or end of text).
    pub content: &'a str,
}

/// Splits `text` into labeled spans, returned in text order.
///
/// Markers that do not occur produce no span. Matching is case-sensitive.
pub fn split_sections<'a>(text: &'a str, markers: &[&'a str]) -> Vec<Section<'a>> {
    let mut sections: Vec<Section<'a>> = markers
        .iter()
        .filter_map(|&marker| {
            let offset = text.find(marker)?;
            let start = offset + marker.len();
            let end = next_marker_from(text, start, marker, markers).unwrap_or(text.len());
            Some(Section {
                marker,
                offset,
                content: text[start..end].trim(),
            })
        })
        .collect();
    sections.sort_by_key(|s| s.offset);
    sections
}

/// Earliest byte offset, at or after `from`, of any marker other than `own`.
pub(crate) fn next_marker_from(text: &str, from: usize, own: &str, markers: &[&str]) -> Option<usize> {
    let rest = &text[from..];
    markers
        .iter()
        .filter(|&&m| m != own)
        .filter_map(|m| rest.find(m))
        .min()
        .map(|i| from + i)
}

/// Content of the span opened by `marker`, if that marker occurs.
pub fn section_content<'a>(sections: &[Section<'a>], marker: &str) -> Option<&'a str> {
    sections
        .iter()
        .find(|s| s.marker == marker)
        .map(|s| s.content)
}
