//! Wiki section extraction
//!
//! Plain-text wiki extracts mark headings with runs of `=`
//! (`== Histoire ==`, `=== Construction ===`). The text between two `==`
//! markers is a segment; a heading segment followed by a body segment makes a
//! section.

use std::fmt;

const MARKER: &[u8] = b"==";

/// A heading and the text under it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: String,
    pub content: String,
}

impl Section {
    /// Build a section from two raw segments, dropping a leftover `=` from
    /// deeper heading levels.
    pub fn new(title: &str, content: &str) -> Self {
        Self {
            title: strip_marker(title).to_string(),
            content: strip_marker(content).to_string(),
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} : {}", self.title, self.content)
    }
}

fn strip_marker(segment: &str) -> &str {
    segment.strip_prefix('=').unwrap_or(segment).trim()
}

fn find_marker(bytes: &[u8], from: usize) -> Option<usize> {
    bytes
        .get(from..)?
        .windows(MARKER.len())
        .position(|window| window == MARKER)
        .map(|offset| from + offset)
}

/// Lazy iterator over the trimmed segments of an article body.
///
/// A segment starts right after a `==` marker and runs up to the nearest
/// following `==` marker, which may in turn open the next segment. Inside a
/// run of `=` every position preceded by `==` opens a segment, so segments can
/// be empty (`====`) or start with leftover `=`.
#[derive(Debug, Clone)]
pub struct Segments<'a> {
    text: &'a str,
    cursor: usize,
    /// Position where an empty segment was already yielded
    empty_at: Option<usize>,
}

/// Split `text` into heading-delimited segments
pub fn segments(text: &str) -> Segments<'_> {
    Segments {
        text,
        cursor: 0,
        empty_at: None,
    }
}

impl<'a> Iterator for Segments<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let bytes = self.text.as_bytes();
        let mut start = self.cursor.max(MARKER.len());

        while start <= bytes.len() {
            if &bytes[start - MARKER.len()..start] == MARKER {
                let from = if self.empty_at == Some(start) {
                    start + 1
                } else {
                    start
                };
                // No closing marker from here means none for any later start
                let end = find_marker(bytes, from)?;

                self.empty_at = (end == start).then_some(start);
                self.cursor = end;
                return Some(self.text[start..end].trim());
            }
            start += 1;
        }

        None
    }
}

/// First pair of adjacent non-empty segments whose title and content are
/// still non-empty once the leftover `=` is stripped. Later segments are not
/// read.
pub fn first_section<'a>(segments: impl IntoIterator<Item = &'a str>) -> Option<Section> {
    let mut previous: Option<&str> = None;

    for segment in segments {
        if let Some(title) = previous {
            if !title.is_empty() && !segment.is_empty() {
                let section = Section::new(title, segment);
                if !section.title.is_empty() && !section.content.is_empty() {
                    return Some(section);
                }
            }
        }
        previous = Some(segment);
    }

    None
}

/// `"Title : Content"` for the first section of an article, or an empty string
pub fn get_section(text: &str) -> String {
    first_section(segments(text))
        .map(|section| section.to_string())
        .unwrap_or_default()
}
