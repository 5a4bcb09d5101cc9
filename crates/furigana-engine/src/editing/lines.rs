use std::ops::Range;

use xi_rope::Rope;

/// A single line of the buffer with its byte span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineRef {
    /// Zero-based line number.
    pub number: usize,
    /// Byte span of this line in the rope (includes the newline if present).
    pub span: Range<usize>,
    /// The line text, newline included.
    pub text: String,
}

impl LineRef {
    /// Line text without its trailing line break.
    pub fn content(&self) -> &str {
        self.text.trim_end_matches(['\n', '\r'])
    }
}

/// Returns an iterator over lines with their byte spans.
///
/// An empty rope has zero lines. Uses `lines_raw` so spans tile the rope exactly.
pub fn lines_with_spans(rope: &Rope) -> impl Iterator<Item = LineRef> + '_ {
    let mut offset = 0usize;
    rope.lines_raw(..)
        .filter(|line| !line.is_empty())
        .enumerate()
        .map(move |(number, line)| {
            let start = offset;
            offset += line.len();
            LineRef {
                number,
                span: start..offset,
                text: line.into_owned(),
            }
        })
}
