use std::ops::Range;

/// One `{base|reading...}` occurrence found in a piece of text.
///
/// Offsets are byte offsets relative to the text that was scanned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupMatch {
    /// The whole matched markup including braces.
    pub full_text: String,
    /// Base characters between `{` and the first `|`.
    pub base: String,
    /// Reading segments in order, escape backslashes removed. Never empty.
    pub readings: Vec<String>,
    /// Byte offset of `{` in the scanned text.
    pub offset: usize,
    /// Byte length of `full_text`.
    pub len: usize,
}

/// A base run paired with its reading.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AnnotationUnit {
    pub base: String,
    pub reading: String,
}

impl AnnotationUnit {
    pub fn new(base: impl Into<String>, reading: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            reading: reading.into(),
        }
    }
}

impl MarkupMatch {
    /// Byte range of the match in the scanned text.
    pub fn range(&self) -> Range<usize> {
        self.offset..self.offset + self.len
    }

    /// Pair base characters with readings.
    ///
    /// A single reading annotates the whole base span. With several readings
    /// there must be exactly one per base character; any other shape returns
    /// `None` and the markup is left as literal text.
    pub fn validate(&self) -> Option<Vec<AnnotationUnit>> {
        if let [reading] = self.readings.as_slice() {
            return Some(vec![AnnotationUnit::new(self.base.clone(), reading.clone())]);
        }

        let chars: Vec<char> = self.base.chars().collect();
        if chars.len() != self.readings.len() {
            return None;
        }

        Some(
            chars
                .into_iter()
                .zip(&self.readings)
                .map(|(base, reading)| AnnotationUnit::new(base, reading.clone()))
                .collect(),
        )
    }
}
