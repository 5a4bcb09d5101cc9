use std::ops::RangeInclusive;

/// Code-point ranges accepted as base characters inside `{...|...}`.
///
/// The default approximates CJK ideographs and kana with two blocks:
/// `U+2E80..=U+A4CF` (radicals, kana, CJK unified ideographs, Yi) and
/// `U+FF00..=U+FFEF` (halfwidth and fullwidth forms). It misses some
/// extension blocks and accepts a few non-Japanese scripts, so callers may
/// supply their own ranges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseCharset {
    ranges: Vec<RangeInclusive<char>>,
}

impl BaseCharset {
    pub fn new(ranges: Vec<RangeInclusive<char>>) -> Self {
        Self { ranges }
    }

    pub fn ranges(&self) -> &[RangeInclusive<char>] {
        &self.ranges
    }

    pub fn contains(&self, c: char) -> bool {
        self.ranges.iter().any(|r| r.contains(&c))
    }

    /// Regex character class matching one base character, e.g. `[\x{2E80}-\x{A4CF}]`.
    pub(crate) fn to_class(&self) -> String {
        let mut class = String::from("[");
        for range in &self.ranges {
            class.push_str(&format!(
                "\\x{{{:X}}}-\\x{{{:X}}}",
                u32::from(*range.start()),
                u32::from(*range.end())
            ));
        }
        class.push(']');
        class
    }
}

impl Default for BaseCharset {
    fn default() -> Self {
        Self::new(vec!['\u{2E80}'..='\u{A4CF}', '\u{FF00}'..='\u{FFEF}'])
    }
}

impl From<Vec<(char, char)>> for BaseCharset {
    fn from(pairs: Vec<(char, char)>) -> Self {
        Self::new(pairs.into_iter().map(|(start, end)| start..=end).collect())
    }
}
