use std::sync::OnceLock;

use regex::{CaptureMatches, Regex};

use super::{BaseCharset, MarkupMatch};

#[derive(Debug, thiserror::Error)]
pub enum MatcherError {
    #[error("base charset has no ranges")]
    EmptyCharset,
    #[error("invalid base range {start:?}..={end:?}")]
    InvalidRange { start: char, end: char },
    #[error("failed to compile furigana pattern: {0}")]
    Regex(#[from] regex::Error),
}

/// Reading segments exclude whitespace, ASCII punctuation and the
/// delimiters `{` `|` `}` `\`.
const SEGMENT: &str = r"[^\s\x20-/:-@\[-`\{-~]*";

fn build_pattern(charset: &BaseCharset) -> String {
    let mut pattern = String::from(r"\{(?P<base>");
    pattern.push_str(&charset.to_class());
    pattern.push_str(r"+)(?P<readings>(?:\\?\|");
    pattern.push_str(SEGMENT);
    pattern.push_str(r")+)\}");
    pattern
}

/// Finds `{base|reading...}` markup in text.
///
/// Cloning is cheap; the compiled pattern is shared.
#[derive(Debug, Clone)]
pub struct Matcher {
    regex: Regex,
}

impl Matcher {
    pub fn new(charset: &BaseCharset) -> Result<Self, MatcherError> {
        if charset.ranges().is_empty() {
            return Err(MatcherError::EmptyCharset);
        }
        if let Some(bad) = charset.ranges().iter().find(|r| r.start() > r.end()) {
            return Err(MatcherError::InvalidRange {
                start: *bad.start(),
                end: *bad.end(),
            });
        }

        let regex = Regex::new(&build_pattern(charset))?;
        Ok(Self { regex })
    }

    /// Cheap pre-check: text without both `{` and `|` can never match.
    pub fn has_candidate(text: &str) -> bool {
        text.contains('{') && text.contains('|')
    }

    /// Lazily yields non-overlapping matches left to right.
    ///
    /// The iterator is a pure function of `text`; calling again restarts the scan.
    pub fn find_matches<'r, 't>(&'r self, text: &'t str) -> Matches<'r, 't> {
        Matches {
            inner: self.regex.captures_iter(text),
        }
    }
}

impl Default for Matcher {
    fn default() -> Self {
        static DEFAULT_REGEX: OnceLock<Regex> = OnceLock::new();
        let regex = DEFAULT_REGEX.get_or_init(|| {
            Regex::new(&build_pattern(&BaseCharset::default())).expect("Invalid furigana regex")
        });
        Self {
            regex: regex.clone(),
        }
    }
}

/// Iterator over [`MarkupMatch`]es in one text.
pub struct Matches<'r, 't> {
    inner: CaptureMatches<'r, 't>,
}

impl Iterator for Matches<'_, '_> {
    type Item = MarkupMatch;

    fn next(&mut self) -> Option<Self::Item> {
        let caps = self.inner.next()?;
        let full = caps.get(0)?;
        let base = caps.name("base")?.as_str();
        let raw_readings = caps.name("readings")?.as_str();

        // The run starts with `|` (or `\|`), so the first piece is empty or a lone escape.
        let readings = raw_readings
            .split('|')
            .skip(1)
            .map(|segment| segment.strip_suffix('\\').unwrap_or(segment).to_string())
            .collect();

        Some(MarkupMatch {
            full_text: full.as_str().to_string(),
            base: base.to_string(),
            readings,
            offset: full.start(),
            len: full.len(),
        })
    }
}
