use crate::annotate::ruby_element;
use crate::markup::AnnotationUnit;
use crate::render::Element;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecorationError {
    #[error("decoration at {from} added after one at {previous}; ranges must be added in order")]
    OutOfOrder { from: usize, previous: usize },
    #[error("decoration range {from}..{to} is inverted")]
    InvalidRange { from: usize, to: usize },
}

/// A replace overlay covering `[from, to)` on one line of the buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayRecord {
    pub from: usize,
    pub to: usize,
    /// Zero-based line the overlay sits on.
    pub line: usize,
    pub units: Vec<AnnotationUnit>,
}

impl OverlayRecord {
    /// The ruby widget drawn in place of the covered text.
    pub fn to_element(&self) -> Element {
        ruby_element(&self.units)
    }
}

/// Overlays sorted by start offset. Only built through [`DecorationSetBuilder`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecorationSet {
    records: Vec<OverlayRecord>,
}

impl DecorationSet {
    pub const fn empty() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &OverlayRecord> {
        self.records.iter()
    }

    /// Overlays starting within `[from, to)`.
    pub fn starting_between(&self, from: usize, to: usize) -> &[OverlayRecord] {
        let start = self.records.partition_point(|r| r.from < from);
        let end = self.records.partition_point(|r| r.from < to);
        &self.records[start..end.max(start)]
    }

    /// Combine sets from several plugins, keeping ascending order.
    pub fn merge<'a>(sets: impl IntoIterator<Item = &'a DecorationSet>) -> DecorationSet {
        let mut records: Vec<OverlayRecord> =
            sets.into_iter().flat_map(|s| s.records.iter().cloned()).collect();
        records.sort_by_key(|r| r.from);
        DecorationSet { records }
    }
}

/// Accumulates overlays in non-decreasing `from` order.
#[derive(Debug, Default)]
pub struct DecorationSetBuilder {
    records: Vec<OverlayRecord>,
}

impl DecorationSetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, record: OverlayRecord) -> Result<(), DecorationError> {
        if record.to < record.from {
            return Err(DecorationError::InvalidRange {
                from: record.from,
                to: record.to,
            });
        }
        if let Some(previous) = self.records.last()
            && record.from < previous.from
        {
            return Err(DecorationError::OutOfOrder {
                from: record.from,
                previous: previous.from,
            });
        }
        self.records.push(record);
        Ok(())
    }

    pub fn finish(self) -> DecorationSet {
        DecorationSet {
            records: self.records,
        }
    }
}
