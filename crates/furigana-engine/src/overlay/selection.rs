/// An active selection or cursor, as byte offsets with `from <= to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SelectionRange {
    pub from: usize,
    pub to: usize,
}

impl SelectionRange {
    /// Selection between two positions in either order.
    pub fn new(anchor: usize, head: usize) -> Self {
        Self {
            from: anchor.min(head),
            to: anchor.max(head),
        }
    }

    pub fn cursor(pos: usize) -> Self {
        Self { from: pos, to: pos }
    }

    /// Whether this selection touches `[from, to]`. Boundaries count, so a
    /// cursor sitting right before or after markup suppresses its overlay.
    pub fn overlaps(&self, from: usize, to: usize) -> bool {
        self.to >= from && self.from <= to
    }
}
