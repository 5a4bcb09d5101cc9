/// What a command changed, as seen by view plugins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateFlags {
    pub doc_changed: bool,
    pub viewport_changed: bool,
    pub selection_set: bool,
}

impl UpdateFlags {
    /// True when at least one flag is set.
    pub fn any(self) -> bool {
        self.doc_changed || self.viewport_changed || self.selection_set
    }
}
