//! # Live Overlays
//!
//! Positioned furigana overlays for an editable buffer.
//!
//! Every triggering update (document, viewport or selection change) rebuilds
//! the whole decoration set from scratch: each line is scanned on its own,
//! valid matches become replace overlays, and any match touching an active
//! selection is left as raw text so it can be edited.
//!
//! ## Modules
//!
//! - **`selection`**: `SelectionRange` and the overlap rule
//! - **`decoration`**: `OverlayRecord`, `DecorationSet` and its ordered builder
//! - **`plugin`**: `build_decorations()` and the `FuriganaOverlay` view plugin
//! - **`layout`**: `layout_line()` for hosts that draw lines themselves

pub mod decoration;
pub mod layout;
pub mod plugin;
pub mod selection;

pub use decoration::{DecorationError, DecorationSet, DecorationSetBuilder, OverlayRecord};
pub use layout::{LineSegment, layout_line};
pub use plugin::{FuriganaOverlay, build_decorations};
pub use selection::SelectionRange;
