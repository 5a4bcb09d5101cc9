//! # Furigana Markup
//!
//! Matching and validation of the inline `{base|reading|...}` syntax.
//!
//! ## Syntax
//!
//! - `{日本語|にほんご}`: one reading covers the whole base span
//! - `{日本語|に|ほん|ご}`: one reading per base character, paired in order
//! - `{日本|に\|ほん}`: a backslash before `|` is tolerated (escaped pipes in tables)
//!
//! Anything else shaped like markup but failing the count rule stays plain text.
//!
//! ## Modules
//!
//! - **`charset`**: `BaseCharset`, the code-point ranges accepted as base characters
//! - **`matcher`**: `Matcher` and the lazy `Matches` iterator
//! - **`types`**: `MarkupMatch` and `AnnotationUnit`, plus the validation rule

pub mod charset;
pub mod matcher;
pub mod types;

pub use charset::BaseCharset;
pub use matcher::{Matcher, MatcherError, Matches};
pub use types::{AnnotationUnit, MarkupMatch};
