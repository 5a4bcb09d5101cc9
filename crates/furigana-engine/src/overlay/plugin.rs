use xi_rope::Rope;

use crate::editing::{EditorState, ViewPlugin, ViewUpdate, lines_with_spans};
use crate::markup::Matcher;
use crate::overlay::{
    DecorationError, DecorationSet, DecorationSetBuilder, OverlayRecord, SelectionRange,
};

/// Compute overlays for every line of `doc`.
///
/// Matches never span lines. A valid match becomes an overlay unless an
/// active selection touches it. Records are added in line order, then left
/// to right, which the builder requires.
pub fn build_decorations(
    matcher: &Matcher,
    doc: &Rope,
    selections: &[SelectionRange],
) -> Result<DecorationSet, DecorationError> {
    let mut builder = DecorationSetBuilder::new();

    for line in lines_with_spans(doc) {
        if !Matcher::has_candidate(&line.text) {
            continue;
        }
        for found in matcher.find_matches(&line.text) {
            let from = line.span.start + found.offset;
            let to = from + found.len;

            let Some(units) = found.validate() else {
                continue;
            };
            if selections.iter().any(|r| r.overlaps(from, to)) {
                log::trace!("overlay {from}..{to} suppressed by selection");
                continue;
            }

            builder.add(OverlayRecord {
                from,
                to,
                line: line.number,
                units,
            })?;
        }
    }

    Ok(builder.finish())
}

/// View plugin that keeps furigana overlays in step with the editor.
pub struct FuriganaOverlay {
    matcher: Matcher,
    decorations: DecorationSet,
}

impl FuriganaOverlay {
    pub fn new(matcher: Matcher, state: &EditorState) -> Result<Self, DecorationError> {
        let decorations = build_decorations(&matcher, state.buffer(), state.selections())?;
        Ok(Self {
            matcher,
            decorations,
        })
    }
}

impl ViewPlugin for FuriganaOverlay {
    fn update(&mut self, update: &ViewUpdate<'_>) -> Result<(), DecorationError> {
        if !(update.doc_changed() || update.viewport_changed() || update.selection_set()) {
            return Ok(());
        }

        let state = update.state;
        self.decorations = build_decorations(&self.matcher, state.buffer(), state.selections())?;
        log::debug!(
            "recomputed {} furigana overlays (version {})",
            self.decorations.len(),
            state.version()
        );
        Ok(())
    }

    fn decorations(&self) -> &DecorationSet {
        &self.decorations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::{Cmd, UpdateFlags};
    use crate::markup::AnnotationUnit;
    use pretty_assertions::assert_eq;

    fn build(text: &str, selections: &[SelectionRange]) -> DecorationSet {
        build_decorations(&Matcher::default(), &Rope::from(text), selections).unwrap()
    }

    #[test]
    fn test_empty_document() {
        assert!(build("", &[]).is_empty());
    }

    #[test]
    fn test_no_markup() {
        assert!(build("plain text\nmore text", &[]).is_empty());
    }

    #[test]
    fn test_absolute_offsets_across_lines() {
        let text = "一行目\n前{日本語|に|ほん|ご}後\n{月|つき}";
        let set = build(text, &[]);
        let records: Vec<&OverlayRecord> = set.iter().collect();

        assert_eq!(records.len(), 2);

        let second_line = "一行目\n".len();
        assert_eq!(records[0].from, second_line + "前".len());
        assert_eq!(&text[records[0].from..records[0].to], "{日本語|に|ほん|ご}");
        assert_eq!(records[0].line, 1);
        assert_eq!(
            records[0].units,
            vec![
                AnnotationUnit::new("日", "に"),
                AnnotationUnit::new("本", "ほん"),
                AnnotationUnit::new("語", "ご"),
            ]
        );

        assert_eq!(&text[records[1].from..records[1].to], "{月|つき}");
        assert_eq!(records[1].line, 2);
    }

    #[test]
    fn test_invalid_matches_are_skipped() {
        let set = build("{日本|に|ほん|ご} {日|ひ}", &[]);
        assert_eq!(set.len(), 1);
        assert_eq!(set.iter().next().map(|r| r.from), Some("{日本|に|ほん|ご} ".len()));
    }

    #[test]
    fn test_cursor_at_start_boundary_suppresses() {
        let text = "{日|ひ}";
        assert!(build(text, &[SelectionRange::cursor(0)]).is_empty());
        assert!(build(text, &[SelectionRange::cursor(text.len())]).is_empty());
    }

    #[test]
    fn test_selection_outside_restores_overlay() {
        let text = "{日|ひ} tail";
        let end = "{日|ひ}".len();

        assert!(build(text, &[SelectionRange::cursor(end)]).is_empty());
        assert_eq!(build(text, &[SelectionRange::cursor(end + 1)]).len(), 1);
    }

    #[test]
    fn test_only_touched_overlay_is_suppressed() {
        let text = "{日|ひ} {月|つき}";
        let second = "{日|ひ} ".len();
        let set = build(text, &[SelectionRange::cursor(second + 1)]);

        assert_eq!(set.len(), 1);
        assert_eq!(set.iter().next().map(|r| r.from), Some(0));
    }

    #[test]
    fn test_any_of_several_selections_suppresses() {
        let text = "{日|ひ} {月|つき}";
        let selections = [SelectionRange::new(1, 2), SelectionRange::cursor(text.len())];

        assert!(build(text, &selections).is_empty());
    }

    #[test]
    fn test_update_without_flags_keeps_previous_set() {
        let mut state = EditorState::new("{日|ひ} x");
        state
            .apply(Cmd::SetSelection {
                ranges: vec![SelectionRange::cursor(state.len())],
            })
            .unwrap();
        let mut plugin = FuriganaOverlay::new(Matcher::default(), &state).unwrap();
        assert_eq!(plugin.decorations().len(), 1);

        // Move the cursor onto the markup without telling the plugin a selection was set.
        state.selections = vec![SelectionRange::cursor(0)];
        plugin
            .update(&ViewUpdate {
                state: &state,
                flags: UpdateFlags::default(),
            })
            .unwrap();
        assert_eq!(plugin.decorations().len(), 1);

        plugin
            .update(&ViewUpdate {
                state: &state,
                flags: UpdateFlags {
                    selection_set: true,
                    ..Default::default()
                },
            })
            .unwrap();
        assert!(plugin.decorations().is_empty());
    }

    #[test]
    fn test_each_trigger_recomputes() {
        let triggers = [
            UpdateFlags {
                doc_changed: true,
                ..Default::default()
            },
            UpdateFlags {
                viewport_changed: true,
                ..Default::default()
            },
            UpdateFlags {
                selection_set: true,
                ..Default::default()
            },
        ];

        for flags in triggers {
            let empty = EditorState::new("");
            let mut plugin = FuriganaOverlay::new(Matcher::default(), &empty).unwrap();
            let state = EditorState::new("x {日|ひ}");

            plugin
                .update(&ViewUpdate {
                    state: &state,
                    flags,
                })
                .unwrap();
            assert_eq!(plugin.decorations().len(), 1, "flags: {flags:?}");
        }
    }
}
