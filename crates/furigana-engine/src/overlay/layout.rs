use crate::overlay::{DecorationSet, OverlayRecord};

/// A piece of a displayed line: raw buffer text or an overlay drawn in its place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineSegment<'a> {
    Text(&'a str),
    Overlay(&'a OverlayRecord),
}

/// Split one line into raw text and overlays.
///
/// `line_start` is the buffer offset of `line_text`. Overlays that do not fit
/// inside the line, or overlap an earlier one, are ignored and their text is
/// shown raw.
pub fn layout_line<'a>(
    line_text: &'a str,
    line_start: usize,
    decorations: &'a DecorationSet,
) -> Vec<LineSegment<'a>> {
    let line_end = line_start + line_text.len();
    let mut segments = Vec::new();
    let mut cursor = 0;

    for record in decorations.starting_between(line_start, line_end) {
        let from = record.from - line_start;
        let to = record.to.saturating_sub(line_start);
        if from < cursor || to > line_text.len() {
            continue;
        }
        let Some(before) = line_text.get(cursor..from) else {
            continue;
        };
        if !before.is_empty() {
            segments.push(LineSegment::Text(before));
        }
        segments.push(LineSegment::Overlay(record));
        cursor = to;
    }

    if let Some(rest) = line_text.get(cursor..)
        && !rest.is_empty()
    {
        segments.push(LineSegment::Text(rest));
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::Matcher;
    use crate::overlay::{SelectionRange, build_decorations};
    use xi_rope::Rope;

    #[test]
    fn test_layout_line_segments() {
        let text = "head\n前{日|ひ}中{月|つき}";
        let set = build_decorations(&Matcher::default(), &Rope::from(text), &[]).unwrap();

        let line_start = "head\n".len();
        let line = &text[line_start..];
        let segments = layout_line(line, line_start, &set);

        assert_eq!(segments.len(), 4);
        assert_eq!(segments[0], LineSegment::Text("前"));
        assert!(matches!(segments[1], LineSegment::Overlay(r) if r.units[0].base == "日"));
        assert_eq!(segments[2], LineSegment::Text("中"));
        assert!(matches!(segments[3], LineSegment::Overlay(r) if r.units[0].reading == "つき"));

        assert_eq!(layout_line("head\n", 0, &set), vec![LineSegment::Text("head\n")]);
    }

    #[test]
    fn test_layout_line_with_suppressed_overlay() {
        let text = "{日|ひ}";
        let set =
            build_decorations(&Matcher::default(), &Rope::from(text), &[SelectionRange::cursor(0)])
                .unwrap();

        assert_eq!(layout_line(text, 0, &set), vec![LineSegment::Text(text)]);
    }

    #[test]
    fn test_layout_empty_line() {
        assert!(layout_line("", 0, &DecorationSet::empty()).is_empty());
    }
}
