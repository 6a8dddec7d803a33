//! Replacement-span composition for renderers.
//!
//! A renderer replaces each fragment's span with its rewrite. Whitespace
//! between two fragments is dropped, and a [`Segment::Spacer`] marks where
//! adjacent rewrites would otherwise run together.

use lens_catalog::DisplayModeInfo;

use crate::fragment::FragmentResult;

/// Gaps wider than this (in bytes) never get a spacer.
const MAX_SPACER_GAP: usize = 2;

/// One piece of a rendered line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Source text outside any fragment.
    Text(&'a str),
    Fragment(&'a FragmentResult),
    /// A single space separating two rewrites.
    Spacer,
}

/// Split `text` into text, fragment and spacer segments.
///
/// `fragments` must be the resolved, ordered output of
/// [`LiquidMatcher::find_fragments`](crate::LiquidMatcher::find_fragments)
/// for the same `text`.
#[must_use]
pub fn compose_segments<'a>(text: &'a str, fragments: &'a [FragmentResult]) -> Vec<Segment<'a>> {
    let mut segments = Vec::with_capacity(fragments.len() * 2 + 1);
    let mut cursor = 0;

    for (index, fragment) in fragments.iter().enumerate() {
        if fragment.start > cursor {
            let before = &text[cursor..fragment.start];
            if !before.trim().is_empty() {
                segments.push(Segment::Text(before));
            }
        }
        segments.push(Segment::Fragment(fragment));
        cursor = fragment.end;

        if let Some(next) = fragments.get(index + 1)
            && needs_spacer(text, fragment, next)
        {
            segments.push(Segment::Spacer);
        }
    }

    if cursor < text.len() {
        let rest = &text[cursor..];
        if !rest.trim().is_empty() {
            segments.push(Segment::Text(rest));
        }
    }
    segments
}

fn needs_spacer(text: &str, current: &FragmentResult, next: &FragmentResult) -> bool {
    let gap = next.start.saturating_sub(current.end);
    if gap > MAX_SPACER_GAP || text[current.end..next.start.max(current.end)].contains('\n') {
        return false;
    }
    if current.pattern != next.pattern {
        return true;
    }
    gap == 0
}

/// Render `text` with every fragment replaced by its rewrite.
#[must_use]
pub fn render_plain(text: &str, fragments: &[FragmentResult]) -> String {
    let mut rendered = String::with_capacity(text.len());
    for segment in compose_segments(text, fragments) {
        match segment {
            Segment::Text(s) => rendered.push_str(s),
            Segment::Fragment(f) => rendered.push_str(&f.clean),
            Segment::Spacer => rendered.push(' '),
        }
    }
    rendered
}

/// Hover text for a fragment, or `None` when the mode hides tooltips.
#[must_use]
pub fn tooltip(fragment: &FragmentResult, mode: &DisplayModeInfo) -> Option<String> {
    if !mode.show_tooltips {
        return None;
    }
    let pattern = fragment
        .pattern
        .as_deref()
        .map(|p| format!(" [{p}]"))
        .unwrap_or_default();
    Some(format!(
        "Original: {}{pattern}\nImportance: {}",
        fragment.original,
        fragment.importance()
    ))
}
