//! Fragment scanner.
//!
//! Finds `{{ ... }}` output expressions and `{% ... %}` tag statements.
//! Outputs tolerate one level of nested braces so that `{{ a.${b} }}` is a
//! single fragment. Whitespace-control dashes (`{%-`, `-}}`) are not part
//! of the reported content. Overlapping candidates are all reported; the resolver
//! arbitrates later.

use std::sync::LazyLock;

use regex::Regex;

use crate::fragment::FragmentKind;

/// Output expression with one level of nested braces.
pub(crate) static OUTPUT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{((?:[^{}]|\{[^{}]*\})*)\}\}").unwrap());

/// A scanned fragment before transduction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawFragment<'t> {
    pub start: usize,
    pub end: usize,
    /// Text between the delimiters, without trim markers. Tag content is
    /// trimmed; output content is not.
    pub inner: &'t str,
    pub kind: FragmentKind,
}

impl<'t> RawFragment<'t> {
    /// Full fragment text from `source`.
    #[must_use]
    pub fn original(&self, source: &'t str) -> &'t str {
        &source[self.start..self.end]
    }
}

/// Scan `text` for all output fragments, then all tag fragments.
#[must_use]
pub fn scan(text: &str) -> Vec<RawFragment<'_>> {
    let mut fragments: Vec<RawFragment<'_>> = OUTPUT_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            Some(RawFragment {
                start: whole.start(),
                end: whole.end(),
                inner: strip_trim_markers(caps.get(1).map_or("", |m| m.as_str())),
                kind: FragmentKind::Output,
            })
        })
        .collect();
    fragments.extend(TagScanner::new(text));
    fragments
}

/// Drop Liquid's whitespace-control dash from either end of `inner`.
///
/// The dash only counts when it touches the delimiter, as in `{%- x -%}`.
fn strip_trim_markers(inner: &str) -> &str {
    let inner = inner.strip_prefix('-').unwrap_or(inner);
    inner.strip_suffix('-').unwrap_or(inner)
}

/// Iterator over `{% ... %}` statements.
///
/// A statement ends at the first `%}`. If a `%` followed by whitespace and
/// then `}` comes first, the candidate is abandoned and scanning resumes one
/// byte after its opening brace.
struct TagScanner<'t> {
    text: &'t str,
    pos: usize,
}

impl<'t> TagScanner<'t> {
    fn new(text: &'t str) -> Self {
        Self { text, pos: 0 }
    }

    /// Try to complete a statement opened at `start`. Returns the end offset
    /// of the closing `%}` (exclusive) and the index of its `%`.
    fn close(&self, start: usize) -> Option<(usize, usize)> {
        let bytes = self.text.as_bytes();
        let mut i = start + 2;
        while i < bytes.len() {
            if bytes[i] == b'%' {
                let rest = &self.text[i + 1..];
                if rest.starts_with('}') {
                    return Some((i + 2, i));
                }
                if rest.trim_start().starts_with('}') {
                    return None;
                }
            }
            i += 1;
        }
        None
    }
}

impl<'t> Iterator for TagScanner<'t> {
    type Item = RawFragment<'t>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let start = self.pos + self.text.get(self.pos..)?.find("{%")?;
            match self.close(start) {
                Some((end, close)) => {
                    self.pos = end;
                    return Some(RawFragment {
                        start,
                        end,
                        inner: strip_trim_markers(&self.text[start + 2..close]).trim(),
                        kind: FragmentKind::Tag,
                    });
                }
                None => self.pos = start + 1,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inners(text: &str, kind: FragmentKind) -> Vec<&str> {
        scan(text)
            .into_iter()
            .filter(|f| f.kind == kind)
            .map(|f| f.inner)
            .collect()
    }

    #[test]
    fn test_scan_output() {
        let text = "Hello {{first_name}}!";
        let fragments = scan(text);
        assert_eq!(fragments.len(), 1);
        assert_eq!(fragments[0].start, 6);
        assert_eq!(fragments[0].end, 20);
        assert_eq!(fragments[0].inner, "first_name");
        assert_eq!(fragments[0].original(text), "{{first_name}}");
    }

    #[test]
    fn test_scan_output_with_nested_braces() {
        assert_eq!(
            inners("{{custom_attribute.${fav}}}", FragmentKind::Output),
            vec!["custom_attribute.${fav}"]
        );
    }

    #[test]
    fn test_scan_unterminated_output() {
        assert!(scan("price: {{").is_empty());
        assert!(scan("{{ a").is_empty());
    }

    #[test]
    fn test_scan_tag_trims_content() {
        assert_eq!(
            inners("{%   if a == b  %}", FragmentKind::Tag),
            vec!["if a == b"]
        );
    }

    #[test]
    fn test_scan_adjacent_tags() {
        let text = "{% if x %}yes{% endif %}";
        let fragments = scan(text);
        assert_eq!(fragments.len(), 2);
        assert_eq!(fragments[0].inner, "if x");
        assert_eq!((fragments[1].start, fragments[1].end), (13, 24));
    }

    #[test]
    fn test_scan_tag_spaced_close_is_rejected() {
        assert!(inners("{% if x % }", FragmentKind::Tag).is_empty());
        assert_eq!(inners("{% a % } {% b %}", FragmentKind::Tag), vec!["b"]);
    }

    #[test]
    fn test_scan_tag_percent_in_content() {
        assert_eq!(
            inners("{% assign pct = 5 % 2 %}", FragmentKind::Tag),
            vec!["assign pct = 5 % 2"]
        );
    }

    #[test]
    fn test_scan_tag_containing_output() {
        let fragments = scan("{% if {{x}} %}");
        assert_eq!(fragments.len(), 2);
        assert_eq!(fragments[0].kind, FragmentKind::Output);
        assert_eq!(fragments[1].kind, FragmentKind::Tag);
        assert_eq!(fragments[1].inner, "if {{x}}");
    }

    #[test]
    fn test_scan_strips_trim_markers() {
        assert_eq!(inners("{%- if vip -%}", FragmentKind::Tag), vec!["if vip"]);
        assert_eq!(inners("{%- -%}", FragmentKind::Tag), vec![""]);
        assert_eq!(inners("{%-%}", FragmentKind::Tag), vec![""]);
        assert_eq!(
            inners("{{- first_name -}}", FragmentKind::Output),
            vec![" first_name "]
        );
    }

    #[test]
    fn test_scan_keeps_inner_dashes() {
        assert_eq!(inners("{{ a - 1 }}", FragmentKind::Output), vec![" a - 1 "]);
        assert_eq!(inners("{% if a -%}", FragmentKind::Tag), vec!["if a"]);
    }

    #[test]
    fn test_scan_empty_tag() {
        assert_eq!(inners("{%%}", FragmentKind::Tag), vec![""]);
    }

    #[test]
    fn test_scan_multibyte_text() {
        let text = "héllo {{ naïve }} ✓ {% endif %}";
        let fragments = scan(text);
        assert_eq!(fragments.len(), 2);
        for f in &fragments {
            assert!(text.is_char_boundary(f.start) && text.is_char_boundary(f.end));
        }
        assert_eq!(fragments[0].original(text), "{{ naïve }}");
    }
}
