//! Small string helpers shared by the scanner and transducer.

/// Collapse whitespace runs to a single space and trim.
pub(crate) fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Remove every single and double quote character.
pub(crate) fn strip_quotes(s: &str) -> String {
    s.chars().filter(|c| !matches!(c, '"' | '\'')).collect()
}

/// `true` for `"..."` or `'...'`.
pub(crate) fn is_quoted_literal(s: &str) -> bool {
    s.len() >= 2
        && ((s.starts_with('"') && s.ends_with('"')) || (s.starts_with('\'') && s.ends_with('\'')))
}

/// Split `s` on `separator`, ignoring separators inside quotes or braces.
///
/// Parts are trimmed. An empty input yields a single empty part.
pub(crate) fn split_top_level(s: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut part_start = 0;

    for (i, c) in s.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '{') => depth += 1,
            (None, '}') => depth = depth.saturating_sub(1),
            (None, c) if c == separator && depth == 0 => {
                parts.push(s[part_start..i].trim());
                part_start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(s[part_start..].trim());
    parts
}

/// Replace every `{key}` in `template` with `value`.
pub(crate) fn fill_placeholder(template: &str, key: &str, value: &str) -> String {
    template.replace(&format!("{{{key}}}"), value)
}

/// Uppercase the first character.
pub(crate) fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
