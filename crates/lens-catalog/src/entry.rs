//! Catalog entry types.
//!
//! Each type has a raw serde shape mirroring the catalog document and a
//! compiled form used by the engine. Conversion happens once at load time.

use std::borrow::Cow;
use std::fmt::Write as _;

use fancy_regex::{Regex, RegexBuilder};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::EntryError;
use crate::mode::DisplayMode;

/// Capture groups of a successful match. Index 0 is the whole match;
/// groups that did not participate are `None`.
pub type Groups<'t> = Vec<Option<&'t str>>;

/// Priority assigned to patterns that do not declare one.
pub const DEFAULT_PRIORITY: i64 = 999;

/// Backtracking steps one match attempt may take before it counts as no match.
pub(crate) const BACKTRACK_LIMIT: usize = 100_000;

/// Compile a catalog expression. Catalog expressions always match case-insensitively.
pub(crate) fn compile(pattern: &str) -> Result<Regex, fancy_regex::Error> {
    RegexBuilder::new(&format!("(?i){}", ecma_compat(pattern)))
        .backtrack_limit(BACKTRACK_LIMIT)
        .build()
}

/// Rewrite ECMAScript-only syntax: `[^]` (any character, newlines included)
/// becomes `[\s\S]` and `\cX` becomes the control character escape.
fn ecma_compat(pattern: &str) -> Cow<'_, str> {
    if !pattern.contains("[^]") && !pattern.contains(r"\c") {
        return Cow::Borrowed(pattern);
    }

    let mut out = String::with_capacity(pattern.len() + 8);
    let mut in_class = false;
    let mut rest = pattern;
    while let Some(c) = rest.chars().next() {
        if c == '\\' {
            let mut escape = rest.chars().skip(1);
            match (escape.next(), escape.next()) {
                (Some('c'), Some(letter)) if letter.is_ascii_alphabetic() => {
                    let code = u32::from(letter.to_ascii_uppercase()) - 0x40;
                    let _ = write!(out, r"\x{code:02X}");
                    rest = &rest[3..];
                }
                (Some(next), _) => {
                    out.push('\\');
                    out.push(next);
                    rest = &rest[1 + next.len_utf8()..];
                }
                (None, _) => {
                    out.push('\\');
                    rest = "";
                }
            }
            continue;
        }
        if !in_class && rest.starts_with("[^]") {
            out.push_str(r"[\s\S]");
            rest = &rest[3..];
            continue;
        }
        match c {
            '[' => in_class = true,
            ']' => in_class = false,
            _ => {}
        }
        out.push(c);
        rest = &rest[c.len_utf8()..];
    }
    Cow::Owned(out)
}

/// Test `regex` against `text`, treating a matcher failure as "no match".
fn test(regex: &Regex, name: &str, text: &str) -> bool {
    match regex.is_match(text) {
        Ok(matched) => matched,
        Err(e) => {
            tracing::warn!(pattern = name, error = %e, "Pattern failed while matching");
            false
        }
    }
}

fn groups<'t>(regex: &Regex, name: &str, text: &'t str) -> Option<Groups<'t>> {
    match regex.captures(text) {
        Ok(caps) => caps.map(|caps| caps.iter().map(|m| m.map(|m| m.as_str())).collect()),
        Err(e) => {
            tracing::warn!(pattern = name, error = %e, "Pattern failed while matching");
            None
        }
    }
}

/// Convert a scalar JSON value into its display string.
fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn string_map(field: &str, map: &Map<String, Value>) -> Result<Vec<(String, String)>, EntryError> {
    map.iter()
        .map(|(key, value)| {
            scalar_to_string(value)
                .map(|v| (key.clone(), v))
                .ok_or_else(|| EntryError::Field(format!("{field}.{key} must be a string")))
        })
        .collect()
}

fn group_index(field: &str, value: &Value) -> Result<usize, EntryError> {
    let index = match value {
        Value::Number(n) => n.as_u64().and_then(|n| usize::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    index.ok_or_else(|| EntryError::Field(format!("{field} must be a capture group index")))
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|s| !s.is_empty())
}

/// A named expression with no template, used by the keyword tables.
#[derive(Debug, Clone)]
pub struct NamedPattern {
    pub name: String,
    pub regex: Regex,
}

impl NamedPattern {
    /// Compile a named pattern.
    pub fn new(name: &str, pattern: &str) -> Result<Self, fancy_regex::Error> {
        Ok(Self {
            name: name.to_owned(),
            regex: compile(pattern)?,
        })
    }

    pub(crate) fn from_value(name: &str, value: &Value) -> Result<Self, EntryError> {
        let pattern = value
            .as_str()
            .ok_or_else(|| EntryError::Field("value must be a regex string".to_owned()))?;
        Ok(Self::new(name, pattern)?)
    }

    #[must_use]
    pub fn is_match(&self, text: &str) -> bool {
        test(&self.regex, &self.name, text)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPatternEntry {
    regex: String,
    priority: Option<i64>,
    friendly: Option<String>,
    technical: Option<String>,
    #[serde(default)]
    placeholder_map: Map<String, Value>,
    #[serde(default)]
    defaults: Map<String, Value>,
}

/// A tag pattern from the catalog's `patterns` section.
#[derive(Debug, Clone)]
pub struct PatternEntry {
    pub name: String,
    pub regex: Regex,
    /// Lower values are tried first.
    pub priority: i64,
    pub friendly: Option<String>,
    pub technical: Option<String>,
    /// Placeholder name to capture group index, in document order.
    pub placeholder_map: Vec<(String, usize)>,
    /// Placeholder defaults, in document order.
    pub defaults: Vec<(String, String)>,
}

impl PatternEntry {
    pub(crate) fn from_value(name: &str, value: &Value) -> Result<Self, EntryError> {
        let raw = RawPatternEntry::deserialize(value)?;
        let placeholder_map = raw
            .placeholder_map
            .iter()
            .map(|(key, v)| Ok((key.clone(), group_index(&format!("placeholderMap.{key}"), v)?)))
            .collect::<Result<Vec<_>, EntryError>>()?;

        Ok(Self {
            name: name.to_owned(),
            regex: compile(&raw.regex)?,
            priority: raw.priority.unwrap_or(DEFAULT_PRIORITY),
            friendly: raw.friendly,
            technical: raw.technical,
            placeholder_map,
            defaults: string_map("defaults", &raw.defaults)?,
        })
    }

    #[must_use]
    pub fn is_match(&self, text: &str) -> bool {
        test(&self.regex, &self.name, text)
    }

    /// Capture groups for `text`, or `None` when the pattern does not match.
    #[must_use]
    pub fn groups<'t>(&self, text: &'t str) -> Option<Groups<'t>> {
        groups(&self.regex, &self.name, text)
    }

    /// Template for `mode`, falling back to the other mode's template.
    #[must_use]
    pub fn template(&self, mode: DisplayMode) -> Option<&str> {
        let friendly = non_empty(self.friendly.as_ref());
        let technical = non_empty(self.technical.as_ref());
        match mode {
            DisplayMode::Friendly => friendly.or(technical),
            DisplayMode::Technical => technical.or(friendly),
        }
    }

    #[must_use]
    pub fn default_for(&self, placeholder: &str) -> Option<&str> {
        self.defaults
            .iter()
            .find(|(key, _)| key == placeholder)
            .map(|(_, v)| v.as_str())
    }

    #[must_use]
    pub fn group_for(&self, placeholder: &str) -> Option<usize> {
        self.placeholder_map
            .iter()
            .find(|(key, _)| key == placeholder)
            .map(|(_, index)| *index)
    }

    #[must_use]
    pub fn has_defaults(&self) -> bool {
        !self.defaults.is_empty()
    }
}

/// A known variable from the `variables` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct VariableEntry {
    #[serde(default)]
    pub friendly: Option<String>,
    #[serde(default)]
    pub technical: Option<String>,
}

impl VariableEntry {
    #[must_use]
    pub fn friendly(&self) -> Option<&str> {
        non_empty(self.friendly.as_ref())
    }

    #[must_use]
    pub fn technical(&self) -> Option<&str> {
        non_empty(self.technical.as_ref())
    }
}

/// A filter description from the `filters` section.
///
/// The template may contain `{value}`, replaced by the first filter argument.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FilterEntry {
    #[serde(default)]
    pub friendly: Option<String>,
}

#[derive(Deserialize)]
struct RawOperatorEntry {
    #[serde(default)]
    friendly: Option<String>,
}

/// An operator phrase from the `operators` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperatorEntry {
    /// Symbol (`>=`) or word (`contains`) as written in templates.
    pub symbol: String,
    pub friendly: String,
}

impl OperatorEntry {
    pub(crate) fn from_value(symbol: &str, value: &Value) -> Result<Self, EntryError> {
        if symbol.trim().is_empty() {
            return Err(EntryError::Field("operator cannot be empty".to_owned()));
        }
        let raw = match value {
            Value::String(s) => RawOperatorEntry {
                friendly: Some(s.clone()),
            },
            other => RawOperatorEntry::deserialize(other)?,
        };
        Ok(Self {
            symbol: symbol.to_owned(),
            friendly: raw
                .friendly
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| symbol.to_owned()),
        })
    }

    /// Word operators (`and`, `contains`) match on word boundaries.
    #[must_use]
    pub fn is_word(&self) -> bool {
        self.symbol.chars().all(|c| c.is_ascii_alphabetic())
    }
}

#[derive(Deserialize)]
struct RawFallbackTransformation {
    regex: String,
    template: String,
    #[serde(default)]
    defaults: Map<String, Value>,
    #[serde(default)]
    condition: Option<Value>,
}

/// A numbered-group rewrite from `fallbackTransformations`.
#[derive(Debug, Clone)]
pub struct FallbackTransformation {
    pub regex: Regex,
    /// Template with `{1}`, `{2}`, ... placeholders.
    pub template: String,
    /// Defaults keyed by group number.
    pub defaults: Vec<(usize, String)>,
    /// Group whose value is an operator expression.
    pub condition: Option<usize>,
}

impl FallbackTransformation {
    pub(crate) fn from_value(value: &Value) -> Result<Self, EntryError> {
        let raw = RawFallbackTransformation::deserialize(value)?;
        let defaults = string_map("defaults", &raw.defaults)?
            .into_iter()
            .map(|(key, v)| {
                let index = key.trim().parse().map_err(|_| {
                    EntryError::Field(format!("defaults.{key} must be keyed by group number"))
                })?;
                Ok((index, v))
            })
            .collect::<Result<Vec<_>, EntryError>>()?;
        let condition = raw
            .condition
            .as_ref()
            .map(|v| group_index("condition", v))
            .transpose()?;

        Ok(Self {
            regex: compile(&raw.regex)?,
            template: raw.template,
            defaults,
            condition,
        })
    }

    /// Build a transformation from static parts.
    pub fn new(
        pattern: &str,
        template: &str,
        defaults: &[(usize, &str)],
        condition: Option<usize>,
    ) -> Result<Self, fancy_regex::Error> {
        Ok(Self {
            regex: compile(pattern)?,
            template: template.to_owned(),
            defaults: defaults.iter().map(|(i, v)| (*i, (*v).to_owned())).collect(),
            condition,
        })
    }

    #[must_use]
    pub fn groups<'t>(&self, text: &'t str) -> Option<Groups<'t>> {
        groups(&self.regex, &self.template, text)
    }

    #[must_use]
    pub fn default_for(&self, group: usize) -> Option<&str> {
        self.defaults
            .iter()
            .find(|(i, _)| *i == group)
            .map(|(_, v)| v.as_str())
    }
}

/// Phrase template for `object.${property}` lookups.
///
/// The first `{...}` slot in the template receives the property description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DynamicPattern {
    #[serde(default)]
    pub friendly: Option<String>,
    #[serde(default)]
    pub pattern: Option<String>,
}

impl DynamicPattern {
    #[must_use]
    pub fn template(&self) -> Option<&str> {
        non_empty(self.friendly.as_ref()).or(non_empty(self.pattern.as_ref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_pattern_entry_defaults_priority() {
        let entry = PatternEntry::from_value("x", &json!({"regex": "^x$"})).unwrap();
        assert_eq!(entry.priority, DEFAULT_PRIORITY);
        assert!(entry.placeholder_map.is_empty());
    }

    #[test]
    fn test_pattern_entry_case_insensitive() {
        let entry =
            PatternEntry::from_value("ifStatement", &json!({"regex": "^if\\s+(.+)$"})).unwrap();
        assert!(entry.is_match("IF x"));
    }

    #[test]
    fn test_pattern_entry_keeps_placeholder_order() {
        let entry = PatternEntry::from_value(
            "loop",
            &json!({
                "regex": "for (\\w+) in (\\w+)",
                "placeholderMap": {"collection": 2, "item": "1"},
                "defaults": {"limit": 5}
            }),
        )
        .unwrap();
        assert_eq!(
            entry.placeholder_map,
            vec![("collection".to_owned(), 2), ("item".to_owned(), 1)]
        );
        assert_eq!(entry.default_for("limit"), Some("5"));
    }

    #[test]
    fn test_pattern_entry_invalid_regex() {
        let err = PatternEntry::from_value("bad", &json!({"regex": "(unclosed"})).unwrap_err();
        assert!(matches!(err, EntryError::Regex(_)));
    }

    #[test]
    fn test_pattern_entry_rejects_bad_group() {
        let err = PatternEntry::from_value(
            "bad",
            &json!({"regex": "x", "placeholderMap": {"a": "one"}}),
        )
        .unwrap_err();
        assert!(err.to_string().contains("placeholderMap.a"));
    }

    #[test]
    fn test_template_falls_back_to_other_mode() {
        let entry = PatternEntry::from_value(
            "x",
            &json!({"regex": "x", "friendly": "", "technical": "tech"}),
        )
        .unwrap();
        assert_eq!(entry.template(DisplayMode::Friendly), Some("tech"));
    }

    #[test]
    fn test_groups_report_missing_as_none() {
        let entry = PatternEntry::from_value(
            "loop",
            &json!({"regex": "^for (\\w+)(?: limit: (\\d+))?$"}),
        )
        .unwrap();
        assert_eq!(entry.groups("for x"), Some(vec![Some("for x"), Some("x"), None]));
        assert_eq!(entry.groups("while x"), None);
    }

    #[test]
    fn test_runaway_pattern_counts_as_no_match() {
        let text = "ab".repeat(28);
        let entry =
            PatternEntry::from_value("runaway", &json!({"regex": "(a|b|ab)*(?=c)"})).unwrap();
        assert!(entry.regex.is_match(&text).is_err());
        assert!(!entry.is_match(&text));
        assert_eq!(entry.groups(&text), None);

        let named = NamedPattern::new("runaway", "(a|b|ab)*(?=c)").unwrap();
        assert!(!named.is_match(&text));
    }

    #[test]
    fn test_ecma_only_syntax_is_rewritten() {
        assert_eq!(ecma_compat(r"^if\s+(.+)$"), r"^if\s+(.+)$");
        assert_eq!(ecma_compat(r"a[^]*b"), r"a[\s\S]*b");
        assert_eq!(ecma_compat(r"\cJ|\ci"), r"\x0A|\x09");
        assert_eq!(ecma_compat(r"\[^]"), r"\[^]");
        assert_eq!(ecma_compat(r"[a\c]"), r"[a\c]");
    }

    #[test]
    fn test_ecma_only_syntax_compiles() {
        let entry =
            PatternEntry::from_value("comment", &json!({"regex": "^comment[^]*end$"})).unwrap();
        assert!(entry.is_match("comment\nsome notes\nend"));

        let named = NamedPattern::new("newline", r"a\cJb").unwrap();
        assert!(named.is_match("a\nb"));
    }

    #[test]
    fn test_lookaround_supported() {
        let pattern = NamedPattern::new("product", r"\bproduct\b(?!\s*s)").unwrap();
        assert!(pattern.is_match("product.title"));
        assert!(!pattern.is_match("products"));
    }

    #[test]
    fn test_operator_word_detection() {
        let word = OperatorEntry::from_value("contains", &json!({"friendly": "includes"})).unwrap();
        let symbol = OperatorEntry::from_value(">=", &json!("is at least")).unwrap();
        assert!(word.is_word());
        assert!(!symbol.is_word());
        assert_eq!(symbol.friendly, "is at least");
    }

    #[test]
    fn test_fallback_transformation_defaults_by_group() {
        let t = FallbackTransformation::from_value(&json!({
            "regex": "for (\\w+) in (\\w+)",
            "template": "Loop through {2}",
            "defaults": {"2": "items"},
            "condition": 1
        }))
        .unwrap();
        assert_eq!(t.default_for(2), Some("items"));
        assert_eq!(t.condition, Some(1));
    }
}
