//! Content transducer: rewrites fragment content into prose.
//!
//! Tags are matched against the catalog's patterns and the winning
//! template is filled from the capture groups. Tags no pattern claims go
//! through the numbered fallback transformations, and outputs are resolved
//! as a main expression followed by a filter pipeline.
//!
//! Every path yields a string. When nothing matches, the whitespace
//! normalized input comes back unchanged.

mod dot_paths;
mod filters;
mod operators;
mod variables;

use std::sync::LazyLock;

use lens_catalog::{
    DisplayMode, FallbackTransformation, Groups, PatternCatalog, PatternEntry, VariableEntry,
    builtin,
};
use regex::{Captures, Regex};

pub(crate) use operators::OperatorTable;
pub(crate) use variables::PERSONALIZATION_RE;

use crate::fragment::FragmentKind;
use crate::text::{
    fill_placeholder, is_quoted_literal, normalize_whitespace, split_top_level, strip_quotes,
};

/// A nested output expression with an optional trailing filter pipeline.
static NESTED_OUTPUT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{((?:[^{}]|\{[^{}]*\})*)\}\}(?:\s*\|([^{}]*))?").unwrap()
});

/// Leftover `{{ ... }}` after expansion.
static LEFTOVER_OUTPUT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{([^}]+)\}\}").unwrap());

/// A bare `| filter` segment left in a tag value.
static BARE_FILTER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\|\s*([^|]+)").unwrap());

static NUMERIC_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^-?\d+(?:\.\d+)?$").unwrap());

/// Rewrites fragment content for one display mode against one catalog.
///
/// Cheap to build; the matcher creates one per call.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Transducer<'a> {
    catalog: &'a PatternCatalog,
    operators: &'a OperatorTable,
    mode: DisplayMode,
}

impl<'a> Transducer<'a> {
    pub(crate) fn new(
        catalog: &'a PatternCatalog,
        operators: &'a OperatorTable,
        mode: DisplayMode,
    ) -> Self {
        Self {
            catalog,
            operators,
            mode,
        }
    }

    /// Rewrite the inner content of a fragment.
    pub(crate) fn transduce(&self, content: &str, kind: FragmentKind) -> String {
        match kind {
            FragmentKind::Output => self.output(content),
            FragmentKind::Tag => self.tag(content),
        }
    }

    fn tag(&self, content: &str) -> String {
        let clean = normalize_whitespace(content);

        for entry in self.catalog.patterns() {
            if let Some(groups) = entry.groups(&clean) {
                tracing::debug!(pattern = %entry.name, "Tag matched catalog pattern");
                let template = entry.template(self.mode).unwrap_or(&clean);
                return self.fill_template(template, &groups, entry);
            }
        }
        self.fallback(&clean)
    }

    fn fill_template(&self, template: &str, groups: &Groups<'_>, entry: &PatternEntry) -> String {
        let mut result = template.to_owned();

        for (placeholder, group) in &entry.placeholder_map {
            let captured = capture(groups, *group);
            let value = if placeholder == "items" && entry.has_defaults() && captured.is_some() {
                self.plural_noun(groups, entry)
            } else {
                let raw = captured
                    .or_else(|| entry.default_for(placeholder))
                    .unwrap_or(placeholder);
                let cleaned = self.clean_liquid_syntax(raw);
                if placeholder == "condition" {
                    self.conditional(&cleaned)
                } else {
                    cleaned
                }
            };
            result = fill_placeholder(&result, placeholder, &value);
        }

        for (key, default) in &entry.defaults {
            result = fill_placeholder(&result, key, default);
        }
        result
    }

    /// Singular or plural noun for the `items` placeholder, keyed off the
    /// sibling `limit` capture.
    fn plural_noun(&self, groups: &Groups<'_>, entry: &PatternEntry) -> String {
        let limit = entry
            .group_for("limit")
            .and_then(|group| capture(groups, group))
            .map(str::trim);
        let noun = if limit == Some("1") {
            entry.default_for("item").unwrap_or("item")
        } else {
            entry.default_for("items").unwrap_or("items")
        };
        noun.to_owned()
    }

    /// Operator humanization for condition values. Friendly mode only.
    fn conditional(&self, expression: &str) -> String {
        if self.mode.is_technical() {
            expression.to_owned()
        } else {
            self.operators.humanize(expression)
        }
    }

    /// Numbered-group transformations for tags no catalog pattern claims.
    fn fallback(&self, clean: &str) -> String {
        let builtin: &[FallbackTransformation] = match self.mode {
            DisplayMode::Friendly => &builtin::FRIENDLY_TRANSFORMATIONS,
            DisplayMode::Technical => &builtin::TECHNICAL_TRANSFORMATIONS,
        };
        let transformations = self
            .catalog
            .fallback_transformations(self.mode)
            .iter()
            .chain(builtin);

        for transformation in transformations {
            let Some(groups) = transformation.groups(clean) else {
                continue;
            };
            let mut result = transformation.template.clone();
            for (index, group) in groups.iter().enumerate().skip(1) {
                let value = group
                    .filter(|v| !v.is_empty())
                    .or_else(|| transformation.default_for(index))
                    .unwrap_or("");
                let value = if transformation.condition == Some(index) {
                    self.conditional(value)
                } else {
                    value.to_owned()
                };
                result = fill_placeholder(&result, &index.to_string(), &value);
            }
            return self.humanize_nested(&result);
        }
        clean.to_owned()
    }

    /// Expand Liquid syntax left inside a captured tag value.
    fn clean_liquid_syntax(&self, value: &str) -> String {
        self.expand_liquid(value, true)
    }

    /// Expand Liquid syntax left inside a filled fallback template.
    fn humanize_nested(&self, value: &str) -> String {
        self.expand_liquid(value, false)
    }

    fn expand_liquid(&self, value: &str, with_dot_paths: bool) -> String {
        if self.mode.is_technical() {
            return value.to_owned();
        }

        let expanded = NESTED_OUTPUT_RE.replace_all(value.trim(), |caps: &Captures<'_>| {
            let inner = self.output(&caps[1]);
            let descriptions = caps
                .get(2)
                .map(|pipeline| self.filters(split_top_level(pipeline.as_str(), '|')))
                .unwrap_or_default();
            if descriptions.is_empty() {
                inner
            } else {
                format!("{inner} ({})", descriptions.join(", "))
            }
        });
        let expanded = PERSONALIZATION_RE.replace_all(&expanded, |caps: &Captures<'_>| {
            self.prettify(strip_quotes(&caps[1]).trim())
        });
        let expanded = BARE_FILTER_RE.replace_all(&expanded, |caps: &Captures<'_>| {
            format!(" ({})", self.filter(caps[1].trim()))
        });
        let expanded = if with_dot_paths {
            self.dot_phrases(&expanded)
        } else {
            expanded.into_owned()
        };
        normalize_whitespace(&self.clean_leftovers(&expanded))
    }

    /// Prettify `${...}` and `{{ ... }}` that survived resolution.
    fn clean_leftovers(&self, text: &str) -> String {
        let text = PERSONALIZATION_RE.replace_all(text, |caps: &Captures<'_>| {
            self.prettify(strip_quotes(&caps[1]).trim())
        });
        LEFTOVER_OUTPUT_RE
            .replace_all(&text, |caps: &Captures<'_>| {
                self.prettify(strip_quotes(&caps[1]).trim())
            })
            .into_owned()
    }

    /// Rewrite an output expression: main expression plus filter pipeline.
    pub(crate) fn output(&self, content: &str) -> String {
        let parts = split_top_level(content.trim(), '|');
        let main = parts[0];
        let filters: Vec<&str> = parts[1..]
            .iter()
            .copied()
            .filter(|f| !f.is_empty())
            .collect();

        if self.mode.is_technical() {
            let mut result = if is_quoted_literal(main) {
                main.to_owned()
            } else {
                self.catalog
                    .variable(main)
                    .and_then(VariableEntry::technical)
                    .map_or_else(|| normalize_whitespace(main), str::to_owned)
            };
            for filter in filters {
                result.push_str(" | ");
                result.push_str(&normalize_whitespace(filter));
            }
            return result;
        }

        let resolved = if is_quoted_literal(main) {
            main[1..main.len() - 1].to_owned()
        } else if main.contains("${") {
            self.personalization(main)
        } else if NUMERIC_RE.is_match(main) {
            main.to_owned()
        } else if main.contains('.') {
            self.complex_variable(main)
        } else {
            self.prettify(main)
        };
        let resolved = self.clean_leftovers(&resolved);

        let descriptions = self.filters(filters);
        if descriptions.is_empty() {
            resolved
        } else {
            format!("{resolved} ({})", descriptions.join(", "))
        }
    }
}

/// Non-empty capture for `group`.
fn capture<'t>(groups: &Groups<'t>, group: usize) -> Option<&'t str> {
    groups.get(group).copied().flatten().filter(|v| !v.is_empty())
}
