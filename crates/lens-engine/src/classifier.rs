//! Pattern classification.

use lens_catalog::{PatternCatalog, builtin};

use crate::fragment::FragmentKind;
use crate::text::normalize_whitespace;
use crate::transducer::PERSONALIZATION_RE;

/// Pattern name given to outputs nothing else claims.
pub const VARIABLE_PATTERN: &str = "variable";

/// Name the pattern `content` belongs to.
///
/// Catalog entries are tried first, then the built-in keyword tables.
/// Unclaimed outputs are [`VARIABLE_PATTERN`]; unclaimed tags are `None`.
#[must_use]
pub fn classify(catalog: &PatternCatalog, content: &str, kind: FragmentKind) -> Option<String> {
    let clean = normalize_whitespace(content);
    match kind {
        FragmentKind::Tag => classify_tag(catalog, &clean),
        FragmentKind::Output => classify_output(catalog, &clean),
    }
}

fn classify_tag(catalog: &PatternCatalog, clean: &str) -> Option<String> {
    if let Some(entry) = catalog.patterns().iter().find(|p| p.is_match(clean)) {
        return Some(entry.name.clone());
    }
    catalog
        .fallback_tag_patterns()
        .iter()
        .chain(builtin::TAG_KEYWORDS.iter())
        .find(|p| p.is_match(clean))
        .map(|p| p.name.clone())
}

fn classify_output(catalog: &PatternCatalog, clean: &str) -> Option<String> {
    if clean.is_empty() {
        return None;
    }
    if PERSONALIZATION_RE.is_match(clean) {
        return Some(VARIABLE_PATTERN.to_owned());
    }
    let name = catalog
        .output_patterns()
        .iter()
        .chain(builtin::OUTPUT_KEYWORDS.iter())
        .find(|p| p.is_match(clean))
        .map_or(VARIABLE_PATTERN, |p| p.name.as_str());
    Some(name.to_owned())
}
