//! Scan, transduce, classify and resolve in one pass.

use std::sync::Arc;

use lens_catalog::{DisplayMode, PatternCatalog};

use crate::classifier::classify;
use crate::fragment::{FragmentKind, FragmentResult};
use crate::resolver::resolve_overlaps;
use crate::scanner::scan;
use crate::transducer::{OperatorTable, Transducer};

/// Finds and rewrites template fragments against one catalog snapshot.
///
/// A matcher is immutable apart from its display mode and is safe to share
/// between threads. To pick up a reloaded catalog, build a new matcher from
/// the new snapshot.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use lens_catalog::{DisplayMode, PatternCatalog};
/// use lens_engine::LiquidMatcher;
///
/// let matcher = LiquidMatcher::new(Arc::new(PatternCatalog::empty()), DisplayMode::Friendly);
/// let fragments = matcher.find_fragments("{% if tier == 'gold' %}");
/// assert_eq!(fragments.len(), 1);
/// assert_eq!(fragments[0].pattern.as_deref(), Some("ifStatement"));
/// ```
#[derive(Debug, Clone)]
pub struct LiquidMatcher {
    catalog: Arc<PatternCatalog>,
    operators: OperatorTable,
    mode: DisplayMode,
}

impl LiquidMatcher {
    #[must_use]
    pub fn new(catalog: Arc<PatternCatalog>, mode: DisplayMode) -> Self {
        let operators = OperatorTable::compile(&catalog);
        Self {
            catalog,
            operators,
            mode,
        }
    }

    /// Set the display mode (builder pattern).
    #[must_use]
    pub fn with_display_mode(mut self, mode: DisplayMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn set_display_mode(&mut self, mode: DisplayMode) {
        self.mode = mode;
    }

    #[must_use]
    pub fn display_mode(&self) -> DisplayMode {
        self.mode
    }

    #[must_use]
    pub fn catalog(&self) -> &Arc<PatternCatalog> {
        &self.catalog
    }

    /// Pattern name for fragment content.
    #[must_use]
    pub fn classify(&self, content: &str, kind: FragmentKind) -> Option<String> {
        classify(&self.catalog, content, kind)
    }

    /// Rewrite fragment content for the current display mode.
    #[must_use]
    pub fn transduce(&self, content: &str, kind: FragmentKind) -> String {
        self.transducer().transduce(content, kind)
    }

    /// All fragments in `text`, rewritten, classified and free of overlaps.
    ///
    /// Fragments whose rewrite is empty or whitespace are dropped.
    #[must_use]
    pub fn find_fragments(&self, text: &str) -> Vec<FragmentResult> {
        let transducer = self.transducer();
        let fragments = scan(text)
            .into_iter()
            .filter_map(|raw| {
                let clean = transducer.transduce(raw.inner, raw.kind);
                if clean.trim().is_empty() {
                    tracing::debug!(start = raw.start, kind = %raw.kind, "Dropping empty fragment");
                    return None;
                }
                Some(FragmentResult {
                    start: raw.start,
                    end: raw.end,
                    original: raw.original(text).to_owned(),
                    clean,
                    kind: raw.kind,
                    pattern: self.classify(raw.inner, raw.kind),
                })
            })
            .collect();
        resolve_overlaps(fragments)
    }

    fn transducer(&self) -> Transducer<'_> {
        Transducer::new(&self.catalog, &self.operators, self.mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    static_assertions::assert_impl_all!(LiquidMatcher: Send, Sync);

    fn matcher(mode: DisplayMode) -> LiquidMatcher {
        LiquidMatcher::new(Arc::new(PatternCatalog::empty()), mode)
    }

    #[test]
    fn test_find_fragments_reports_offsets_and_originals() {
        let text = "Hi {{ first_name }}, {% if vip %}";
        let fragments = matcher(DisplayMode::Friendly).find_fragments(text);
        assert_eq!(fragments.len(), 2);
        assert_eq!(fragments[0].original, "{{ first_name }}");
        assert_eq!(&text[fragments[0].start..fragments[0].end], "{{ first_name }}");
        assert_eq!(fragments[0].pattern.as_deref(), Some("firstName"));
        assert_eq!(fragments[1].kind, FragmentKind::Tag);
        assert_eq!(fragments[1].clean, "Display when: vip");
    }

    #[test]
    fn test_whitespace_only_output_is_dropped() {
        let fragments = matcher(DisplayMode::Friendly).find_fragments("a {{   }} b");
        assert!(fragments.is_empty());
    }

    #[test]
    fn test_display_mode_switch() {
        let mut matcher = matcher(DisplayMode::Friendly).with_display_mode(DisplayMode::Technical);
        assert_eq!(matcher.display_mode(), DisplayMode::Technical);
        assert_eq!(
            matcher.transduce("for x in xs", FragmentKind::Tag),
            "for x in xs"
        );
        matcher.set_display_mode(DisplayMode::Friendly);
        assert_eq!(
            matcher.transduce("for x in xs", FragmentKind::Tag),
            "Loop through xs"
        );
    }

    #[test]
    fn test_runaway_pattern_does_not_block_rewrite() {
        let catalog = PatternCatalog::from_value(&json!({
            "patterns": {
                "runaway": { "regex": "(a|b|ab)*(?=c)", "priority": 1, "friendly": "Never" },
                "pairs": { "regex": "^(ab)+$", "priority": 2, "friendly": "Pairs" }
            }
        }))
        .unwrap();
        let matcher = LiquidMatcher::new(Arc::new(catalog), DisplayMode::Friendly);
        let text = format!("{{% {} %}}", "ab".repeat(28));
        let fragments = matcher.find_fragments(&text);
        assert_eq!(fragments.len(), 1);
        assert_eq!(fragments[0].clean, "Pairs");
        assert_eq!(fragments[0].pattern.as_deref(), Some("pairs"));
    }

    #[test]
    fn test_catalog_operators_compiled_once_per_matcher() {
        let catalog = PatternCatalog::from_value(&json!({ "operators": { ">": "exceeds" } }))
            .unwrap();
        let matcher = LiquidMatcher::new(Arc::new(catalog), DisplayMode::Friendly);
        assert_eq!(
            matcher.transduce("if score > 10", FragmentKind::Tag),
            "Display when: score exceeds 10"
        );
    }
}
