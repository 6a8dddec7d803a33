//! Hard-coded fallback tables.
//!
//! These tables are independent of any loaded catalog. The engine consults
//! them after the catalog's own entries, so an incomplete or missing catalog
//! still yields pattern names and readable rewrites.

use std::sync::LazyLock;

use crate::entry::{FallbackTransformation, NamedPattern};

fn named(table: &[(&str, &str)]) -> Vec<NamedPattern> {
    table
        .iter()
        .map(|(name, pattern)| NamedPattern::new(name, pattern).unwrap())
        .collect()
}

/// Tag keyword table, tried in order.
pub static TAG_KEYWORDS: LazyLock<Vec<NamedPattern>> = LazyLock::new(|| {
    named(&[
        ("forLoopSimple", r"\bfor\s+\w+\s+in\s+"),
        ("endfor", r"\bendfor\b"),
        ("ifStatement", r"\bif\s+"),
        ("endif", r"\bendif\b"),
        ("else", r"\belse\b"),
        ("elseif", r"\bels(?:e)?if\s+"),
        ("unless", r"\bunless\s+"),
        ("endunless", r"\bendunless\b"),
        ("case", r"\bcase\s+"),
        ("when", r"\bwhen\s+"),
        ("endcase", r"\bendcase\b"),
        ("assignment", r"\bassign\s+\w+\s*="),
        ("capture", r"\bcapture\s+"),
        ("endcapture", r"\bendcapture\b"),
        ("catalogItems", r"\bcatalog_items\b"),
        ("fetch", r"\bfetch\s+"),
        ("api", r"\bapi\s+"),
        ("include", r"\binclude\s+"),
        ("render", r"\brender\s+"),
        ("comment", r"\bcomment\b"),
        ("endcomment", r"\bendcomment\b"),
    ])
});

/// Output keyword table, tried in order. The last entry catches bare identifiers.
pub static OUTPUT_KEYWORDS: LazyLock<Vec<NamedPattern>> = LazyLock::new(|| {
    named(&[
        ("customAttribute", r"custom_attribute"),
        ("emailAddress", r"email_address"),
        ("firstName", r"first_name"),
        ("lastName", r"last_name"),
        ("userId", r"user_id"),
        ("userName", r"user_name"),
        ("product", r"\bproduct\b(?!\s*s)"),
        ("products", r"\bproducts\b"),
        ("contentBlocks", r"content_blocks"),
        ("recommendations", r"recommended_products"),
        ("catalogItems", r"catalog_items"),
        ("braze", r"braze_id|external_id"),
        ("timestamp", r"created_at|updated_at|timestamp"),
        ("currency", r"currency|price|total|amount"),
        ("location", r"city|country|state|region|timezone"),
        ("device", r"device|platform|browser|app_version"),
        ("campaign", r"campaign|canvas|message"),
        ("variable", r"^[a-zA-Z_][a-zA-Z0-9_]*$"),
    ])
});

/// Friendly-mode tag rewrites used when no catalog pattern matches.
pub static FRIENDLY_TRANSFORMATIONS: LazyLock<Vec<FallbackTransformation>> =
    LazyLock::new(|| {
        [
            (
                r"^for\s+(\w+)\s+in\s+(\S+)\s+limit:\s*(\d+)",
                "Loop through {2} (show {3} items)",
                None,
            ),
            (r"^for\s+(\w+)\s+in\s+(\S+)", "Loop through {2}", None),
            (r"^endfor$", "End loop", None),
            (r"^if\s+(.+)$", "Display when: {1}", Some(1)),
            (r"^unless\s+(.+)$", "Display unless: {1}", Some(1)),
            (r"^els(?:e)?if\s+(.+)$", "Otherwise, when: {1}", Some(1)),
            (r"^else$", "Otherwise", None),
            (r"^endif$", "End condition", None),
            (r"^endunless$", "End condition", None),
            (r"^assign\s+(\w+)\s*=\s*(.+)$", "Set {1} to {2}", None),
            (r"^capture\s+(\w+)$", "Capture {1}", None),
            (r"^endcapture$", "End capture", None),
            (r"^case\s+(.+)$", "Check {1}", None),
            (r"^when\s+(.+)$", "When {1}", None),
            (r"^endcase$", "End check", None),
            (r#"^(?:include|render)\s+['"]?([^'"\s]+)['"]?"#, "Insert {1}", None),
            (r"^comment$", "Comment", None),
            (r"^endcomment$", "End comment", None),
        ]
        .into_iter()
        .map(|(pattern, template, condition)| {
            FallbackTransformation::new(pattern, template, &[], condition).unwrap()
        })
        .collect()
    });

/// Technical-mode tag rewrites. Empty: technical output stays verbatim.
pub static TECHNICAL_TRANSFORMATIONS: LazyLock<Vec<FallbackTransformation>> =
    LazyLock::new(Vec::new);

/// Friendly filter phrase.
#[derive(Debug, Clone, Copy)]
pub struct FilterDescription {
    /// Template with `{0}`, `{1}`, ... argument slots.
    pub with_args: Option<&'static str>,
    pub without_args: Option<&'static str>,
}

const fn describe(
    with_args: Option<&'static str>,
    without_args: Option<&'static str>,
) -> FilterDescription {
    FilterDescription {
        with_args,
        without_args,
    }
}

/// Default filter descriptions used when the catalog has no entry.
pub const FILTER_DESCRIPTIONS: &[(&str, FilterDescription)] = &[
    ("id", describe(None, Some("as ID"))),
    ("default", describe(Some("or {0} if empty"), Some("with default"))),
    ("capitalize", describe(None, Some("capitalized"))),
    ("upcase", describe(None, Some("uppercase"))),
    ("downcase", describe(None, Some("lowercase"))),
    ("truncate", describe(Some("first {0} characters"), Some("truncated"))),
    ("limit", describe(Some("limit {0}"), None)),
    ("strip", describe(None, Some("trimmed"))),
    ("escape", describe(None, Some("escaped"))),
    ("join", describe(Some("joined with {0}"), None)),
    ("split", describe(Some("split by {0}"), None)),
    ("replace", describe(Some("replace {0} with {1}"), None)),
    ("remove", describe(Some("remove {0}"), None)),
    ("append", describe(Some("add {0} at end"), None)),
    ("prepend", describe(Some("add {0} at start"), None)),
];

#[must_use]
pub fn filter_description(name: &str) -> Option<FilterDescription> {
    FILTER_DESCRIPTIONS
        .iter()
        .find(|(key, _)| *key == name)
        .map(|(_, d)| *d)
}

/// Phrase for `object.${property}`, keyed by object name. `{}` receives the property.
pub const OBJECT_PHRASES: &[(&str, &str)] = &[
    ("most_recently_used_device", "{} (from current device)"),
    ("targeted_device", "{} (from target device)"),
    ("campaign", "campaign {}"),
    ("canvas", "Canvas {}"),
    ("event_properties", "event: {}"),
    ("custom_attribute", "custom {}"),
    ("subscribed_state", "subscription status for {}"),
    ("sms", "SMS {}"),
    ("whats_app", "WhatsApp {}"),
    ("card", "card {}"),
    ("app", "app {}"),
];

#[must_use]
pub fn object_phrase(object: &str) -> Option<&'static str> {
    OBJECT_PHRASES
        .iter()
        .find(|(key, _)| *key == object)
        .map(|(_, phrase)| *phrase)
}

/// Built-in catalog document bundled with the crate.
pub(crate) const DEFAULT_CATALOG: &str = include_str!("../assets/default-catalog.json");

#[cfg(test)]
mod tests {
    use super::*;

    fn tag_name(content: &str) -> Option<String> {
        TAG_KEYWORDS
            .iter()
            .find(|p| p.is_match(content))
            .map(|p| p.name.clone())
    }

    #[test]
    fn test_tag_keywords_order() {
        assert_eq!(tag_name("for item in items").as_deref(), Some("forLoopSimple"));
        assert_eq!(tag_name("endif").as_deref(), Some("endif"));
        assert_eq!(tag_name("elsif x").as_deref(), Some("elseif"));
        assert_eq!(tag_name("if x").as_deref(), Some("ifStatement"));
        assert_eq!(tag_name("raw"), None);
    }

    #[test]
    fn test_output_keywords_product_vs_products() {
        let first = |content: &str| {
            OUTPUT_KEYWORDS
                .iter()
                .find(|p| p.is_match(content))
                .map(|p| p.name.clone())
        };
        assert_eq!(first("product.title").as_deref(), Some("product"));
        assert_eq!(first("products").as_deref(), Some("products"));
        assert_eq!(first("a.b.c"), None);
    }

    #[test]
    fn test_all_builtin_tables_compile() {
        assert!(!TAG_KEYWORDS.is_empty());
        assert!(!OUTPUT_KEYWORDS.is_empty());
        assert!(!FRIENDLY_TRANSFORMATIONS.is_empty());
        assert!(TECHNICAL_TRANSFORMATIONS.is_empty());
    }

    #[test]
    fn test_filter_description_lookup() {
        let d = filter_description("truncate").unwrap();
        assert_eq!(d.with_args, Some("first {0} characters"));
        assert!(filter_description("unknown").is_none());
    }
}
