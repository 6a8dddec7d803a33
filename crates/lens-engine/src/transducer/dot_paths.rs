//! Dot-path phrasing inside tag values.
//!
//! Rewrites `object.path` references that survive into prose, e.g. a
//! condition such as `catalog_items.shoes.size > 3`.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::Transducer;

static CATALOG_ITEMS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bcatalog_items\.([\w-]+(?:\.[\w-]+)*)").unwrap());

static EVENT_PROPERTIES_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:event_properties|event data)\.([\w-]+(?:\.[\w-]+)*)").unwrap()
});

static CUSTOM_ATTRIBUTE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:custom_attribute|Custom attribute)\.([\w-]+(?:\.[\w-]+)*)").unwrap()
});

static KNOWN_OBJECT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(user|campaign|canvas|sms|whats_app|card|app|most_recently_used_device|targeted_device)\.([\w-]+(?:\.[\w-]+)*)",
    )
    .unwrap()
});

static GENERIC_PATH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b([a-zA-Z_][a-zA-Z0-9_]*)\.([a-zA-Z_][a-zA-Z0-9_]*(?:\.[a-zA-Z_][a-zA-Z0-9_]*)*)")
        .unwrap()
});

/// Characters of context inspected around a generic path.
const URL_CONTEXT: usize = 10;

/// Whether a generic `a.b` match is more likely part of a URL or host name.
fn looks_like_url(text: &str, start: usize, end: usize) -> bool {
    let before: String = {
        let mut chars: Vec<char> = text[..start].chars().rev().take(URL_CONTEXT).collect();
        chars.reverse();
        chars.into_iter().collect()
    };
    let after: String = text[end..].chars().take(URL_CONTEXT).collect();
    let matched = &text[start..end];

    before.contains("http")
        || before.contains("://")
        || after.contains('/')
        || ["com", "org", "net", "api"]
            .iter()
            .any(|tld| matched.contains(tld))
}

impl Transducer<'_> {
    fn lowered_parts(&self, path: &str) -> Vec<String> {
        path.split('.')
            .map(|part| self.prettify(part).to_lowercase())
            .collect()
    }

    fn object_phrase(&self, object: &str, path: &str) -> String {
        let object = self.prettify(object).to_lowercase();
        let parts = self.lowered_parts(path);
        if parts.len() == 1 {
            format!("{object} {}", parts[0])
        } else {
            format!("{object} → {}", parts.join(" → "))
        }
    }

    /// Rewrite dotted references into phrases. Friendly mode only.
    pub(crate) fn dot_phrases(&self, text: &str) -> String {
        if self.mode.is_technical() {
            return text.to_owned();
        }

        let result = CATALOG_ITEMS_RE.replace_all(text, |caps: &Captures<'_>| {
            let parts: Vec<String> = caps[1].split('.').map(|p| self.prettify(p)).collect();
            let first = parts[0].to_lowercase();
            if parts.len() >= 2 && first.contains("custom") && first.contains("attribute") {
                format!("products from {}", parts[1..].join(" ").to_lowercase())
            } else {
                format!("products from {}", parts.join(" → ").to_lowercase())
            }
        });

        let result = EVENT_PROPERTIES_RE.replace_all(&result, |caps: &Captures<'_>| {
            format!("event: {}", self.lowered_parts(&caps[1]).join(" "))
        });

        let result = CUSTOM_ATTRIBUTE_RE.replace_all(&result, |caps: &Captures<'_>| {
            format!("custom {}", self.lowered_parts(&caps[1]).join(" "))
        });

        let result = KNOWN_OBJECT_RE.replace_all(&result, |caps: &Captures<'_>| {
            self.object_phrase(&caps[1], &caps[2])
        });

        let haystack: &str = &result;
        GENERIC_PATH_RE
            .replace_all(haystack, |caps: &Captures<'_>| {
                let whole = &caps[0];
                let (start, end) = caps.get(0).map_or((0, 0), |m| (m.start(), m.end()));
                if looks_like_url(haystack, start, end) {
                    whole.to_owned()
                } else {
                    self.object_phrase(&caps[1], &caps[2])
                }
            })
            .into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transducer::tests::{empty_catalog, transducer};
    use lens_catalog::DisplayMode;
    use pretty_assertions::assert_eq;

    fn phrases(text: &str) -> String {
        let catalog = empty_catalog();
        transducer(&catalog, DisplayMode::Friendly).dot_phrases(text)
    }

    #[test]
    fn test_catalog_items_paths() {
        assert_eq!(phrases("catalog_items.shoes"), "products from shoes");
        assert_eq!(
            phrases("catalog_items.custom_attribute.favorite_category"),
            "products from favorite category"
        );
        assert_eq!(phrases("catalog_items.a.b"), "products from a → b");
    }

    #[test]
    fn test_event_and_custom_attribute_paths() {
        assert_eq!(phrases("event_properties.plan_name is gold"), "event: plan name is gold");
        assert_eq!(phrases("custom_attribute.shoe_size"), "custom shoe size");
    }

    #[test]
    fn test_known_objects() {
        assert_eq!(phrases("user.first_name"), "user first name");
        assert_eq!(phrases("campaign.api_id.value"), "campaign → api id → value");
    }

    #[test]
    fn test_generic_paths_and_urls() {
        assert_eq!(phrases("order.total > 10"), "order total > 10");
        assert_eq!(phrases("https://shop.example/x"), "https://shop.example/x");
        assert_eq!(phrases("visit example.com"), "visit example.com");
        assert_eq!(phrases("see assets.cdn/logo"), "see assets.cdn/logo");
    }

    #[test]
    fn test_technical_mode_untouched() {
        let catalog = empty_catalog();
        let t = transducer(&catalog, DisplayMode::Technical);
        assert_eq!(t.dot_phrases("user.first_name"), "user.first_name");
    }
}
