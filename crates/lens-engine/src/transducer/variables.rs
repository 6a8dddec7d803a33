//! Variable, dot-path and `${...}` personalization resolution.

use std::borrow::Cow;
use std::sync::LazyLock;

use lens_catalog::{DynamicPattern, builtin};
use regex::{Captures, NoExpand, Regex};

use super::Transducer;
use crate::text::{capitalize_first, normalize_whitespace, strip_quotes};

/// Any `${...}` reference.
pub(crate) static PERSONALIZATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").unwrap());

/// `object.${property}` as the whole expression.
static OBJECT_PROPERTY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^.]+)\.\$\{([^}]+)\}$").unwrap());

/// `${property}` as the whole expression.
static STANDALONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\$\{([^}]+)\}$").unwrap());

/// Template slot in a dynamic pattern phrase.
static SLOT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{[^}]+\}").unwrap());

static CAMEL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"([a-z])([A-Z])").unwrap());

static LETTER_DIGIT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"([a-z])(\d)").unwrap());

static ACRONYM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(id|url|api|sms|ios|usb)\b").unwrap());

impl<'a> Transducer<'a> {
    /// Friendly text of an exactly matching catalog variable.
    pub(crate) fn friendly_variable(&self, key: &str) -> Option<&'a str> {
        self.catalog.variable(key).and_then(|v| v.friendly())
    }

    /// Turn an identifier into words.
    ///
    /// Known variables and common mappings win. Text that already contains
    /// whitespace is only normalized, so prettified output is a fixed point.
    pub(crate) fn prettify(&self, identifier: &str) -> String {
        if self.mode.is_technical() {
            return identifier.to_owned();
        }
        if let Some(friendly) = self.friendly_variable(identifier) {
            return friendly.to_owned();
        }
        if let Some(mapped) = self.catalog.common_mapping(identifier) {
            return mapped.to_owned();
        }
        if identifier.chars().any(char::is_whitespace) {
            return normalize_whitespace(identifier);
        }

        let spaced = CAMEL_RE.replace_all(identifier, "$1 $2").replace('_', " ");
        let spaced = LETTER_DIGIT_RE.replace_all(&spaced, "$1 $2").to_lowercase();
        let spaced = ACRONYM_RE.replace_all(&spaced, |caps: &Captures<'_>| match &caps[1] {
            "id" => "ID",
            "url" => "URL",
            "api" => "API",
            "sms" => "SMS",
            "ios" => "iOS",
            _ => "USB",
        });
        capitalize_first(&normalize_whitespace(&spaced))
    }

    /// Resolve an expression containing `${...}` references.
    pub(crate) fn personalization(&self, expression: &str) -> String {
        if self.mode.is_technical() {
            return expression.to_owned();
        }
        if let Some(friendly) = self.friendly_variable(expression) {
            return friendly.to_owned();
        }

        if let Some(caps) = OBJECT_PROPERTY_RE.captures(expression) {
            let object = &caps[1];
            let property = strip_quotes(&caps[2]);
            return self.object_property(object, property.trim());
        }

        if let Some(caps) = STANDALONE_RE.captures(expression) {
            let property = &caps[1];
            let unquoted = strip_quotes(property);
            return self
                .friendly_variable(property)
                .or_else(|| self.friendly_variable(&unquoted))
                .map_or_else(|| self.prettify(unquoted.trim()), str::to_owned);
        }

        let working = PERSONALIZATION_RE.replace_all(expression, |caps: &Captures<'_>| {
            let property = strip_quotes(&caps[1]);
            self.friendly_variable(&property)
                .map_or_else(|| self.prettify(property.trim()), str::to_owned)
        });
        if let Cow::Owned(working) = working {
            return if working.contains('.') && !working.contains(' ') {
                self.dot_path(&working)
            } else {
                working
            };
        }

        if expression.contains('.') {
            return expression
                .split('.')
                .map(|part| {
                    self.friendly_variable(part)
                        .map_or_else(|| self.prettify(part), str::to_owned)
                })
                .collect::<Vec<_>>()
                .join(" → ");
        }
        self.prettify(expression)
    }

    /// Phrase for `object.${property}`.
    fn object_property(&self, object: &str, property: &str) -> String {
        if let Some(friendly) = self.friendly_variable(&format!("{object}.{property}")) {
            return friendly.to_owned();
        }

        let described = self.prettify(property);
        if let Some(template) = self
            .catalog
            .dynamic_pattern(object)
            .and_then(DynamicPattern::template)
        {
            return SLOT_RE
                .replace_all(template, NoExpand(&described))
                .into_owned();
        }
        if let Some(phrase) = builtin::object_phrase(object) {
            return phrase.replace("{}", &described);
        }

        let object_described = self
            .friendly_variable(object)
            .map_or_else(|| self.prettify(object), str::to_owned);
        format!("{object_described} → {described}")
    }

    /// Resolve a dotted variable path that has no `${...}`.
    pub(crate) fn complex_variable(&self, path: &str) -> String {
        if let Some(friendly) = self.friendly_variable(path) {
            return friendly.to_owned();
        }
        if path.contains("${") {
            return self.personalization(path);
        }
        self.dot_path(path)
    }

    /// Describe `a.b.c`. The longest prefix known to the catalog supplies the
    /// head; the remaining segments are appended as `→ Segment`.
    pub(crate) fn dot_path(&self, path: &str) -> String {
        let parts: Vec<&str> = path.split('.').collect();
        let (head, consumed) = (1..=parts.len())
            .rev()
            .find_map(|k| {
                self.friendly_variable(&parts[..k].join("."))
                    .map(|friendly| (friendly.to_owned(), k))
            })
            .unwrap_or_else(|| (self.prettify(parts[0]), 1));

        parts[consumed..]
            .iter()
            .filter(|part| !part.is_empty())
            .fold(head, |mut description, part| {
                description.push_str(" → ");
                description.push_str(&self.prettify(part));
                description
            })
    }
}

#[cfg(test)]
mod tests {
    use crate::transducer::tests::{empty_catalog, transducer};
    use lens_catalog::{DisplayMode, PatternCatalog};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn catalog() -> PatternCatalog {
        PatternCatalog::from_value(&json!({
            "variables": {
                "first_name": { "friendly": "First Name" },
                "user": { "friendly": "Customer" },
                "user.address": { "friendly": "Mailing address" },
                "custom_attribute.${tier}": { "friendly": "Loyalty tier" }
            },
            "dynamicPatterns": {
                "event_properties": { "friendly": "the {property} of the event" }
            },
            "commonVariableMappings": { "dob": "Date of birth" }
        }))
        .unwrap()
    }

    #[test]
    fn test_prettify_identifiers() {
        let catalog = empty_catalog();
        let t = transducer(&catalog, DisplayMode::Friendly);
        assert_eq!(t.prettify("firstName"), "First name");
        assert_eq!(t.prettify("user_id"), "User ID");
        assert_eq!(t.prettify("api_url"), "API URL");
        assert_eq!(t.prettify("address2"), "Address 2");
        assert_eq!(t.prettify("sms_opt_in"), "SMS opt in");
    }

    #[test]
    fn test_prettify_is_idempotent() {
        let catalog = empty_catalog();
        let t = transducer(&catalog, DisplayMode::Friendly);
        for input in ["firstName", "user_id", "ios_device", "Name", "already  spaced words"] {
            let once = t.prettify(input);
            assert_eq!(t.prettify(&once), once, "input: {input}");
        }
    }

    #[test]
    fn test_prettify_prefers_catalog() {
        let catalog = catalog();
        let t = transducer(&catalog, DisplayMode::Friendly);
        assert_eq!(t.prettify("first_name"), "First Name");
        assert_eq!(t.prettify("DOB"), "Date of birth");
    }

    #[test]
    fn test_prettify_technical_is_verbatim() {
        let catalog = catalog();
        let t = transducer(&catalog, DisplayMode::Technical);
        assert_eq!(t.prettify("first_name"), "first_name");
    }

    #[test]
    fn test_dot_path_longest_prefix() {
        let catalog = catalog();
        let t = transducer(&catalog, DisplayMode::Friendly);
        assert_eq!(t.dot_path("user.name"), "Customer → Name");
        assert_eq!(t.dot_path("user.address.zip_code"), "Mailing address → Zip code");
        assert_eq!(t.dot_path("order.total"), "Order → Total");
    }

    #[test]
    fn test_personalization_standalone() {
        let catalog = catalog();
        let t = transducer(&catalog, DisplayMode::Friendly);
        assert_eq!(t.personalization("${first_name}"), "First Name");
        assert_eq!(t.personalization("${'first_name'}"), "First Name");
        assert_eq!(t.personalization("${favoriteColor}"), "Favorite color");
    }

    #[test]
    fn test_personalization_object_property() {
        let catalog = catalog();
        let t = transducer(&catalog, DisplayMode::Friendly);
        assert_eq!(t.personalization("custom_attribute.${tier}"), "Loyalty tier");
        assert_eq!(
            t.personalization("event_properties.${plan}"),
            "the Plan of the event"
        );
        assert_eq!(
            t.personalization("most_recently_used_device.${model}"),
            "Model (from current device)"
        );
        assert_eq!(t.personalization("user.${nickname}"), "Customer → Nickname");
    }

    #[test]
    fn test_personalization_mixed_expression() {
        let catalog = empty_catalog();
        let t = transducer(&catalog, DisplayMode::Friendly);
        assert_eq!(t.personalization("Hi ${first_name}"), "Hi First name");
    }
}
