//! Operator humanization for conditional expressions.

use lens_catalog::PatternCatalog;
use regex::{NoExpand, Regex};

use crate::text::normalize_whitespace;

/// Compiled operator replacements, longest operator first.
#[derive(Debug, Clone, Default)]
pub(crate) struct OperatorTable {
    rules: Vec<(Regex, String)>,
}

impl OperatorTable {
    /// Compile the catalog's operators. Word operators match on word
    /// boundaries, case-insensitively; symbol operators absorb surrounding
    /// whitespace.
    pub(crate) fn compile(catalog: &PatternCatalog) -> Self {
        let rules = catalog
            .operators()
            .iter()
            .filter_map(|op| {
                let escaped = regex::escape(&op.symbol);
                let pattern = if op.is_word() {
                    format!(r"(?i)\b{escaped}\b")
                } else {
                    format!(r"\s*{escaped}\s*")
                };
                match Regex::new(&pattern) {
                    Ok(re) => Some((re, format!(" {} ", op.friendly))),
                    Err(e) => {
                        tracing::warn!(operator = %op.symbol, error = %e, "Skipping operator");
                        None
                    }
                }
            })
            .collect();
        Self { rules }
    }

    /// Replace each operator in `expression` with its friendly phrase.
    pub(crate) fn humanize(&self, expression: &str) -> String {
        let mut result = expression.trim().to_owned();
        for (re, replacement) in &self.rules {
            if re.is_match(&result) {
                result = re.replace_all(&result, NoExpand(replacement)).into_owned();
            }
        }
        normalize_whitespace(&result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn table(operators: serde_json::Value) -> OperatorTable {
        let catalog = PatternCatalog::from_value(&json!({ "operators": operators })).unwrap();
        OperatorTable::compile(&catalog)
    }

    #[test]
    fn test_longest_symbol_first() {
        let ops = table(json!({ ">": "is more than", ">=": "is at least" }));
        assert_eq!(ops.humanize("age >= 21"), "age is at least 21");
        assert_eq!(ops.humanize("age>21"), "age is more than 21");
    }

    #[test]
    fn test_word_operators_use_word_boundaries() {
        let ops = table(json!({ "or": "or else", "contains": "includes" }));
        assert_eq!(ops.humanize("tags CONTAINS 'vip'"), "tags includes 'vip'");
        assert_eq!(ops.humanize("order_count or color"), "order_count or else color");
    }

    #[test]
    fn test_no_operators_normalizes_only() {
        let ops = table(json!({}));
        assert_eq!(ops.humanize("  a   ==  b "), "a == b");
    }
}
