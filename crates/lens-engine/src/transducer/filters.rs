//! Filter pipeline descriptions.

use lens_catalog::builtin;

use super::Transducer;
use crate::text::fill_placeholder;

/// Split filter arguments on commas outside quotes. Quotes are kept.
pub(crate) fn parse_filter_arguments(args: &str) -> Vec<String> {
    let mut parsed = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;

    for c in args.chars() {
        match (quote, c) {
            (None, '"' | '\'') => {
                quote = Some(c);
                current.push(c);
            }
            (Some(q), c) if c == q => {
                quote = None;
                current.push(c);
            }
            (None, ',') => {
                let arg = current.trim();
                if !arg.is_empty() {
                    parsed.push(arg.to_owned());
                }
                current.clear();
            }
            _ => current.push(c),
        }
    }

    let arg = current.trim();
    if !arg.is_empty() {
        parsed.push(arg.to_owned());
    }
    parsed
}

impl Transducer<'_> {
    /// Describe one `name[: args]` filter segment.
    pub(crate) fn filter(&self, segment: &str) -> String {
        let (name, args) = match segment.split_once(':') {
            Some((name, rest)) => (name.trim(), parse_filter_arguments(rest.trim())),
            None => (segment.trim(), Vec::new()),
        };

        if self.mode.is_technical() {
            return if args.is_empty() {
                name.to_owned()
            } else {
                format!("{name}: {}", args.join(", "))
            };
        }

        if let Some(template) = self
            .catalog
            .filter(name)
            .and_then(|f| f.friendly.as_deref())
            .filter(|t| !t.is_empty())
        {
            match args.first() {
                Some(first) => return template.replace("{value}", first),
                // A `{value}` template with nothing to put in it reads worse than the defaults.
                None if !template.contains("{value}") => return template.to_owned(),
                None => {}
            }
        }

        if let Some(description) = builtin::filter_description(name) {
            match description.with_args {
                Some(with_args) if !args.is_empty() => {
                    return args
                        .iter()
                        .enumerate()
                        .fold(with_args.to_owned(), |acc, (i, arg)| {
                            fill_placeholder(&acc, &i.to_string(), arg)
                        });
                }
                _ => {}
            }
            if let Some(without_args) = description.without_args {
                return without_args.to_owned();
            }
        }

        if args.is_empty() {
            name.to_owned()
        } else {
            format!("{name} {}", args.join(" "))
        }
    }

    /// Describe a list of filter segments, dropping empty ones.
    pub(crate) fn filters<'s>(&self, segments: impl IntoIterator<Item = &'s str>) -> Vec<String> {
        segments
            .into_iter()
            .filter(|s| !s.trim().is_empty())
            .map(|s| self.filter(s))
            .collect()
    }
}
