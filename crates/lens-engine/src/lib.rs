//! Liquid fragment humanizer engine.
//!
//! Finds `{{ ... }}` outputs and `{% ... %}` tags in text, names the
//! pattern each one follows, and rewrites it as prose ("friendly" mode) or
//! near-verbatim syntax ("technical" mode).
//!
//! One pass runs four stages:
//!
//! 1. [`scan`] collects every output and tag candidate, overlaps included.
//! 2. Each candidate's inner content is rewritten against the catalog.
//!    Empty rewrites are dropped.
//! 3. Each candidate is classified against the catalog's patterns and the
//!    built-in keyword tables.
//! 4. [`resolve_overlaps`] keeps a non-overlapping subset; tags win over
//!    outputs nested in them.
//!
//! [`LiquidMatcher`] runs the pass. [`compose_segments`] and [`tooltip`]
//! shape its result for renderers.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use lens_catalog::{DisplayMode, PatternCatalog};
//! use lens_engine::{LiquidMatcher, render_plain};
//!
//! let catalog = PatternCatalog::from_json_str(
//!     r#"{ "variables": { "first_name": { "friendly": "First Name" } } }"#,
//! ).unwrap();
//! let matcher = LiquidMatcher::new(Arc::new(catalog), DisplayMode::Friendly);
//!
//! let text = "Hello {{first_name}}!";
//! let fragments = matcher.find_fragments(text);
//! assert_eq!(fragments[0].clean, "First Name");
//! assert_eq!(render_plain(text, &fragments), "Hello First Name!");
//! ```

mod classifier;
mod fragment;
mod importance;
mod matcher;
mod resolver;
mod scanner;
mod segments;
mod text;
mod transducer;

pub use classifier::{VARIABLE_PATTERN, classify};
pub use fragment::{FragmentKind, FragmentResult};
pub use importance::Importance;
pub use matcher::LiquidMatcher;
pub use resolver::resolve_overlaps;
pub use scanner::{RawFragment, scan};
pub use segments::{Segment, compose_segments, render_plain, tooltip};
