//! Fragment result types.

use std::fmt;

use serde::Serialize;

use crate::importance::Importance;

/// Syntax a fragment was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FragmentKind {
    /// `{{ ... }}` expression.
    Output,
    /// `{% ... %}` statement.
    Tag,
}

impl fmt::Display for FragmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::Output => "output",
            Self::Tag => "tag",
        })
    }
}

/// A located and rewritten fragment.
///
/// `start` and `end` are byte offsets into the scanned text, end exclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FragmentResult {
    pub start: usize,
    pub end: usize,
    /// Fragment text including delimiters.
    pub original: String,
    /// Rewritten text for the active display mode.
    pub clean: String,
    #[serde(rename = "type")]
    pub kind: FragmentKind,
    /// Classified pattern name, if any.
    pub pattern: Option<String>,
}

impl FragmentResult {
    /// Length of the span in bytes.
    #[must_use]
    pub fn span_len(&self) -> usize {
        self.end - self.start
    }

    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && self.end > other.start
    }

    #[must_use]
    pub fn importance(&self) -> Importance {
        Importance::for_pattern(self.pattern.as_deref())
    }
}
