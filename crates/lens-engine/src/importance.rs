//! Visual importance tiers for classified patterns.

use std::fmt;

use serde::Serialize;

/// Importance tier used by renderers to weight highlights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    /// Control flow openers.
    Primary,
    /// Data operations.
    Secondary,
    /// Closing and branch tags.
    Tertiary,
    /// Variables and anything unclassified.
    Minor,
    /// Includes and comments.
    Utility,
}

impl Importance {
    /// Map a pattern name to its tier. Unknown or missing names are [`Importance::Minor`].
    #[must_use]
    pub fn for_pattern(pattern: Option<&str>) -> Self {
        match pattern {
            Some("forLoopComplex" | "forLoopSimple" | "ifStatement" | "unless" | "case") => {
                Self::Primary
            }
            Some("assignment" | "capture" | "catalogItems" | "customAttribute") => Self::Secondary,
            Some(
                "endif" | "endfor" | "endunless" | "endcase" | "endcapture" | "else" | "elseif"
                | "when",
            ) => Self::Tertiary,
            Some("include" | "render" | "comment" | "endcomment") => Self::Utility,
            _ => Self::Minor,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Secondary => "secondary",
            Self::Tertiary => "tertiary",
            Self::Minor => "minor",
            Self::Utility => "utility",
        }
    }
}

impl fmt::Display for Importance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}
