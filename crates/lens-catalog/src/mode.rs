//! Display modes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Rendering style for rewritten fragments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// Natural-language prose.
    #[default]
    Friendly,
    /// Near-verbatim template syntax.
    Technical,
}

impl DisplayMode {
    /// Catalog key for this mode.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Friendly => "friendly",
            Self::Technical => "technical",
        }
    }

    #[must_use]
    pub fn is_technical(self) -> bool {
        self == Self::Technical
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Error returned when parsing an unknown display mode name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown display mode `{0}` (expected `friendly` or `technical`)")]
pub struct ParseDisplayModeError(String);

impl FromStr for DisplayMode {
    type Err = ParseDisplayModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "friendly" => Ok(Self::Friendly),
            "technical" => Ok(Self::Technical),
            _ => Err(ParseDisplayModeError(s.to_owned())),
        }
    }
}

/// Per-mode presentation flags from the catalog's `displayModes` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DisplayModeInfo {
    /// Human-readable mode name.
    pub name: String,
    /// Whether the rendering layer shows raw syntax alongside prose.
    pub show_technical: bool,
    /// Whether the rendering layer attaches "original syntax" tooltips.
    pub show_tooltips: bool,
}

impl Default for DisplayModeInfo {
    fn default() -> Self {
        Self::builtin(DisplayMode::Friendly)
    }
}

impl DisplayModeInfo {
    /// Built-in flags used when the catalog has no entry for `mode`.
    #[must_use]
    pub fn builtin(mode: DisplayMode) -> Self {
        match mode {
            DisplayMode::Friendly => Self {
                name: "Friendly".to_owned(),
                show_technical: false,
                show_tooltips: true,
            },
            DisplayMode::Technical => Self {
                name: "Technical".to_owned(),
                show_technical: true,
                show_tooltips: false,
            },
        }
    }
}
