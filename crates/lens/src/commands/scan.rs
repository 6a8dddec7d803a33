//! `lens scan` command implementation.

use clap::Args;
use lens_catalog::{DisplayMode, DisplayModeInfo};
use lens_engine::{FragmentResult, Importance, tooltip};
use rayon::prelude::*;
use serde::Serialize;
use serde_json::Value;

use super::{Input, SourceArgs};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the scan command.
#[derive(Args)]
pub(crate) struct ScanArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Print a JSON report (mode, styling and per-file fragments) instead of a table.
    #[arg(long)]
    json: bool,

    /// Show tooltip text under each fragment.
    #[arg(long)]
    tooltips: bool,

    /// Hide tooltip text.
    #[arg(long, conflicts_with = "tooltips")]
    no_tooltips: bool,
}

/// JSON report handed to renderers.
#[derive(Serialize)]
struct ScanReport<'a> {
    mode: DisplayMode,
    /// Catalog styling for `mode`, passed through untouched.
    styling: Option<&'a Value>,
    files: Vec<FileReport<'a>>,
}

#[derive(Serialize)]
struct FileReport<'a> {
    file: &'a str,
    fragments: Vec<FragmentReport<'a>>,
}

#[derive(Serialize)]
struct FragmentReport<'a> {
    #[serde(flatten)]
    fragment: &'a FragmentResult,
    importance: Importance,
    #[serde(skip_serializing_if = "Option::is_none")]
    tooltip: Option<String>,
}

impl<'a> ScanReport<'a> {
    fn new(
        mode: DisplayMode,
        info: &DisplayModeInfo,
        styling: Option<&'a Value>,
        inputs: &'a [Input],
        results: &'a [Vec<FragmentResult>],
    ) -> Self {
        let files = inputs
            .iter()
            .zip(results)
            .map(|(input, fragments)| FileReport {
                file: &input.name,
                fragments: fragments
                    .iter()
                    .map(|fragment| FragmentReport {
                        fragment,
                        importance: fragment.importance(),
                        tooltip: tooltip(fragment, info),
                    })
                    .collect(),
            })
            .collect();
        Self {
            mode,
            styling,
            files,
        }
    }
}

impl ScanArgs {
    /// Execute the scan command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration, the catalog or an input file cannot be loaded.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let session = self.source.open(self.resolve_tooltips())?;

        let results: Vec<Vec<FragmentResult>> = session
            .inputs
            .par_iter()
            .map(|input| session.matcher.find_fragments(&input.text))
            .collect();

        let mode = session.matcher.display_mode();
        let catalog = session.matcher.catalog();
        let catalog_info = catalog.display_mode_info(mode);
        let info = DisplayModeInfo {
            show_tooltips: session
                .config
                .display
                .tooltips
                .unwrap_or(catalog_info.show_tooltips),
            ..catalog_info
        };

        if self.json {
            let styling = catalog.styling(mode);
            let report = ScanReport::new(mode, &info, styling, &session.inputs, &results);
            output.print(&serde_json::to_string_pretty(&report)?);
            return Ok(());
        }

        for (input, fragments) in session.inputs.iter().zip(&results) {
            output.highlight(&format!("{} ({} fragments)", input.name, fragments.len()));
            for fragment in fragments {
                output.print(&format_row(fragment));
                if let Some(text) = tooltip(fragment, &info) {
                    for line in text.lines() {
                        output.print(&output.dimmed(&format!("    {line}")));
                    }
                }
            }
        }
        Ok(())
    }

    /// Resolve the tooltip override from --tooltips/--no-tooltips flags.
    fn resolve_tooltips(&self) -> Option<bool> {
        self.no_tooltips
            .then_some(false)
            .or(self.tooltips.then_some(true))
    }
}

fn format_row(fragment: &FragmentResult) -> String {
    format!(
        "{:>6}..{:<6} {:<6} {:<16} {:<9} {}",
        fragment.start,
        fragment.end,
        fragment.kind,
        fragment.pattern.as_deref().unwrap_or("-"),
        fragment.importance(),
        fragment.clean
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use lens_catalog::PatternCatalog;
    use lens_engine::FragmentKind;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_format_row() {
        let fragment = FragmentResult {
            start: 3,
            end: 14,
            original: "{% endif %}".to_owned(),
            clean: "End condition".to_owned(),
            kind: FragmentKind::Tag,
            pattern: Some("endif".to_owned()),
        };
        assert_eq!(
            format_row(&fragment),
            "     3..14     tag    endif            tertiary  End condition"
        );
    }

    fn input(name: &str) -> Input {
        Input {
            name: name.to_owned(),
            text: String::new(),
        }
    }

    fn endif() -> FragmentResult {
        FragmentResult {
            start: 0,
            end: 11,
            original: "{% endif %}".to_owned(),
            clean: "End condition".to_owned(),
            kind: FragmentKind::Tag,
            pattern: Some("endif".to_owned()),
        }
    }

    #[test]
    fn test_report_json_shape() {
        let inputs = [input("a.liquid")];
        let results = [vec![endif()]];
        let styling = json!({ "tertiary": { "color": "red" } });
        let info = DisplayModeInfo::builtin(DisplayMode::Friendly);

        let report =
            ScanReport::new(DisplayMode::Friendly, &info, Some(&styling), &inputs, &results);
        assert_eq!(
            serde_json::to_value(&report).unwrap(),
            json!({
                "mode": "friendly",
                "styling": { "tertiary": { "color": "red" } },
                "files": [{
                    "file": "a.liquid",
                    "fragments": [{
                        "start": 0,
                        "end": 11,
                        "original": "{% endif %}",
                        "clean": "End condition",
                        "type": "tag",
                        "pattern": "endif",
                        "importance": "tertiary",
                        "tooltip": "Original: {% endif %} [endif]\nImportance: tertiary"
                    }]
                }]
            })
        );
    }

    #[test]
    fn test_report_omits_hidden_tooltips() {
        let inputs = [input("a.liquid")];
        let results = [vec![endif()]];
        let info = DisplayModeInfo::builtin(DisplayMode::Technical);

        let report = ScanReport::new(DisplayMode::Technical, &info, None, &inputs, &results);
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["mode"], json!("technical"));
        assert_eq!(value["styling"], Value::Null);
        assert!(value["files"][0]["fragments"][0].get("tooltip").is_none());
    }

    #[test]
    fn test_report_carries_bundled_styling() {
        let catalog = PatternCatalog::builtin();
        let inputs = [input("a.liquid")];
        let results = [Vec::new()];
        let info = catalog.display_mode_info(DisplayMode::Friendly);

        let report = ScanReport::new(
            DisplayMode::Friendly,
            &info,
            catalog.styling(DisplayMode::Friendly),
            &inputs,
            &results,
        );
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["styling"]["primary"]["color"], json!("#b45309"));
        assert_eq!(value["files"][0]["fragments"], json!([]));
    }
}
