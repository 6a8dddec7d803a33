//! `lens render` command implementation.

use clap::Args;
use lens_engine::{FragmentResult, Segment, compose_segments};
use rayon::prelude::*;

use super::SourceArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Disable importance colors.
    #[arg(long)]
    plain: bool,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration, the catalog or an input file cannot be loaded.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let session = self.source.open(None)?;

        let results: Vec<Vec<FragmentResult>> = session
            .inputs
            .par_iter()
            .map(|input| session.matcher.find_fragments(&input.text))
            .collect();

        let show_names = session.inputs.len() > 1;
        for (input, fragments) in session.inputs.iter().zip(&results) {
            if show_names {
                output.highlight(&input.name);
            }
            output.print_raw(&render(&output, &input.text, fragments, self.plain));
        }
        Ok(())
    }
}

fn render(output: &Output, text: &str, fragments: &[FragmentResult], plain: bool) -> String {
    let mut rendered = String::with_capacity(text.len());
    for segment in compose_segments(text, fragments) {
        match segment {
            Segment::Text(s) => rendered.push_str(s),
            Segment::Fragment(f) if plain => rendered.push_str(&f.clean),
            Segment::Fragment(f) => rendered.push_str(&output.fragment(&f.clean, f.importance())),
            Segment::Spacer => rendered.push(' '),
        }
    }
    rendered
}
