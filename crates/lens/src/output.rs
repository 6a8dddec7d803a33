//! Colored terminal output utilities.

use console::{Style, Term};
use lens_engine::Importance;

/// Terminal output formatter.
///
/// Results go to stdout; status messages go to stderr.
pub(crate) struct Output {
    out: Term,
    err: Term,
    green: Style,
    yellow: Style,
    red: Style,
    cyan_bold: Style,
    dim: Style,
}

impl Output {
    /// Create a new output formatter.
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            out: Term::stdout(),
            err: Term::stderr(),
            green: Style::new().green(),
            yellow: Style::new().yellow(),
            red: Style::new().red(),
            cyan_bold: Style::new().cyan().bold(),
            dim: Style::new().dim(),
        }
    }

    /// Print a result line to stdout.
    pub(crate) fn print(&self, msg: &str) {
        let _ = self.out.write_line(msg);
    }

    /// Print result text to stdout without a trailing newline.
    pub(crate) fn print_raw(&self, text: &str) {
        let _ = self.out.write_str(text);
    }

    /// Print an info message.
    pub(crate) fn info(&self, msg: &str) {
        let _ = self.err.write_line(msg);
    }

    /// Print a success message (green).
    pub(crate) fn success(&self, msg: &str) {
        let _ = self.err.write_line(&self.green.apply_to(msg).to_string());
    }

    /// Print a warning message (yellow).
    pub(crate) fn warning(&self, msg: &str) {
        let _ = self.err.write_line(&self.yellow.apply_to(msg).to_string());
    }

    /// Print an error message (red).
    pub(crate) fn error(&self, msg: &str) {
        let _ = self.err.write_line(&self.red.apply_to(msg).to_string());
    }

    /// Print a highlighted message (cyan bold).
    pub(crate) fn highlight(&self, msg: &str) {
        let _ = self.err.write_line(&self.cyan_bold.apply_to(msg).to_string());
    }

    /// Dimmed text for secondary details.
    pub(crate) fn dimmed(&self, text: &str) -> String {
        self.dim.apply_to(text).to_string()
    }

    /// Rewrite text styled by importance tier.
    pub(crate) fn fragment(&self, text: &str, importance: Importance) -> String {
        let style = match importance {
            Importance::Primary => Style::new().magenta().bold(),
            Importance::Secondary => Style::new().blue(),
            Importance::Tertiary => Style::new().cyan().dim(),
            Importance::Minor => Style::new().green(),
            Importance::Utility => Style::new().yellow().italic(),
        };
        style.apply_to(text).to_string()
    }
}
