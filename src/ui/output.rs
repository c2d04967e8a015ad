//! ui::output
//!
//! Output formatting and display.
//!
//! # Design
//!
//! Everything the tool prints goes through a [`Reporter`], which owns the
//! two output streams for the duration of one invocation:
//!
//! - stdout: echoed git commands (`-c`), echoed git output (`-o`), the
//!   summary of actions, help and version text
//! - stderr: `ERROR:` lines with the usage hint, output of a failed git
//!   command, and `[debug]` traces (`-d`)
//!
//! Echoes are written as things happen, so the two narration flags compose:
//! with both enabled each command line is immediately followed by its
//! output.

use std::fmt::Display;
use std::io::Write;

/// Printed after every error.
pub const USAGE_HINT: &str = "'git-rflow --help' for usage.";

/// Which kinds of intermediate narration are enabled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Narration {
    /// Echo each git command before it runs.
    pub print_commands: bool,
    /// Echo each git command's output after it runs.
    pub print_output: bool,
    /// Write `[debug]` traces to stderr.
    pub debug: bool,
}

impl Narration {
    /// Create narration settings from flags.
    pub fn from_flags(print_commands: bool, print_output: bool, debug: bool) -> Self {
        Self {
            print_commands,
            print_output,
            debug,
        }
    }
}

/// The human-readable report of a completed workflow action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    /// First line, e.g. `Switched to a new branch 'feature1'`.
    pub confirmation: String,
    /// One bullet per notable effect.
    pub actions: Vec<String>,
    /// What to do next.
    pub guidance: String,
}

impl Summary {
    /// Render the summary block, newline-terminated.
    ///
    /// # Example
    ///
    /// ```
    /// use git_rflow::ui::output::Summary;
    ///
    /// let summary = Summary {
    ///     confirmation: "Done".into(),
    ///     actions: vec!["One thing happened".into()],
    ///     guidance: "Carry on.".into(),
    /// };
    /// assert_eq!(
    ///     summary.render(),
    ///     "Done\n\nSummary of actions:\n- One thing happened\n\nCarry on.\n"
    /// );
    /// ```
    pub fn render(&self) -> String {
        let actions = format_list(&self.actions, "- ");
        format!(
            "{}\n\nSummary of actions:\n{}\n\n{}\n",
            self.confirmation, actions, self.guidance
        )
    }
}

/// Writes narration, summaries and errors for one invocation.
pub struct Reporter<'a> {
    out: &'a mut dyn Write,
    err: &'a mut dyn Write,
    narration: Narration,
}

impl<'a> Reporter<'a> {
    /// Create a reporter with all narration disabled.
    pub fn new(out: &'a mut dyn Write, err: &'a mut dyn Write) -> Self {
        Self {
            out,
            err,
            narration: Narration::default(),
        }
    }

    /// Replace the narration settings.
    pub fn set_narration(&mut self, narration: Narration) {
        self.narration = narration;
    }

    pub fn narration(&self) -> Narration {
        self.narration
    }

    /// Echo a git command that is about to run (`-c`).
    pub fn command(&mut self, command: impl Display) {
        if self.narration.print_commands {
            self.emit_line(command);
        }
    }

    /// Echo a git command's raw output (`-o`).
    pub fn output(&mut self, text: &str) {
        if self.narration.print_output {
            write_raw(self.out, text);
        }
    }

    /// Surface the output of a failed git command on stderr.
    pub fn tool_output(&mut self, text: &str) {
        write_raw(self.err, text);
    }

    /// Print the summary of a completed action.
    pub fn summary(&mut self, summary: &Summary) {
        write_raw(self.out, &summary.render());
    }

    /// Print plain text (help, version) on stdout.
    pub fn text(&mut self, text: &str) {
        write_raw(self.out, text);
    }

    /// Print an error followed by the usage hint.
    pub fn error(&mut self, error: impl Display) {
        let _ = writeln!(self.err, "ERROR: {}", error);
        let _ = writeln!(self.err, "{}", USAGE_HINT);
    }

    /// Print a debug trace (only with `-d`).
    pub fn debug(&mut self, message: impl Display) {
        if self.narration.debug {
            let _ = writeln!(self.err, "[debug] {}", message);
        }
    }

    /// Flush both streams.
    pub fn flush(&mut self) {
        let _ = self.out.flush();
        let _ = self.err.flush();
    }

    fn emit_line(&mut self, line: impl Display) {
        // A closed stdout is not a workflow failure.
        let _ = writeln!(self.out, "{}", line);
    }
}

/// Write `text` verbatim, adding a trailing newline if it lacks one.
/// Empty text writes nothing.
fn write_raw(stream: &mut dyn Write, text: &str) {
    if text.is_empty() {
        return;
    }
    let _ = stream.write_all(text.as_bytes());
    if !text.ends_with('\n') {
        let _ = stream.write_all(b"\n");
    }
}

/// Format a list of items.
pub fn format_list<T: Display>(items: &[T], prefix: &str) -> String {
    items
        .iter()
        .map(|item| format!("{}{}", prefix, item))
        .collect::<Vec<_>>()
        .join("\n")
}
