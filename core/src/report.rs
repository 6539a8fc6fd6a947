//! User-facing status lines.
//!
//! A [`Reporter`] receives exactly one [`StatusLine`] per command. The
//! [`ConsoleReporter`] writes success and no-op lines to stdout and failures
//! to stderr, colored by [`Tone`].

use std::io::{self, IsTerminal, Write};

use colored::{ColoredString, Colorize};

/// Visual category of a status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// Bright green.
    Success,
    /// Bright yellow; the command had nothing to do.
    Neutral,
    /// Bright red.
    Failure,
}

impl Tone {
    pub fn paint(self, text: &str) -> ColoredString {
        match self {
            Self::Success => text.bright_green(),
            Self::Neutral => text.bright_yellow(),
            Self::Failure => text.bright_red(),
        }
    }
}

/// One line of user-facing output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub tone: Tone,
    pub text: String,
}

impl StatusLine {
    pub fn new(tone: Tone, text: impl Into<String>) -> Self {
        Self {
            tone,
            text: text.into(),
        }
    }
}

/// Sink for status lines.
pub trait Reporter {
    fn report(&mut self, line: &StatusLine) -> io::Result<()>;
}

/// Collects lines in memory.
impl Reporter for Vec<StatusLine> {
    fn report(&mut self, line: &StatusLine) -> io::Result<()> {
        self.push(line.clone());
        Ok(())
    }
}

/// Writes status lines to a pair of output streams.
///
/// # Examples
///
/// ```
/// use spg_core::{ConsoleReporter, Reporter, StatusLine, Tone};
///
/// let mut reporter = ConsoleReporter::new(Vec::new(), Vec::new()).with_color(false);
/// reporter.report(&StatusLine::new(Tone::Failure, "boom")).unwrap();
/// let (out, err) = reporter.into_inner();
/// assert!(out.is_empty());
/// assert_eq!(err, b"boom\n");
/// ```
pub struct ConsoleReporter<O, E> {
    out: O,
    err: E,
    out_color: bool,
    err_color: bool,
}

impl ConsoleReporter<io::Stdout, io::Stderr> {
    /// Reporter bound to the process stdout and stderr.
    ///
    /// Each stream is colored only when it is a terminal. `colored` still
    /// decides globally, so `NO_COLOR` and `CLICOLOR_FORCE` apply on top.
    pub fn stdio() -> Self {
        let out_color = io::stdout().is_terminal();
        let err_color = io::stderr().is_terminal();
        Self::new(io::stdout(), io::stderr()).with_stream_colors(out_color, err_color)
    }
}

impl<O: Write, E: Write> ConsoleReporter<O, E> {
    pub fn new(out: O, err: E) -> Self {
        Self {
            out,
            err,
            out_color: true,
            err_color: true,
        }
    }

    /// Enables or disables coloring on both streams.
    pub fn with_color(self, color: bool) -> Self {
        self.with_stream_colors(color, color)
    }

    pub fn with_stream_colors(mut self, out_color: bool, err_color: bool) -> Self {
        self.out_color = out_color;
        self.err_color = err_color;
        self
    }

    pub fn into_inner(self) -> (O, E) {
        (self.out, self.err)
    }
}

impl<O: Write, E: Write> Reporter for ConsoleReporter<O, E> {
    fn report(&mut self, line: &StatusLine) -> io::Result<()> {
        let (stream, color): (&mut dyn Write, bool) = match line.tone {
            Tone::Success | Tone::Neutral => (&mut self.out, self.out_color),
            Tone::Failure => (&mut self.err, self.err_color),
        };
        if color {
            writeln!(stream, "{}", line.tone.paint(&line.text))?;
        } else {
            writeln!(stream, "{}", line.text)?;
        }
        stream.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain() -> ConsoleReporter<Vec<u8>, Vec<u8>> {
        ConsoleReporter::new(Vec::new(), Vec::new()).with_color(false)
    }

    #[test]
    fn test_success_and_neutral_go_to_stdout() {
        let mut reporter = plain();
        reporter
            .report(&StatusLine::new(Tone::Success, "committed"))
            .unwrap();
        reporter
            .report(&StatusLine::new(Tone::Neutral, "no diff"))
            .unwrap();
        let (out, err) = reporter.into_inner();
        assert_eq!(String::from_utf8(out).unwrap(), "committed\nno diff\n");
        assert!(err.is_empty());
    }

    #[test]
    fn test_failure_goes_to_stderr() {
        let mut reporter = plain();
        reporter
            .report(&StatusLine::new(Tone::Failure, "ERROR: File x not exists."))
            .unwrap();
        let (out, err) = reporter.into_inner();
        assert!(out.is_empty());
        assert_eq!(String::from_utf8(err).unwrap(), "ERROR: File x not exists.\n");
    }

    #[test]
    fn test_colored_output_still_contains_text() {
        let mut reporter = ConsoleReporter::new(Vec::new(), Vec::new());
        reporter
            .report(&StatusLine::new(Tone::Success, "committed"))
            .unwrap();
        let (out, _) = reporter.into_inner();
        assert!(String::from_utf8(out).unwrap().contains("committed"));
    }

    // The only test that touches the global `colored` override.
    #[test]
    fn test_tone_colors_and_per_stream_switch() {
        colored::control::set_override(true);

        let mut reporter = ConsoleReporter::new(Vec::new(), Vec::new());
        reporter.report(&StatusLine::new(Tone::Success, "committed")).unwrap();
        reporter.report(&StatusLine::new(Tone::Neutral, "no diff")).unwrap();
        reporter.report(&StatusLine::new(Tone::Failure, "failed")).unwrap();
        let (out, err) = reporter.into_inner();
        let out = String::from_utf8(out).unwrap();
        let err = String::from_utf8(err).unwrap();
        assert!(out.contains("\x1b[92mcommitted"), "{out:?}");
        assert!(out.contains("\x1b[93mno diff"), "{out:?}");
        assert!(err.contains("\x1b[91mfailed"), "{err:?}");

        let mut reporter =
            ConsoleReporter::new(Vec::new(), Vec::new()).with_stream_colors(true, false);
        reporter.report(&StatusLine::new(Tone::Success, "committed")).unwrap();
        reporter.report(&StatusLine::new(Tone::Failure, "failed")).unwrap();
        let (out, err) = reporter.into_inner();

        colored::control::unset_override();

        assert!(String::from_utf8(out).unwrap().contains("\x1b[92m"));
        assert_eq!(String::from_utf8(err).unwrap(), "failed\n");
    }

    #[test]
    fn test_vec_reporter_records_lines() {
        let mut lines: Vec<StatusLine> = Vec::new();
        lines.report(&StatusLine::new(Tone::Neutral, "x")).unwrap();
        assert_eq!(lines, vec![StatusLine::new(Tone::Neutral, "x")]);
    }
}
