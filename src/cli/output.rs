//! Color-coded terminal output.
//!
//! One line per pipeline stage, colored by severity, so an operator can
//! see which stage failed without inspecting logs. Progress and success go
//! to stdout; warnings and errors go to stderr.

use std::io::Write;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Colored status-line writer for pipeline stages.
#[derive(Clone, Debug)]
pub struct OutputManager {
    verbose: bool,
    quiet: bool,
}

impl OutputManager {
    /// Creates an output manager.
    ///
    /// `verbose` enables extra detail lines; `quiet` suppresses everything
    /// except errors.
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self { verbose, quiet }
    }

    /// Informational stage line (blue `==>` prefix).
    pub fn progress(&self, message: &str) -> std::io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let mut out = StandardStream::stdout(ColorChoice::Auto);
        write_colored(&mut out, Color::Blue, "==>", message)
    }

    /// Success line (green check prefix).
    pub fn success(&self, message: &str) -> std::io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let mut out = StandardStream::stdout(ColorChoice::Auto);
        write_colored(&mut out, Color::Green, "✓", message)
    }

    /// Warning line on stderr (yellow prefix).
    pub fn warn(&self, message: &str) -> std::io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let mut err = StandardStream::stderr(ColorChoice::Auto);
        write_colored(&mut err, Color::Yellow, "warning:", message)
    }

    /// Error line on stderr (red prefix). Never suppressed.
    pub fn error(&self, message: &str) -> std::io::Result<()> {
        let mut err = StandardStream::stderr(ColorChoice::Auto);
        write_colored(&mut err, Color::Red, "error:", message)
    }

    /// Detail line, shown only in verbose mode.
    #[allow(dead_code)] // Public API - preserved for external consumers
    pub fn verbose(&self, message: &str) -> std::io::Result<()> {
        if !self.verbose || self.quiet {
            return Ok(());
        }
        let mut out = StandardStream::stdout(ColorChoice::Auto);
        writeln!(out, "    {message}")
    }
}

fn write_colored(
    stream: &mut StandardStream,
    color: Color,
    prefix: &str,
    message: &str,
) -> std::io::Result<()> {
    stream.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
    write!(stream, "{prefix}")?;
    stream.reset()?;
    writeln!(stream, " {message}")
}
