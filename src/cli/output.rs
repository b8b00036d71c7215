//! Terminal progress output.
//!
//! A bundle line is its label, a dimmed run of filler dots and a status tag,
//! sized so the tag ends exactly at the last terminal column.

use std::io::{self, IsTerminal, Write};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};
use unicode_width::UnicodeWidthStr;

/// Successful bundle tag
pub const DONE_TAG: &str = " DONE ";

/// Failed bundle tag
pub const FAIL_TAG: &str = " FAIL ";

/// Column count used when the terminal size is unknown
pub const DEFAULT_COLUMNS: usize = 80;

const FILLER: char = '.';

/// Current terminal width, or [`DEFAULT_COLUMNS`] when stdout is not a terminal.
pub fn terminal_columns() -> usize {
    // crossterm falls back to the controlling tty, which is wrong for piped output
    if !io::stdout().is_terminal() {
        return DEFAULT_COLUMNS;
    }
    match crossterm::terminal::size() {
        Ok((columns, _)) if columns > 0 => usize::from(columns),
        _ => DEFAULT_COLUMNS,
    }
}

/// Number of filler characters between `label` and a status tag.
///
/// Zero when the label and tag do not fit in `columns` together.
pub fn fill_width(label: &str, columns: usize) -> usize {
    let tag_width = DONE_TAG.width();
    columns
        .saturating_sub(tag_width)
        .saturating_sub(label.width())
}

/// `label` padded with filler so that appending a status tag fills `columns`.
pub fn fit_terminal(label: &str, columns: usize) -> String {
    let mut line = String::from(label);
    line.extend(std::iter::repeat_n(FILLER, fill_width(label, columns)));
    line
}

/// Colored stdout/stderr writer for release progress.
#[derive(Debug, Clone)]
pub struct OutputManager {
    color: ColorChoice,
    columns: usize,
}

impl OutputManager {
    /// Detects color support and terminal width from the current stdout.
    pub fn new() -> Self {
        let color = if io::stdout().is_terminal() {
            ColorChoice::Auto
        } else {
            ColorChoice::Never
        };
        Self::with_settings(color, terminal_columns())
    }

    /// Explicit color choice and width.
    pub fn with_settings(color: ColorChoice, columns: usize) -> Self {
        Self { color, columns }
    }

    /// Terminal width in use.
    pub fn columns(&self) -> usize {
        self.columns
    }

    fn stdout(&self) -> StandardStream {
        StandardStream::stdout(self.color)
    }

    fn stderr(&self) -> StandardStream {
        StandardStream::stderr(self.color)
    }

    /// Print an inverse section header on its own line.
    pub fn section(&self, title: &str) -> io::Result<()> {
        let mut out = self.stdout();
        write_section(&mut out, title)?;
        out.flush()
    }

    /// Print `label` and its filler without a newline, leaving the cursor for a tag.
    pub fn label(&self, label: &str) -> io::Result<()> {
        let mut out = self.stdout();
        write_label(&mut out, label, self.columns)?;
        out.flush()
    }

    /// Finish the current line with a green DONE tag.
    pub fn done(&self) -> io::Result<()> {
        let mut out = self.stdout();
        write_tag(&mut out, DONE_TAG, Color::Green)?;
        writeln!(out)?;
        out.flush()
    }

    /// Finish the current line with a red FAIL tag and a blank line.
    pub fn fail(&self) -> io::Result<()> {
        let mut out = self.stdout();
        write_tag(&mut out, FAIL_TAG, Color::Red)?;
        writeln!(out)?;
        writeln!(out)?;
        out.flush()
    }

    /// Print an error to stderr.
    ///
    /// Only the top-level message is printed; error messages already embed their cause.
    pub fn error(&self, error: &dyn std::fmt::Display) -> io::Result<()> {
        let mut err = self.stderr();
        err.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
        write!(err, "Error:")?;
        err.reset()?;
        writeln!(err, " {error}")?;
        err.flush()
    }
}

/// Black on white, the terminal's inverse look.
fn write_section<W: WriteColor>(out: &mut W, title: &str) -> io::Result<()> {
    out.set_color(
        ColorSpec::new()
            .set_fg(Some(Color::Black))
            .set_bg(Some(Color::White)),
    )?;
    write!(out, " {title} ")?;
    out.reset()?;
    writeln!(out)
}

fn write_label<W: WriteColor>(out: &mut W, label: &str, columns: usize) -> io::Result<()> {
    let line = fit_terminal(label, columns);
    let (text, filler) = line.split_at(label.len());
    write!(out, "{text}")?;
    if !filler.is_empty() {
        out.set_color(ColorSpec::new().set_dimmed(true))?;
        write!(out, "{filler}")?;
        out.reset()?;
    }
    Ok(())
}

/// Bold black text on a `color` background.
fn write_tag<W: WriteColor>(out: &mut W, tag: &str, color: Color) -> io::Result<()> {
    out.set_color(
        ColorSpec::new()
            .set_fg(Some(Color::Black))
            .set_bg(Some(color))
            .set_bold(true),
    )?;
    write!(out, "{tag}")?;
    out.reset()
}

impl Default for OutputManager {
    fn default() -> Self {
        Self::new()
    }
}
