//! Columnar rendering of annotated diffs.
//!
//! Rendering is two-pass: column widths are measured over every file of the
//! run first, so all hunks share one alignment.

use super::types::{AnnotatedLine, HunkLine, LineKind};
use crate::diff::DiffFile;
use crate::error::{DifflameError, Result};
use std::io::Write;

const BOLD: &str = "\x1b[1m";
const CYAN: &str = "\x1b[36m";
const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const DIM: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z";
const DATE_WIDTH: usize = 25;

/// Display switches for [`render`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub color: bool,
    pub show_name: bool,
    pub show_mail: bool,
    pub show_date: bool,
    pub hints: bool,
    /// Abbreviated commit id length.
    pub abbrev: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            color: false,
            show_name: true,
            show_mail: false,
            show_date: true,
            hints: true,
            abbrev: 8,
        }
    }
}

/// Column widths shared by every row of one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColumnWidths {
    pub name: usize,
    pub mail: usize,
    pub original_line: usize,
    pub final_line: usize,
    /// Set only when some line is attributed under a path other than its
    /// file's display name (renames, copies).
    pub filename: Option<usize>,
}

impl ColumnWidths {
    pub fn measure(files: &[DiffFile]) -> Self {
        let mut widths = Self::default();
        let mut filename_width = 0;
        let mut foreign_path = false;

        for file in files {
            for hunk in &file.hunks {
                for line in hunk.annotated() {
                    let AnnotatedLine::Line(line) = line else {
                        continue;
                    };
                    let author = &line.revision.author;
                    widths.name = widths.name.max(author.name.chars().count());
                    widths.mail = widths.mail.max(author.mail.chars().count() + 2);
                    widths.original_line =
                        widths.original_line.max(digits(line.original_line));
                    widths.final_line = widths.final_line.max(digits(line.final_line));
                    filename_width = filename_width.max(line.filename.chars().count());
                    foreign_path |= line.filename != file.display_name();
                }
            }
        }

        if foreign_path {
            widths.filename = Some(filename_width);
        }
        widths
    }
}

fn digits(line: Option<u32>) -> usize {
    line.map_or(0, |n| n.to_string().len())
}

/// Write every file's preamble, hunk headers and annotated rows.
pub fn render<W: Write>(files: &[DiffFile], options: &RenderOptions, out: &mut W) -> Result<()> {
    let widths = ColumnWidths::measure(files);
    let mut renderer = Renderer {
        options,
        widths,
        out,
    };

    for file in files {
        for line in &file.preamble {
            renderer.paint(BOLD, line)?;
        }
        for hunk in &file.hunks {
            renderer.paint(CYAN, &hunk.header)?;
            // Hint suppression never carries across hunks.
            let mut last_hinted: Option<&str> = None;
            for line in hunk.annotated() {
                match line {
                    AnnotatedLine::Marker(text) => renderer.plain(text)?,
                    AnnotatedLine::Line(line) => {
                        if line.kind == LineKind::Context {
                            last_hinted = None;
                        } else if options.hints && last_hinted != Some(line.revision.id.as_str()) {
                            renderer.hint(line)?;
                            last_hinted = Some(line.revision.id.as_str());
                        }
                        renderer.row(line)?;
                    }
                }
            }
        }
    }

    renderer.out.flush().map_err(write_error)
}

struct Renderer<'a, W: Write> {
    options: &'a RenderOptions,
    widths: ColumnWidths,
    out: &'a mut W,
}

impl<W: Write> Renderer<'_, W> {
    fn plain(&mut self, text: &str) -> Result<()> {
        writeln!(self.out, "{}", text).map_err(write_error)
    }

    fn paint(&mut self, color: &str, text: &str) -> Result<()> {
        if self.options.color {
            writeln!(self.out, "{}{}{}", color, text, RESET).map_err(write_error)
        } else {
            self.plain(text)
        }
    }

    fn hint(&mut self, line: &HunkLine) -> Result<()> {
        let text = format!(
            "    {}: {}",
            line.revision.short_id(self.options.abbrev),
            line.revision.summary
        );
        self.paint(DIM, &text)
    }

    /// Write one annotated row. The line content goes out as raw bytes so
    /// files in any encoding come through unchanged.
    fn row(&mut self, line: &HunkLine) -> Result<()> {
        let color = match line.kind {
            LineKind::Context => None,
            LineKind::Added => Some(GREEN),
            LineKind::Removed => Some(RED),
        }
        .filter(|_| self.options.color);
        let columns = self.format_columns(line);

        let out = &mut *self.out;
        let mut write = || -> std::io::Result<()> {
            if let Some(color) = color {
                out.write_all(color.as_bytes())?;
            }
            out.write_all(columns.as_bytes())?;
            out.write_all(&line.content)?;
            if color.is_some() {
                out.write_all(RESET.as_bytes())?;
            }
            out.write_all(b"\n")
        };
        write().map_err(write_error)
    }

    /// Everything of a row that precedes the line content.
    fn format_columns(&self, line: &HunkLine) -> String {
        let options = self.options;
        let widths = self.widths;

        let id = if line.boundary {
            format!("^{}", line.revision.short_id(options.abbrev.saturating_sub(1)))
        } else {
            line.revision.short_id(options.abbrev).to_string()
        };
        let mut row = format!("{}{}", line.kind.marker(), id);

        if let Some(width) = widths.filename {
            row.push_str(&format!(" {:<width$}", line.filename, width = width));
        }

        let author = &line.revision.author;
        let mut columns: Vec<String> = Vec::new();
        if options.show_name {
            columns.push(format!("{:<width$}", author.name, width = widths.name));
        }
        if options.show_mail {
            let mail = format!("<{}>", author.mail);
            columns.push(format!("{:<width$}", mail, width = widths.mail));
        }
        if options.show_date {
            let date = author
                .date()
                .map(|d| d.format(DATE_FORMAT).to_string())
                .unwrap_or_default();
            columns.push(format!("{:<width$}", date, width = DATE_WIDTH));
        }
        columns.push(number_column(line.original_line, widths.original_line));
        columns.push(number_column(line.final_line, widths.final_line));

        format!("{} ({}) ", row, columns.join(" "))
    }
}

fn number_column(line: Option<u32>, width: usize) -> String {
    match line {
        Some(n) => format!("{:>width$}", n, width = width),
        None => " ".repeat(width),
    }
}

fn write_error(e: std::io::Error) -> DifflameError {
    DifflameError::UserError(format!("failed to write output: {}", e))
}
