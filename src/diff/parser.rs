//! Core diff parsing logic.
//!
//! `DiffParser` walks raw `git diff` output lazily and yields one `DiffFile`
//! per `diff` header. Hunk bodies are consumed according to the counts in
//! their descriptors, so a removed line that happens to look like `--- x`
//! is never mistaken for a file header.
//!
//! Input is bytes: headers are decoded for display and path handling, while
//! hunk line content is kept exactly as git wrote it.

use crate::error::{DifflameError, Result};
use std::borrow::Cow;
use std::iter::Peekable;
use std::slice::Split;

use super::helpers::{parse_diff_git_line, parse_hunk_header, parse_marker_path, unquote_path};
use super::model::{DiffFile, DiffHunk, RawLine, RawLineKind};

type Lines<'a> = Peekable<Split<'a, u8, fn(&u8) -> bool>>;

fn is_line_end(byte: &u8) -> bool {
    *byte == b'\n'
}

fn text(line: &[u8]) -> Cow<'_, str> {
    String::from_utf8_lossy(line)
}

/// Lazy parser over one diff invocation's output.
///
/// The parser borrows the text, so restarting is a matter of building a new
/// parser over the same buffer.
pub struct DiffParser<'a> {
    lines: Lines<'a>,
    line_number: usize,
    starting_revision: String,
    final_revision: String,
    failed: bool,
}

impl<'a> DiffParser<'a> {
    pub fn new<T: AsRef<[u8]> + ?Sized>(
        text: &'a T,
        starting_revision: &str,
        final_revision: &str,
    ) -> Self {
        let bytes = text.as_ref();
        let bytes = bytes.strip_suffix(b"\n").unwrap_or(bytes);
        Self {
            lines: bytes.split(is_line_end as fn(&u8) -> bool).peekable(),
            line_number: 0,
            starting_revision: starting_revision.to_string(),
            final_revision: final_revision.to_string(),
            failed: false,
        }
    }

    fn next_line(&mut self) -> Option<&'a [u8]> {
        let line = self.lines.next()?;
        self.line_number += 1;
        Some(line)
    }

    fn peek_line(&mut self) -> Option<&'a [u8]> {
        self.lines.peek().copied()
    }

    fn malformed(&self, message: impl Into<String>) -> DifflameError {
        DifflameError::MalformedDiff(format!("line {}: {}", self.line_number, message.into()))
    }

    fn parse_file(&mut self, header: &str) -> Result<DiffFile> {
        let rest = header.strip_prefix("diff ").unwrap_or(header);
        let rest = rest.strip_prefix("--git ").unwrap_or(rest);
        let (mut original_name, mut final_name) = parse_diff_git_line(rest)
            .ok_or_else(|| self.malformed(format!("cannot read file names from '{}'", header)))?;

        let mut file = DiffFile {
            original_name: String::new(),
            final_name: String::new(),
            starting_revision: self.starting_revision.clone(),
            final_revision: self.final_revision.clone(),
            preamble: vec![header.to_string()],
            is_new: false,
            is_deleted: false,
            is_binary: false,
            hunks: Vec::new(),
        };

        // Extended headers up to the ---/+++ pair. Files without content
        // changes (mode-only, pure rename, binary) end here.
        while let Some(raw) = self.peek_line() {
            if raw.starts_with(b"diff ") {
                break;
            }
            self.next_line();
            let line = text(raw);

            if line.starts_with("@@") {
                return Err(self.malformed(format!(
                    "hunk before ---/+++ headers for '{}'",
                    final_name
                )));
            }
            if line.starts_with("--- ") {
                self.parse_marker_pair(&line, &mut file, &mut original_name, &mut final_name)?;
                self.parse_hunks(&mut file)?;
                break;
            }

            if line.starts_with("Binary files ") || line == "GIT binary patch" {
                file.is_binary = true;
            } else if line.starts_with("new file mode") {
                file.is_new = true;
            } else if line.starts_with("deleted file mode") {
                file.is_deleted = true;
            } else if let Some(name) = line.strip_prefix("rename from ") {
                original_name = unquote_path(name);
            } else if let Some(name) = line.strip_prefix("rename to ") {
                final_name = unquote_path(name);
            }
            file.preamble.push(line.into_owned());
        }

        file.original_name = original_name;
        file.final_name = final_name;
        Ok(file)
    }

    fn parse_marker_pair(
        &mut self,
        minus: &str,
        file: &mut DiffFile,
        original_name: &mut String,
        final_name: &mut String,
    ) -> Result<()> {
        file.preamble.push(minus.to_string());
        match parse_marker_path(&minus[4..], "a/") {
            Some(name) => *original_name = name,
            None => file.is_new = true,
        }

        let plus = match self.next_line().map(text) {
            Some(line) if line.starts_with("+++ ") => line,
            _ => {
                return Err(self.malformed(format!(
                    "expected '+++' after '---' for '{}'",
                    original_name
                )));
            }
        };
        match parse_marker_path(&plus[4..], "b/") {
            Some(name) => *final_name = name,
            None => file.is_deleted = true,
        }
        file.preamble.push(plus.into_owned());

        Ok(())
    }

    fn parse_hunks(&mut self, file: &mut DiffFile) -> Result<()> {
        while let Some(line) = self.peek_line() {
            if !line.starts_with(b"@@") {
                break;
            }
            self.next_line();
            let hunk = self.parse_hunk(&text(line))?;
            file.hunks.push(hunk);
        }
        Ok(())
    }

    fn parse_hunk(&mut self, header: &str) -> Result<DiffHunk> {
        let (original, final_range) = parse_hunk_header(header)
            .ok_or_else(|| self.malformed(format!("malformed hunk descriptor '{}'", header)))?;

        let mut hunk = DiffHunk::new(header.to_string(), original, final_range);
        let mut original_left = original.count;
        let mut final_left = final_range.count;

        while original_left > 0 || final_left > 0 {
            let line = self.next_line().ok_or_else(|| {
                self.malformed(format!("unexpected end of input inside hunk '{}'", header))
            })?;

            // Some tools strip the lone space of an empty context line.
            let (kind, content) = match line.split_first() {
                None => (RawLineKind::Context, line),
                Some((&marker, content)) => match RawLineKind::from_marker(char::from(marker)) {
                    Some(kind) => (kind, content),
                    None => {
                        return Err(self.malformed(format!(
                            "hunk '{}' ended early at '{}'",
                            header,
                            text(line)
                        )));
                    }
                },
            };

            let fits = match kind {
                RawLineKind::Context => original_left > 0 && final_left > 0,
                RawLineKind::Removed => original_left > 0,
                RawLineKind::Added => final_left > 0,
                RawLineKind::NoNewline => true,
            };
            if !fits {
                return Err(self.malformed(format!(
                    "hunk '{}' has more lines than its descriptor declares",
                    header
                )));
            }
            if kind.in_original() {
                original_left -= 1;
            }
            if kind.in_final() {
                final_left -= 1;
            }

            hunk.lines.push(RawLine {
                kind,
                content: content.to_vec(),
            });
        }

        while let Some(line) = self.peek_line() {
            let Some(content) = line.strip_prefix(b"\\") else {
                break;
            };
            self.next_line();
            hunk.lines.push(RawLine {
                kind: RawLineKind::NoNewline,
                content: content.to_vec(),
            });
        }

        Ok(hunk)
    }
}

impl Iterator for DiffParser<'_> {
    type Item = Result<DiffFile>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        let line = loop {
            let line = self.next_line()?;
            if !line.trim_ascii().is_empty() {
                break text(line);
            }
        };

        let result = if line.starts_with("diff ") {
            self.parse_file(&line)
        } else {
            Err(self.malformed(format!("expected a 'diff' header, found '{}'", line)))
        };

        if result.is_err() {
            self.failed = true;
        }
        Some(result)
    }
}

/// Parse a complete diff into its file records.
pub fn parse_diff<T: AsRef<[u8]> + ?Sized>(
    text: &T,
    starting_revision: &str,
    final_revision: &str,
) -> Result<Vec<DiffFile>> {
    DiffParser::new(text, starting_revision, final_revision).collect()
}
