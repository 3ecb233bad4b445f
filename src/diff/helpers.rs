//! Helper functions for diff parsing.

use super::model::HunkRange;
use regex::Regex;
use std::sync::LazyLock;

static HUNK_HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^@@ -(\d+)(?:,(\d+))? \+(\d+)(?:,(\d+))? @@").expect("Invalid hunk header regex")
});

/// Parse a hunk header line.
///
/// Format: "@@ -old_start,old_len +new_start,new_len @@" or "@@ -old_start +new_start @@",
/// optionally followed by function context. A missing length means 1.
///
/// Returns (original, final) or None if the descriptor is malformed or a
/// range runs past the largest line number.
pub(super) fn parse_hunk_header(line: &str) -> Option<(HunkRange, HunkRange)> {
    let caps = HUNK_HEADER_RE.captures(line)?;

    let number = |idx: usize| -> Option<u32> {
        match caps.get(idx) {
            Some(m) => m.as_str().parse().ok(),
            None => Some(1),
        }
    };

    let original = HunkRange::new(caps[1].parse().ok()?, number(2)?);
    let final_range = HunkRange::new(caps[3].parse().ok()?, number(4)?);
    // Both ranges must end inside the line-number space.
    original.end()?;
    final_range.end()?;

    Some((original, final_range))
}

/// Parse both paths from the remainder of a "diff --git " line.
///
/// Handles:
/// - "a/path/to/file b/path/to/file" (normal)
/// - "a/path/to/file b/path/to/renamed" (rename)
/// - "\"a/with\\ttab\" \"b/with\\ttab\"" (quoted by git)
///
/// Returns (original, final) with the `a/` and `b/` prefixes stripped.
pub(super) fn parse_diff_git_line(rest: &str) -> Option<(String, String)> {
    if rest.starts_with('"') {
        let (first, remainder) = split_quoted(rest)?;
        let remainder = remainder.trim_start();
        let second = if remainder.starts_with('"') {
            split_quoted(remainder)?.0
        } else {
            remainder.to_string()
        };
        return Some((strip_side_prefix(&first, "a/"), strip_side_prefix(&second, "b/")));
    }

    // Only the final side quoted (e.g. a rename to an unusual name).
    if let Some(q_pos) = rest.rfind(" \"b/") {
        let (second, _) = split_quoted(&rest[q_pos + 1..])?;
        return Some((strip_side_prefix(&rest[..q_pos], "a/"), strip_side_prefix(&second, "b/")));
    }

    // Paths can contain spaces; the last " b/" separates the two sides.
    if let Some(b_pos) = rest.rfind(" b/") {
        let a_path = &rest[..b_pos];
        let b_path = &rest[b_pos + 1..];
        return Some((strip_side_prefix(a_path, "a/"), strip_side_prefix(b_path, "b/")));
    }

    // Fallback: split on whitespace and take the two sides.
    let parts: Vec<&str> = rest.split_whitespace().collect();
    if parts.len() == 2 {
        return Some((
            strip_side_prefix(parts[0], "a/"),
            strip_side_prefix(parts[1], "b/"),
        ));
    }

    None
}

/// Parse the path out of a `--- ` or `+++ ` line body.
///
/// Returns None for `/dev/null`. Git appends a tab when the name contains
/// spaces; it is dropped.
pub(super) fn parse_marker_path(rest: &str, prefix: &str) -> Option<String> {
    let rest = rest.strip_suffix('\t').unwrap_or(rest);
    if rest == "/dev/null" {
        return None;
    }
    if rest.starts_with('"') {
        let (unquoted, _) = split_quoted(rest)?;
        return Some(strip_side_prefix(&unquoted, prefix));
    }
    Some(strip_side_prefix(rest, prefix))
}

/// Unquote a path git may have C-quoted: `rename from`/`rename to` headers
/// and the `filename`/`previous` keys of blame output.
pub(crate) fn unquote_path(raw: &str) -> String {
    if raw.starts_with('"') {
        if let Some((unquoted, _)) = split_quoted(raw) {
            return unquoted;
        }
    }
    raw.to_string()
}

fn strip_side_prefix(path: &str, prefix: &str) -> String {
    path.strip_prefix(prefix).unwrap_or(path).to_string()
}

/// Split a leading C-style quoted string (as git emits for unusual paths)
/// off `input`, returning the unescaped value and the remainder.
fn split_quoted(input: &str) -> Option<(String, &str)> {
    let body = input.strip_prefix('"')?;
    let mut bytes: Vec<u8> = Vec::new();
    let mut chars = body.char_indices();

    while let Some((idx, c)) = chars.next() {
        match c {
            '"' => {
                let value = String::from_utf8_lossy(&bytes).into_owned();
                return Some((value, &body[idx + 1..]));
            }
            '\\' => {
                let (_, escaped) = chars.next()?;
                match escaped {
                    'n' => bytes.push(b'\n'),
                    't' => bytes.push(b'\t'),
                    'r' => bytes.push(b'\r'),
                    '"' => bytes.push(b'"'),
                    '\\' => bytes.push(b'\\'),
                    'a' => bytes.push(0x07),
                    'b' => bytes.push(0x08),
                    'f' => bytes.push(0x0c),
                    'v' => bytes.push(0x0b),
                    '0'..='3' => {
                        let mut value = escaped.to_digit(8)?;
                        for _ in 0..2 {
                            let (_, digit) = chars.next()?;
                            value = value * 8 + digit.to_digit(8)?;
                        }
                        bytes.push(u8::try_from(value).ok()?);
                    }
                    other => {
                        let mut buf = [0u8; 4];
                        bytes.extend_from_slice(other.encode_utf8(&mut buf).as_bytes());
                    }
                }
            }
            other => {
                let mut buf = [0u8; 4];
                bytes.extend_from_slice(other.encode_utf8(&mut buf).as_bytes());
            }
        }
    }

    None
}

/// Normalize a file path to use forward slashes.
pub(crate) fn normalize_path(path: &str) -> String {
    path.replace('\\', "/")
}
