//! Commit metadata shared by attribution entries and resolved deletions.

use chrono::{DateTime, FixedOffset, Offset, TimeZone, Utc};

/// Author or committer identity with its timestamp.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identity {
    pub name: String,
    /// Address without the surrounding angle brackets.
    pub mail: String,
    /// Seconds since the epoch.
    pub time: i64,
    /// Offset as printed by git, e.g. `+0200`.
    pub tz: String,
}

impl Identity {
    /// Timestamp in the identity's own offset. Unparsable offsets fall back
    /// to UTC.
    pub fn date(&self) -> Option<DateTime<FixedOffset>> {
        let offset = parse_tz(&self.tz).unwrap_or_else(|| Utc.fix());
        offset.timestamp_opt(self.time, 0).single()
    }
}

/// Cached commit metadata, keyed by full commit id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RevisionInfo {
    pub id: String,
    pub author: Identity,
    pub committer: Identity,
    /// One-line summary of the commit message.
    pub summary: String,
}

impl RevisionInfo {
    /// Abbreviated id of at most `abbrev` characters.
    pub fn short_id(&self, abbrev: usize) -> &str {
        let end = abbrev.min(self.id.len());
        &self.id[..end]
    }

    /// Parse the output of [`SHOW_FORMAT`]: ten NUL-separated fields.
    pub fn from_show_output(output: &str) -> Option<Self> {
        let output = output.trim_end_matches('\n');
        let fields: Vec<&str> = output.splitn(10, '\0').collect();
        if fields.len() != 10 || fields[0].is_empty() {
            return None;
        }

        Some(Self {
            id: fields[0].to_string(),
            author: Identity {
                name: fields[1].to_string(),
                mail: fields[2].to_string(),
                time: fields[3].parse().ok()?,
                tz: fields[4].to_string(),
            },
            committer: Identity {
                name: fields[5].to_string(),
                mail: fields[6].to_string(),
                time: fields[7].parse().ok()?,
                tz: fields[8].to_string(),
            },
            summary: fields[9].lines().next().unwrap_or("").to_string(),
        })
    }
}

/// `git show` format string matching [`RevisionInfo::from_show_output`].
/// Used together with `--date=format:%z` so `%ad`/`%cd` print the offset.
pub const SHOW_FORMAT: &str =
    "--format=%H%x00%an%x00%ae%x00%at%x00%ad%x00%cn%x00%ce%x00%ct%x00%cd%x00%s";

fn parse_tz(tz: &str) -> Option<FixedOffset> {
    let (sign, digits) = match tz.as_bytes().first()? {
        b'+' => (1, &tz[1..]),
        b'-' => (-1, &tz[1..]),
        _ => return None,
    };
    if digits.len() != 4 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let hours: i32 = digits[..2].parse().ok()?;
    let minutes: i32 = digits[2..].parse().ok()?;
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_show_output() {
        let raw = "abc123\0Alice\0alice@example.com\01700000000\0+0200\0Bob\0bob@example.com\01700000100\0-0500\0Fix the parser\n";
        let info = RevisionInfo::from_show_output(raw).unwrap();
        assert_eq!(info.id, "abc123");
        assert_eq!(info.author.name, "Alice");
        assert_eq!(info.author.mail, "alice@example.com");
        assert_eq!(info.author.time, 1_700_000_000);
        assert_eq!(info.committer.tz, "-0500");
        assert_eq!(info.summary, "Fix the parser");
    }

    #[test]
    fn test_from_show_output_rejects_short_records() {
        assert!(RevisionInfo::from_show_output("abc\0Alice\n").is_none());
        assert!(RevisionInfo::from_show_output("").is_none());
    }

    #[test]
    fn test_identity_date_uses_offset() {
        let identity = Identity {
            time: 0,
            tz: "+0130".to_string(),
            ..Default::default()
        };
        let date = identity.date().unwrap();
        assert_eq!(date.format("%Y-%m-%d %H:%M %z").to_string(), "1970-01-01 01:30 +0130");
    }

    #[test]
    fn test_identity_date_falls_back_to_utc() {
        let identity = Identity {
            time: 60,
            tz: "bogus".to_string(),
            ..Default::default()
        };
        assert_eq!(identity.date().unwrap().format("%H:%M:%S").to_string(), "00:01:00");
    }

    #[test]
    fn test_short_id() {
        let info = RevisionInfo {
            id: "0123456789abcdef".to_string(),
            ..Default::default()
        };
        assert_eq!(info.short_id(8), "01234567");
        assert_eq!(info.short_id(64), "0123456789abcdef");
    }
}
