//! Trace record formatting
//!
//! A record renders to exactly one line:
//!
//! ```text
//! <timestamp>, <request_id>, <action>, <content>
//! ```
//!
//! The timestamp is Unix seconds with six fractional digits. Backslash, line
//! feed and carriage return are escaped in the action and content fields
//! (`\\`, `\n`, `\r`), and commas are escaped (`\,`) in the action field only.
//! Content is the trailing field, so a reader splits on the first three
//! unescaped `", "` separators and takes the remainder verbatim.

use chrono::{DateTime, Utc};

use super::content::Content;

const FIELD_SEPARATOR: &str = ", ";

/// One immutable trace record
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    timestamp: DateTime<Utc>,
    request_id: i64,
    action: String,
    content: Content,
}

impl LogRecord {
    /// Create a record stamped with the current time
    pub fn new(action: impl Into<String>, request_id: i64, content: impl Into<Content>) -> Self {
        Self::at(Utc::now(), action, request_id, content)
    }

    /// Create a record with an explicit timestamp
    pub fn at(
        timestamp: DateTime<Utc>,
        action: impl Into<String>,
        request_id: i64,
        content: impl Into<Content>,
    ) -> Self {
        Self {
            timestamp,
            request_id,
            action: action.into(),
            content: content.into(),
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn request_id(&self) -> i64 {
        self.request_id
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    pub fn content(&self) -> &Content {
        &self.content
    }

    /// Render the record as a single line, without the trailing newline
    pub fn format_line(&self) -> String {
        format!(
            "{}{sep}{}{sep}{}{sep}{}",
            format_timestamp(self.timestamp),
            self.request_id,
            escape_field(&self.action, true),
            escape_field(&self.content.render(), false),
            sep = FIELD_SEPARATOR,
        )
    }

    /// Parse a line produced by [`LogRecord::format_line`]
    pub fn parse_line(line: &str) -> Option<ParsedRecord> {
        let line = line.trim_end_matches(&['\n', '\r'][..]);
        let [timestamp, request_id, action, content] = split_fields(line)?;

        Some(ParsedRecord {
            timestamp: parse_timestamp(timestamp)?,
            request_id: request_id.parse().ok()?,
            action: unescape_field(action),
            content: unescape_field(content),
        })
    }
}

/// Fields recovered from a trace line. Content stays in its rendered form.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRecord {
    pub timestamp: DateTime<Utc>,
    pub request_id: i64,
    pub action: String,
    pub content: String,
}

/// Format as `<seconds>.<microseconds>` with exactly six fractional digits
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    let micros = timestamp.timestamp_micros();
    format!(
        "{}.{:06}",
        micros.div_euclid(1_000_000),
        micros.rem_euclid(1_000_000)
    )
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let (secs, frac) = s.split_once('.')?;
    if frac.len() != 6 {
        return None;
    }
    let secs: i64 = secs.parse().ok()?;
    let micros: u32 = frac.parse().ok()?;
    DateTime::from_timestamp(secs, micros * 1_000)
}

fn escape_field(raw: &str, escape_commas: bool) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            ',' if escape_commas => out.push_str("\\,"),
            c => out.push(c),
        }
    }
    out
}

fn unescape_field(escaped: &str) -> String {
    let mut out = String::with_capacity(escaped.len());
    let mut chars = escaped.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('\\') => out.push('\\'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some(',') => out.push(','),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Split on the first three unescaped separators
fn split_fields(line: &str) -> Option<[&str; 4]> {
    let bytes = line.as_bytes();
    let mut bounds = [0usize; 3];
    let mut found = 0;
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() && found < 3 {
        match bytes[i] {
            b'\\' => i += 2,
            b',' if bytes.get(i + 1) == Some(&b' ') => {
                bounds[found] = i;
                found += 1;
                i += FIELD_SEPARATOR.len();
            }
            _ => i += 1,
        }
    }
    if found < 3 {
        return None;
    }

    let mut fields = [""; 4];
    for (n, end) in bounds.iter().enumerate() {
        fields[n] = &line[start..*end];
        start = end + FIELD_SEPARATOR.len();
    }
    fields[3] = &line[start..];
    Some(fields)
}
