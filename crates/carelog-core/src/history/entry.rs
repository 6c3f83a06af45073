//! Transcript entry template.
//!
//! Each entry is framed by a blank line and a `--- {timestamp} ---` delimiter
//! line, followed by one line per speaker:
//!
//! ```text
//!
//! --- 04/03/2025, 09:05 ---
//! Paciente/Profissional: <requester>
//! Assistente: <responder>
//! ```
//!
//! Field text is written verbatim. A field containing a line that looks like
//! a delimiter will confuse both trimming and parsing.

use chrono::NaiveDateTime;
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

/// Marker searched for when dropping a partial leading entry.
pub const ENTRY_DELIMITER: &str = "\n---";

/// Local wall-clock timestamp layout: `DD/MM/YYYY, HH:MM`.
pub const TIMESTAMP_FORMAT: &str = "%d/%m/%Y, %H:%M";

pub const REQUESTER_LABEL: &str = "Paciente/Profissional";
pub const RESPONDER_LABEL: &str = "Assistente";

static HEADER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^--- (\d{2}/\d{2}/\d{4}, \d{2}:\d{2}) ---$").expect("valid header regex")
});

/// One requester/responder exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry<'a> {
    pub timestamp: NaiveDateTime,
    pub requester: &'a str,
    pub responder: &'a str,
}

impl<'a> HistoryEntry<'a> {
    pub fn new(timestamp: NaiveDateTime, requester: &'a str, responder: &'a str) -> Self {
        Self {
            timestamp,
            requester,
            responder,
        }
    }

    /// Render the entry, including its leading blank line.
    pub fn format(&self) -> String {
        format!(
            "\n\n--- {} ---\n{REQUESTER_LABEL}: {}\n{RESPONDER_LABEL}: {}",
            self.timestamp.format(TIMESTAMP_FORMAT),
            self.requester,
            self.responder
        )
    }
}

/// An entry recovered from stored transcript text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedEntry {
    pub timestamp: String,
    pub requester: String,
    pub responder: String,
}

/// Split transcript text back into entries.
///
/// Best effort: text before the first delimiter (a trimmed fragment) and
/// blocks that do not follow the template are skipped. When a requester
/// field itself contains an `Assistente: ` line, the first one wins.
pub fn parse_transcript(text: &str) -> Vec<ParsedEntry> {
    let headers: Vec<_> = HEADER_PATTERN.captures_iter(text).collect();
    let mut entries = Vec::with_capacity(headers.len());

    for (idx, caps) in headers.iter().enumerate() {
        let (Some(whole), Some(timestamp)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let body_end = headers
            .get(idx + 1)
            .and_then(|next| next.get(0))
            .map(|m| m.start())
            .unwrap_or(text.len());
        let body = text[whole.end()..body_end].trim_end_matches('\n');
        let Some(body) = body.strip_prefix('\n') else {
            continue;
        };
        let Some(fields) = body.strip_prefix(&format!("{REQUESTER_LABEL}: ")) else {
            continue;
        };
        let responder_marker = format!("\n{RESPONDER_LABEL}: ");
        let Some((requester, responder)) = fields.split_once(&responder_marker) else {
            continue;
        };

        entries.push(ParsedEntry {
            timestamp: timestamp.as_str().to_string(),
            requester: requester.to_string(),
            responder: responder.to_string(),
        });
    }

    entries
}
