// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Turns appended chat-log text into parsed lines.

use std::collections::BTreeSet;

use chatpad_core::{classify_log_line, ChatLogLine, ClassifyError};
use tracing::{debug, trace};

/// Stateful parser fed with chunks of log text.
///
/// The game client sometimes flushes the same line twice in a row; an
/// exact repeat of the previous raw line is dropped.  Every speaker seen is
/// remembered so a front end can offer name completion.
#[derive(Debug, Default)]
pub struct LogTail {
    last_raw: Option<String>,
    speakers: BTreeSet<String>,
    parsed: usize,
    malformed: usize,
}

impl LogTail {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse every line in `chunk`.  Blank lines and immediate repeats
    /// produce nothing; a blank line between two equal lines keeps both.
    pub fn ingest(&mut self, chunk: &str) -> Vec<Result<ChatLogLine, ClassifyError>> {
        chunk.lines().filter_map(|raw| self.ingest_line(raw)).collect()
    }

    pub fn ingest_line(&mut self, raw: &str) -> Option<Result<ChatLogLine, ClassifyError>> {
        let raw = raw.trim_end_matches(['\r', '\n']);
        if raw.trim().is_empty() {
            self.last_raw = None;
            return None;
        }
        if self.last_raw.as_deref() == Some(raw) {
            trace!(line = raw, "dropping repeated line");
            return None;
        }
        self.last_raw = Some(raw.to_string());

        let result = classify_log_line(raw);
        match &result {
            Ok(line) => {
                self.parsed += 1;
                self.speakers.insert(line.speaker.name());
            }
            Err(e) => {
                self.malformed += 1;
                debug!("{e}");
            }
        }
        Some(result)
    }

    /// Forget the last line after the log was truncated, so a first line
    /// equal to the old last line is not mistaken for a repeat.
    pub fn reset(&mut self) {
        self.last_raw = None;
    }

    /// Speakers seen so far, as `First Last`, sorted.
    pub fn known_speakers(&self) -> impl Iterator<Item = &str> {
        self.speakers.iter().map(String::as_str)
    }

    pub fn parsed(&self) -> usize {
        self.parsed
    }

    pub fn malformed(&self) -> usize {
        self.malformed
    }
}

// ─── Unit tests ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chatpad_core::ChatTag;

    #[test]
    fn parses_each_line_in_order() {
        let mut tail = LogTail::new();
        let out = tail.ingest("Aria Moonwhisper: hi\n(Bren Stoneheart) on my way\n");
        let tags: Vec<ChatTag> = out.iter().map(|r| r.as_ref().unwrap().tag()).collect();
        assert_eq!(tags, vec![ChatTag::Say, ChatTag::Party]);
        assert_eq!(tail.parsed(), 2);
    }

    #[test]
    fn immediate_repeats_are_dropped() {
        let mut tail = LogTail::new();
        let out = tail.ingest("Aria Moonwhisper: hi\nAria Moonwhisper: hi\nBren Stoneheart: yo\nAria Moonwhisper: hi\n");
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn blank_line_separates_equal_lines() {
        let mut tail = LogTail::new();
        let out = tail.ingest("Aria Moonwhisper: hi\n\nAria Moonwhisper: hi\n");
        assert_eq!(out.len(), 2);
        assert_eq!(tail.parsed(), 2);
    }

    #[test]
    fn repeat_across_chunks_is_dropped() {
        let mut tail = LogTail::new();
        assert_eq!(tail.ingest("Aria Moonwhisper: hi\n").len(), 1);
        assert!(tail.ingest("Aria Moonwhisper: hi\n").is_empty());
    }

    #[test]
    fn reset_allows_the_same_line_again() {
        let mut tail = LogTail::new();
        tail.ingest("Aria Moonwhisper: hi\n");
        tail.reset();
        assert_eq!(tail.ingest("Aria Moonwhisper: hi\n").len(), 1);
    }

    #[test]
    fn malformed_lines_are_reported_and_counted() {
        let mut tail = LogTail::new();
        let out = tail.ingest("*** system restart ***\n\n   \n");
        assert_eq!(out.len(), 1);
        assert!(matches!(out[0], Err(ClassifyError::MalformedLogLine(_))));
        assert_eq!(tail.malformed(), 1);
    }

    #[test]
    fn speakers_are_collected_sorted_and_unique() {
        let mut tail = LogTail::new();
        tail.ingest("Bren Stoneheart: a\nAria Moonwhisper: b\nBren Stoneheart yells: c\n");
        let names: Vec<&str> = tail.known_speakers().collect();
        assert_eq!(names, vec!["Aria Moonwhisper", "Bren Stoneheart"]);
    }

    #[test]
    fn crlf_line_endings_are_accepted() {
        let mut tail = LogTail::new();
        let out = tail.ingest("Aria Moonwhisper: hi\r\n");
        assert_eq!(out[0].as_ref().unwrap().body, "hi");
    }
}
