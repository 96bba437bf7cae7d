// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Formatting of a whole pad buffer into an ordered batch of messages.

use std::sync::OnceLock;

use chatpad_config::FormatterSettings;
use regex::Regex;
use serde::Serialize;
use tracing::debug;

use crate::classify::{classify, ChatTag, Classification};
use crate::prefix::resolve;
use crate::segment::segment_line;
use crate::size::{byte_length, within_limit};

const EM_DASH: &str = "\u{2014}";

/// One finished outbound message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    pub text: String,
    pub classification: Classification,
    pub byte_length: usize,
    /// Longer than [`LIMIT`](crate::size::LIMIT).  Happens for a single
    /// word that does not fit in any message, and for full messages in a
    /// batch of 100 or more, whose ` (k/n)` suffix outgrows
    /// [`ENUM_OVERHEAD`](crate::size::ENUM_OVERHEAD).
    pub oversized: bool,
}

impl Segment {
    fn new(text: String) -> Self {
        let classification = classify(&text);
        let byte_length = byte_length(&text);
        let oversized = !within_limit(&text);
        Self { text, classification, byte_length, oversized }
    }

    pub fn tag(&self) -> ChatTag {
        self.classification.tag()
    }

    fn enumerate(&mut self, k: usize, n: usize) {
        self.text = format!("{} ({k}/{n})", self.text.trim_end());
        self.byte_length = byte_length(&self.text);
        self.oversized = !within_limit(&self.text);
    }
}

/// Format `raw` into messages.
///
/// Lines without their own slash-command are sent with `active_prefix`.
/// When more than one chat message results, each chat message gets a
/// ` (k/n)` suffix counting chat messages only; commands keep their place
/// in the sequence without a suffix.
pub fn format(raw: &str, active_prefix: &str, settings: &FormatterSettings) -> Vec<Segment> {
    let text = if settings.em_dash_convert {
        raw.replace("--", EM_DASH)
    } else {
        raw.to_string()
    };

    let lines: Vec<&str> = text.split('\n').filter(|l| !l.trim().is_empty()).collect();
    let singular = lines.len() == 1;

    let mut segments: Vec<Segment> = lines
        .iter()
        .flat_map(|line| segment_line(&resolve(line, active_prefix, settings), singular))
        .map(Segment::new)
        .collect();

    let n = segments.iter().filter(|s| s.tag().is_chat()).count();
    debug!(lines = lines.len(), segments = segments.len(), chat = n, "formatted pad");
    if n <= 1 {
        return segments;
    }

    for (k, segment) in segments.iter_mut().filter(|s| s.tag().is_chat()).enumerate() {
        segment.enumerate(k + 1, n);
    }
    segments
}

fn enumeration_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r" \(\d+/\d+\)$").expect("enumeration pattern is valid"))
}

/// `text` without a trailing ` (k/n)` suffix.
pub fn strip_enumeration(text: &str) -> &str {
    match enumeration_re().find(text) {
        Some(m) => &text[..m.start()],
        None => text,
    }
}

// ─── Unit tests ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::size::LIMIT;

    fn settings() -> FormatterSettings {
        FormatterSettings::default()
    }

    fn texts(segments: &[Segment]) -> Vec<&str> {
        segments.iter().map(|s| s.text.as_str()).collect()
    }

    #[test]
    fn single_short_line_has_no_suffix() {
        let out = format("hello there", "/say", &settings());
        assert_eq!(texts(&out), vec!["/say hello there"]);
        assert_eq!(out[0].tag(), ChatTag::Say);
        assert_eq!(out[0].byte_length, 16);
    }

    #[test]
    fn single_command_line_has_no_suffix() {
        let out = format("/wave", "/say", &settings());
        assert_eq!(texts(&out), vec!["/wave"]);
        assert_eq!(out[0].tag(), ChatTag::Command);
    }

    #[test]
    fn blank_lines_are_dropped_and_lines_enumerated() {
        let out = format("first\n\n   \nsecond\r\n", "/p", &settings());
        assert_eq!(texts(&out), vec!["/p first (1/2)", "/p second (2/2)"]);
    }

    #[test]
    fn commands_are_skipped_by_enumeration() {
        let out = format("/em bows\n/echo reminder\nhello\n/fc evening", "/say", &settings());
        assert_eq!(
            texts(&out),
            vec!["/em bows (1/3)", "/echo reminder", "/say hello (2/3)", "/fc evening (3/3)"]
        );
    }

    #[test]
    fn one_chat_line_among_commands_is_not_enumerated() {
        let out = format("/echo a\nhello\n/echo b", "/say", &settings());
        assert_eq!(texts(&out), vec!["/echo a", "/say hello", "/echo b"]);
    }

    #[test]
    fn em_dash_conversion_follows_setting() {
        let out = format("wait--what", "/say", &settings());
        assert_eq!(out[0].text, "/say wait\u{2014}what");

        let off = FormatterSettings { em_dash_convert: false, ..settings() };
        assert_eq!(format("wait--what", "/say", &off)[0].text, "/say wait--what");
    }

    #[test]
    fn tabs_and_runs_of_spaces_collapse() {
        let out = format("a \t b    c", "/say", &settings());
        assert_eq!(out[0].text, "/say a b c");
    }

    #[test]
    fn long_line_is_split_and_enumerated() {
        let body = vec!["lorem"; 200].join(" ");
        let out = format(&body, "/say", &settings());
        assert_eq!(out.len(), 3);
        for (i, s) in out.iter().enumerate() {
            assert!(s.text.ends_with(&format!(" ({}/3)", i + 1)));
            assert!(!s.oversized);
            assert!(s.byte_length <= LIMIT);
        }
        assert!(out[1].text.starts_with("/say | lorem"));
    }

    #[test]
    fn oversized_word_is_flagged() {
        let out = format(&"X".repeat(520), "/say", &settings());
        assert_eq!(out.len(), 1);
        assert!(out[0].oversized);
        assert_eq!(out[0].byte_length, 525);
    }

    #[test]
    fn three_digit_enumeration_can_overflow_full_messages() {
        // "/say " + 487 bytes + ENUM_OVERHEAD is exactly the limit.
        let line = "a".repeat(487);
        let raw = vec![line.as_str(); 100].join("\n");
        let out = format(&raw, "/say", &settings());
        assert_eq!(out.len(), 100);

        assert_eq!(out[0].byte_length, 500);
        assert!(!out[0].oversized);
        assert_eq!(out[9].byte_length, 501);
        assert!(out[9].oversized);
        assert!(out[99].text.ends_with(" (100/100)"));
        assert_eq!(out[99].byte_length, 502);
        assert!(out[99].oversized);
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert!(format("", "/say", &settings()).is_empty());
        assert!(format("\n \n\t", "/say", &settings()).is_empty());
    }

    #[test]
    fn strip_enumeration_removes_only_trailing_suffix() {
        assert_eq!(strip_enumeration("/say hi (2/3)"), "/say hi");
        assert_eq!(strip_enumeration("/say (1/2) hi"), "/say (1/2) hi");
        assert_eq!(strip_enumeration("/say hi"), "/say hi");
        assert_eq!(strip_enumeration("/say hi (12/14)"), "/say hi");
    }
}
