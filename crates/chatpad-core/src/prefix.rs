// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Resolution of the chat prefix that a logical line is sent with.

use chatpad_config::FormatterSettings;

use crate::classify::{match_outbound, Classification};
use crate::size::byte_length;

/// Shown instead of an empty prefix so the problem is visible in the preview.
pub const PLACEHOLDER_PREFIX: &str = "/???";

/// Bytes taken by the `((` and `))` of an out-of-character wrap.
const OOC_OVERHEAD: usize = 4;

/// A logical line split into the prefix it is sent with and its body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLine {
    /// Slash-command, including the tell recipient for tells.
    pub prefix: String,
    /// Message text after the prefix, whitespace-collapsed.
    pub body: String,
    /// Bytes every segment of this line spends outside the body.
    pub total_offset: usize,
    /// Whether bodies are wrapped in `((…))`.
    pub ooc: bool,
    pub classification: Classification,
}

impl ResolvedLine {
    /// Assemble a message from this line's prefix and `body`.
    pub fn finish(&self, body: &str) -> String {
        finish_with(&self.prefix, body, self.ooc)
    }
}

/// `prefix body`, trimmed, with the body optionally wrapped out-of-character.
pub fn finish_with(prefix: &str, body: &str, ooc: bool) -> String {
    if ooc {
        format!("{prefix} (({}))", body.trim_end()).trim().to_string()
    } else {
        format!("{prefix} {body}").trim().to_string()
    }
}

/// Resolve the prefix for `line`.
///
/// A leading `/command` token replaces `ambient_prefix` for this line only.
/// Out-of-character mode is never applied to lines that classify as
/// commands.
pub fn resolve(line: &str, ambient_prefix: &str, settings: &FormatterSettings) -> ResolvedLine {
    let line = collapse_whitespace(line);

    let (mut prefix, mut body) = match split_command(&line) {
        Some((token, rest)) => (token.to_string(), rest.to_string()),
        None => (ambient(ambient_prefix), line),
    };

    let unwrapped = finish_with(&prefix, &body, false);
    let matched = match_outbound(&unwrapped);

    // Keep the tell recipient with the command so every segment is addressed.
    if let Classification::Tell { .. } = matched.classification {
        if matched.address_len > byte_length(&prefix) {
            prefix = unwrapped[..matched.address_len].to_string();
            body = unwrapped[matched.address_len..].trim_start().to_string();
        }
    }

    let ooc = settings.out_of_character && matched.classification.tag().is_chat();
    let mut total_offset = byte_length(&prefix) + 1;
    if ooc {
        total_offset += OOC_OVERHEAD;
    }

    ResolvedLine { prefix, body, total_offset, ooc, classification: matched.classification }
}

fn ambient(prefix: &str) -> String {
    let prefix = collapse_whitespace(prefix);
    if prefix.is_empty() {
        PLACEHOLDER_PREFIX.to_string()
    } else {
        prefix
    }
}

/// Collapse whitespace runs to a single space and trim both ends.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split a leading `/` + alphanumerics token off `line`.
fn split_command(line: &str) -> Option<(&str, &str)> {
    let rest = line.strip_prefix('/')?;
    let token_len = rest.find(|c: char| !c.is_ascii_alphanumeric()).unwrap_or(rest.len());
    if token_len == 0 {
        return None;
    }
    let (token, body) = line.split_at(token_len + 1);
    Some((token, body.trim_start()))
}

// ─── Unit tests ──────────────────────────────────────────────────────────────
