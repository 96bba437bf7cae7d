// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::collections::HashSet;

use chatpad_config::FilterConfig;
use chatpad_core::{ChatLogLine, ChatTag};
use tracing::warn;

/// Decides which parsed log lines are shown.
///
/// Built from the `[filters]` table: lines whose channel is listed in
/// `hidden_tags`, or whose speaker name is listed in `hidden_speakers`,
/// are dropped.  Speaker names compare case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct LogFilter {
    hidden_tags: HashSet<ChatTag>,
    hidden_speakers: HashSet<String>,
}

impl LogFilter {
    pub fn from_config(cfg: &FilterConfig) -> Self {
        let hidden_tags = cfg
            .hidden_tags
            .iter()
            .filter_map(|raw| match raw.parse::<ChatTag>() {
                Ok(tag) => Some(tag),
                Err(e) => {
                    warn!(tag = %raw, "ignoring filter entry: {e}");
                    None
                }
            })
            .collect();
        let hidden_speakers = cfg.hidden_speakers.iter().map(|s| s.trim().to_lowercase()).collect();
        Self { hidden_tags, hidden_speakers }
    }

    pub fn allows(&self, line: &ChatLogLine) -> bool {
        !self.hidden_tags.contains(&line.tag())
            && !self.hidden_speakers.contains(&line.speaker.name().to_lowercase())
    }

    pub fn is_empty(&self) -> bool {
        self.hidden_tags.is_empty() && self.hidden_speakers.is_empty()
    }
}

// ─── Unit tests ──────────────────────────────────────────────────────────────
