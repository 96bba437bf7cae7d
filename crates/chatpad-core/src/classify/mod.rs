// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Speech-act classification of chat messages.
//!
//! Two ordered pattern tables live here: the outbound table maps a message
//! about to be sent to a [`Classification`] and never fails, the inbound
//! table turns a chat-log line into a [`ChatLogLine`] and rejects anything it
//! does not recognise.  In both tables declaration order decides between
//! patterns that overlap, so they are kept as `Vec`s.

mod inbound;
mod outbound;

use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

pub use inbound::{classify_log_line, ChatLogLine, InboundKind, Speaker, TellDirection};
pub use outbound::{classify, match_outbound, Classification, OutboundMatch, TellTarget};

/// The chat channel a message belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatTag {
    Say,
    Party,
    Yell,
    Shout,
    Emote,
    Tell,
    FreeCompany,
    Linkshell,
    /// Anything that is not chat: `/echo`, `/wave`, macros, typos.
    Command,
}

impl ChatTag {
    pub const ALL: [ChatTag; 9] = [
        ChatTag::Say,
        ChatTag::Party,
        ChatTag::Yell,
        ChatTag::Shout,
        ChatTag::Emote,
        ChatTag::Tell,
        ChatTag::FreeCompany,
        ChatTag::Linkshell,
        ChatTag::Command,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ChatTag::Say => "say",
            ChatTag::Party => "party",
            ChatTag::Yell => "yell",
            ChatTag::Shout => "shout",
            ChatTag::Emote => "emote",
            ChatTag::Tell => "tell",
            ChatTag::FreeCompany => "freecompany",
            ChatTag::Linkshell => "linkshell",
            ChatTag::Command => "command",
        }
    }

    /// Chat tags are enumerated and may be wrapped out-of-character;
    /// commands are left alone.
    pub fn is_chat(self) -> bool {
        self != ChatTag::Command
    }
}

impl std::fmt::Display for ChatTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChatTag {
    type Err = ClassifyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        ChatTag::ALL
            .into_iter()
            .find(|t| t.as_str() == wanted)
            .ok_or_else(|| ClassifyError::UnknownTag(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassifyError {
    #[error("malformed log line: {0:?}")]
    MalformedLogLine(String),

    #[error("unknown chat tag '{0}'")]
    UnknownTag(String),
}

// ─── Unit tests ──────────────────────────────────────────────────────────────
