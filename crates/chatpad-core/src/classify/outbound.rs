use std::sync::OnceLock;

use regex::{Captures, Regex};
use serde::Serialize;

use super::ChatTag;

/// Recipient of a `/tell`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TellTarget {
    pub first: String,
    pub last: String,
    /// Home world including the leading `@`, e.g. `@Server`.
    pub server: String,
}

impl std::fmt::Display for TellTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}{}", self.first, self.last, self.server)
    }
}

/// Result of classifying an outbound message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "tag", rename_all = "lowercase")]
pub enum Classification {
    Say,
    Party,
    Yell,
    Shout,
    Emote,
    Tell { target: TellTarget },
    FreeCompany,
    Linkshell { channel: u8, cross_world: bool },
    Command,
}

impl Classification {
    pub fn tag(&self) -> ChatTag {
        match self {
            Classification::Say => ChatTag::Say,
            Classification::Party => ChatTag::Party,
            Classification::Yell => ChatTag::Yell,
            Classification::Shout => ChatTag::Shout,
            Classification::Emote => ChatTag::Emote,
            Classification::Tell { .. } => ChatTag::Tell,
            Classification::FreeCompany => ChatTag::FreeCompany,
            Classification::Linkshell { .. } => ChatTag::Linkshell,
            Classification::Command => ChatTag::Command,
        }
    }
}

/// A classification together with the byte length of the addressing part of
/// the message: the slash-command plus, for tells, the recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMatch {
    pub classification: Classification,
    pub address_len: usize,
}

struct OutboundPattern {
    tag: ChatTag,
    re: Regex,
}

fn outbound_table() -> &'static [OutboundPattern] {
    static TABLE: OnceLock<Vec<OutboundPattern>> = OnceLock::new();
    TABLE.get_or_init(|| {
        [
            (ChatTag::Say, r"^/(?:s|say)\s"),
            (ChatTag::Party, r"^/(?:p|party)\s"),
            (ChatTag::Yell, r"^/(?:y|yell)\s"),
            (ChatTag::Shout, r"^/(?:sh|shout)\s"),
            (ChatTag::Emote, r"^/(?:em|emote)\s"),
            (
                ChatTag::Tell,
                r"^/(?:t|tell)\s+(?P<first>\S+)\s+(?P<last>[^\s@]+)(?P<server>@\S+)\s",
            ),
            (ChatTag::FreeCompany, r"^/(?:fc|freecompany)\s"),
            (
                ChatTag::Linkshell,
                r"^/(?:(?P<cwls>cwls|crossworldlinkshell)|ls|linkshell)(?P<channel>[0-9])\s",
            ),
        ]
        .into_iter()
        .map(|(tag, pattern)| OutboundPattern {
            tag,
            re: Regex::new(pattern).expect("outbound pattern table is valid"),
        })
        .collect()
    })
}

/// Classify an outbound message.  Unrecognised text is a
/// [`Classification::Command`]; this never fails.
///
/// ```
/// use chatpad_core::{classify, ChatTag};
///
/// assert_eq!(classify("/p hello").tag(), ChatTag::Party);
/// assert_eq!(classify("hello").tag(), ChatTag::Command);
/// ```
pub fn classify(text: &str) -> Classification {
    match_outbound(text).classification
}

/// Like [`classify`], also reporting where the addressing part ends.
pub fn match_outbound(text: &str) -> OutboundMatch {
    for pattern in outbound_table() {
        let Some(caps) = pattern.re.captures(text) else {
            continue;
        };
        let address_len = address_len(pattern.tag, &caps);
        let classification = build(pattern.tag, &caps);
        return OutboundMatch { classification, address_len };
    }
    OutboundMatch { classification: Classification::Command, address_len: 0 }
}

fn address_len(tag: ChatTag, caps: &Captures<'_>) -> usize {
    match tag {
        ChatTag::Tell => caps.name("server").map(|m| m.end()).unwrap_or(0),
        // The whole match minus the separating whitespace.
        _ => caps.get(0).map(|m| m.as_str().trim_end().len()).unwrap_or(0),
    }
}

fn build(tag: ChatTag, caps: &Captures<'_>) -> Classification {
    let text = |name: &str| caps.name(name).map(|m| m.as_str().to_string()).unwrap_or_default();
    match tag {
        ChatTag::Say => Classification::Say,
        ChatTag::Party => Classification::Party,
        ChatTag::Yell => Classification::Yell,
        ChatTag::Shout => Classification::Shout,
        ChatTag::Emote => Classification::Emote,
        ChatTag::Tell => Classification::Tell {
            target: TellTarget { first: text("first"), last: text("last"), server: text("server") },
        },
        ChatTag::FreeCompany => Classification::FreeCompany,
        ChatTag::Linkshell => Classification::Linkshell {
            channel: text("channel").parse().unwrap_or(0),
            cross_world: caps.name("cwls").is_some(),
        },
        ChatTag::Command => Classification::Command,
    }
}

// ─── Unit tests ──────────────────────────────────────────────────────────────
