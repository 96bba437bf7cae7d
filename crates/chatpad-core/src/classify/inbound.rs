use std::sync::OnceLock;

use regex::{Captures, Regex};
use serde::Serialize;

use super::{ChatTag, ClassifyError};

/// Character name as it appears in the chat log.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Speaker {
    pub first: String,
    pub last: String,
    /// Home world including the leading `@`; absent for same-world speakers.
    pub server: Option<String>,
}

impl Speaker {
    /// `First Last`, the identity used for filtering.
    pub fn name(&self) -> String {
        format!("{} {}", self.first, self.last)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TellDirection {
    /// Sent by us; the speaker is the recipient.
    To,
    /// Received; the speaker is the sender.
    From,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "tag", rename_all = "lowercase")]
pub enum InboundKind {
    Say,
    Party,
    Yell,
    Shout,
    Emote,
    Tell { direction: TellDirection },
    FreeCompany,
    Linkshell { channel: u8, cross_world: bool },
}

impl InboundKind {
    pub fn tag(&self) -> ChatTag {
        match self {
            InboundKind::Say => ChatTag::Say,
            InboundKind::Party => ChatTag::Party,
            InboundKind::Yell => ChatTag::Yell,
            InboundKind::Shout => ChatTag::Shout,
            InboundKind::Emote => ChatTag::Emote,
            InboundKind::Tell { .. } => ChatTag::Tell,
            InboundKind::FreeCompany => ChatTag::FreeCompany,
            InboundKind::Linkshell { .. } => ChatTag::Linkshell,
        }
    }
}

/// One parsed chat-log record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatLogLine {
    /// Contents of the leading `[…]` timestamp, without brackets.
    pub timestamp: Option<String>,
    pub kind: InboundKind,
    pub speaker: Speaker,
    pub body: String,
}

impl ChatLogLine {
    pub fn tag(&self) -> ChatTag {
        self.kind.tag()
    }
}

#[derive(Debug, Clone, Copy)]
enum Shape {
    TellTo,
    TellFrom,
    Party,
    FreeCompany,
    Linkshell,
    Yell,
    Shout,
    Say,
    Emote,
}

struct InboundPattern {
    shape: Shape,
    re: Regex,
}

/// Player names: capitalised words that may contain apostrophes and hyphens.
const NAME: &str = r"(?P<first>[A-Z][A-Za-z'\-]*) (?P<last>[A-Z][A-Za-z'\-]*)(?P<server>@[A-Za-z]+)?";

fn timestamp_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // A colon separates a timestamp from channel markers such as `[1]` or `[FC]`.
    RE.get_or_init(|| Regex::new(r"^\[(?P<stamp>[^\]]*:[^\]]*)\]\s*").expect("timestamp pattern is valid"))
}

fn inbound_table() -> &'static [InboundPattern] {
    static TABLE: OnceLock<Vec<InboundPattern>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let marker = r"[^A-Za-z>)]*";
        [
            (Shape::TellTo, format!(r"^>>\s*{NAME}:\s?(?P<body>.*)$")),
            (Shape::TellFrom, format!(r"^{NAME} >>\s?(?P<body>.*)$")),
            (Shape::Party, format!(r"^\({marker}{NAME}\)\s?(?P<body>.*)$")),
            (Shape::FreeCompany, format!(r"^\[FC\]<{marker}{NAME}>\s?(?P<body>.*)$")),
            (
                Shape::Linkshell,
                format!(r"^\[(?:(?P<cwls>CWLS)|LS)?(?P<channel>[0-9])\]<{marker}{NAME}>\s?(?P<body>.*)$"),
            ),
            (Shape::Yell, format!(r"^{NAME} yells:\s?(?P<body>.*)$")),
            (Shape::Shout, format!(r"^{NAME} shouts:\s?(?P<body>.*)$")),
            (Shape::Say, format!(r"^{NAME}:\s?(?P<body>.*)$")),
            (Shape::Emote, format!(r"^{NAME} (?P<body>\S.*)$")),
        ]
        .into_iter()
        .map(|(shape, pattern)| InboundPattern {
            shape,
            re: Regex::new(&pattern).expect("inbound pattern table is valid"),
        })
        .collect()
    })
}

/// Parse one chat-log line.
///
/// Log lines are written by the game client and assumed well-formed, so a
/// line that matches no pattern is reported as
/// [`ClassifyError::MalformedLogLine`] instead of being guessed at.
///
/// ```
/// use chatpad_core::{classify_log_line, ChatTag};
///
/// let line = classify_log_line("[2024-01-01 12:00] Jane Doe@Server: hi").unwrap();
/// assert_eq!(line.tag(), ChatTag::Say);
/// assert_eq!(line.speaker.server.as_deref(), Some("@Server"));
/// assert_eq!(line.body, "hi");
/// ```
pub fn classify_log_line(raw: &str) -> Result<ChatLogLine, ClassifyError> {
    let line = raw.trim_end_matches(['\r', '\n']);

    let (timestamp, rest) = match timestamp_re().captures(line) {
        Some(caps) => {
            let whole = caps.get(0).map(|m| m.end()).unwrap_or(0);
            (caps.name("stamp").map(|m| m.as_str().trim().to_string()), &line[whole..])
        }
        None => (None, line),
    };

    for pattern in inbound_table() {
        if let Some(caps) = pattern.re.captures(rest) {
            return Ok(build(pattern.shape, &caps, timestamp));
        }
    }
    Err(ClassifyError::MalformedLogLine(raw.to_string()))
}

fn build(shape: Shape, caps: &Captures<'_>, timestamp: Option<String>) -> ChatLogLine {
    let text = |name: &str| caps.name(name).map(|m| m.as_str().to_string()).unwrap_or_default();
    let kind = match shape {
        Shape::TellTo => InboundKind::Tell { direction: TellDirection::To },
        Shape::TellFrom => InboundKind::Tell { direction: TellDirection::From },
        Shape::Party => InboundKind::Party,
        Shape::FreeCompany => InboundKind::FreeCompany,
        Shape::Linkshell => InboundKind::Linkshell {
            channel: text("channel").parse().unwrap_or(0),
            cross_world: caps.name("cwls").is_some(),
        },
        Shape::Yell => InboundKind::Yell,
        Shape::Shout => InboundKind::Shout,
        Shape::Say => InboundKind::Say,
        Shape::Emote => InboundKind::Emote,
    };
    ChatLogLine {
        timestamp,
        kind,
        speaker: Speaker {
            first: text("first"),
            last: text("last"),
            server: caps.name("server").map(|m| m.as_str().to_string()),
        },
        body: text("body"),
    }
}

// ─── Unit tests ──────────────────────────────────────────────────────────────
