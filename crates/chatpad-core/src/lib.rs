// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Message segmentation and classification for chat pads.
//!
//! [`format`] turns a free-form, multi-line pad into chat messages that each
//! fit the [`LIMIT`](size::LIMIT), [`classify`] labels an outbound message
//! with its chat channel, [`classify_log_line`] parses an inbound chat-log
//! line and [`focus_index`] tells a preview which message changed.  All of
//! them are pure functions of their arguments.
pub mod batch;
pub mod classify;
pub mod focus;
pub mod prefix;
pub mod segment;
pub mod size;

pub use batch::{format, strip_enumeration, Segment};
pub use classify::{
    classify, classify_log_line, ChatLogLine, ChatTag, Classification, ClassifyError, InboundKind,
    Speaker, TellDirection, TellTarget,
};
pub use focus::{focus_index, FocusState};
pub use prefix::{resolve, ResolvedLine, PLACEHOLDER_PREFIX};
pub use segment::{segment_line, CONTINUATION_MARKER};
pub use size::{byte_length, ENUM_OVERHEAD, LIMIT};
