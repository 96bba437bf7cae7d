// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
mod filter;
mod log;
mod tail;
mod watch;
pub mod draft;

pub use filter::LogFilter;
pub use log::LogTail;
pub use tail::{read_log, TailChunk, TailCursor};
pub use watch::{LogWatch, TailEvent};
