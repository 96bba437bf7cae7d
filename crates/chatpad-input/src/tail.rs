// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Incremental reads of a growing log file.
//!
//! A [`TailCursor`] remembers how far into the file it has consumed and
//! only ever returns complete, newline-terminated lines; a partial last
//! line stays in the file until the writer finishes it.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{trace, warn};

/// Text read by one [`TailCursor::read_new`] call.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TailChunk {
    /// Complete lines appended since the previous read, newlines included.
    pub text: String,
    /// The file shrank since the previous read and was re-read from the start.
    pub truncated: bool,
}

impl TailChunk {
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// The whole log at `path`.  Invalid UTF-8 is replaced, the same way
/// [`TailCursor::read_new`] decodes appended text.
pub fn read_log(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).with_context(|| format!("reading chat log {}", path.display()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Byte offset into a followed file.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TailCursor {
    offset: u64,
}

impl TailCursor {
    /// Cursor at the start of the file: the first read returns everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cursor at the current end of `path`, so only lines written from now
    /// on are returned.
    pub fn at_end(path: &Path) -> Result<Self> {
        let len = std::fs::metadata(path)
            .with_context(|| format!("reading metadata of {}", path.display()))?
            .len();
        Ok(Self { offset: len })
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Read the complete lines appended to `path` since the last call.
    ///
    /// A file that is shorter than the cursor has been truncated or
    /// replaced; the cursor then restarts at 0 and the chunk is marked
    /// [`truncated`](TailChunk::truncated).
    pub fn read_new(&mut self, path: &Path) -> Result<TailChunk> {
        let mut file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
        let len = file
            .metadata()
            .with_context(|| format!("reading metadata of {}", path.display()))?
            .len();

        let mut truncated = false;
        if len < self.offset {
            warn!(
                path = %path.display(),
                old_offset = self.offset,
                new_len = len,
                "log shrank, restarting from the beginning"
            );
            self.offset = 0;
            truncated = true;
        }
        if len == self.offset {
            return Ok(TailChunk { text: String::new(), truncated });
        }

        file.seek(SeekFrom::Start(self.offset))
            .with_context(|| format!("seeking in {}", path.display()))?;
        let mut buf = Vec::with_capacity((len - self.offset) as usize);
        file.by_ref()
            .take(len - self.offset)
            .read_to_end(&mut buf)
            .with_context(|| format!("reading {}", path.display()))?;

        let Some(last_newline) = buf.iter().rposition(|&b| b == b'\n') else {
            trace!(pending = buf.len(), "no complete line yet");
            return Ok(TailChunk { text: String::new(), truncated });
        };
        buf.truncate(last_newline + 1);
        self.offset += buf.len() as u64;

        Ok(TailChunk { text: String::from_utf8_lossy(&buf).into_owned(), truncated })
    }
}

// ─── Unit tests ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn append(path: &Path, text: &str) {
        let mut f = std::fs::OpenOptions::new().append(true).create(true).open(path).unwrap();
        f.write_all(text.as_bytes()).unwrap();
    }

    #[test]
    fn reads_only_new_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chat.log");
        append(&path, "one\ntwo\n");

        let mut cursor = TailCursor::new();
        assert_eq!(cursor.read_new(&path).unwrap().text, "one\ntwo\n");
        assert!(cursor.read_new(&path).unwrap().is_empty());

        append(&path, "three\n");
        assert_eq!(cursor.read_new(&path).unwrap().text, "three\n");
        assert_eq!(cursor.offset(), 14);
    }

    #[test]
    fn partial_line_waits_for_its_newline() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chat.log");
        append(&path, "done\nhalf");

        let mut cursor = TailCursor::new();
        assert_eq!(cursor.read_new(&path).unwrap().text, "done\n");
        append(&path, " way\n");
        assert_eq!(cursor.read_new(&path).unwrap().text, "half way\n");
    }

    #[test]
    fn split_multibyte_character_is_not_mangled() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chat.log");
        let dash = "\u{2014}".as_bytes();
        std::fs::write(&path, [b"a".as_slice(), &dash[..1]].concat()).unwrap();

        let mut cursor = TailCursor::new();
        assert!(cursor.read_new(&path).unwrap().is_empty());
        let mut f = std::fs::OpenOptions::new().append(true).open(&path).unwrap();
        f.write_all(&dash[1..]).unwrap();
        f.write_all(b"\n").unwrap();
        assert_eq!(cursor.read_new(&path).unwrap().text, "a\u{2014}\n");
    }

    #[test]
    fn truncation_resets_to_start() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chat.log");
        append(&path, "a long first session\n");

        let mut cursor = TailCursor::new();
        cursor.read_new(&path).unwrap();
        std::fs::write(&path, "new\n").unwrap();

        let chunk = cursor.read_new(&path).unwrap();
        assert!(chunk.truncated);
        assert_eq!(chunk.text, "new\n");
        assert_eq!(cursor.offset(), 4);
    }

    #[test]
    fn at_end_skips_existing_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chat.log");
        append(&path, "old\n");

        let mut cursor = TailCursor::at_end(&path).unwrap();
        assert!(cursor.read_new(&path).unwrap().is_empty());
        append(&path, "fresh\n");
        assert_eq!(cursor.read_new(&path).unwrap().text, "fresh\n");
    }

    #[test]
    fn invalid_utf8_is_replaced_not_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chat.log");
        std::fs::write(&path, b"Aria Moonwhisper: caf\xe9\nBren Stoneheart: ok\n").unwrap();

        let text = read_log(&path).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.contains("caf\u{FFFD}"));
        assert_eq!(TailCursor::new().read_new(&path).unwrap().text, text);
    }

    #[test]
    fn missing_file_is_an_error() {
        let mut cursor = TailCursor::new();
        assert!(cursor.read_new(Path::new("/tmp/chatpad_missing_log_xyz.log")).is_err());
        assert!(read_log(Path::new("/tmp/chatpad_missing_log_xyz.log")).is_err());
    }
}
