// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Background follower for a chat log.
//!
//! [`LogWatch::spawn`] polls the file on a fixed interval and forwards every
//! newly appended line as a [`TailEvent`].  The task stops when
//! [`LogWatch::close`] is called, when the handle is dropped, or when the
//! receiver goes away.

use std::path::PathBuf;
use std::time::Duration;

use chatpad_core::{ChatLogLine, ClassifyError};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use crate::filter::LogFilter;
use crate::log::LogTail;
use crate::tail::TailCursor;

const CHANNEL_CAPACITY: usize = 256;

#[derive(Debug, Clone, PartialEq)]
pub enum TailEvent {
    Line(ChatLogLine),
    Malformed(ClassifyError),
    /// The file shrank; following restarted from its beginning.
    Truncated,
    /// Reading failed.  Sent once per distinct error; polling continues.
    Failed(String),
}

/// Handle to a running log follower.
#[derive(Debug)]
pub struct LogWatch {
    stop: Option<oneshot::Sender<()>>,
    task: JoinHandle<LogTail>,
}

impl LogWatch {
    /// Follow `path` starting at `cursor`, checking every `interval`.
    pub fn spawn(
        path: PathBuf,
        cursor: TailCursor,
        interval: Duration,
        filter: LogFilter,
    ) -> (Self, mpsc::Receiver<TailEvent>) {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        let (stop_tx, stop_rx) = oneshot::channel();
        let task = tokio::spawn(run(path, cursor, interval, filter, tx, stop_rx));
        (Self { stop: Some(stop_tx), task }, rx)
    }

    /// Stop polling and return the parser, with the speakers it collected.
    pub async fn close(mut self) -> LogTail {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        match (&mut self.task).await {
            Ok(tail) => tail,
            Err(e) => {
                warn!("log watch task failed: {e}");
                LogTail::default()
            }
        }
    }
}

async fn run(
    path: PathBuf,
    mut cursor: TailCursor,
    interval: Duration,
    filter: LogFilter,
    tx: mpsc::Sender<TailEvent>,
    mut stop_rx: oneshot::Receiver<()>,
) -> LogTail {
    let mut parser = LogTail::new();
    let mut last_error: Option<String> = None;
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    debug!(path = %path.display(), offset = cursor.offset(), ?interval, "following log");

    loop {
        tokio::select! {
            biased;

            _ = &mut stop_rx => break,

            _ = ticker.tick() => {
                let mut events = Vec::new();
                match cursor.read_new(&path) {
                    Ok(chunk) => {
                        last_error = None;
                        if chunk.truncated {
                            parser.reset();
                            events.push(TailEvent::Truncated);
                        }
                        if !chunk.is_empty() {
                            for result in parser.ingest(&chunk.text) {
                                match result {
                                    Ok(line) if filter.allows(&line) => events.push(TailEvent::Line(line)),
                                    Ok(_) => {}
                                    Err(e) => events.push(TailEvent::Malformed(e)),
                                }
                            }
                        }
                    }
                    Err(e) => {
                        let message = format!("{e:#}");
                        if last_error.as_deref() != Some(message.as_str()) {
                            warn!("{message}");
                            events.push(TailEvent::Failed(message.clone()));
                            last_error = Some(message);
                        }
                    }
                }
                for event in events {
                    if tx.send(event).await.is_err() {
                        debug!("log watch receiver dropped");
                        return parser;
                    }
                }
            }
        }
    }
    debug!(parsed = parser.parsed(), malformed = parser.malformed(), "log watch stopped");
    parser
}

// ─── Unit tests ──────────────────────────────────────────────────────────────
