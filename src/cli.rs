// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "chatpad",
    about = "Split role-play text into chat-sized messages and follow chat logs",
    version,
    long_about = None,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config file (overrides auto-discovery)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v = debug, -vv = trace)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Format a pad into messages, one per output line.
    ///
    /// The pad is read from --file, from stdin when it is not a terminal,
    /// or from the saved draft otherwise.
    Format {
        /// Read the pad from this file
        #[arg(long, short = 'f')]
        file: Option<PathBuf>,
        /// Prefix for lines without their own command (default from config)
        #[arg(long, short = 'p')]
        prefix: Option<String>,
        /// Wrap chat messages in (( )) for out-of-character talk
        #[arg(long)]
        ooc: bool,
        /// Keep "--" as typed instead of converting it to an em dash
        #[arg(long)]
        no_em_dash: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
        /// Save the pad as the current draft
        #[arg(long)]
        save_draft: bool,
    },
    /// Show which chat channel a message would be sent to
    Classify {
        #[arg(value_name = "TEXT")]
        text: String,
    },
    /// Parse every line of a chat log
    ParseLog {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Output as JSON lines
        #[arg(long)]
        json: bool,
    },
    /// Follow a growing chat log until interrupted
    Tail {
        /// Log file (default: tail.path from config)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
        /// Poll interval in milliseconds (default: tail.poll_interval_ms)
        #[arg(long, value_name = "MS")]
        interval_ms: Option<u64>,
        /// Read the whole file first instead of only new lines
        #[arg(long)]
        from_start: bool,
    },
    /// Change a formatter setting and save it (keys: ooc, em-dash, spellcheck, prefix)
    Set {
        #[arg(value_name = "KEY")]
        key: String,
        #[arg(value_name = "VALUE")]
        value: String,
    },
    /// Print the effective configuration and exit
    ShowConfig,
    /// Generate shell completion script
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

pub fn print_completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "chatpad", &mut std::io::stdout());
}

// ─── Unit tests ──────────────────────────────────────────────────────────────
