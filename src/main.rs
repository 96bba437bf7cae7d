mod cli;

use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use tracing::{debug, warn};
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use chatpad_config::{Config, FormatterSettings, SettingKey, SettingsStore};
use chatpad_core::{classify, format, ChatLogLine, Classification, InboundKind, Segment, LIMIT};
use chatpad_input::{draft, read_log, LogFilter, LogTail, LogWatch, TailCursor, TailEvent};
use clap::Parser;
use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    if let Commands::Completions { shell } = &cli.command {
        cli::print_completions(*shell);
        return Ok(());
    }

    let config = chatpad_config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Format { file, prefix, ooc, no_em_dash, json, save_draft } => {
            let opts = FormatOptions { file, prefix, ooc, no_em_dash, json, save_draft };
            format_cmd(&config, opts)
        }
        Commands::Classify { text } => {
            print_classification(&classify(&text));
            Ok(())
        }
        Commands::ParseLog { file, json } => parse_log_cmd(&file, json),
        Commands::Tail { file, interval_ms, from_start } => {
            tail_cmd(&config, file, interval_ms, from_start).await
        }
        Commands::Set { key, value } => set_cmd(&key, &value),
        Commands::ShowConfig => {
            println!("{}", serde_yaml::to_string(&config).unwrap_or_default());
            Ok(())
        }
        Commands::Completions { .. } => Ok(()),
    }
}

// ─── format ──────────────────────────────────────────────────────────────────

struct FormatOptions {
    file: Option<PathBuf>,
    prefix: Option<String>,
    ooc: bool,
    no_em_dash: bool,
    json: bool,
    save_draft: bool,
}

fn format_cmd(config: &Config, opts: FormatOptions) -> anyhow::Result<()> {
    let (raw, from_draft) = match &opts.file {
        Some(path) => (draft::import_from(path)?, false),
        None if !is_stdin_tty() => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf).context("reading pad from stdin")?;
            (buf, false)
        }
        None => (draft::load_draft()?, true),
    };

    if opts.save_draft || (config.draft.autosave && !from_draft) {
        let path = draft::save_draft(&raw)?;
        debug!(path = %path.display(), "draft saved");
    }

    let settings = FormatterSettings {
        out_of_character: opts.ooc || config.format.out_of_character,
        em_dash_convert: config.format.em_dash_convert && !opts.no_em_dash,
        ..config.format.clone()
    };
    let prefix = opts.prefix.as_deref().unwrap_or(&settings.default_prefix);
    let segments = format(&raw, prefix, &settings);

    if opts.json {
        println!("{}", serde_json::to_string_pretty(&segments)?);
    } else {
        print_segments(&segments);
    }
    Ok(())
}

fn print_segments(segments: &[Segment]) {
    let total = segments.len();
    for (i, segment) in segments.iter().enumerate() {
        let mark = if segment.oversized { " OVER LIMIT" } else { "" };
        println!(
            "{:>2}/{total} {:>3}/{LIMIT}B {:<11}{mark}  {}",
            i + 1,
            segment.byte_length,
            segment.tag().as_str(),
            segment.text
        );
    }
}

// ─── classify ────────────────────────────────────────────────────────────────

fn print_classification(classification: &Classification) {
    println!("{}", classification.tag());
    match classification {
        Classification::Tell { target } => println!("  target: {target}"),
        Classification::Linkshell { channel, cross_world } => {
            println!("  channel: {channel}");
            println!("  cross-world: {cross_world}");
        }
        _ => {}
    }
}

// ─── parse-log / tail ────────────────────────────────────────────────────────

fn render_log_line(line: &ChatLogLine) -> String {
    let stamp = line.timestamp.as_deref().map(|t| format!("[{t}] ")).unwrap_or_default();
    let server = line.speaker.server.as_deref().unwrap_or("");
    let channel = match &line.kind {
        InboundKind::Tell { direction } => format!("tell {direction:?}").to_lowercase(),
        InboundKind::Linkshell { channel, cross_world: true } => format!("cwls{channel}"),
        InboundKind::Linkshell { channel, cross_world: false } => format!("ls{channel}"),
        other => other.tag().to_string(),
    };
    format!("{stamp}[{channel}] {}{server}: {}", line.speaker.name(), line.body)
}

fn parse_log_cmd(file: &Path, json: bool) -> anyhow::Result<()> {
    let text = read_log(file)?;

    let mut tail = LogTail::new();
    for result in tail.ingest(&text) {
        match result {
            Ok(line) if json => println!("{}", serde_json::to_string(&line)?),
            Ok(line) => println!("{}", render_log_line(&line)),
            Err(e) => eprintln!("{e}"),
        }
    }

    let speakers: Vec<&str> = tail.known_speakers().collect();
    eprintln!(
        "{} lines parsed, {} malformed, {} speakers",
        tail.parsed(),
        tail.malformed(),
        speakers.len()
    );
    if !json && !speakers.is_empty() {
        println!("\nSpeakers:");
        for name in speakers {
            println!("  {name}");
        }
    }
    Ok(())
}

async fn tail_cmd(
    config: &Config,
    file: Option<PathBuf>,
    interval_ms: Option<u64>,
    from_start: bool,
) -> anyhow::Result<()> {
    let path = file
        .or_else(|| config.tail.expanded_path())
        .context("no log file given and tail.path is not configured")?;
    let interval = Duration::from_millis(interval_ms.unwrap_or(config.tail.poll_interval_ms).max(1));

    let cursor = if from_start {
        TailCursor::new()
    } else {
        TailCursor::at_end(&path)?
    };
    let filter = LogFilter::from_config(&config.filters);
    if !filter.is_empty() {
        debug!(filters = ?config.filters, "hiding filtered log lines");
    }
    let (watch, mut rx) = LogWatch::spawn(path.clone(), cursor, interval, filter);
    eprintln!("Following {} (Ctrl+C to stop)", path.display());

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            event = rx.recv() => match event {
                Some(TailEvent::Line(line)) => println!("{}", render_log_line(&line)),
                Some(TailEvent::Malformed(e)) => warn!("{e}"),
                Some(TailEvent::Truncated) => eprintln!("-- log truncated, restarting --"),
                Some(TailEvent::Failed(message)) => eprintln!("error: {message}"),
                None => break,
            },
        }
    }

    let tail = watch.close().await;
    eprintln!("{} lines, {} speakers", tail.parsed(), tail.known_speakers().count());
    Ok(())
}

// ─── set ─────────────────────────────────────────────────────────────────────

fn set_cmd(key: &str, value: &str) -> anyhow::Result<()> {
    let key: SettingKey = key.parse()?;
    let path = chatpad_config::settings_path().context("no configuration directory available")?;

    let mut store = SettingsStore::open(path)?;
    store.subscribe(key, move |settings| {
        debug!(?settings, "setting '{key}' changed");
    });
    store.set_from_str(key, value)?;

    println!("{key} = {value}");
    if let Some(path) = store.path() {
        println!("Saved to {}", path.display());
    }
    Ok(())
}

// ─── Startup ─────────────────────────────────────────────────────────────────

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn is_stdin_tty() -> bool {
    #[cfg(unix)]
    {
        use std::os::unix::io::AsRawFd;
        unsafe { libc::isatty(io::stdin().as_raw_fd()) != 0 }
    }
    #[cfg(not(unix))]
    {
        false
    }
}
