// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use serde::{Deserialize, Serialize};

/// Serde default helper for flags that are on unless switched off.
fn default_true() -> bool {
    true
}

fn default_prefix() -> String {
    "/say".into()
}

fn default_poll_interval_ms() -> u64 {
    1000
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub format: FormatterSettings,
    #[serde(default)]
    pub filters: FilterConfig,
    #[serde(default)]
    pub tail: TailConfig,
    #[serde(default)]
    pub draft: DraftConfig,
}

/// Options that change how a pad buffer is cut into chat messages.
///
/// The formatter only ever reads these; writes go through
/// [`SettingsStore`](crate::SettingsStore) so that they are persisted and
/// announced to subscribers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FormatterSettings {
    /// Wrap every chat message body in `((…))`.
    #[serde(default)]
    pub out_of_character: bool,
    /// Replace `--` with an em-dash before segmenting.
    #[serde(default = "default_true")]
    pub em_dash_convert: bool,
    /// Spellcheck hint for editors embedding the pad.  Not used by the
    /// formatter itself.
    #[serde(default = "default_true")]
    pub spellcheck: bool,
    /// Chat prefix used for lines that do not start with their own
    /// slash-command, e.g. `/say`, `/p` or `/tell Jane Doe@Server`.
    #[serde(default = "default_prefix")]
    pub default_prefix: String,
}

impl Default for FormatterSettings {
    fn default() -> Self {
        Self {
            out_of_character: false,
            em_dash_convert: true,
            spellcheck: true,
            default_prefix: default_prefix(),
        }
    }
}

/// Which chat-log records a viewer should hide.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FilterConfig {
    /// Classification tags to hide, e.g. `["shout", "yell"]`.
    #[serde(default)]
    pub hidden_tags: Vec<String>,
    /// Speakers to hide, written as `First Last`.
    #[serde(default)]
    pub hidden_speakers: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TailConfig {
    /// Chat log followed by `chatpad tail` when no file is given.
    /// `~` and environment variables are expanded.
    #[serde(default)]
    pub path: Option<String>,
    /// Interval between two reads of the followed file.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl Default for TailConfig {
    fn default() -> Self {
        Self { path: None, poll_interval_ms: default_poll_interval_ms() }
    }
}

impl TailConfig {
    /// The configured log path with `~` and `$VARS` expanded.
    pub fn expanded_path(&self) -> Option<std::path::PathBuf> {
        self.path.as_deref().map(|p| {
            let expanded = shellexpand::full(p)
                .map(|s| s.into_owned())
                .unwrap_or_else(|_| p.to_string());
            std::path::PathBuf::from(expanded)
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DraftConfig {
    /// Keep the pad read by `chatpad format` as the current draft.
    #[serde(default = "default_true")]
    pub autosave: bool,
}

impl Default for DraftConfig {
    fn default() -> Self {
        Self { autosave: true }
    }
}

// ─── Unit tests ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let cfg: Config = toml::from_str("").unwrap();
        assert_eq!(cfg, Config::default());
        assert!(cfg.format.em_dash_convert);
        assert!(!cfg.format.out_of_character);
        assert_eq!(cfg.format.default_prefix, "/say");
        assert_eq!(cfg.tail.poll_interval_ms, 1000);
    }

    #[test]
    fn partial_format_table_keeps_other_defaults() {
        let cfg: Config = toml::from_str("[format]\nout_of_character = true").unwrap();
        assert!(cfg.format.out_of_character);
        assert!(cfg.format.spellcheck);
        assert!(cfg.draft.autosave);
    }

    #[test]
    fn tail_path_expands_home() {
        let tail = TailConfig { path: Some("~/chat.log".into()), ..TailConfig::default() };
        let expanded = tail.expanded_path().unwrap();
        if dirs::home_dir().is_some() {
            assert!(!expanded.to_string_lossy().starts_with('~'));
        }
        assert!(expanded.ends_with("chat.log"));
    }

    #[test]
    fn filters_round_trip_through_toml() {
        let cfg = Config {
            filters: FilterConfig {
                hidden_tags: vec!["shout".into()],
                hidden_speakers: vec!["Jane Doe".into()],
            },
            ..Config::default()
        };
        let text = toml::to_string(&cfg).unwrap();
        let back: Config = toml::from_str(&text).unwrap();
        assert_eq!(back.filters, cfg.filters);
    }
}
