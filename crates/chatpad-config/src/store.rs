// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Persisted, observable formatter settings.
//!
//! Every write is an explicit three-step command: the field is set, the
//! whole settings record is written to disk, and only then are the
//! subscribers registered for that key called with the new settings.  A
//! failed write stops the command before anyone is notified.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error};

use crate::FormatterSettings;

/// A single user-editable formatter setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingKey {
    OutOfCharacter,
    EmDashConvert,
    Spellcheck,
    DefaultPrefix,
}

impl SettingKey {
    pub const ALL: [SettingKey; 4] = [
        SettingKey::OutOfCharacter,
        SettingKey::EmDashConvert,
        SettingKey::Spellcheck,
        SettingKey::DefaultPrefix,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SettingKey::OutOfCharacter => "ooc",
            SettingKey::EmDashConvert => "em-dash",
            SettingKey::Spellcheck => "spellcheck",
            SettingKey::DefaultPrefix => "prefix",
        }
    }
}

impl std::fmt::Display for SettingKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SettingKey {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ooc" | "out-of-character" | "out_of_character" => Ok(SettingKey::OutOfCharacter),
            "em-dash" | "emdash" | "em_dash_convert" => Ok(SettingKey::EmDashConvert),
            "spellcheck" => Ok(SettingKey::Spellcheck),
            "prefix" | "default_prefix" => Ok(SettingKey::DefaultPrefix),
            _ => Err(SettingsError::UnknownKey(s.to_string())),
        }
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("unknown setting '{0}' (expected one of: ooc, em-dash, spellcheck, prefix)")]
    UnknownKey(String),

    #[error("setting '{key}' expects {expected}, got '{value}'")]
    InvalidValue { key: SettingKey, expected: &'static str, value: String },

    #[error("could not read settings from '{0}': {1}")]
    Read(PathBuf, #[source] std::io::Error),

    #[error("could not parse settings in '{0}': {1}")]
    Decode(PathBuf, #[source] toml::de::Error),

    #[error("could not save settings to '{0}': {1}")]
    Persist(PathBuf, #[source] std::io::Error),

    #[error("could not encode settings: {0}")]
    Encode(#[from] toml::ser::Error),
}

/// The on-disk shape of persisted settings: a single `[format]` table, so
/// the file can also be merged as an ordinary config layer.
#[derive(Serialize, Deserialize)]
struct SettingsFile {
    #[serde(default)]
    format: FormatterSettings,
}

type Subscriber = Box<dyn Fn(&FormatterSettings) + Send + Sync>;

/// Owner of the live [`FormatterSettings`].
pub struct SettingsStore {
    settings: FormatterSettings,
    path: Option<PathBuf>,
    subscribers: Vec<(SettingKey, Subscriber)>,
}

impl std::fmt::Debug for SettingsStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsStore")
            .field("settings", &self.settings)
            .field("path", &self.path)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl SettingsStore {
    /// Store backed by `path`.  Writes create the parent directory if needed.
    pub fn new(settings: FormatterSettings, path: impl Into<PathBuf>) -> Self {
        Self { settings, path: Some(path.into()), subscribers: Vec::new() }
    }

    /// Store backed by `path`, starting from what was saved there before,
    /// or from the defaults when nothing has been saved yet.
    ///
    /// Only this file is read.  Values merged in from other config layers
    /// never end up in it.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SettingsError> {
        let path = path.into();
        let settings = match std::fs::read_to_string(&path) {
            Ok(text) => {
                toml::from_str::<SettingsFile>(&text)
                    .map_err(|e| SettingsError::Decode(path.clone(), e))?
                    .format
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => FormatterSettings::default(),
            Err(e) => return Err(SettingsError::Read(path, e)),
        };
        debug!(path = %path.display(), "opened settings");
        Ok(Self::new(settings, path))
    }

    /// Store that keeps settings in memory only.
    pub fn in_memory(settings: FormatterSettings) -> Self {
        Self { settings, path: None, subscribers: Vec::new() }
    }

    pub fn settings(&self) -> &FormatterSettings {
        &self.settings
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Register `callback` to run after `key` has been set and persisted.
    pub fn subscribe<F>(&mut self, key: SettingKey, callback: F)
    where
        F: Fn(&FormatterSettings) + Send + Sync + 'static,
    {
        self.subscribers.push((key, Box::new(callback)));
    }

    /// Parse `raw` for `key` and apply it with [`set`](Self::set).
    pub fn set_from_str(&mut self, key: SettingKey, raw: &str) -> Result<(), SettingsError> {
        let value = match key {
            SettingKey::DefaultPrefix => SettingValue::Text(raw.trim().to_string()),
            _ => SettingValue::Flag(parse_flag(key, raw)?),
        };
        self.set(key, value)
    }

    /// Set, persist, notify.
    pub fn set(&mut self, key: SettingKey, value: SettingValue) -> Result<(), SettingsError> {
        let previous = self.settings.clone();
        apply(&mut self.settings, key, value)?;

        if let Err(e) = self.persist() {
            error!(setting = %key, error = %e, "failed to save setting");
            self.settings = previous;
            return Err(e);
        }

        debug!(setting = %key, "setting updated");
        for (_, callback) in self.subscribers.iter().filter(|(k, _)| *k == key) {
            callback(&self.settings);
        }
        Ok(())
    }

    /// Write the current settings to the backing file, if any.
    pub fn persist(&self) -> Result<(), SettingsError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let text = toml::to_string_pretty(&SettingsFile { format: self.settings.clone() })?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| SettingsError::Persist(path.clone(), e))?;
        }
        std::fs::write(path, text).map_err(|e| SettingsError::Persist(path.clone(), e))
    }
}

/// A typed value for a [`SettingKey`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingValue {
    Flag(bool),
    Text(String),
}

fn apply(settings: &mut FormatterSettings, key: SettingKey, value: SettingValue) -> Result<(), SettingsError> {
    match (key, value) {
        (SettingKey::OutOfCharacter, SettingValue::Flag(b)) => settings.out_of_character = b,
        (SettingKey::EmDashConvert, SettingValue::Flag(b)) => settings.em_dash_convert = b,
        (SettingKey::Spellcheck, SettingValue::Flag(b)) => settings.spellcheck = b,
        (SettingKey::DefaultPrefix, SettingValue::Text(t)) => settings.default_prefix = t,
        (key, SettingValue::Text(t)) => {
            return Err(SettingsError::InvalidValue { key, expected: "true or false", value: t })
        }
        (key, SettingValue::Flag(b)) => {
            return Err(SettingsError::InvalidValue { key, expected: "text", value: b.to_string() })
        }
    }
    Ok(())
}

fn parse_flag(key: SettingKey, raw: &str) -> Result<bool, SettingsError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Ok(true),
        "false" | "off" | "no" | "0" => Ok(false),
        _ => Err(SettingsError::InvalidValue { key, expected: "true or false", value: raw.to_string() }),
    }
}

// ─── Unit tests ──────────────────────────────────────────────────────────────
