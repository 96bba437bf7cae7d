use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::debug;

use crate::Config;

/// Ordered list of config file locations searched from lowest to highest priority.
/// Later files override earlier ones.
fn config_search_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    // 1. System-wide default
    paths.push(PathBuf::from("/etc/chatpad/config.toml"));

    // 2. XDG / home
    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".config/chatpad/config.toml"));
    }
    if let Some(cfg) = dirs::config_dir() {
        paths.push(cfg.join("chatpad/config.toml"));
    }

    // 3. Settings saved by `chatpad set`
    if let Some(saved) = settings_path() {
        paths.push(saved);
    }

    // 4. Working directory
    paths.push(PathBuf::from(".chatpad/config.toml"));
    paths.push(PathBuf::from("chatpad.toml"));

    paths.dedup();
    paths
}

/// Where `chatpad set` persists formatter settings.
pub fn settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("chatpad").join("settings.toml"))
}

/// Load configuration by merging all discovered TOML files.
/// The `extra` argument may provide an explicit path (e.g. `--config` CLI flag).
///
/// Persisted settings (see [`settings_path`]) sit above the user's config
/// files and below the working-directory ones, so a project's
/// `chatpad.toml` still wins over a global `chatpad set`.
pub fn load(extra: Option<&Path>) -> anyhow::Result<Config> {
    load_layers(&config_search_paths(), extra)
}

pub(crate) fn load_layers(layers: &[PathBuf], extra: Option<&Path>) -> anyhow::Result<Config> {
    let mut merged = toml::Value::Table(toml::map::Map::new());

    for path in layers {
        if path.is_file() {
            debug!(path = %path.display(), "loading config layer");
            merge_toml(&mut merged, read_layer(path)?);
        }
    }

    if let Some(p) = extra {
        debug!(path = %p.display(), "loading explicit config");
        merge_toml(&mut merged, read_layer(p)?);
    }

    let config: Config = merged
        .try_into()
        .context("config layers do not form a valid chatpad configuration")?;
    Ok(config)
}

fn read_layer(path: &Path) -> anyhow::Result<toml::Value> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

/// Deep-merge `src` into `dst`; src wins on scalar conflicts.
fn merge_toml(dst: &mut toml::Value, src: toml::Value) {
    match (dst, src) {
        (toml::Value::Table(d), toml::Value::Table(s)) => {
            for (k, v) in s {
                match d.get_mut(&k) {
                    Some(existing) => merge_toml(existing, v),
                    None => {
                        d.insert(k, v);
                    }
                }
            }
        }
        (dst, src) => *dst = src,
    }
}

// ─── Unit tests ──────────────────────────────────────────────────────────────
