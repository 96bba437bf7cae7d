/// Persistent pad draft.
///
/// The text being composed is kept in `~/.local/share/chatpad/pad.txt`
/// (XDG data directory) so it survives restarts.  Export and import copy a
/// draft to or from any other file.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

// ─── Directory ───────────────────────────────────────────────────────────────

/// Returns the directory where chatpad keeps its draft.
///
/// Defaults to `$XDG_DATA_HOME/chatpad` (i.e. `~/.local/share/chatpad`).
pub fn draft_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".local")
                .join("share")
        })
        .join("chatpad")
}

pub fn draft_path() -> PathBuf {
    draft_dir().join("pad.txt")
}

// ─── Save / load ─────────────────────────────────────────────────────────────

/// Writes `text` as the current draft and returns the path written.
pub fn save_draft(text: &str) -> Result<PathBuf> {
    let path = draft_path();
    export_to(&path, text)?;
    Ok(path)
}

/// The saved draft, or an empty string when none has been saved yet.
pub fn load_draft() -> Result<String> {
    load_or_empty(&draft_path())
}

fn load_or_empty(path: &Path) -> Result<String> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(text),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no saved draft");
            Ok(String::new())
        }
        Err(e) => Err(e).with_context(|| format!("reading draft {}", path.display())),
    }
}

// ─── Export / import ─────────────────────────────────────────────────────────

/// Writes `text` to `path`, creating parent directories as needed.
pub fn export_to(path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating directory {}", parent.display()))?;
    }
    fs::write(path, text).with_context(|| format!("writing draft to {}", path.display()))?;
    debug!(path = %path.display(), bytes = text.len(), "draft written");
    Ok(())
}

/// Reads a draft from `path`.  Unlike [`load_draft`] a missing file is an
/// error.
pub fn import_from(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("reading draft {}", path.display()))
}

// ─── Unit tests ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_path_ends_with_pad_file() {
        let path = draft_path();
        assert!(path.ends_with("chatpad/pad.txt"), "{}", path.display());
    }

    #[test]
    fn export_then_import_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("scene.txt");
        export_to(&path, "hello\n/em waves\n").unwrap();
        assert_eq!(import_from(&path).unwrap(), "hello\n/em waves\n");
    }

    #[test]
    fn import_of_missing_file_fails_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.txt");
        let err = import_from(&path).unwrap_err();
        assert!(format!("{err:#}").contains("absent.txt"));
    }

    #[test]
    fn missing_draft_loads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(load_or_empty(&dir.path().join("pad.txt")).unwrap(), "");
    }

    #[test]
    fn unreadable_draft_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the file should be.
        assert!(load_or_empty(dir.path()).is_err());
    }
}
