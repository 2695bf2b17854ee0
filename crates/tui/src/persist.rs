use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use directories::BaseDirs;
use miniurl_core::link::ShortLink;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::app::App;

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct SavedState {
    pub show_history: bool,
}

impl From<&App> for SavedState {
    fn from(a: &App) -> Self {
        SavedState {
            show_history: a.show_history,
        }
    }
}

pub fn state_path() -> Option<PathBuf> {
    let base = BaseDirs::new()?;
    let dir = base.config_dir().join("miniurl");
    Some(dir.join("ui_state.json"))
}

pub fn load_state() -> Result<Option<SavedState>> {
    let Some(path) = state_path() else {
        return Ok(None);
    };
    if !path.exists() {
        return Ok(None);
    }
    let data = fs::read(&path).with_context(|| format!("read state file: {}", path.display()))?;
    let s: SavedState = serde_json::from_slice(&data).with_context(|| "parse state json")?;
    Ok(Some(s))
}

pub fn save_state(state: &SavedState) -> Result<()> {
    let Some(path) = state_path() else {
        return Ok(());
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).ok();
    }
    let data = serde_json::to_vec_pretty(state)?;
    write_atomically(&path, &data)
}

fn write_atomically(path: &Path, data: &[u8]) -> Result<()> {
    let mut tmp = path.to_path_buf();
    tmp.set_extension("json.tmp");
    {
        let mut f =
            fs::File::create(&tmp).with_context(|| format!("create tmp: {}", tmp.display()))?;
        f.write_all(data)?;
        f.flush()?;
    }
    fs::rename(tmp, path).with_context(|| format!("persist to {}", path.display()))?;
    Ok(())
}

/// The one place link history touches disk. The full list is rewritten after
/// every mutation; a fresh session reads it back in the same order.
pub struct HistoryStore {
    path: Option<PathBuf>,
}

impl HistoryStore {
    pub fn open_default() -> Self {
        let path = BaseDirs::new().map(|b| b.data_dir().join("miniurl").join("history.json"));
        Self { path }
    }

    pub fn at(path: PathBuf) -> Self {
        Self { path: Some(path) }
    }

    // Absent or unreadable history is an empty list, not an error.
    pub fn load(&self) -> Vec<ShortLink> {
        let Some(path) = &self.path else {
            return Vec::new();
        };
        if !path.exists() {
            return Vec::new();
        }
        let data = match fs::read(path) {
            Ok(d) => d,
            Err(e) => {
                warn!(target: "tui", "history read failed: {}", e);
                return Vec::new();
            }
        };
        match serde_json::from_slice(&data) {
            Ok(links) => links,
            Err(e) => {
                warn!(target: "tui", "history unparseable, starting empty: {}", e);
                Vec::new()
            }
        }
    }

    pub fn save(&self, links: &[ShortLink]) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).ok();
        }
        let data = serde_json::to_vec_pretty(links)?;
        write_atomically(path, &data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn link(alias: &str) -> ShortLink {
        ShortLink {
            url: "https://example.com".to_string(),
            tiny_url: format!("https://tinyurl.com/{alias}"),
            created_at: "2024-01-01T00:00:00Z".to_string(),
            domain: "tinyurl.com".to_string(),
            alias: alias.to_string(),
            tags: Vec::new(),
        }
    }

    #[test]
    fn history_round_trips_in_order() {
        let dir = TempDir::new().unwrap();
        let store = HistoryStore::at(dir.path().join("history.json"));
        let links = vec![link("ccccc"), link("bbbbb"), link("aaaaa")];
        store.save(&links).unwrap();
        // A fresh store on the same path plays the part of a new session.
        let reloaded = HistoryStore::at(dir.path().join("history.json")).load();
        assert_eq!(reloaded, links);
    }

    #[test]
    fn absent_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let store = HistoryStore::at(dir.path().join("missing.json"));
        assert!(store.load().is_empty());
    }

    #[test]
    fn unparseable_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("history.json");
        fs::write(&path, b"{ not json").unwrap();
        assert!(HistoryStore::at(path).load().is_empty());
    }

    #[test]
    fn save_rewrites_the_file_in_full() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("history.json");
        let store = HistoryStore::at(path.clone());
        store.save(&[link("aaaaa")]).unwrap();
        store.save(&[link("bbbbb"), link("aaaaa")]).unwrap();
        let reloaded = HistoryStore::at(path).load();
        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded[0].alias, "bbbbb");
        assert_eq!(reloaded[1].alias, "aaaaa");
    }
}
