// Recently played artists - small, deduplicated, most-recent-first
// Backed by a plain text file (one artist per line) rewritten on every change

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const MAX_RECENT_ARTISTS: usize = 10;

#[derive(Debug, Clone)]
pub struct RecentArtists {
    artists: Vec<String>, // index 0 is the most recent
    path: PathBuf,
}

impl RecentArtists {
    /// Load from disk. A missing file is an empty list.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let artists = if path.exists() {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read recent artists from {}", path.display()))?;
            Self::parse(&content)
        } else {
            debug!("No recent artists file at {}, starting empty", path.display());
            Vec::new()
        };

        info!("Loaded {} recent artists from {}", artists.len(), path.display());
        Ok(Self { artists, path })
    }

    /// Normalize whatever is on disk: trim, skip blanks, drop repeats, cap length
    fn parse(content: &str) -> Vec<String> {
        let mut artists: Vec<String> = Vec::new();
        for name in content.lines().map(str::trim).filter(|l| !l.is_empty()) {
            if !artists.iter().any(|a| a == name) {
                artists.push(name.to_string());
            }
        }
        artists.truncate(MAX_RECENT_ARTISTS);
        artists
    }

    /// Move `name` to the front, evicting the oldest entry past the cap, then persist.
    pub fn push(&mut self, name: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(());
        }

        let mut updated = self.artists.clone();
        if let Some(pos) = updated.iter().position(|a| a == name) {
            updated.remove(pos);
        }
        updated.insert(0, name.to_string());
        updated.truncate(MAX_RECENT_ARTISTS);

        // Only adopt the new order once it is on disk
        write_list(&self.path, &updated)?;
        debug!("Recent artists now: {:?}", updated);
        self.artists = updated;
        Ok(())
    }

    pub fn as_slice(&self) -> &[String] {
        &self.artists
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.artists.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.artists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artists.is_empty()
    }
}

/// Whole-file rewrite
fn write_list(path: &Path, artists: &[String]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut content = String::new();
    for artist in artists {
        content.push_str(artist);
        content.push('\n');
    }

    fs::write(path, content)
        .with_context(|| format!("Failed to write recent artists to {}", path.display()))?;
    Ok(())
}
