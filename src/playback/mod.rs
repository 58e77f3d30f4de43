// Playback control - the transport side of the dashboard
// Implementations talk to whatever is actually producing sound; the UI only sees this trait

use crate::error::BackendResult;
use async_trait::async_trait;

pub const UNKNOWN_TITLE: &str = "Unknown Title";
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";

#[async_trait]
pub trait PlaybackControl: Send + Sync {
    async fn play_pause(&self) -> BackendResult<()>;
    async fn next(&self) -> BackendResult<()>;
    async fn previous(&self) -> BackendResult<()>;
    async fn play_uri(&self, uri: &str) -> BackendResult<()>;
    async fn play_artist(&self, name: &str) -> BackendResult<()>;

    /// Human readable "title by artist"
    async fn now_playing(&self) -> BackendResult<String>;
}

/// Build the now-playing line, substituting placeholders for missing metadata
pub fn format_now_playing(title: &str, artist: &str) -> String {
    let title = title.trim();
    let artist = artist.trim();
    format!(
        "{} by {}",
        if title.is_empty() { UNKNOWN_TITLE } else { title },
        if artist.is_empty() { UNKNOWN_ARTIST } else { artist },
    )
}
