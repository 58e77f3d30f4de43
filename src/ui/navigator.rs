// Navigation state machine - which panel has focus and what each key does there
// One owned struct, one mode tag; the event loop feeds it actions and redraws from it

use super::events::Action;
use crate::catalog::{CatalogSearch, ResultSet};
use crate::error::BackendResult;
use crate::playback::PlaybackControl;
use crate::recent::RecentArtists;
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Active mode plus the state that only exists while it is active
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Idle,
    Search { text: String },
    Recent { cursor: usize },
    SearchResults { results: ResultSet, cursor: usize },
}

/// Payload-free copy of the mode tag, for key mapping and rendering decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeKind {
    Idle,
    Search,
    Recent,
    SearchResults,
}

impl Mode {
    pub fn kind(&self) -> ModeKind {
        match self {
            Mode::Idle => ModeKind::Idle,
            Mode::Search { .. } => ModeKind::Search,
            Mode::Recent { .. } => ModeKind::Recent,
            Mode::SearchResults { .. } => ModeKind::SearchResults,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Transport {
    PlayPause,
    Next,
    Previous,
}

/// Step a list cursor by one, staying inside `[0, len - 1]` (or at 0 for an empty list)
fn step_cursor(cursor: usize, len: usize, up: bool) -> usize {
    if len == 0 {
        return 0;
    }
    if up {
        cursor.saturating_sub(1).min(len - 1)
    } else {
        (cursor + 1).min(len - 1)
    }
}

pub struct Navigator {
    mode: Mode,
    running: bool,
    recent: RecentArtists,
    now_playing: String,
    backend_offline: bool,
    playback: Arc<dyn PlaybackControl>,
    catalog: Arc<dyn CatalogSearch>,
}

impl Navigator {
    pub fn new(
        recent: RecentArtists,
        playback: Arc<dyn PlaybackControl>,
        catalog: Arc<dyn CatalogSearch>,
    ) -> Self {
        Self {
            mode: Mode::Idle,
            running: true,
            recent,
            now_playing: "Nothing playing".to_string(),
            backend_offline: false,
            playback,
            catalog,
        }
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn mode_kind(&self) -> ModeKind {
        self.mode.kind()
    }

    pub fn recent(&self) -> &RecentArtists {
        &self.recent
    }

    pub fn now_playing(&self) -> &str {
        &self.now_playing
    }

    pub fn is_backend_offline(&self) -> bool {
        self.backend_offline
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Resize recovery: drop whatever was in progress and start over from Idle
    pub fn reset(&mut self) {
        debug!("Navigator reset from {:?}", self.mode.kind());
        self.mode = Mode::Idle;
    }

    /// Used by the event loop after a failed action
    pub fn fall_back_to_idle(&mut self) {
        self.mode = Mode::Idle;
    }

    pub async fn handle(&mut self, action: Action) -> Result<()> {
        if action == Action::Quit {
            info!("Quit requested");
            self.running = false;
            return Ok(());
        }

        match self.mode.kind() {
            ModeKind::Idle => self.handle_idle(action).await,
            ModeKind::Search => self.handle_search(action).await,
            ModeKind::Recent => self.handle_recent(action).await,
            ModeKind::SearchResults => self.handle_results(action).await,
        }
    }

    async fn handle_idle(&mut self, action: Action) -> Result<()> {
        match action {
            Action::OpenSearch => {
                self.mode = Mode::Search { text: String::new() };
            }
            Action::OpenRecent => {
                self.mode = Mode::Recent { cursor: 0 };
            }
            Action::TogglePlayPause => self.transport(Transport::PlayPause).await,
            Action::NextTrack => self.transport(Transport::Next).await,
            Action::PreviousTrack => self.transport(Transport::Previous).await,
            _ => {}
        }
        Ok(())
    }

    async fn handle_search(&mut self, action: Action) -> Result<()> {
        let Mode::Search { text } = &mut self.mode else {
            return Ok(());
        };

        match action {
            Action::Input(c) => text.push(c),
            Action::Backspace => {
                text.pop();
            }
            Action::Back => self.mode = Mode::Idle,
            Action::Select => {
                let query = std::mem::take(text);
                let results = self.search(&query).await;
                self.mode = Mode::SearchResults { results, cursor: 0 };
            }
            _ => {}
        }
        Ok(())
    }

    async fn handle_recent(&mut self, action: Action) -> Result<()> {
        let Mode::Recent { cursor } = &mut self.mode else {
            return Ok(());
        };
        let len = self.recent.len();

        match action {
            Action::Up | Action::Down => *cursor = step_cursor(*cursor, len, action == Action::Up),
            Action::Back => self.mode = Mode::Idle,
            Action::Select => {
                let Some(artist) = self.recent.get(*cursor).map(str::to_string) else {
                    return Ok(());
                };
                self.mode = Mode::Idle;

                info!("Playing recent artist '{}'", artist);
                let outcome = self.playback.play_artist(&artist).await;
                self.note_backend("play artist", outcome);
                self.refresh_now_playing().await;
            }
            Action::TogglePlayPause => self.transport(Transport::PlayPause).await,
            Action::NextTrack => self.transport(Transport::Next).await,
            Action::PreviousTrack => self.transport(Transport::Previous).await,
            _ => {}
        }
        Ok(())
    }

    async fn handle_results(&mut self, action: Action) -> Result<()> {
        let Mode::SearchResults { results, cursor } = &mut self.mode else {
            return Ok(());
        };

        match action {
            Action::Up | Action::Down => {
                *cursor = step_cursor(*cursor, results.len(), action == Action::Up);
            }
            Action::Back => self.mode = Mode::Idle,
            Action::Select => {
                let Some(entry) = results.resolve(*cursor).map(|s| s.entry().clone()) else {
                    return Ok(());
                };
                // Leaving the mode discards the result set
                self.mode = Mode::Idle;

                info!("Playing '{}' ({})", entry.display_line(), entry.uri);
                let outcome = self.playback.play_uri(&entry.uri).await;
                self.note_backend("play uri", outcome);
                // Now playing is refreshed even when the recent list can't be written
                let persisted = self.recent.push(&entry.artist);
                self.refresh_now_playing().await;
                persisted?;
            }
            Action::TogglePlayPause => self.transport(Transport::PlayPause).await,
            Action::NextTrack => self.transport(Transport::Next).await,
            Action::PreviousTrack => self.transport(Transport::Previous).await,
            _ => {}
        }
        Ok(())
    }

    async fn transport(&mut self, command: Transport) {
        debug!("Transport {:?}", command);
        let outcome = match command {
            Transport::PlayPause => self.playback.play_pause().await,
            Transport::Next => self.playback.next().await,
            Transport::Previous => self.playback.previous().await,
        };
        self.note_backend("transport", outcome);
        self.refresh_now_playing().await;
    }

    /// Search failures degrade to an empty result set
    async fn search(&self, query: &str) -> ResultSet {
        match self.catalog.search(query).await {
            Ok(results) => results,
            Err(e) => {
                warn!("Search for '{}' failed: {}", query, e);
                ResultSet::empty(query)
            }
        }
    }

    /// Keeps the last known text when the player can't be reached
    pub async fn refresh_now_playing(&mut self) {
        let outcome = self.playback.now_playing().await;
        if let Some(text) = self.note_backend("now playing", outcome) {
            self.now_playing = text;
        }
    }

    fn note_backend<T>(&mut self, what: &str, outcome: BackendResult<T>) -> Option<T> {
        match outcome {
            Ok(value) => {
                self.backend_offline = false;
                Some(value)
            }
            Err(e) => {
                warn!("Playback backend failed ({}): {}", what, e);
                self.backend_offline = true;
                None
            }
        }
    }
}
