// Transport control for the desktop Spotify client over MPRIS
// We shell out to `playerctl` rather than speaking D-Bus ourselves

use crate::catalog::CatalogSearch;
use crate::config::PlayerConfig;
use crate::error::{BackendError, BackendResult};
use crate::playback::{format_now_playing, PlaybackControl};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::process::Command;
use tracing::debug;

const METADATA_FORMAT: &str = "{{title}}\t{{artist}}";

pub struct PlayerctlPlayer {
    program: String,
    player: String,
    catalog: Arc<dyn CatalogSearch>, // resolves artist names to playable URIs
}

impl PlayerctlPlayer {
    pub fn new(config: &PlayerConfig, catalog: Arc<dyn CatalogSearch>) -> Self {
        Self {
            program: config.playerctl.clone(),
            player: config.name.clone(),
            catalog,
        }
    }

    /// Run one playerctl command against our player and return its trimmed stdout
    async fn run(&self, args: &[&str]) -> BackendResult<String> {
        debug!("{} -p {} {}", self.program, self.player, args.join(" "));

        let output = Command::new(&self.program)
            .arg("-p")
            .arg(&self.player)
            .args(args)
            .output()
            .await
            .map_err(|e| BackendError::Unavailable(format!("failed to run {}: {}", self.program, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(BackendError::Unavailable(format!(
                "{} {} failed: {}",
                self.program,
                args.first().copied().unwrap_or_default(),
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

fn parse_metadata(stdout: &str) -> String {
    let mut fields = stdout.splitn(2, '\t');
    let title = fields.next().unwrap_or_default();
    let artist = fields.next().unwrap_or_default();
    format_now_playing(title, artist)
}

#[async_trait]
impl PlaybackControl for PlayerctlPlayer {
    async fn play_pause(&self) -> BackendResult<()> {
        self.run(&["play-pause"]).await.map(|_| ())
    }

    async fn next(&self) -> BackendResult<()> {
        self.run(&["next"]).await.map(|_| ())
    }

    async fn previous(&self) -> BackendResult<()> {
        self.run(&["previous"]).await.map(|_| ())
    }

    async fn play_uri(&self, uri: &str) -> BackendResult<()> {
        self.run(&["open", uri]).await.map(|_| ())
    }

    async fn play_artist(&self, name: &str) -> BackendResult<()> {
        let uri = self
            .catalog
            .find_artist(name)
            .await?
            .ok_or_else(|| BackendError::Unavailable(format!("no catalog artist matches '{name}'")))?;
        self.play_uri(&uri).await
    }

    async fn now_playing(&self) -> BackendResult<String> {
        let stdout = self.run(&["metadata", "--format", METADATA_FORMAT]).await?;
        Ok(parse_metadata(&stdout))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ResultSet;

    struct NoCatalog;

    #[async_trait]
    impl CatalogSearch for NoCatalog {
        async fn search(&self, query: &str) -> BackendResult<ResultSet> {
            Ok(ResultSet::empty(query))
        }

        async fn find_artist(&self, _name: &str) -> BackendResult<Option<String>> {
            Ok(None)
        }
    }

    fn player(program: &str) -> PlayerctlPlayer {
        let config = PlayerConfig {
            name: "spotify".to_string(),
            playerctl: program.to_string(),
        };
        PlayerctlPlayer::new(&config, Arc::new(NoCatalog))
    }

    #[test]
    fn test_parse_metadata() {
        assert_eq!(parse_metadata("Airbag\tRadiohead"), "Airbag by Radiohead");
        assert_eq!(parse_metadata("Airbag"), "Airbag by Unknown Artist");
        assert_eq!(parse_metadata(""), "Unknown Title by Unknown Artist");
    }

    #[tokio::test]
    async fn test_missing_program_is_unavailable() {
        let player = player("tunedeck-no-such-playerctl");
        assert!(matches!(player.play_pause().await, Err(BackendError::Unavailable(_))));
        assert!(matches!(player.now_playing().await, Err(BackendError::Unavailable(_))));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failing_command_is_unavailable() {
        let player = player("false");
        assert!(matches!(player.next().await, Err(BackendError::Unavailable(_))));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_successful_command() {
        let player = player("true");
        assert!(player.previous().await.is_ok());
        assert!(player.play_uri("spotify:track:1").await.is_ok());
    }

    #[tokio::test]
    async fn test_unknown_artist_is_unavailable() {
        let player = player("true");
        assert!(matches!(player.play_artist("Nobody").await, Err(BackendError::Unavailable(_))));
    }
}
