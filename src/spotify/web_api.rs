// Spotify Web API catalog search
// Client-credentials flow: no user login, just app credentials and a short lived token

use crate::catalog::{CatalogEntry, CatalogSearch, ResultSet};
use crate::config::SpotifyConfig;
use crate::error::{BackendError, BackendResult};
use crate::playback::UNKNOWN_ARTIST;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, info};

const TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
const SEARCH_URL: &str = "https://api.spotify.com/v1/search";

// Refresh a little before Spotify says the token dies
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64, // seconds
}

#[derive(Debug)]
struct CachedToken {
    value: String,
    expires_at: Instant,
}

#[derive(Debug, Default, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    tracks: Option<Page<Item>>,
    #[serde(default)]
    albums: Option<Page<Item>>,
    #[serde(default)]
    artists: Option<Page<ArtistRef>>,
}

#[derive(Debug, Deserialize)]
struct Page<T> {
    // Spotify occasionally returns null entries inside `items`
    #[serde(default = "Vec::new")]
    items: Vec<Option<T>>,
}

#[derive(Debug, Deserialize)]
struct Item {
    name: String,
    uri: String,
    #[serde(default)]
    artists: Vec<ArtistRef>,
}

#[derive(Debug, Deserialize)]
struct ArtistRef {
    name: String,
    #[serde(default)]
    uri: Option<String>,
}

impl Item {
    fn into_entry(self) -> CatalogEntry {
        let artist = self
            .artists
            .into_iter()
            .next()
            .map(|a| a.name)
            .unwrap_or_else(|| UNKNOWN_ARTIST.to_string());
        CatalogEntry::new(self.name, artist, self.uri)
    }
}

fn entries(page: Option<Page<Item>>) -> Vec<CatalogEntry> {
    page.map(|p| p.items.into_iter().flatten().map(Item::into_entry).collect())
        .unwrap_or_default()
}

fn into_result_set(query: &str, response: SearchResponse) -> ResultSet {
    ResultSet::new(query, entries(response.tracks), entries(response.albums))
}

pub struct SpotifyCatalog {
    http: reqwest::Client,
    client_id: Option<String>,
    client_secret: Option<String>,
    limit: u32,
    market: Option<String>,
    token: Mutex<Option<CachedToken>>,
}

impl SpotifyCatalog {
    pub fn new(config: &SpotifyConfig) -> BackendResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            limit: config.search_limit,
            market: config.market.clone(),
            token: Mutex::new(None),
        })
    }

    async fn access_token(&self) -> BackendResult<String> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref() {
            if Instant::now() < token.expires_at {
                return Ok(token.value.clone());
            }
        }

        let (Some(id), Some(secret)) = (&self.client_id, &self.client_secret) else {
            return Err(BackendError::Auth(
                "SPOTIFY_CLIENT_ID / SPOTIFY_CLIENT_SECRET are not configured".to_string(),
            ));
        };

        debug!("Requesting Spotify access token");
        let response = self
            .http
            .post(TOKEN_URL)
            .basic_auth(id, Some(secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(BackendError::Auth(format!("token endpoint returned {}", response.status())));
        }

        let token: TokenResponse = response.json().await?;
        let lifetime = Duration::from_secs(token.expires_in).saturating_sub(TOKEN_EXPIRY_MARGIN);
        info!("Spotify token acquired, valid for {}s", lifetime.as_secs());

        *cached = Some(CachedToken {
            value: token.access_token.clone(),
            expires_at: Instant::now() + lifetime,
        });
        Ok(token.access_token)
    }

    async fn query(&self, q: &str, kinds: &str, limit: u32) -> BackendResult<SearchResponse> {
        let token = self.access_token().await?;

        let limit = limit.to_string();
        let mut params = vec![("q", q), ("type", kinds), ("limit", limit.as_str())];
        if let Some(market) = &self.market {
            params.push(("market", market.as_str()));
        }

        let response = self
            .http
            .get(SEARCH_URL)
            .bearer_auth(token)
            .query(&params)
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => Ok(response.json().await?),
            StatusCode::UNAUTHORIZED => {
                // Token revoked early - forget it so the next call fetches a new one
                self.token.lock().await.take();
                Err(BackendError::Auth("search rejected the access token".to_string()))
            }
            status => Err(BackendError::Unavailable(format!("search returned {status}"))),
        }
    }
}

#[async_trait]
impl CatalogSearch for SpotifyCatalog {
    async fn search(&self, query: &str) -> BackendResult<ResultSet> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(ResultSet::empty(query));
        }

        let response = self.query(query, "track,album", self.limit).await?;
        let results = into_result_set(query, response);
        debug!(
            "Search '{}' -> {} tracks, {} albums",
            query,
            results.tracks().len(),
            results.albums().len()
        );
        Ok(results)
    }

    async fn find_artist(&self, name: &str) -> BackendResult<Option<String>> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(None);
        }

        let response = self.query(name, "artist", 1).await?;
        Ok(response
            .artists
            .and_then(|page| page.items.into_iter().flatten().find_map(|a| a.uri)))
    }
}
