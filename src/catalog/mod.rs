// Catalog search results - one immutable snapshot per submitted query
// Tracks and albums share a single selection index space (tracks first, then albums)

use crate::error::BackendResult;
use async_trait::async_trait;

/// A playable catalog item: a track or an album
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub name: String,
    pub artist: String, // primary artist only
    pub uri: String,
}

impl CatalogEntry {
    pub fn new(name: impl Into<String>, artist: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            artist: artist.into(),
            uri: uri.into(),
        }
    }

    pub fn display_line(&self) -> String {
        format!("{} by {}", self.name, self.artist)
    }
}

/// What a combined selection index points at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection<'a> {
    Track(&'a CatalogEntry),
    Album(&'a CatalogEntry),
}

impl<'a> Selection<'a> {
    pub fn entry(&self) -> &'a CatalogEntry {
        match self {
            Selection::Track(entry) | Selection::Album(entry) => entry,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSet {
    query: String,
    tracks: Vec<CatalogEntry>,
    albums: Vec<CatalogEntry>,
}

impl ResultSet {
    pub fn new(query: impl Into<String>, tracks: Vec<CatalogEntry>, albums: Vec<CatalogEntry>) -> Self {
        Self {
            query: query.into(),
            tracks,
            albums,
        }
    }

    pub fn empty(query: impl Into<String>) -> Self {
        Self::new(query, Vec::new(), Vec::new())
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn tracks(&self) -> &[CatalogEntry] {
        &self.tracks
    }

    pub fn albums(&self) -> &[CatalogEntry] {
        &self.albums
    }

    /// Size of the combined selection space
    pub fn len(&self) -> usize {
        self.tracks.len() + self.albums.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Resolve a combined index: `index < tracks.len()` is a track, the rest are albums
    pub fn resolve(&self, index: usize) -> Option<Selection<'_>> {
        if index < self.tracks.len() {
            Some(Selection::Track(&self.tracks[index]))
        } else {
            self.albums
                .get(index - self.tracks.len())
                .map(Selection::Album)
        }
    }
}

/// Catalog search backend
#[async_trait]
pub trait CatalogSearch: Send + Sync {
    /// Tracks and albums matching `query`. No matches is an empty set, not an error.
    async fn search(&self, query: &str) -> BackendResult<ResultSet>;

    /// Playable URI for the best artist match, if any
    async fn find_artist(&self, name: &str) -> BackendResult<Option<String>>;
}
