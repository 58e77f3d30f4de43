// tunedeck library - terminal remote for a Spotify session
// Backends sit behind traits so the UI can be driven by stubs in tests

pub mod catalog;  // search result model + search backend trait
pub mod config;   // settings and preferences
pub mod error;    // backend error type
pub mod playback; // transport backend trait
pub mod recent;   // recently played artists, persisted
pub mod spotify;  // Web API search + playerctl transport
pub mod ui;       // terminal interface

// Export the stuff other modules actually use
pub use catalog::{CatalogEntry, CatalogSearch, ResultSet, Selection};
pub use config::Config;
pub use error::{BackendError, BackendResult};
pub use playback::PlaybackControl;
pub use recent::RecentArtists;
