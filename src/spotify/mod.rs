// Spotify integration - catalog search via the Web API, transport via the desktop client

mod playerctl; // MPRIS control through the playerctl CLI
mod web_api;   // client-credentials search

pub use playerctl::PlayerctlPlayer;
pub use web_api::SpotifyCatalog;
