// Backend failures - everything the playback and catalog clients can report
// The navigator never lets one of these escape the event loop

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackendError {
    /// The remote side (player process, web API) could not be reached or refused the command
    #[error("backend unavailable: {0}")]
    Unavailable(String),

    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected response: {0}")]
    Decode(String),
}

pub type BackendResult<T> = std::result::Result<T, BackendError>;
