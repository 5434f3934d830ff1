use befriend_social::twitter::{FailureKind, TwitterError};
use thiserror::Error;

/// A discovery step failed. Every variant is fatal for the run.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("loading friends failed: {0}")]
    Snapshot(#[source] TwitterError),
    #[error("user search failed: {0}")]
    ProfileSearch(#[source] TwitterError),
    #[error("tweet search failed: {0}")]
    TweetSearch(#[source] TwitterError),
}

impl DiscoveryError {
    pub fn kind(&self) -> FailureKind {
        match self {
            DiscoveryError::Snapshot(e)
            | DiscoveryError::ProfileSearch(e)
            | DiscoveryError::TweetSearch(e) => e.kind(),
        }
    }
}
