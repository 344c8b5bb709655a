//! Runtime errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PeerError {
    #[error("proximity medium has shut down")]
    MediumClosed,

    #[error("peer task has stopped")]
    PeerStopped,

    #[error("peer task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
