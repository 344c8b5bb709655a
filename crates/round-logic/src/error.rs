//! Error taxonomy for the game session

use thiserror::Error;

use crate::session::{PairingState, Side};

/// Every error here is recoverable at the session level.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum GameError {
    /// Remote payload did not decode to a choice name. `remote_choice` is left untouched.
    #[error("payload {payload:?} does not name a choice")]
    InvalidChoiceEncoding { payload: String },

    #[error("{side} choice submitted while not connected")]
    SubmissionWhileDisconnected { side: Side },

    #[error("cannot {event} while {from}")]
    InvalidTransition {
        from: PairingState,
        event: &'static str,
    },
}

impl GameError {
    pub(crate) fn invalid_payload(payload: &[u8]) -> Self {
        Self::InvalidChoiceEncoding {
            payload: String::from_utf8_lossy(payload).into_owned(),
        }
    }
}
