//! Session state shared by the lifecycle manager and the round resolver

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::choice::{Choice, Outcome};

/// Pairing state machine
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PairingState {
    #[default]
    Idle,
    Searching,
    Connected,
}

impl fmt::Display for PairingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PairingState::Idle => "idle",
            PairingState::Searching => "searching",
            PairingState::Connected => "connected",
        })
    }
}

/// Which participant a choice belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Local,
    Remote,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Side::Local => "local",
            Side::Remote => "remote",
        })
    }
}

/// Result of a single resolved round
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundResult {
    /// Zero-based round index within the session
    pub round: u32,
    pub local: Choice,
    pub remote: Choice,
    pub outcome: Outcome,
    /// Cumulative scores after this round
    pub local_score: u32,
    pub remote_score: u32,
}

impl RoundResult {
    pub fn status_text(&self) -> String {
        self.outcome.describe(self.local, self.remote)
    }

    pub fn score_text(&self) -> String {
        format_score(self.local_score, self.remote_score)
    }
}

/// Final tally of a session that ended with a disconnect
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSummary {
    pub opponent: String,
    pub rounds_played: u32,
    pub local_score: u32,
    pub remote_score: u32,
}

/// The single active pairing.
///
/// Invariant: when not connected, both choices are `None`, both scores are zero
/// and there is no opponent.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Session {
    pub(crate) pairing: PairingState,
    pub(crate) opponent: Option<String>,
    pub(crate) local_choice: Option<Choice>,
    pub(crate) remote_choice: Option<Choice>,
    pub(crate) local_score: u32,
    pub(crate) remote_score: u32,
    pub(crate) rounds_played: u32,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pairing(&self) -> PairingState {
        self.pairing
    }

    pub fn is_connected(&self) -> bool {
        self.pairing == PairingState::Connected
    }

    pub fn opponent(&self) -> Option<&str> {
        self.opponent.as_deref()
    }

    pub fn local_choice(&self) -> Option<Choice> {
        self.local_choice
    }

    pub fn remote_choice(&self) -> Option<Choice> {
        self.remote_choice
    }

    pub fn local_score(&self) -> u32 {
        self.local_score
    }

    pub fn remote_score(&self) -> u32 {
        self.remote_score
    }

    pub fn rounds_played(&self) -> u32 {
        self.rounds_played
    }

    /// `"<local> : <remote>"`
    pub fn score_text(&self) -> String {
        format_score(self.local_score, self.remote_score)
    }

    pub(crate) fn clear_round(&mut self) {
        self.local_choice = None;
        self.remote_choice = None;
    }

    /// Back to the empty, not-connected session
    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }
}

fn format_score(local: u32, remote: u32) -> String {
    format!("{local} : {remote}")
}
