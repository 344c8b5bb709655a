//! Event dispatch
//!
//! [`Game`] owns the single [`Session`] and is the only way to mutate it.
//! Connectivity callbacks and UI actions are funneled through [`Game::handle`]
//! as [`GameEvent`]s; each call returns the ordered [`Notification`]s the
//! surrounding runtime should act on. `&mut self` makes every call a critical
//! section: a round cannot be observed half resolved.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::choice::Choice;
use crate::codec::{decode_choice, encode_choice};
use crate::error::GameError;
use crate::lifecycle;
use crate::resolver;
use crate::session::{MatchSummary, RoundResult, Session};

/// Inbound events, from either the UI or the connectivity layer
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    BeginPairing,
    Connected { opponent: String },
    Disconnected,
    LocalChoice(Choice),
    RemoteChoice(Choice),
    /// Raw bytes as delivered by the connectivity layer
    RemotePayload(Vec<u8>),
}

/// Outbound effects and observations, in the order they happened
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Notification {
    /// Pairing started; the runtime should advertise and discover
    Searching,
    Connected { opponent: String },
    /// Payload to hand to the connectivity layer for the paired endpoint
    Send(Vec<u8>),
    ChoiceLocked(Choice),
    ControlsEnabled(bool),
    /// Outcome and updated scores, always together
    RoundResolved(RoundResult),
    MatchEnded(MatchSummary),
    /// Session is back to empty
    Reset,
}

#[derive(Clone, Debug, Default)]
pub struct Game {
    session: Session,
    history: Vec<RoundResult>,
}

impl Game {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Rounds resolved in the current session, oldest first
    pub fn history(&self) -> &[RoundResult] {
        &self.history
    }

    /// Apply one event. On error the session is unchanged.
    pub fn handle(&mut self, event: GameEvent) -> Result<Vec<Notification>, GameError> {
        match event {
            GameEvent::BeginPairing => {
                let started = lifecycle::begin_pairing(&mut self.session)?;
                Ok(if started {
                    vec![Notification::Searching]
                } else {
                    Vec::new()
                })
            }
            GameEvent::Connected { opponent } => {
                lifecycle::on_connected(&mut self.session, opponent.clone())?;
                self.history.clear();
                Ok(vec![
                    Notification::Connected { opponent },
                    Notification::ControlsEnabled(true),
                ])
            }
            GameEvent::Disconnected => Ok(self.disconnect()),
            GameEvent::LocalChoice(choice) => {
                let resolved = resolver::submit_local_choice(&mut self.session, choice)?;
                let mut notifications = vec![
                    Notification::Send(encode_choice(choice)),
                    Notification::ChoiceLocked(choice),
                    Notification::ControlsEnabled(false),
                ];
                self.push_resolution(resolved, &mut notifications);
                Ok(notifications)
            }
            GameEvent::RemoteChoice(choice) => {
                let resolved = resolver::receive_remote_choice(&mut self.session, choice)?;
                let mut notifications = Vec::new();
                self.push_resolution(resolved, &mut notifications);
                Ok(notifications)
            }
            GameEvent::RemotePayload(payload) => {
                let choice = decode_choice(&payload).map_err(|err| {
                    warn!(%err, "rejected remote payload");
                    err
                })?;
                self.handle(GameEvent::RemoteChoice(choice))
            }
        }
    }

    fn disconnect(&mut self) -> Vec<Notification> {
        let mut notifications = Vec::with_capacity(3);
        if let Some(summary) = lifecycle::on_disconnected(&mut self.session) {
            notifications.push(Notification::MatchEnded(summary));
        }
        self.history.clear();
        notifications.push(Notification::Reset);
        notifications.push(Notification::ControlsEnabled(false));
        notifications
    }

    fn push_resolution(&mut self, resolved: Option<RoundResult>, out: &mut Vec<Notification>) {
        if let Some(result) = resolved {
            self.history.push(result.clone());
            out.push(Notification::RoundResolved(result));
            out.push(Notification::ControlsEnabled(true));
        }
    }

    pub fn begin_pairing(&mut self) -> Result<Vec<Notification>, GameError> {
        self.handle(GameEvent::BeginPairing)
    }

    pub fn on_connected(&mut self, opponent: &str) -> Result<Vec<Notification>, GameError> {
        self.handle(GameEvent::Connected {
            opponent: opponent.to_owned(),
        })
    }

    /// Infallible: disconnect is valid from every state
    pub fn on_disconnected(&mut self) -> Vec<Notification> {
        self.disconnect()
    }

    pub fn submit_local_choice(&mut self, choice: Choice) -> Result<Vec<Notification>, GameError> {
        self.handle(GameEvent::LocalChoice(choice))
    }

    pub fn receive_remote_choice(
        &mut self,
        choice: Choice,
    ) -> Result<Vec<Notification>, GameError> {
        self.handle(GameEvent::RemoteChoice(choice))
    }

    pub fn on_choice_bytes_received(
        &mut self,
        payload: &[u8],
    ) -> Result<Vec<Notification>, GameError> {
        self.handle(GameEvent::RemotePayload(payload.to_vec()))
    }
}
